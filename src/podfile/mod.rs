//! Podfile line scanning
//!
//! The Podfile is Ruby, but this module deliberately does not parse it. A line
//! is a source declaration when, after trimming, it splits on whitespace into
//! at least two tokens and the first one is `source` (any case). The second
//! token, with every `'` and `"` removed, is the candidate URI.
//!
//! ```text
//! source 'https://cdn.cocoapods.org/'            -> https://cdn.cocoapods.org/
//! SOURCE "git@github.com:org/PrivateSpecs.git"   -> git@github.com:org/PrivateSpecs.git
//! source                                         -> not a declaration
//! pod 'Alamofire', '~> 5.0'                      -> not a declaration
//! ```
//!
//! [`PodfileScanner`] yields declarations lazily in file order. Every call to
//! [`PodfileScanner::open`] reads the file again from the top.

use anyhow::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::constants::{LEGACY_SPECS_REPO_URL, SOURCE_KEYWORD};
use crate::core::SourceFixError;

/// A `source` line found in a Podfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDeclaration {
    /// 1-based line number in the Podfile
    pub line_number: usize,
    /// All whitespace-separated tokens of the trimmed line
    pub tokens: Vec<String>,
    /// Second token with quote characters removed
    pub uri: String,
}

/// Parse a single Podfile line into a [`SourceDeclaration`].
///
/// Returns `None` for every line that is not a declaration.
#[must_use]
pub fn parse_source_line(line_number: usize, line: &str) -> Option<SourceDeclaration> {
    let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();

    if tokens.len() < 2 || !tokens[0].eq_ignore_ascii_case(SOURCE_KEYWORD) {
        return None;
    }

    let uri = strip_quotes(&tokens[1]);
    Some(SourceDeclaration {
        line_number,
        tokens,
        uri,
    })
}

/// Remove every single and double quote character from a token.
#[must_use]
pub fn strip_quotes(token: &str) -> String {
    token.chars().filter(|c| !matches!(c, '\'' | '"')).collect()
}

/// Whether the URI points at the legacy git-based master spec repository.
#[must_use]
pub fn is_legacy_specs_repo(uri: &str) -> bool {
    uri.eq_ignore_ascii_case(LEGACY_SPECS_REPO_URL)
}

/// Lazy, single-pass iterator over the source declarations of a Podfile.
///
/// The file handle is owned by the iterator and released when it is dropped.
/// A read error is yielded once and ends the iteration.
pub struct PodfileScanner {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
    failed: bool,
}

impl PodfileScanner {
    /// Open the Podfile at `path` and position the scanner on its first line.
    ///
    /// # Errors
    ///
    /// Returns [`SourceFixError::PodfileNotFound`] if the file does not exist
    /// and [`SourceFixError::PodfileReadError`] if it cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceFixError::PodfileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SourceFixError::PodfileReadError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        tracing::debug!("Scanning Podfile: {}", path.display());

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_number: 0,
            failed: false,
        })
    }
}

impl Iterator for PodfileScanner {
    type Item = Result<SourceDeclaration>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(SourceFixError::PodfileReadError {
                        path: self.path.display().to_string(),
                        reason: e.to_string(),
                    }
                    .into()));
                }
            };
            self.line_number += 1;

            if let Some(declaration) = parse_source_line(self.line_number, &line) {
                tracing::trace!(
                    "Line {}: source declaration {:?}",
                    declaration.line_number,
                    declaration.tokens
                );
                return Some(Ok(declaration));
            }
        }
    }
}
