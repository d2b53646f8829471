//! Source URI classification.
//!
//! Decides whether a Podfile source needs to be pre-registered. The URI is
//! matched against the RFC 3986 `URI-reference` grammar, so both absolute URIs
//! and relative references parse:
//!
//! | Input | Result | Needs fix |
//! |-------|--------|-----------|
//! | `https://github.com/org/Specs.git` | `Parsed { scheme: Some("https") }` | no |
//! | `ssh://git@host/org/Specs.git` | `Parsed { scheme: Some("ssh") }` | yes |
//! | `../LocalSpecs` | `Parsed { scheme: None }` | no |
//! | `git@github.com:org/PrivateSpecs.git` | `Unparseable` | yes |
//!
//! SCP-style locations like `git@host:path` are not valid URIs: the part before
//! the colon is not a legal scheme, and a relative path cannot have a colon in
//! its first segment. These are exactly the sources CocoaPods fails to set up
//! on its own, so an unparseable URI is treated like an `ssh` one instead of
//! being reported as an error.

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::SSH_SCHEME;

/// Outcome of parsing a source URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriClass {
    /// The URI is a valid URI reference; `scheme` is `None` for relative references.
    Parsed {
        /// Scheme exactly as written
        scheme: Option<String>,
    },
    /// The URI does not match the URI-reference grammar.
    Unparseable {
        /// Human-readable parse failure
        reason: String,
    },
}

impl UriClass {
    /// Whether the source has to be registered before `pod install`.
    ///
    /// True for unparseable URIs and for URIs whose scheme is exactly `ssh`.
    /// The scheme comparison is case-sensitive.
    #[must_use]
    pub fn needs_fix(&self) -> bool {
        match self {
            Self::Unparseable { .. } => true,
            Self::Parsed { scheme } => scheme.as_deref() == Some(SSH_SCHEME),
        }
    }
}

/// Classify a candidate source URI.
#[must_use]
pub fn classify(uri: &str) -> UriClass {
    let grammar = uri_grammar();

    if let Some(caps) = grammar.absolute.captures(uri) {
        return UriClass::Parsed {
            scheme: caps.name("scheme").map(|m| m.as_str().to_string()),
        };
    }

    if grammar.relative.is_match(uri) {
        return UriClass::Parsed {
            scheme: None,
        };
    }

    UriClass::Unparseable {
        reason: unparseable_reason(uri),
    }
}

fn unparseable_reason(uri: &str) -> String {
    if let Some((head, _)) = uri.split_once(':')
        && !head.contains('/')
    {
        format!("bad URI (is not URI?): '{head}' is not a valid scheme and a relative path cannot contain ':' in its first segment")
    } else {
        "bad URI (is not URI?): contains characters outside the URI grammar".to_string()
    }
}

struct UriGrammar {
    absolute: Regex,
    relative: Regex,
}

fn uri_grammar() -> &'static UriGrammar {
    static GRAMMAR: OnceLock<UriGrammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        let (absolute, relative) = uri_reference_patterns();
        UriGrammar {
            absolute: Regex::new(&absolute).expect("absolute URI grammar must compile"),
            relative: Regex::new(&relative).expect("relative reference grammar must compile"),
        }
    })
}

/// Builds the RFC 3986 `absolute-URI`-with-fragment and `relative-ref` patterns.
fn uri_reference_patterns() -> (String, String) {
    const UNRESERVED: &str = r"A-Za-z0-9\-._~";
    const SUB_DELIMS: &str = r"!$&'()*+,;=";
    const PCT_ENCODED: &str = "%[0-9A-Fa-f]{2}";

    let pchar = format!("(?:[{UNRESERVED}{SUB_DELIMS}:@]|{PCT_ENCODED})");
    let segment_nz_nc = format!("(?:[{UNRESERVED}{SUB_DELIMS}@]|{PCT_ENCODED})+");
    let userinfo = format!("(?:[{UNRESERVED}{SUB_DELIMS}:]|{PCT_ENCODED})*");
    let reg_name = format!("(?:[{UNRESERVED}{SUB_DELIMS}]|{PCT_ENCODED})*");
    let ip_literal = format!(r"\[(?:[0-9A-Fa-f:.]+|v[0-9A-Fa-f]+\.[{UNRESERVED}{SUB_DELIMS}:]+)\]");

    let authority = format!("(?:{userinfo}@)?(?:{ip_literal}|{reg_name})(?::[0-9]*)?");
    let path_abempty = format!("(?:/{pchar}*)*");
    let path_absolute = format!("/(?:{pchar}+(?:/{pchar}*)*)?");
    let path_rootless = format!("{pchar}+(?:/{pchar}*)*");
    let path_noscheme = format!("{segment_nz_nc}(?:/{pchar}*)*");
    let query = format!("(?:{pchar}|[/?])*");
    let tail = format!(r"(?:\?{query})?(?:#{query})?");

    let absolute = format!(
        r"^(?P<scheme>[A-Za-z][A-Za-z0-9+\-.]*):(?://{authority}{path_abempty}|{path_absolute}|{path_rootless})?{tail}$"
    );
    let relative =
        format!("^(?://{authority}{path_abempty}|{path_absolute}|{path_noscheme})?{tail}$");

    (absolute, relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme_of(class: &UriClass) -> Option<&str> {
        match class {
            UriClass::Parsed { scheme } => scheme.as_deref(),
            UriClass::Unparseable { .. } => None,
        }
    }

    #[test]
    fn test_https_source_needs_no_fix() {
        let class = classify("https://github.com/org/Specs.git");
        assert_eq!(
            class,
            UriClass::Parsed {
                scheme: Some("https".to_string())
            }
        );
        assert!(!class.needs_fix());
    }

    #[test]
    fn test_ssh_scheme_needs_fix() {
        let class = classify("ssh://git@host/org/Specs.git");
        assert_eq!(scheme_of(&class), Some("ssh"));
        assert!(class.needs_fix());

        let class = classify("ssh://git@bitbucket.org:7999/team/specs.git");
        assert_eq!(scheme_of(&class), Some("ssh"));
        assert!(class.needs_fix());
    }

    #[test]
    fn test_scp_style_location_is_unparseable() {
        let class = classify("git@github.com:org/PrivateSpecs.git");
        assert!(matches!(class, UriClass::Unparseable { .. }));
        assert!(class.needs_fix());
        assert_eq!(scheme_of(&class), None);
    }

    #[test]
    fn test_scheme_match_is_case_sensitive() {
        let class = classify("SSH://git@host/org/Specs.git");
        assert_eq!(scheme_of(&class), Some("SSH"));
        assert!(!class.needs_fix());
    }

    #[test]
    fn test_other_schemes_and_relative_references() {
        for uri in [
            "https://cdn.cocoapods.org/",
            "http://example.com/specs?ref=main#top",
            "git://example.com/specs.git",
            "file:///Users/me/Specs",
            "git+ssh://git@host/specs.git",
            "../LocalSpecs",
            "/abs/path/Specs",
            "git@github.com/org/Specs.git",
            "",
        ] {
            let class = classify(uri);
            assert!(matches!(class, UriClass::Parsed { .. }), "{uri} should parse");
            assert!(!class.needs_fix(), "{uri} should not need a fix");
        }

        assert_eq!(scheme_of(&classify("../LocalSpecs")), None);
        assert_eq!(scheme_of(&classify("git+ssh://git@host/specs.git")), Some("git+ssh"));
    }

    #[test]
    fn test_invalid_characters_are_unparseable() {
        for uri in ["https://exa mple.com", "https://host/<specs>", "ssh://host/%zz", "ssh://git@host:port/x"]
        {
            let class = classify(uri);
            assert!(matches!(class, UriClass::Unparseable { .. }), "{uri} should not parse");
            assert!(class.needs_fix());
        }
    }

    #[test]
    fn test_ipv6_authority() {
        let class = classify("ssh://git@[::1]:22/specs.git");
        assert_eq!(scheme_of(&class), Some("ssh"));
    }
}
