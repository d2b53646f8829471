use super::*;
use clap::error::ErrorKind;

#[test]
fn test_short_and_long_podfile_flags() {
    let cli = Cli::try_parse_from(["pod-source-fix", "-f", "ios/Podfile"]).unwrap();
    assert_eq!(cli.podfile.as_deref(), Some("ios/Podfile"));

    let cli = Cli::try_parse_from(["pod-source-fix", "--podfile", "Podfile"]).unwrap();
    assert_eq!(cli.podfile.as_deref(), Some("Podfile"));
}

#[test]
fn test_podfile_is_optional_for_the_parser() {
    // The binary reports the missing flag itself so it can exit with status 1
    let cli = Cli::try_parse_from(["pod-source-fix"]).unwrap();
    assert!(cli.podfile.is_none());
}

#[test]
fn test_help_flag() {
    let err = Cli::try_parse_from(["pod-source-fix", "-h"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);

    let err = Cli::try_parse_from(["pod-source-fix", "--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
}

#[test]
fn test_usage_errors_exit_with_1() {
    let err = Cli::try_parse_from(["pod-source-fix", "-f"]).unwrap_err();
    assert_eq!(usage_exit_code(&err), 1);

    let err = Cli::try_parse_from(["pod-source-fix", "--bogus"]).unwrap_err();
    assert_eq!(usage_exit_code(&err), 1);

    let err = Cli::try_parse_from(["pod-source-fix", "--help"]).unwrap_err();
    assert_eq!(usage_exit_code(&err), 0);

    let err = Cli::try_parse_from(["pod-source-fix", "--version"]).unwrap_err();
    assert_eq!(usage_exit_code(&err), 0);
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let err = Cli::try_parse_from(["pod-source-fix", "-f", "Podfile", "-v", "-q"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_build_config_log_levels() {
    let cli = Cli::try_parse_from(["pod-source-fix", "-f", "Podfile"]).unwrap();
    let config = cli.build_config();
    assert_eq!(config.log_level.as_deref(), Some("info"));
    assert!(!config.quiet);

    let cli = Cli::try_parse_from(["pod-source-fix", "-f", "Podfile", "--verbose"]).unwrap();
    let config = cli.build_config();
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert!(config.verbose);

    let cli = Cli::try_parse_from(["pod-source-fix", "-f", "Podfile", "-q"]).unwrap();
    let config = cli.build_config();
    assert_eq!(config.log_level, None);
    assert!(config.quiet);
}

#[test]
fn test_pod_bin_and_repos_dir_flags() {
    let cli = Cli::try_parse_from([
        "pod-source-fix",
        "-f",
        "Podfile",
        "--pod-bin",
        "/opt/pod",
        "--repos-dir",
        "/tmp/repos",
    ])
    .unwrap();
    assert_eq!(cli.pod_bin.as_deref(), Some("/opt/pod"));
    assert_eq!(cli.repos_dir.as_deref(), Some("/tmp/repos"));
}

#[tokio::test]
async fn test_missing_podfile_is_reported() {
    let cli = Cli::try_parse_from(["pod-source-fix", "-q"]).unwrap();
    let err = cli.execute_with_config(CliConfig::new()).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<SourceFixError>(), Some(SourceFixError::PodfileMissing)));
}

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}
