use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["cptrack-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_profile_with_subset_of_handles() {
    let cli = Cli::try_parse_from(["cptrack-cli", "profile", "--cf", "tourist", "--lc", "neal_wu"])
        .expect("expected valid cli args");

    let Some(Commands::Profile {
        cf,
        cc,
        ac,
        lc,
        pretty,
    }) = cli.command
    else {
        panic!("expected profile command");
    };
    assert_eq!(cf.as_deref(), Some("tourist"));
    assert_eq!(cc, None);
    assert_eq!(ac, None);
    assert_eq!(lc.as_deref(), Some("neal_wu"));
    assert!(!pretty);
}

#[test]
fn parses_verify_with_short_platform_code() {
    let cli = Cli::try_parse_from(["cptrack-cli", "verify", "ac", "chokudai", "--pretty"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Verify {
            platform: Platform::Atcoder,
            ref handle,
            pretty: true,
        }) if handle == "chokudai"
    ));
}

#[test]
fn verify_rejects_unknown_platform() {
    let result = Cli::try_parse_from(["cptrack-cli", "verify", "topcoder", "someone"]);
    assert!(result.is_err());
}

#[test]
fn verify_requires_handle() {
    let result = Cli::try_parse_from(["cptrack-cli", "verify", "codeforces"]);
    assert!(result.is_err());
}
