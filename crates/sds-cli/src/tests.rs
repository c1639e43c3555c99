use super::*;

#[test]
fn parses_query_command_with_request_file() {
    let cli = Cli::try_parse_from(["sds-cli", "query", "--request", "shops.yaml"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Query {
            request,
            units,
            top,
            skip,
            filter,
        } => {
            assert_eq!(request, PathBuf::from("shops.yaml"));
            assert!(units.is_none());
            assert!(top.is_none());
            assert!(skip.is_none());
            assert!(filter.is_none());
        }
        Commands::Parse { .. } => panic!("expected query command"),
    }
}

#[test]
fn parses_query_overrides() {
    let cli = Cli::try_parse_from([
        "sds-cli",
        "query",
        "--request",
        "shops.yaml",
        "--units",
        "mi",
        "--top",
        "10",
        "--skip",
        "20",
        "--filter",
        "PostalCode eq '98004'",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Query {
            units: Some(DistanceUnit::Miles),
            top: Some(10),
            skip: Some(20),
            filter: Some(ref f),
            ..
        } if f == "PostalCode eq '98004'"
    ));
}

#[test]
fn query_requires_request_file() {
    assert!(Cli::try_parse_from(["sds-cli", "query"]).is_err());
}

#[test]
fn rejects_unknown_units() {
    let result = Cli::try_parse_from([
        "sds-cli", "query", "--request", "a.yaml", "--units", "leagues",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_parse_command() {
    let cli = Cli::try_parse_from(["sds-cli", "parse", "--feed", "feed.xml", "--units", "ft"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Parse {
            units: Some(DistanceUnit::Feet),
            ..
        }
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["sds-cli"]).is_err());
}

#[test]
fn run_parse_reports_missing_file() {
    let result = run_parse(
        std::path::Path::new("/nonexistent/feed.xml"),
        DistanceUnit::Kilometers,
    );
    assert!(result.is_err());
}
