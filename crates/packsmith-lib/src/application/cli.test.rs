use super::*;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_create() {
    let cli = Cli::try_parse_from([
        "packsmith",
        "create",
        "--mods",
        "Mods",
        "--output",
        "out/pack.zip",
        "--name",
        "Weekend",
        "--force",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Some(Commands::Create {
            mods: PathBuf::from("Mods"),
            output: PathBuf::from("out/pack.zip"),
            name: Some("Weekend".into()),
            force: true,
        })
    );
}

#[test]
fn test_parse_inspect_with_global_options() {
    let cli = Cli::try_parse_from([
        "packsmith",
        "--log-level",
        "3",
        "--max-results",
        "5",
        "inspect",
        "reloaded.sharedlib.hooks",
    ])
    .unwrap();

    assert_eq!(cli.config.log_level, 3);
    assert_eq!(cli.config.max_results, 5);
    match cli.command {
        Some(Commands::Inspect { mod_id, name }) => {
            assert_eq!(mod_id, "reloaded.sharedlib.hooks");
            assert_eq!(name, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_create_requires_output() {
    assert!(Cli::try_parse_from(["packsmith", "create", "--mods", "Mods"]).is_err());
}

#[test]
fn test_requires_network() {
    assert!(!Commands::Version.requires_network());
    assert!(
        !Commands::Validate {
            mods: PathBuf::from("Mods")
        }
        .requires_network()
    );
    assert!(
        Commands::Inspect {
            mod_id: "a".into(),
            name: None
        }
        .requires_network()
    );
}
