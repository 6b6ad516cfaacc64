use clap::Parser;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["otlist"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_list_with_defaults() {
    let cli = Cli::try_parse_from(["otlist", "list", "--category", "otc-3035"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::List {
            category,
            sort,
            page_size,
        }) => {
            assert_eq!(category, "otc-3035");
            assert_eq!(sort, "Ranksales");
            assert_eq!(page_size, 20);
        }
        other => panic!("expected list command, got {other:?}"),
    }
}

#[test]
fn global_flags_follow_subcommand() {
    let cli = Cli::try_parse_from([
        "otlist",
        "item",
        "--id",
        "abb-123",
        "--instance-key",
        "key-1",
        "--language",
        "en",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.instance_key.as_deref(), Some("key-1"));
    assert_eq!(cli.language.as_deref(), Some("en"));
    assert!(matches!(cli.command, Some(Commands::Item { ref id }) if id == "abb-123"));
}

#[test]
fn list_requires_category() {
    assert!(Cli::try_parse_from(["otlist", "list"]).is_err());
}

#[test]
fn tree_parent_is_optional() {
    let cli = Cli::try_parse_from(["otlist", "tree"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Tree { parent: None })));

    let cli = Cli::try_parse_from(["otlist", "tree", "--parent", "otc-1"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Tree { parent: Some(ref p) }) if p == "otc-1"));
}

#[test]
fn rejects_non_numeric_page_size() {
    assert!(Cli::try_parse_from([
        "otlist",
        "list",
        "--category",
        "otc-1",
        "--page-size",
        "many"
    ])
    .is_err());
}
