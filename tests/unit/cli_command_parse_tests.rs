use clap::Parser;

use tracereverse::cli::commands::library::LibraryCommand;
use tracereverse::cli::commands::paths::PathsCommand;
use tracereverse::cli::commands::progress::ProgressCommand;
use tracereverse::cli::{Cli, Commands, OutputFormat};
use tracereverse::search::SortBy;

fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["tracereverse"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("parse")
}

#[test]
fn parse_search_with_every_filter() {
    let cli = parse(&[
        "search",
        "todo app",
        "--stack",
        "react",
        "--stack",
        "css",
        "--difficulty",
        "intermediate",
        "--duration",
        "short",
        "--category",
        "Frontend Framework",
        "--sort",
        "popularity",
        "--bookmarked",
        "--limit",
        "3",
    ]);
    let Commands::Search(args) = cli.command else {
        panic!("expected search");
    };
    assert_eq!(args.query.as_deref(), Some("todo app"));
    assert_eq!(args.stack, vec!["react", "css"]);
    assert_eq!(args.difficulty, vec!["intermediate"]);
    assert_eq!(args.duration, vec!["short"]);
    assert_eq!(args.category, vec!["Frontend Framework"]);
    assert_eq!(args.sort, Some(SortBy::Popularity));
    assert!(args.bookmarked);
    assert!(!args.completed);
    assert_eq!(args.limit, Some(3));
}

#[test]
fn parse_rejects_unknown_sort() {
    assert!(Cli::try_parse_from(["tracereverse", "search", "--sort", "random"]).is_err());
}

#[test]
fn parse_global_flags_after_subcommand() {
    let cli = parse(&["options", "--robot", "-vv", "--user", "ada", "--ephemeral"]);
    assert_eq!(cli.output_format(), OutputFormat::Json);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.user, "ada");
    assert!(cli.ephemeral);
}

#[test]
fn parse_format_json() {
    let cli = parse(&["--format", "json", "suggest", "re"]);
    assert!(cli.is_robot());
}

#[test]
fn parse_paths_complete() {
    let cli = parse(&["paths", "complete", "react-mastery", "todo-app-react"]);
    let Commands::Paths(args) = cli.command else {
        panic!("expected paths");
    };
    let PathsCommand::Complete { id, slug } = args.command else {
        panic!("expected complete");
    };
    assert_eq!(id, "react-mastery");
    assert_eq!(slug, "todo-app-react");
}

#[test]
fn parse_progress_complete_requires_rating() {
    assert!(Cli::try_parse_from(["tracereverse", "progress", "complete", "e1"]).is_err());
    let cli = parse(&["progress", "complete", "e1", "--rating", "4"]);
    let Commands::Progress(args) = cli.command else {
        panic!("expected progress");
    };
    assert!(matches!(
        args.command,
        ProgressCommand::Complete { ref entry, rating: 4 } if entry == "e1"
    ));
}

#[test]
fn parse_library_study() {
    let cli = parse(&["library", "study", "weather-app", "45"]);
    let Commands::Library(args) = cli.command else {
        panic!("expected library");
    };
    assert!(matches!(
        args.command,
        LibraryCommand::Study { ref slug, minutes: 45 } if slug == "weather-app"
    ));
}
