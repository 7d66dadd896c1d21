use std::path::Path;

use console_router::catalog::Catalog;
use console_router::config::Config;
use console_router::console::Console;
use console_router::router::{self, RouteContext, Strategy};
use console_router::search::Feedback;
use console_router::searchers::{ReplaySession, SearcherRegistry};
use console_router::{Cli, execute};

fn catalog() -> Catalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/console-services.yml");
    Catalog::load(&path).unwrap()
}

fn titles(sink: &Feedback) -> String {
    sink.items()
        .iter()
        .map(|i| i.title.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn catalog_prefix_ranking() {
    let catalog = catalog();
    let console = Console::default();
    let registry = SearcherRegistry::with_defaults(&console);
    let ctx = RouteContext {
        catalog: &catalog,
        searchers: &registry,
        session: None,
        console: &console,
    };
    let mut sink = Feedback::new();
    let routed = router::route(&ctx, &mut sink, "e").unwrap();
    assert_eq!(routed.strategy, Strategy::Catalog);
    insta::assert_snapshot!(titles(&sink), @r"
    EC2
    Elastic Container Service
    Elastic Beanstalk
    ");
}

#[test]
fn replayed_remote_search_end_to_end() {
    let catalog = catalog();
    let console = Console::for_region("us-west-2", None);
    let registry = SearcherRegistry::with_defaults(&console);
    let session = ReplaySession::load(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/replay.json"),
    )
    .unwrap();
    let ctx = RouteContext {
        catalog: &catalog,
        searchers: &registry,
        session: Some(&session),
        console: &console,
    };

    let mut sink = Feedback::new();
    let routed = router::route(&ctx, &mut sink, "s3 $logs").unwrap();
    assert_eq!(routed.strategy, Strategy::RemoteSearch("s3".into()));
    assert_eq!(routed.residual, "logs");
    insta::assert_snapshot!(titles(&sink), @"team-logs");
    assert_eq!(
        sink.items()[0].arg,
        "https://console.aws.amazon.com/s3/buckets/team-logs?region=us-west-2"
    );

    let mut sink = Feedback::new();
    // lambda has a searcher but is not in the fixture catalog.
    let routed = router::route(&ctx, &mut sink, "lambda $x").unwrap();
    assert_eq!(routed.strategy, Strategy::Catalog);
    assert!(session.calls().iter().all(|c| !c.starts_with("lambda/")));
}

#[test]
fn execute_writes_json_and_exit_code() {
    let config = Config {
        catalog: Some(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/console-services.yml"),
        ),
        ..Config::default()
    };

    let cli = Cli {
        query: vec!["  iam".into(), "rol  ".into()],
        ..Cli::default()
    };
    let mut out = Vec::new();
    assert!(execute(&cli, &config, &mut out).unwrap());
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["items"][0]["title"], "Roles");
    assert_eq!(json["items"][0]["uid"], "iam/roles");

    let cli = Cli {
        query: vec!["elasticbeanstalk".into(), "$myapp".into()],
        ..Cli::default()
    };
    let mut out = Vec::new();
    assert!(!execute(&cli, &config, &mut out).unwrap());
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["title"], "Error");
}
