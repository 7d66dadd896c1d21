pub mod catalog;
pub mod config;
pub mod console;
pub mod parser;
pub mod router;
pub mod search;
pub mod searchers;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::console::Console;
use crate::router::RouteContext;
use crate::search::{Feedback, Outcome};
use crate::searchers::{HttpSession, LazySession, ReplaySession, SearcherRegistry, Session};

/// Route a launcher query to console services, their sections, or a remote
/// resource search (`<service> $<text>`).
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "console-router", version, about)]
pub struct Cli {
    /// Query text; multiple arguments are joined with spaces.
    pub query: Vec<String>,

    /// Config file (defaults to the platform config dir).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Service catalog YAML.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Region used for console links.
    #[arg(long)]
    pub region: Option<String>,

    /// Gateway base URL for remote searches.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Serve remote searches from a recorded JSON file instead of the network.
    #[arg(long, value_name = "PATH", conflicts_with = "endpoint")]
    pub replay: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(catalog) = &self.catalog {
            config.catalog = Some(catalog.clone());
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        config
    }

    /// The query as the router sees it.
    pub fn query_text(&self) -> String {
        self.query.join(" ").trim().to_string()
    }
}

/// Resolve configuration from file, process environment and flags.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let config = Config::load(cli.config.as_deref())?.apply_env(|key| std::env::var(key).ok())?;
    Ok(cli.apply(config))
}

/// Session for remote searchers, opened only when a searcher first calls it.
fn session_for(cli: &Cli, config: &Config) -> Option<Box<dyn Session>> {
    let session: Box<dyn Session> = if let Some(path) = cli.replay.clone() {
        Box::new(LazySession::new(move || {
            Ok(Box::new(ReplaySession::load(&path)?) as Box<dyn Session>)
        }))
    } else if let Some(endpoint) = config.endpoint.clone() {
        let timeout = config.timeout();
        Box::new(LazySession::new(move || {
            Ok(Box::new(HttpSession::new(endpoint.clone(), timeout)?) as Box<dyn Session>)
        }))
    } else {
        return None;
    };
    Some(session)
}

/// Answer one query, writing the script-filter JSON to `out`. Returns
/// `false` when the query ended in an error item.
pub fn execute(cli: &Cli, config: &Config, out: &mut impl Write) -> Result<bool> {
    let console = Console::for_region(config.region.clone(), config.console_domain.as_deref());
    let catalog_path = config.catalog_path();
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("load catalog {}", catalog_path.display()))?;
    let searchers = SearcherRegistry::with_defaults(&console);
    let session = session_for(cli, config);

    let ctx = RouteContext {
        catalog: &catalog,
        searchers: &searchers,
        session: session.as_deref(),
        console: &console,
    };

    let query = cli.query_text();
    let mut sink = Feedback::new();
    let outcome = match router::route(&ctx, &mut sink, &query) {
        Ok(routed) => {
            if !routed.residual.is_empty() {
                tracing::info!(
                    query = %routed.residual,
                    strategy = %routed.strategy,
                    "filtering with query"
                );
                tracing::info!(count = sink.len(), query = %routed.residual, "results matched");
                for (i, item) in sink.items().iter().enumerate() {
                    tracing::debug!(
                        rank = i + 1,
                        score = item.score,
                        title = %item.title,
                        "result"
                    );
                }
            }
            Outcome::from_feedback(sink)
        }
        Err(err) => {
            tracing::error!(error = %err, "search failed");
            Outcome::Error(err.to_string())
        }
    };

    let failed = outcome.is_error();
    let json = outcome
        .into_script_filter()
        .to_json(cli.pretty)
        .context("serialize results")?;
    writeln!(out, "{json}").context("write results")?;

    Ok(!failed)
}

/// Library entrypoint used by the binary.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let config = resolve_config(cli)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let succeeded = execute(cli, &config, &mut out)?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
