//! Query routing.
//!
//! The first whitespace-separated word of a query selects a service when it
//! matches a catalog id exactly. From there, in order:
//!
//! 1. `<id> $<rest>` with a registered searcher: remote search for `<rest>`.
//! 2. `<id> <rest>` where the service has sections: rank its sections.
//! 3. Anything else: rank the whole catalog against the full query.
//!
//! Exactly one path runs per query.

use std::fmt;

use thiserror::Error;

use crate::catalog::{Catalog, Section, ServiceEntry};
use crate::console::{Console, icon_path};
use crate::search::{self, Feedback, Icon, ResultItem};
use crate::searchers::{SearchError, SearcherRegistry, Session};

/// Marks the rest of a query as a remote search.
pub const SEARCH_PREFIX: char = '$';

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{service_id} search for {query:?} failed: {source}")]
    RemoteSearch {
        service_id: String,
        query: String,
        #[source]
        source: SearchError,
    },
}

/// Which retrieval path produced the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    RemoteSearch(String),
    Sections(String),
    Catalog,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteSearch(id) => write!(f, "remote search ({id})"),
            Self::Sections(id) => write!(f, "sections ({id})"),
            Self::Catalog => write!(f, "catalog"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    /// Query text actually used for filtering.
    pub residual: String,
    pub strategy: Strategy,
}

/// Read-only collaborators for routing one query.
pub struct RouteContext<'a> {
    pub catalog: &'a Catalog,
    pub searchers: &'a SearcherRegistry,
    pub session: Option<&'a dyn Session>,
    pub console: &'a Console,
}

/// Route `raw_query` and write the chosen path's items into `sink`.
///
/// On a remote search failure nothing is left in `sink` from this call.
pub fn route(
    ctx: &RouteContext<'_>,
    sink: &mut Feedback,
    raw_query: &str,
) -> Result<Routed, DispatchError> {
    let words: Vec<&str> = raw_query.split_whitespace().collect();

    if let [id, rest @ ..] = words.as_slice()
        && !rest.is_empty()
        && let Some(service) = ctx.catalog.get(id)
    {
        let rest = rest.join(" ");

        if let Some(stripped) = rest.strip_prefix(SEARCH_PREFIX)
            && let Some(searcher) = ctx.searchers.lookup(id)
        {
            tracing::info!(service = %id, query = %stripped, "using searcher");
            let mark = sink.len();
            return match searcher.search(sink, stripped, ctx.session) {
                Ok(written) => {
                    tracing::debug!(service = %id, written, "searcher finished");
                    Ok(Routed {
                        residual: stripped.to_string(),
                        strategy: Strategy::RemoteSearch(service.id.clone()),
                    })
                }
                Err(source) => {
                    sink.truncate(mark);
                    Err(DispatchError::RemoteSearch {
                        service_id: service.id.clone(),
                        query: stripped.to_string(),
                        source,
                    })
                }
            };
        }

        if service.has_sections() {
            tracing::info!(service = %id, query = %rest, "filtering on sections");
            sink.extend(section_items(ctx.console, service, &rest));
            return Ok(Routed {
                residual: rest,
                strategy: Strategy::Sections(service.id.clone()),
            });
        }
    }

    tracing::debug!(query = %raw_query, "filtering on catalog");
    sink.extend(service_items(ctx.console, ctx.catalog, raw_query));
    Ok(Routed {
        residual: raw_query.to_string(),
        strategy: Strategy::Catalog,
    })
}

/// Rank a service's sections against `query`.
pub fn section_items(console: &Console, service: &ServiceEntry, query: &str) -> Vec<ResultItem> {
    search::filter(&service.sections, query, |section: &Section| {
        ResultItem::new(
            section.display_name(),
            format!("{} section", service.display_name()),
            console.section_url(service, section),
        )
        .with_uid(format!("{}/{}", service.id, section.id))
        .with_autocomplete(format!("{} {}", service.id, section.id))
        .with_icon(Icon::new(icon_path(&service.id)))
    })
}

/// Rank every catalog service against `query`.
pub fn service_items(console: &Console, catalog: &Catalog, query: &str) -> Vec<ResultItem> {
    search::filter(catalog.entries(), query, |service: &ServiceEntry| {
        ResultItem::new(
            service.display_name(),
            service.description.clone(),
            console.service_url(service),
        )
        .with_uid(service.id.clone())
        .with_autocomplete(format!("{} ", service.id))
        .with_icon(Icon::new(icon_path(&service.id)))
    })
}
