//! Pluggable remote searchers.
//!
//! A searcher answers a `$`-prefixed query for one service by calling the
//! remote API through a [`Session`] and writing ranked items into the
//! [`Feedback`] sink. Searchers are registered explicitly into a
//! [`SearcherRegistry`] which the router receives as an argument.
//!
//! # Adding a searcher
//!
//! ```rust,ignore
//! struct RdsInstances { console: Console }
//!
//! impl Searcher for RdsInstances {
//!     fn search(&self, sink: &mut Feedback, query: &str, session: Option<&dyn Session>)
//!         -> Result<usize, SearchError> { ... }
//! }
//!
//! registry.register("rds", RdsInstances { console });
//! ```

pub mod ec2;
pub mod elastic_beanstalk;
pub mod lambda;
pub mod s3;
pub mod session;

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::console::Console;
use crate::search::{self, Feedback, ResultItem};

pub use ec2::Ec2Instances;
pub use elastic_beanstalk::ElasticBeanstalkEnvironments;
pub use lambda::LambdaFunctions;
pub use s3::S3Buckets;
pub use session::{HttpSession, LazySession, ReplaySession, Session};

/// Everything that can go wrong while talking to a remote API.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("not authorized (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no network session configured")]
    NoSession,

    #[error("network session unavailable: {0}")]
    Unavailable(String),
}

/// Search capability for one remote service.
pub trait Searcher: Send + Sync {
    /// Write matching items into `sink` and return how many were written.
    fn search(
        &self,
        sink: &mut Feedback,
        query: &str,
        session: Option<&dyn Session>,
    ) -> Result<usize, SearchError>;
}

/// Explicit service id -> searcher mapping.
#[derive(Default)]
pub struct SearcherRegistry {
    by_id: BTreeMap<String, Box<dyn Searcher>>,
}

impl SearcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every bundled searcher.
    pub fn with_defaults(console: &Console) -> Self {
        let mut registry = Self::new();
        registry.register("ec2", Ec2Instances::new(console.clone()));
        registry.register(
            "elasticbeanstalk",
            ElasticBeanstalkEnvironments::new(console.clone()),
        );
        registry.register("lambda", LambdaFunctions::new(console.clone()));
        registry.register("s3", S3Buckets::new(console.clone()));
        registry
    }

    /// Register a searcher, replacing any previous one for the same id.
    pub fn register(&mut self, service_id: impl Into<String>, searcher: impl Searcher + 'static) {
        self.by_id.insert(service_id.into(), Box::new(searcher));
    }

    pub fn lookup(&self, service_id: &str) -> Option<&dyn Searcher> {
        self.by_id.get(service_id).map(|s| &**s)
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.by_id.contains_key(service_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn require_session(session: Option<&dyn Session>) -> Result<&dyn Session, SearchError> {
    session.ok_or(SearchError::NoSession)
}

/// Array field of a response, or a malformed-response error.
fn records<'a>(value: &'a Value, key: &str) -> Result<&'a Vec<Value>, SearchError> {
    value
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Malformed(format!("missing array field `{key}`")))
}

/// Required string field of a record.
fn str_field<'a>(record: &'a Value, key: &str) -> Result<&'a str, SearchError> {
    record
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SearchError::Malformed(format!("missing string field `{key}`")))
}

fn opt_str<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Rank items against the residual query and write them to the sink.
fn emit_ranked(sink: &mut Feedback, items: Vec<ResultItem>, query: &str) -> usize {
    let ranked = search::filter(&items, query, Clone::clone);
    let count = ranked.len();
    sink.extend(ranked);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(usize);

    impl Searcher for Fixed {
        fn search(
            &self,
            sink: &mut Feedback,
            _query: &str,
            _session: Option<&dyn Session>,
        ) -> Result<usize, SearchError> {
            for i in 0..self.0 {
                sink.push(ResultItem::new(format!("item {i}"), "", ""));
            }
            Ok(self.0)
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = SearcherRegistry::new();
        assert!(registry.is_empty());
        registry.register("ec2", Fixed(2));
        assert!(registry.contains("ec2"));
        assert!(!registry.contains("EC2"));

        let mut sink = Feedback::new();
        let written = registry
            .lookup("ec2")
            .unwrap()
            .search(&mut sink, "", None)
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = SearcherRegistry::new();
        registry.register("s3", Fixed(1));
        registry.register("s3", Fixed(3));
        assert_eq!(registry.len(), 1);
        let mut sink = Feedback::new();
        registry.lookup("s3").unwrap().search(&mut sink, "", None).unwrap();
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn defaults_cover_bundled_services() {
        let registry = SearcherRegistry::with_defaults(&Console::default());
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["ec2", "elasticbeanstalk", "lambda", "s3"]);
    }

    #[test]
    fn missing_session_is_an_error() {
        let registry = SearcherRegistry::with_defaults(&Console::default());
        let mut sink = Feedback::new();
        let err = registry
            .lookup("lambda")
            .unwrap()
            .search(&mut sink, "x", None)
            .unwrap_err();
        assert!(matches!(err, SearchError::NoSession));
        assert!(sink.is_empty());
    }

    #[test]
    fn field_helpers_report_malformed() {
        let value = serde_json::json!({"Items": "nope", "Name": 3});
        assert!(matches!(records(&value, "Items"), Err(SearchError::Malformed(_))));
        assert!(matches!(str_field(&value, "Name"), Err(SearchError::Malformed(_))));
        assert_eq!(opt_str(&value, "Name"), None);
    }
}
