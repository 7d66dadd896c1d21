//! Network sessions handed to remote searchers.
//!
//! [`HttpSession`] talks to an API gateway that owns credential and region
//! resolution; it issues `GET {endpoint}/{service}/{action}?{params}` and
//! expects a JSON body. [`ReplaySession`] serves recorded responses and is
//! used for tests and offline runs. [`LazySession`] defers building either
//! one until a searcher makes its first call.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;

use super::SearchError;

/// One remote call returning a JSON document.
pub trait Session {
    fn call(
        &self,
        service: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, SearchError>;
}

pub struct HttpSession {
    client: Client,
    endpoint: String,
}

impl HttpSession {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("console-router/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_url(&self, service: &str, action: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            urlencoding::encode(service),
            urlencoding::encode(action)
        )
    }
}

impl Session for HttpSession {
    fn call(
        &self,
        service: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, SearchError> {
        let url = self.request_url(service, action);
        tracing::debug!(url = %url, "remote call");
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = response.text().unwrap_or_default();
            return Err(SearchError::Auth {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(SearchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .map_err(|e| SearchError::Malformed(e.to_string()))
    }
}

fn classify_transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Network(err.to_string())
    }
}

/// Recorded responses keyed by `service/action`.
#[derive(Debug, Default)]
pub struct ReplaySession {
    responses: HashMap<String, Value>,
    calls: RefCell<Vec<String>>,
}

impl ReplaySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a recording of the form `{"service/action": <response>, ...}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let responses: HashMap<String, Value> =
            serde_json::from_str(json).context("parse replay recording")?;
        Ok(Self {
            responses,
            calls: RefCell::default(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read replay recording {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn with_response(mut self, service: &str, action: &str, response: Value) -> Self {
        self.responses.insert(Self::key(service, action), response);
        self
    }

    /// Keys of every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn key(service: &str, action: &str) -> String {
        format!("{service}/{action}")
    }
}

impl Session for ReplaySession {
    fn call(
        &self,
        service: &str,
        action: &str,
        _params: &[(&str, &str)],
    ) -> Result<Value, SearchError> {
        let key = Self::key(service, action);
        self.calls.borrow_mut().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| SearchError::Network(format!("no recorded response for {key}")))
    }
}

/// Opens the wrapped session on the first call and reuses the outcome.
///
/// A failed open is remembered; every call then reports
/// [`SearchError::Unavailable`] with the original cause.
pub struct LazySession<F> {
    open: F,
    opened: OnceCell<Result<Box<dyn Session>, String>>,
}

impl<F> LazySession<F>
where
    F: Fn() -> Result<Box<dyn Session>>,
{
    pub fn new(open: F) -> Self {
        Self {
            open,
            opened: OnceCell::new(),
        }
    }

    /// Whether an open has been attempted.
    pub fn is_attempted(&self) -> bool {
        self.opened.get().is_some()
    }
}

impl<F> Session for LazySession<F>
where
    F: Fn() -> Result<Box<dyn Session>>,
{
    fn call(
        &self,
        service: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, SearchError> {
        let opened = self.opened.get_or_init(|| {
            (self.open)().map_err(|err| {
                let message = format!("{err:#}");
                tracing::warn!(error = %message, "failed to open network session");
                message
            })
        });
        match opened {
            Ok(session) => session.call(service, action, params),
            Err(message) => Err(SearchError::Unavailable(message.clone())),
        }
    }
}
