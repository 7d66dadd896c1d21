use serde::Serialize;

/// Icon reference understood by the launcher host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub path: String,
}

impl Icon {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// One entry in the final result list, whichever path produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem {
    pub title: String,
    pub subtitle: String,
    /// Opaque payload handed back to the host when the item is actioned.
    pub arg: String,
    /// Higher is more relevant. Not part of the wire format.
    #[serde(skip)]
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    pub valid: bool,
}

impl ResultItem {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        arg: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            arg: arg.into(),
            score: 0.0,
            icon: None,
            uid: None,
            autocomplete: None,
            valid: true,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Non-actionable informational row.
    pub fn notice(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            valid: false,
            ..Self::new(title, subtitle, "")
        }
    }
}

/// Result sink shared by the router and the remote searchers.
#[derive(Debug, Default, Clone)]
pub struct Feedback {
    items: Vec<ResultItem>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop everything pushed after the first `len` items.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn into_items(self) -> Vec<ResultItem> {
        self.items
    }
}

/// What the host should render for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Items(Vec<ResultItem>),
    Empty,
    Error(String),
}

impl Outcome {
    pub fn from_feedback(feedback: Feedback) -> Self {
        if feedback.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Items(feedback.into_items())
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn into_script_filter(self) -> ScriptFilter {
        let items = match self {
            Outcome::Items(items) => items,
            Outcome::Empty => vec![ResultItem::notice(
                "No matching services found",
                "Try a different query?",
            )],
            Outcome::Error(message) => vec![ResultItem::notice("Error", message)],
        };
        ScriptFilter { items }
    }
}

/// Launcher script-filter document: `{"items": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptFilter {
    pub items: Vec<ResultItem>,
}

impl ScriptFilter {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
