use serde_json::Value;

use super::{
    SearchError, Searcher, Session, emit_ranked, opt_str, records, require_session, str_field,
};
use crate::console::{Console, icon_path};
use crate::search::{Feedback, Icon, ResultItem};

/// Lambda functions by name.
pub struct LambdaFunctions {
    console: Console,
}

impl LambdaFunctions {
    pub fn new(console: Console) -> Self {
        Self { console }
    }

    fn to_item(&self, function: &Value) -> Result<ResultItem, SearchError> {
        let name = str_field(function, "FunctionName")?;
        let runtime = opt_str(function, "Runtime").unwrap_or("container");
        let subtitle = match opt_str(function, "Description").filter(|d| !d.is_empty()) {
            Some(description) => format!("{runtime} • {description}"),
            None => runtime.to_string(),
        };
        let arg = self.console.url(&format!(
            "/lambda/home?region={{region}}#/functions/{}",
            urlencoding::encode(name)
        ));
        Ok(ResultItem::new(name, subtitle, arg)
            .with_uid(name)
            .with_icon(Icon::new(icon_path("lambda"))))
    }
}

impl Searcher for LambdaFunctions {
    fn search(
        &self,
        sink: &mut Feedback,
        query: &str,
        session: Option<&dyn Session>,
    ) -> Result<usize, SearchError> {
        let session = require_session(session)?;
        let response = session.call("lambda", "ListFunctions", &[])?;
        let items = records(&response, "Functions")?
            .iter()
            .map(|f| self.to_item(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(emit_ranked(sink, items, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchers::ReplaySession;
    use serde_json::json;

    #[test]
    fn lists_functions() {
        let session = ReplaySession::new().with_response(
            "lambda",
            "ListFunctions",
            json!({"Functions": [
                {"FunctionName": "resize-images", "Runtime": "python3.12", "Description": "Thumbnailer"},
                {"FunctionName": "nightly-report", "Runtime": "nodejs20.x", "Description": ""},
                {"FunctionName": "image-sync"}
            ]}),
        );
        let searcher = LambdaFunctions::new(Console::for_region("eu-central-1", None));
        let mut sink = Feedback::new();
        let written = searcher.search(&mut sink, "image", Some(&session)).unwrap();
        assert_eq!(written, 2);
        assert_eq!(sink.items()[0].title, "image-sync");
        assert_eq!(sink.items()[0].subtitle, "container");
        assert_eq!(sink.items()[1].title, "resize-images");
        assert_eq!(sink.items()[1].subtitle, "python3.12 • Thumbnailer");
        assert_eq!(
            sink.items()[1].arg,
            "https://console.aws.amazon.com/lambda/home?region=eu-central-1#/functions/resize-images"
        );
    }

    #[test]
    fn missing_functions_array_is_malformed() {
        let session = ReplaySession::new().with_response("lambda", "ListFunctions", json!({}));
        let searcher = LambdaFunctions::new(Console::default());
        let err = searcher.search(&mut Feedback::new(), "", Some(&session)).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }
}
