use serde_json::Value;

use super::{
    SearchError, Searcher, Session, emit_ranked, opt_str, records, require_session, str_field,
};
use crate::console::{Console, icon_path};
use crate::search::{Feedback, Icon, ResultItem};

/// S3 buckets by name.
pub struct S3Buckets {
    console: Console,
}

impl S3Buckets {
    pub fn new(console: Console) -> Self {
        Self { console }
    }

    fn to_item(&self, bucket: &Value) -> Result<ResultItem, SearchError> {
        let name = str_field(bucket, "Name")?;
        let subtitle = opt_str(bucket, "CreationDate")
            .map(|created| format!("created {created}"))
            .unwrap_or_default();
        let arg = self.console.url(&format!(
            "/s3/buckets/{}?region={{region}}",
            urlencoding::encode(name)
        ));
        Ok(ResultItem::new(name, subtitle, arg)
            .with_uid(name)
            .with_icon(Icon::new(icon_path("s3"))))
    }
}

impl Searcher for S3Buckets {
    fn search(
        &self,
        sink: &mut Feedback,
        query: &str,
        session: Option<&dyn Session>,
    ) -> Result<usize, SearchError> {
        let session = require_session(session)?;
        let response = session.call("s3", "ListBuckets", &[])?;
        let items = records(&response, "Buckets")?
            .iter()
            .map(|b| self.to_item(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(emit_ranked(sink, items, query))
    }
}
