use serde_json::Value;

use super::{
    SearchError, Searcher, Session, emit_ranked, opt_str, records, require_session, str_field,
};
use crate::console::{Console, icon_path};
use crate::search::{Feedback, Icon, ResultItem};

/// Elastic Beanstalk environments by name.
pub struct ElasticBeanstalkEnvironments {
    console: Console,
}

impl ElasticBeanstalkEnvironments {
    pub fn new(console: Console) -> Self {
        Self { console }
    }

    fn to_item(&self, env: &Value) -> Result<ResultItem, SearchError> {
        let name = str_field(env, "EnvironmentName")?;
        let id = str_field(env, "EnvironmentId")?;
        let app = str_field(env, "ApplicationName")?;
        let status = opt_str(env, "Status").unwrap_or("Unknown");
        let health = opt_str(env, "Health").unwrap_or("Unknown");

        let arg = self.console.url(&format!(
            "/elasticbeanstalk/home?region={{region}}#/environment/dashboard?applicationName={}&environmentId={}",
            urlencoding::encode(app),
            urlencoding::encode(id)
        ));
        Ok(ResultItem::new(name, format!("{app} • {status} • {health}"), arg)
            .with_uid(id)
            .with_icon(Icon::new(icon_path("elasticbeanstalk"))))
    }
}

impl Searcher for ElasticBeanstalkEnvironments {
    fn search(
        &self,
        sink: &mut Feedback,
        query: &str,
        session: Option<&dyn Session>,
    ) -> Result<usize, SearchError> {
        let session = require_session(session)?;
        let response = session.call("elasticbeanstalk", "DescribeEnvironments", &[])?;
        let items = records(&response, "Environments")?
            .iter()
            .map(|env| self.to_item(env))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(emit_ranked(sink, items, query))
    }
}
