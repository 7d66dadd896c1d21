use serde_json::Value;

use super::{
    SearchError, Searcher, Session, emit_ranked, opt_str, records, require_session, str_field,
};
use crate::console::{Console, icon_path};
use crate::search::{Feedback, Icon, ResultItem};

/// EC2 instances, titled by their `Name` tag.
pub struct Ec2Instances {
    console: Console,
}

impl Ec2Instances {
    pub fn new(console: Console) -> Self {
        Self { console }
    }

    fn name_tag(instance: &Value) -> Option<&str> {
        instance
            .get("Tags")
            .and_then(Value::as_array)?
            .iter()
            .find(|tag| opt_str(tag, "Key") == Some("Name"))
            .and_then(|tag| opt_str(tag, "Value"))
            .filter(|name| !name.is_empty())
    }

    fn to_item(&self, instance: &Value) -> Result<ResultItem, SearchError> {
        let id = str_field(instance, "InstanceId")?;
        let instance_type = opt_str(instance, "InstanceType").unwrap_or("unknown");
        let state = instance
            .get("State")
            .and_then(|s| opt_str(s, "Name"))
            .unwrap_or("unknown");
        let title = Self::name_tag(instance).unwrap_or(id);

        let arg = self.console.url(&format!(
            "/ec2/v2/home?region={{region}}#InstanceDetails:instanceId={}",
            urlencoding::encode(id)
        ));
        Ok(ResultItem::new(title, format!("{id} • {instance_type} • {state}"), arg)
            .with_uid(id)
            .with_icon(Icon::new(icon_path("ec2"))))
    }
}

impl Searcher for Ec2Instances {
    fn search(
        &self,
        sink: &mut Feedback,
        query: &str,
        session: Option<&dyn Session>,
    ) -> Result<usize, SearchError> {
        let session = require_session(session)?;
        let response = session.call("ec2", "DescribeInstances", &[])?;
        let mut items = Vec::new();
        for reservation in records(&response, "Reservations")? {
            for instance in records(reservation, "Instances")? {
                items.push(self.to_item(instance)?);
            }
        }
        Ok(emit_ranked(sink, items, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searchers::ReplaySession;
    use serde_json::json;

    fn session() -> ReplaySession {
        ReplaySession::new().with_response(
            "ec2",
            "DescribeInstances",
            json!({"Reservations": [
                {"Instances": [
                    {"InstanceId": "i-0001", "InstanceType": "t3.micro", "State": {"Name": "running"},
                     "Tags": [{"Key": "env", "Value": "prod"}, {"Key": "Name", "Value": "web-1"}]},
                    {"InstanceId": "i-0002", "InstanceType": "t3.large", "State": {"Name": "stopped"}}
                ]},
                {"Instances": [
                    {"InstanceId": "i-0003", "Tags": [{"Key": "Name", "Value": "worker"}]}
                ]}
            ]}),
        )
    }

    #[test]
    fn flattens_reservations() {
        let searcher = Ec2Instances::new(Console::default());
        let mut sink = Feedback::new();
        assert_eq!(searcher.search(&mut sink, "", Some(&session())).unwrap(), 3);
        let titles: Vec<&str> = sink.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["web-1", "i-0002", "worker"]);
        assert_eq!(sink.items()[0].subtitle, "i-0001 • t3.micro • running");
        assert_eq!(sink.items()[2].subtitle, "i-0003 • unknown • unknown");
    }

    #[test]
    fn query_matches_name_tag() {
        let searcher = Ec2Instances::new(Console::for_region("us-east-2", None));
        let mut sink = Feedback::new();
        searcher.search(&mut sink, "web", Some(&session())).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(
            sink.items()[0].arg,
            "https://console.aws.amazon.com/ec2/v2/home?region=us-east-2#InstanceDetails:instanceId=i-0001"
        );
    }

    #[test]
    fn reservation_without_instances_is_malformed() {
        let session = ReplaySession::new().with_response(
            "ec2",
            "DescribeInstances",
            json!({"Reservations": [{}]}),
        );
        let searcher = Ec2Instances::new(Console::default());
        let err = searcher.search(&mut Feedback::new(), "", Some(&session)).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }
}
