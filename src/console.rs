//! Console link construction.
//!
//! URL templates may use `{domain}` and `{region}` placeholders. A template
//! without a scheme is treated as a path on the console domain.

use crate::catalog::{Section, ServiceEntry};

pub const DEFAULT_CONSOLE_DOMAIN: &str = "console.aws.amazon.com";
pub const CHINA_CONSOLE_DOMAIN: &str = "console.amazonaws.cn";
pub const CONSOLE_DOMAIN_ENV: &str = "CONSOLE_ROUTER_CONSOLE_DOMAIN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Console {
    pub domain: String,
    pub region: String,
}

impl Console {
    /// Pick the console domain for a region. An explicit, non-empty override
    /// wins; China regions get the `.cn` console.
    pub fn for_region(region: impl Into<String>, domain_override: Option<&str>) -> Self {
        let region = region.into();
        let domain = match domain_override.map(str::trim) {
            Some(domain) if !domain.is_empty() => domain.to_string(),
            _ if region.starts_with("cn-") => CHINA_CONSOLE_DOMAIN.to_string(),
            _ => DEFAULT_CONSOLE_DOMAIN.to_string(),
        };
        Self { domain, region }
    }

    /// Expand placeholders and make the result absolute.
    pub fn url(&self, template: &str) -> String {
        let expanded = template
            .replace("{domain}", &self.domain)
            .replace("{region}", &self.region);
        if expanded.contains("://") {
            expanded
        } else if let Some(path) = expanded.strip_prefix('/') {
            format!("https://{}/{}", self.domain, path)
        } else {
            format!("https://{}/{}", self.domain, expanded)
        }
    }

    pub fn service_url(&self, service: &ServiceEntry) -> String {
        match &service.url {
            Some(template) => self.url(template),
            None => self.url(&format!("/{}/home?region={{region}}", service.id)),
        }
    }

    pub fn section_url(&self, service: &ServiceEntry, section: &Section) -> String {
        match &section.url {
            Some(template) => self.url(template),
            None => format!("{}#/{}", self.service_url(service), section.id),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::for_region("us-east-1", None)
    }
}

/// Icon path shipped alongside the workflow for a service id.
pub fn icon_path(service_id: &str) -> String {
    format!("images/{service_id}.png")
}
