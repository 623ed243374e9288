use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Allow-list and response headers for the image passthrough.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Image Proxy", inline)]
#[serde(default)]
pub struct ProxyOptions {
    /// Hostnames the passthrough may fetch from, compared ignoring case.
    pub allowed_hosts: Vec<String>,
    /// `Cache-Control` header on successful responses.
    pub cache_control: String,
    /// `User-Agent` sent upstream.
    pub user_agent: String,
    /// Content type used when neither upstream nor the URL names one.
    pub fallback_content_type: String,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            allowed_hosts: vec!["loesnooitgedagt.com".to_owned()],
            cache_control: "public, max-age=31536000, immutable".to_owned(),
            user_agent: "Mozilla/5.0".to_owned(),
            fallback_content_type: "image/jpeg".to_owned(),
        }
    }
}
