//! Same-origin image passthrough.
//!
//! Accepts `?url=<remote image>`, checks the host against an allow-list,
//! fetches the image and returns it with long-lived cache headers so the
//! browser (and the WebGL layer, which needs CORS) can use it.

use crate::error::SegueError;
use crate::options::ProxyOptions;

/// Raw upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status.
    pub status: u16,
    /// `Content-Type` header, if sent.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

/// Fetches remote images.
pub trait Upstream {
    /// GET `url`. Non-2xx statuses are returned as responses; only
    /// transport failures are errors.
    fn fetch(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<UpstreamResponse, SegueError>;
}

/// [`Upstream`] over a blocking `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqUpstream {
    agent: ureq::Agent,
}

impl UreqUpstream {
    /// Upstream using a default agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Default for UreqUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl Upstream for UreqUpstream {
    fn fetch(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<UpstreamResponse, SegueError> {
        let response = match self
            .agent
            .get(url)
            .header("User-Agent", user_agent)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(status)) => {
                return Ok(UpstreamResponse {
                    status,
                    content_type: None,
                    body: Vec::new(),
                });
            }
            Err(e) => return Err(SegueError::Fetch(e.to_string())),
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .into_body()
            .read_to_vec()
            .map_err(|e| SegueError::Fetch(e.to_string()))?;
        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Reply sent back to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    /// HTTP status.
    pub status: u16,
    /// Response headers, in order.
    pub headers: Vec<(&'static str, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl ProxyResponse {
    fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "text/plain".to_owned())],
            body: message.as_bytes().to_vec(),
        }
    }

    /// First header named `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The passthrough endpoint.
#[derive(Debug)]
pub struct ImageProxy<U = UreqUpstream> {
    options: ProxyOptions,
    upstream: U,
}

impl ImageProxy<UreqUpstream> {
    /// Endpoint fetching with `ureq`.
    #[must_use]
    pub fn with_ureq(options: ProxyOptions) -> Self {
        Self::new(options, UreqUpstream::new())
    }
}

impl<U: Upstream> ImageProxy<U> {
    /// Endpoint fetching through `upstream`.
    pub fn new(options: ProxyOptions, upstream: U) -> Self {
        Self { options, upstream }
    }

    /// Handle a request whose query string is `query`.
    pub fn handle(&self, query: &str) -> ProxyResponse {
        match query_param(query, "url") {
            Some(url) => self.handle_url(&url),
            None => ProxyResponse::text(400, "Missing url parameter"),
        }
    }

    /// Handle a request for the already-decoded `url`.
    pub fn handle_url(&self, url: &str) -> ProxyResponse {
        let Some(host) = http_host(url) else {
            return ProxyResponse::text(400, "Invalid url parameter");
        };
        if !self
            .options
            .allowed_hosts
            .iter()
            .any(|h| h.eq_ignore_ascii_case(&host))
        {
            log::warn!("image proxy refused host {host}");
            return ProxyResponse::text(403, "Invalid domain");
        }

        let upstream = match self.upstream.fetch(url, &self.options.user_agent)
        {
            Ok(upstream) => upstream,
            Err(e) => {
                log::error!("error proxying image {url}: {e}");
                return ProxyResponse::text(500, "Internal server error");
            }
        };
        if !(200..300).contains(&upstream.status) {
            log::warn!("upstream {url} answered {}", upstream.status);
            return ProxyResponse::text(upstream.status, "Failed to fetch image");
        }

        let content_type = upstream
            .content_type
            .filter(|ct| !ct.is_empty())
            .or_else(|| {
                mime_guess::from_path(path_of(url))
                    .first()
                    .map(|mime| mime.essence_str().to_owned())
            })
            .unwrap_or_else(|| self.options.fallback_content_type.clone());

        ProxyResponse {
            status: 200,
            headers: vec![
                ("Content-Type", content_type),
                ("Cache-Control", self.options.cache_control.clone()),
                ("Access-Control-Allow-Origin", "*".to_owned()),
                ("Access-Control-Allow-Methods", "GET".to_owned()),
            ],
            body: upstream.body,
        }
    }
}

/// Lower-cased host of an absolute `http`/`https` URL.
fn http_host(url: &str) -> Option<String> {
    let uri = url.parse::<ureq::http::Uri>().ok()?;
    match uri.scheme_str() {
        Some("http" | "https") => {}
        _ => return None,
    }
    uri.host()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Path component of `url`, for content-type guessing.
fn path_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    rest.find('/').map_or("", |i| &rest[i..])
}

/// Decoded value of `name` in a form-encoded query string.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode(value))
        .filter(|value| !value.is_empty())
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..=i + 2])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = hex {
                    out.push(byte);
                    i += 3;
                    continue;
                }
                out.push(b'%');
            }
            other => out.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
