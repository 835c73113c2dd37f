//! HTTP delivery for postJson submissions.

use core::error::Error;
use core::fmt;
use core::time::Duration;

use log::debug;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::PageConfig;

#[derive(Debug)]
pub enum TransportError {
    /// The endpoint is not an absolute http(s) URL.
    InvalidUrl(String),
    /// Connection, TLS or timeout failure before a status arrived.
    Network(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "invalid endpoint URL: {url}"),
            Self::Network(reason) => write!(f, "network error: {reason}"),
        }
    }
}

impl Error for TransportError {}

/// Sends a JSON body and reports the response status.
#[allow(
    async_fn_in_trait,
    reason = "single-threaded page runtime never needs Send futures from this trait"
)]
pub trait HttpTransport {
    /// POST `body` to `url` with `Content-Type: application/json`.
    ///
    /// # Errors
    /// Returns an error when no HTTP status was received.
    async fn post_json(&self, url: &str, body: &str) -> Result<u16, TransportError>;
}

/// Production transport backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    /// Transport bounded by the page's configured request timeout.
    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(config.request_timeout())
    }

    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn parse_endpoint(url: &str) -> Result<Url, TransportError> {
    let parsed = Url::parse(url).map_err(|err| TransportError::InvalidUrl(format!("{url}: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(TransportError::InvalidUrl(format!("{url}: unsupported scheme {other}"))),
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &str) -> Result<u16, TransportError> {
        let target = parse_endpoint(url)?;
        let mut req = self
            .client
            .post(target)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned());
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let resp = req
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let status = resp.status().as_u16();
        debug!("POST {url} -> {status}");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClipboardFallback;

    #[test]
    fn endpoint_must_be_absolute_http() {
        assert!(parse_endpoint("https://example.com/hook").is_ok());
        assert!(matches!(parse_endpoint("/hook"), Err(TransportError::InvalidUrl(_))));
        assert!(matches!(
            parse_endpoint("ftp://example.com/hook"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn page_config_timeout_reaches_transport() {
        let bounded = ReqwestTransport::from_config(&PageConfig::new(3000, Some(750), ClipboardFallback::Prompt));
        assert_eq!(bounded.timeout(), Some(Duration::from_millis(750)));
        let unbounded = ReqwestTransport::from_config(&PageConfig::new(3000, Some(0), ClipboardFallback::Prompt));
        assert_eq!(unbounded.timeout(), None);
    }

    #[tokio::test]
    async fn invalid_url_fails_without_network() {
        let transport = ReqwestTransport::default();
        let result = transport.post_json("not a url", "{}").await;
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }
}
