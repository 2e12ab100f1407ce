use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use tracing::debug;

use crate::error::NetworkError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// FlightStats blocks clients that don't look like a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;\
    q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const BROWSER_REFERER: &str = "https://www.flightstats.com/";

/// Blocking GET with the browser header set attached.
///
/// Holds an optional caller-supplied client for connection reuse. Without
/// one, every call builds a fresh client and drops it when done.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Option<Client>,
    timeout: Duration,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: None,
            timeout,
        }
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            client: Some(client),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with `params` as the query string and return the body text.
    pub fn get(&self, url: &str, params: &[(&str, String)]) -> Result<String, NetworkError> {
        match &self.client {
            Some(client) => send(client, url, params, self.timeout),
            None => {
                let client = Client::builder().build().map_err(NetworkError::Client)?;
                send(&client, url, params, self.timeout)
            }
        }
    }
}

pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
    headers.insert(REFERER, HeaderValue::from_static(BROWSER_REFERER));
    headers
}

fn send(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout: Duration,
) -> Result<String, NetworkError> {
    debug!(url, ?params, "GET");
    let unreachable = |source| NetworkError::Unreachable {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .query(params)
        .headers(browser_headers())
        .timeout(timeout)
        .send()
        .map_err(unreachable)?;

    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(unreachable)
}

// ── Tests ──
