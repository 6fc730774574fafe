//! Content fetching from URLs, files, and stdin.
//!
//! [`fetch_url`] performs a single GET with browser-like headers and maps
//! every failure onto the fetch variants of [`PostgradeError`]. Local files
//! and stdin produce the same [`RawDocument`] shape so the rest of the
//! pipeline does not care where the markup came from.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{PostgradeError, Result};

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::{Client, header, redirect};

#[cfg(feature = "fetch")]
use tracing::{debug, info, warn};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// HTTP client configuration for fetching blog pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 15, max_redirects: 5, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// Markup as retrieved, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub html: String,
    /// URL after redirects.
    pub final_url: String,
    pub status_code: u16,
    /// Response headers with lower-cased names.
    pub headers: HashMap<String, String>,
}

impl RawDocument {
    /// Wraps markup that did not come over HTTP (file, stdin, editor).
    pub fn from_html(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self { html: html.into(), final_url: url.into(), status_code: 200, headers: HashMap::new() }
    }

    /// The final URL, when it parses.
    pub fn base_url(&self) -> Option<Url> {
        Url::parse(&self.final_url).ok()
    }
}

/// True only for absolute `http` or `https` URLs.
///
/// ```rust
/// use postgrade_core::validate_url;
///
/// assert!(validate_url("https://example.com/post"));
/// assert!(!validate_url("ftp://example.com"));
/// assert!(!validate_url("not a url"));
/// ```
pub fn validate_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

/// Maps a response status onto the fetch taxonomy. Statuses below 400 pass.
pub fn check_status(status: u16) -> Result<()> {
    match status {
        401 => Err(PostgradeError::Unauthorized),
        403 => Err(PostgradeError::Forbidden),
        404 => Err(PostgradeError::NotFound),
        s if s >= 400 => Err(PostgradeError::HttpStatus { status: s }),
        _ => Ok(()),
    }
}

/// Fetches a blog page.
///
/// One attempt, no retries. Follows at most `config.max_redirects`
/// redirects and gives up after `config.timeout` seconds.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<RawDocument> {
    let parsed_url = Url::parse(url).map_err(|e| PostgradeError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(PostgradeError::InvalidUrl(format!(
            "unsupported scheme `{}`, expected http or https",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .redirect(redirect::Policy::limited(config.max_redirects))
        .build()
        .map_err(|e| PostgradeError::Network { detail: e.to_string() })?;

    debug!(url = %parsed_url, timeout = config.timeout, "fetching page");

    let response = client
        .get(parsed_url)
        .header(header::USER_AGENT, &config.user_agent)
        .header(header::ACCEPT, ACCEPT)
        .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::PRAGMA, "no-cache")
        .header(header::UPGRADE_INSECURE_REQUESTS, "1")
        .send()
        .await
        .map_err(|e| classify(&e, config.timeout))?;

    let status_code = response.status().as_u16();
    if let Err(err) = check_status(status_code) {
        warn!(url, status = status_code, code = err.code(), "fetch rejected");
        return Err(err);
    }

    let final_url = response.url().to_string();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_lowercase(), value.to_str().ok()?.to_string())))
        .collect();

    let html = response.text().await.map_err(|e| classify(&e, config.timeout))?;

    info!(url = %final_url, status = status_code, bytes = html.len(), "fetched page");

    Ok(RawDocument { html, final_url, status_code, headers })
}

/// Turns a transport error into one of the fetch variants.
#[cfg(feature = "fetch")]
fn classify(err: &reqwest::Error, timeout: u64) -> PostgradeError {
    use std::error::Error as _;

    if err.is_timeout() {
        warn!(timeout, "fetch timed out");
        return PostgradeError::Timeout { timeout };
    }

    if let Some(status) = err.status()
        && let Err(mapped) = check_status(status.as_u16())
    {
        return mapped;
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            match io.kind() {
                std::io::ErrorKind::ConnectionRefused => return PostgradeError::ConnectionRefused,
                std::io::ErrorKind::TimedOut => return PostgradeError::Timeout { timeout },
                _ => {}
            }
        }

        let message = cause.to_string().to_lowercase();
        if message.contains("dns error")
            || message.contains("failed to lookup address")
            || message.contains("name or service not known")
        {
            return PostgradeError::DnsNotFound;
        }
        if message.contains("connection refused") {
            return PostgradeError::ConnectionRefused;
        }

        source = cause.source();
    }

    warn!(error = %err, "unclassified transport failure");
    PostgradeError::Network { detail: err.to_string() }
}

/// Reads HTML from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(PostgradeError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(PostgradeError::from)
    }
}

/// Reads HTML from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}
