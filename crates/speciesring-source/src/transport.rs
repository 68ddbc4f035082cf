//! HTTP transport.
//!
//! Remote services are reached through the [`Transport`] trait, which returns
//! one [`Page`] per request: the response body plus the URL of the next page
//! when the server advertises one in its `Link` header. [`HttpTransport`] is
//! the blocking `reqwest` implementation; tests substitute canned pages.

use std::{thread, time::Duration};

use log::{debug, warn};
use reqwest::{
    StatusCode,
    blocking::Client,
    header::{ACCEPT, HeaderMap, HeaderValue, LINK, RETRY_AFTER, USER_AGENT},
};
use serde::{Deserialize, Serialize};

use crate::SourceError;

/// Maximum number of attempts for a rate-limited request.
const MAX_ATTEMPTS: u32 = 3;

/// Wait used when a 429 response carries no usable `Retry-After` value.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One fetched response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    body: String,
    next: Option<String>,
}

impl Page {
    pub fn new(body: impl Into<String>, next: Option<String>) -> Self {
        Self {
            body: body.into(),
            next,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// URL of the following page, if any.
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

/// A way of performing GET requests.
pub trait Transport {
    /// Fetches `url` and returns its body.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the request cannot be completed or the
    /// server answers with a non-success status.
    fn get(&self, url: &str) -> Result<Page, SourceError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Page, SourceError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<Page, SourceError> {
        (**self).get(url)
    }
}

/// Blocking HTTP transport with rate-limit handling.
///
/// A `429 Too Many Requests` answer is retried after the number of seconds in
/// its `Retry-After` header (one second when absent), up to three attempts in
/// total.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_attempts: u32,
}

impl HttpTransport {
    /// Creates a transport sending JSON `Accept` and crate `User-Agent` headers.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] when the underlying client cannot be
    /// built.
    pub fn new() -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("speciesring/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            max_attempts: MAX_ATTEMPTS,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Page, SourceError> {
        let mut attempts = 0;

        loop {
            debug!(url; "Sending request");
            let response = self.client.get(url).send()?;
            let status = response.status();

            if status.is_success() {
                let next = response
                    .headers()
                    .get(LINK)
                    .and_then(|value| value.to_str().ok())
                    .and_then(parse_next_link);
                let body = response.text()?;
                return Ok(Page::new(body, next));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                attempts += 1;
                if attempts >= self.max_attempts {
                    return Err(SourceError::RetriesExhausted {
                        url: url.to_string(),
                    });
                }

                let wait_secs = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                warn!(url, wait_secs, attempt = attempts; "Rate limited, waiting before retry");
                thread::sleep(Duration::from_secs(wait_secs));
                continue;
            }

            let body = response.text().unwrap_or_default();
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
    }
}

/// Extracts the `rel="next"` target from a `Link` header value.
///
/// # Examples
///
/// ```
/// use speciesring_source::transport::parse_next_link;
///
/// let header = r#"<https://example.org/p2>; rel="next", <https://example.org/p0>; rel="prev""#;
/// assert_eq!(parse_next_link(header).as_deref(), Some("https://example.org/p2"));
/// assert_eq!(parse_next_link(r#"<https://example.org/p0>; rel="prev""#), None);
/// ```
pub fn parse_next_link(header: &str) -> Option<String> {
    header
        .split(',')
        .find(|entry| entry.contains(r#"rel="next""#))
        .and_then(|entry| entry.split(';').next())
        .map(|target| target.trim().trim_start_matches('<').trim_end_matches('>'))
        .filter(|target| !target.is_empty())
        .map(str::to_string)
}
