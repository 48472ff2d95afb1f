//! Where reports come from.
//!
//! [`ReportSource`] is the seam between the prediction pipeline and the
//! outside world. [`HttpSource`] talks to the live feed; [`JsonSource`] wraps a
//! body that is already in memory (a saved response, a file, a test fixture).

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use crate::config::SourceConfig;
use crate::error::{CaveError, Result};
use crate::ingest;
use crate::report::Report;

/// Supplies one fresh batch of reports per call.
pub trait ReportSource {
    /// Fetch and parse a batch.
    ///
    /// # Errors
    ///
    /// [`CaveError::Fetch`] when the data cannot be obtained, and
    /// [`CaveError::Parse`] when any entry is malformed.
    fn fetch_reports(&self) -> Result<Vec<Report>>;
}

impl<S: ReportSource + ?Sized> ReportSource for &S {
    fn fetch_reports(&self) -> Result<Vec<Report>> {
        (**self).fetch_reports()
    }
}

// ── JsonSource ──────────────────────────────────────────────────────────────

/// A response body held in memory.
#[derive(Debug, Clone)]
pub struct JsonSource {
    body: String,
}

impl JsonSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl ReportSource for JsonSource {
    fn fetch_reports(&self) -> Result<Vec<Report>> {
        ingest::parse_body(&self.body)
    }
}

// ── HttpSource ──────────────────────────────────────────────────────────────

/// Blocking client for the live report feed.
#[derive(Debug)]
pub struct HttpSource {
    client: Client,
    config: SourceConfig,
}

impl HttpSource {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidConfig`] if the settings are invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(config: SourceConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| CaveError::InvalidConfig(format!("user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| CaveError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self { client, config })
    }

    fn fetch_body(&self) -> Result<String> {
        tracing::debug!(
            endpoint = %self.config.endpoint,
            region = %self.config.region,
            "fetching reports"
        );

        let response = self
            .client
            .get(self.config.endpoint.trim())
            .query(&[("region", self.config.region.trim())])
            .send()
            .map_err(|e| CaveError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaveError::Fetch(format!("server answered {status}")));
        }

        response
            .text()
            .map_err(|e| CaveError::Fetch(format!("reading body: {e}")))
    }
}

impl ReportSource for HttpSource {
    fn fetch_reports(&self) -> Result<Vec<Report>> {
        let body = self.fetch_body()?;
        ingest::parse_body(&body)
    }
}
