//! Forwards finished matches to a rewards/notification service.
//!
//! The engine knows nothing about players or promo codes. It hands over a
//! [`MatchResult`] once per finished match, and a reporter decides what to do
//! with it.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use whisker_tictactoe::MatchResult;

/// Wire name for a result, as the rewards service expects it.
pub fn result_label(result: MatchResult) -> &'static str {
    match result {
        MatchResult::PlayerWins => "win",
        MatchResult::ComputerWins => "lose",
        MatchResult::Draw => "draw",
    }
}

/// Body sent to the rewards service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    /// `win`, `lose` or `draw`, from the player's side.
    pub result: &'static str,
    /// Chat identity of the player. The engine has none, so always null.
    pub telegram_id: Option<i64>,
    /// Display name of the player. Always null for the same reason.
    pub first_name: Option<String>,
}

impl From<MatchResult> for ResultPayload {
    fn from(result: MatchResult) -> Self {
        Self {
            result: result_label(result),
            telegram_id: None,
            first_name: None,
        }
    }
}

/// What the rewards service said back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportReceipt {
    /// `ok` or `error`.
    #[serde(default)]
    status: String,
    /// A promo code, issued on a player win.
    #[serde(default)]
    promo_code: Option<String>,
    /// True when this identity was already given a code.
    #[serde(default)]
    already_has_promo: bool,
}

/// Reporting error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Report error: {} at {}:{}", message, file, line)]
pub struct ReportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ReportError {
    /// Creates a new report error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ReportError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

/// Receives one event per finished match.
#[async_trait::async_trait]
pub trait ResultReporter: Send + Sync {
    /// Reports a finished match.
    async fn report(&self, result: MatchResult) -> Result<ReportReceipt, ReportError>;
}

/// Reporter that only writes a log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

#[async_trait::async_trait]
impl ResultReporter for LogReporter {
    async fn report(&self, result: MatchResult) -> Result<ReportReceipt, ReportError> {
        info!(%result, "Match result (no report_url configured)");
        Ok(ReportReceipt::default())
    }
}

/// Reporter that POSTs the result as JSON.
#[derive(Debug, Clone)]
pub struct HttpReporter {
    url: String,
    client: reqwest::Client,
}

impl HttpReporter {
    /// Creates a reporter for the given endpoint.
    #[instrument]
    pub fn new(url: String) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { url, client })
    }
}

#[async_trait::async_trait]
impl ResultReporter for HttpReporter {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn report(&self, result: MatchResult) -> Result<ReportReceipt, ReportError> {
        let payload = ResultPayload::from(result);
        debug!(?payload, "Posting match result");

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Result service rejected report");
            return Err(ReportError::new(format!("Result service returned {}", status)));
        }

        let receipt: ReportReceipt = response.json().await?;
        info!(
            status = %receipt.status,
            promo_issued = receipt.promo_code.is_some(),
            "Match result reported"
        );
        Ok(receipt)
    }
}

/// Picks the HTTP reporter when a URL is configured, the log reporter otherwise.
pub fn reporter_for(url: Option<&str>) -> Result<Box<dyn ResultReporter>, ReportError> {
    match url {
        Some(url) => Ok(Box::new(HttpReporter::new(url.to_string())?)),
        None => Ok(Box::new(LogReporter)),
    }
}
