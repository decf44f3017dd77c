use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a network endpoint as seen by the matcher.
///
/// Both fields are plain strings, never absent: an unresolvable component is
/// the empty string. After [`resolve_host`](crate::resolver::resolve_host) at
/// least one of the two is populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    /// The literal host string as presented by the client (header/authority
    /// value), kept verbatim with no normalization or case-folding.
    pub value: String,
    /// The client-visible IP address with any port suffix stripped.
    pub ip: String,
}

impl Host {
    pub fn new(value: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ip: ip.into(),
        }
    }

    /// True when neither the hostname nor the IP could be determined.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.ip.is_empty()
    }
}

/// One recorded request/response pair, tagged with the host it was captured
/// under.
///
/// Items are created fully formed by the recording layer, appended to the
/// [`History`](crate::history::History) once, and immutable thereafter. The
/// response payload is opaque cargo: the matcher hands it back untouched and
/// never inspects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Host the recording was captured under.
    pub host: Host,
    /// URL port of the recorded request ("" when the URL carried none).
    pub port: String,
    /// Protocol/version string, e.g. `HTTP/1.1`.
    pub protocol: String,
    /// HTTP method of the recorded request.
    pub method: String,
    /// Percent-escaped URL path of the recorded request.
    pub path: String,
    /// Raw request-body payload.
    pub request: Bytes,
    /// Recorded response payload, replayed by the caller on a match.
    pub response: Bytes,
    /// When the pair was captured. Never consulted by ranking; carried for
    /// the persistence layer.
    pub recorded_at: DateTime<Utc>,
}

/// Result of one match operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The best-ranked history entry for this request.
    Matched(Arc<Item>),
    /// No history entry was recorded against the request's host.
    NoCandidate,
}

impl MatchOutcome {
    /// The winning item, if any.
    pub fn item(&self) -> Option<&Arc<Item>> {
        match self {
            MatchOutcome::Matched(item) => Some(item),
            MatchOutcome::NoCandidate => None,
        }
    }
}

/// Per-matcher tuning knobs.
///
/// Serde-friendly and cheap to clone so it can be embedded in higher-level
/// service configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Header consulted for the client-visible IP before falling back to the
    /// transport remote address.
    #[serde(default = "MatcherConfig::default_forwarded_header")]
    pub forwarded_header: String,
    /// Cap on how many host-filtered candidates enter ranking; `0` means
    /// unbounded. The cap is applied in insertion order, before ranking.
    #[serde(default)]
    pub max_candidates: usize,
}

impl MatcherConfig {
    pub(crate) fn default_forwarded_header() -> String {
        "x-forwarded-for".to_string()
    }

    /// Validate the configuration once, at matcher construction.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.forwarded_header.trim().is_empty() {
            return Err(MatchError::InvalidConfig(
                "forwarded_header must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            forwarded_header: Self::default_forwarded_header(),
            max_candidates: 0,
        }
    }
}

/// Errors produced by the matching layer.
///
/// Body-read failures during ranking are deliberately absent: they are logged
/// and degrade the single match operation, never escalated to the caller.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid matcher configuration.
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
}
