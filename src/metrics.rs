//! Pluggable per-match observability hook.
//!
//! Install a recorder once during service startup via [`set_match_metrics`];
//! every [`Matcher`](crate::engine::Matcher) in the process then reports
//! through it. With no recorder installed the hook is a no-op.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Receiver for per-match observations.
pub trait MatchMetrics: Send + Sync {
    /// Called once per completed match operation.
    ///
    /// `candidates` is the host-filtered candidate count before ranking;
    /// `matched` is false when the operation ended in no-candidate.
    fn record_match(&self, host: &str, candidates: usize, latency: Duration, matched: bool);
}

static RECORDER: OnceCell<Arc<dyn MatchMetrics>> = OnceCell::new();

/// Install the process-wide metrics recorder. Returns `false` if one was
/// already installed (the first install wins).
pub fn set_match_metrics(recorder: Arc<dyn MatchMetrics>) -> bool {
    RECORDER.set(recorder).is_ok()
}

pub(crate) fn metrics_recorder() -> Option<&'static Arc<dyn MatchMetrics>> {
    RECORDER.get()
}
