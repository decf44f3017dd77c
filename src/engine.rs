//! Fuzzy ranking and match selection.
//!
//! The comparator defines a strict weak ordering over recorded items relative
//! to a [`MatchContext`]; a stable sort puts the best candidate first. The
//! quality of every replayed response hinges on this cascade.

use std::cmp::Ordering;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::history::History;
use crate::metrics::metrics_recorder;
use crate::resolver::{resolve_host, IncomingRequest};
use crate::types::{Host, Item, MatchError, MatchOutcome, MatcherConfig};


/// Snapshot of the incoming request's discriminating fields, built once per
/// match operation and reused across every pairwise comparison.
///
/// Building the context consumes the request body, the one suspension point
/// in the core.
#[derive(Debug, Clone)]
pub struct MatchContext {
    pub body: Bytes,
    pub host: Host,
    pub port: String,
    pub protocol: String,
    pub method: String,
    pub path: String,
}

impl MatchContext {
    /// Capture `req`'s fields and consume its body stream.
    pub async fn from_request<R>(req: &mut R, host: Host) -> io::Result<Self>
    where
        R: IncomingRequest + ?Sized,
    {
        let body = req.read_body().await?;
        Ok(Self {
            body,
            host,
            port: req.port().to_string(),
            protocol: req.protocol().to_string(),
            method: req.method().to_string(),
            path: req.path().to_string(),
        })
    }
}

/// `Less` when exactly `a` satisfies the criterion, `Greater` when exactly
/// `b` does, `None` when the criterion does not discriminate.
fn prefer(a: bool, b: bool) -> Option<Ordering> {
    match (a, b) {
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        _ => None,
    }
}

/// Order two candidates relative to `ctx`; `Less` means `a` is the better
/// match.
///
/// Fixed priority cascade, first discriminating criterion wins:
/// exact path, exact body, method, protocol, port, then body-length
/// closeness as the final tie-break. A method match wins outright even when
/// the other candidate's body length is closer.
pub fn compare_candidates(a: &Item, b: &Item, ctx: &MatchContext) -> Ordering {
    if let Some(ord) = prefer(a.path == ctx.path, b.path == ctx.path) {
        return ord;
    }

    // Either both paths match exactly or neither does; look at the body.
    if let Some(ord) = prefer(a.request == ctx.body, b.request == ctx.body) {
        return ord;
    }

    if let Some(ord) = prefer(a.method == ctx.method, b.method == ctx.method) {
        return ord;
    }

    if let Some(ord) = prefer(a.protocol == ctx.protocol, b.protocol == ctx.protocol) {
        return ord;
    }

    if let Some(ord) = prefer(a.port == ctx.port, b.port == ctx.port) {
        return ord;
    }

    // Everything else tied: the candidate whose body length is closest to
    // the incoming one wins. Content closeness would be a better signal than
    // length alone.
    body_len_diff(a, ctx).cmp(&body_len_diff(b, ctx))
}

fn body_len_diff(item: &Item, ctx: &MatchContext) -> usize {
    item.request.len().abs_diff(ctx.body.len())
}

/// Sort `candidates` in place, best match first.
///
/// The sort is stable: candidates the comparator cannot tell apart keep
/// their insertion order, deterministically across runs.
pub fn rank(candidates: &mut [Arc<Item>], ctx: &MatchContext) {
    candidates.sort_by(|a, b| compare_candidates(a, b, ctx));
}

/// The match selector: resolves the request's host, filters the history,
/// ranks the survivors, and reports the winner.
pub struct Matcher {
    history: History,
    config: MatcherConfig,
}

impl Matcher {
    /// Construct a matcher over `history` with an explicit config.
    pub fn new(history: History, config: MatcherConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { history, config })
    }

    /// Construct a matcher with the default config.
    pub fn with_defaults(history: History) -> Self {
        Self {
            history,
            config: MatcherConfig::default(),
        }
    }

    /// The store this matcher consults.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Find the history entry that most closely resembles `req`.
    ///
    /// Never panics and never fails hard: an unreadable request body is
    /// logged and degrades this one operation to an unranked pick (first
    /// candidate in insertion order), and an unknown host is the normal
    /// [`MatchOutcome::NoCandidate`] outcome.
    pub async fn find_matching<R>(&self, req: &mut R) -> MatchOutcome
    where
        R: IncomingRequest + ?Sized,
    {
        let start = Instant::now();
        let host = resolve_host(req, &self.config.forwarded_header);

        let mut candidates = self.history.candidates_for(&host);
        if self.config.max_candidates > 0 && candidates.len() > self.config.max_candidates {
            candidates.truncate(self.config.max_candidates);
        }
        if candidates.is_empty() {
            debug!(host = %host.value, ip = %host.ip, "no recording for host");
            self.observe(&host, 0, start, false);
            return MatchOutcome::NoCandidate;
        }
        let total = candidates.len();

        match MatchContext::from_request(req, host.clone()).await {
            Ok(ctx) => rank(&mut candidates, &ctx),
            Err(err) => {
                // Without the body the cascade cannot run; the candidate
                // list stays in pre-sort (insertion) order.
                warn!(
                    host = %host.value,
                    error = %err,
                    "error reading body of request while ranking"
                );
            }
        }

        match candidates.into_iter().next() {
            Some(winner) => {
                debug!(
                    host = %host.value,
                    path = %winner.path,
                    method = %winner.method,
                    candidates = total,
                    "selected closest recording"
                );
                self.observe(&host, total, start, true);
                MatchOutcome::Matched(winner)
            }
            None => {
                self.observe(&host, total, start, false);
                MatchOutcome::NoCandidate
            }
        }
    }

    fn observe(&self, host: &Host, candidates: usize, start: Instant, matched: bool) {
        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(&host.value, candidates, start.elapsed(), matched);
        }
    }
}
