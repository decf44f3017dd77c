//! # mockmatch
//!
//! ## Purpose
//!
//! `mockmatch` is the matching core of an HTTP mock/record-replay tool. The
//! surrounding service records request/response pairs into a [`History`];
//! when a new request arrives, the [`Matcher`] picks the recording that most
//! closely resembles it so the service can reply with the stored response
//! instead of forwarding to a live backend.
//!
//! Listener setup, on-disk persistence of recordings, and response replay
//! are the caller's concern: this crate only stores fully formed [`Item`]s
//! and ranks them.
//!
//! ## Core Types
//!
//! - [`Item`]: one recorded request/response pair plus the [`Host`] it was
//!   captured under.
//! - [`History`]: the process-wide, append-only recording store. Clones
//!   share one lock-guarded list; filtering hands back a snapshot so ranking
//!   never races an append.
//! - [`IncomingRequest`]: the seam the service implements to expose the
//!   request being matched (host, method, path, body stream, ...).
//! - [`MatchContext`]: per-match snapshot of the request's discriminating
//!   fields, built once and reused across every pairwise comparison.
//! - [`Matcher`]: resolve host → filter → rank → [`MatchOutcome`].
//!
//! ## Example Usage
//!
//! ```rust
//! use bytes::Bytes;
//! use chrono::Utc;
//! use mockmatch::{History, Host, Item, MatchContext, Matcher, MatcherConfig};
//!
//! let history = History::new();
//! history.append(Item {
//!     host: Host::new("backend.test", "10.0.0.1"),
//!     port: "".into(),
//!     protocol: "HTTP/1.1".into(),
//!     method: "GET".into(),
//!     path: "/health".into(),
//!     request: Bytes::new(),
//!     response: Bytes::from_static(b"{\"status\":\"ok\"}"),
//!     recorded_at: Utc::now(),
//! });
//!
//! // At request time the service adapts its HTTP stack to `IncomingRequest`
//! // and calls `matcher.find_matching(&mut request).await`. The ranking
//! // itself is also usable directly over a filtered snapshot:
//! let matcher = Matcher::new(history.clone(), MatcherConfig::default()).expect("valid config");
//! let ctx = MatchContext {
//!     body: Bytes::new(),
//!     host: Host::new("backend.test", "10.0.0.1"),
//!     port: "".into(),
//!     protocol: "HTTP/1.1".into(),
//!     method: "GET".into(),
//!     path: "/health".into(),
//! };
//! let mut candidates = matcher.history().candidates_for(&ctx.host);
//! mockmatch::rank(&mut candidates, &ctx);
//! assert_eq!(candidates[0].path, "/health");
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to
//! record per-match latency, candidate counts, and outcomes. This is
//! typically done once during service startup so every [`Matcher`] shares
//! the same backend. Diagnostics go through `tracing`; the library installs
//! no subscriber.

pub mod engine;
pub mod history;
pub mod metrics;
pub mod resolver;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use crate::engine::{compare_candidates, rank, MatchContext, Matcher};
pub use crate::history::History;
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::resolver::{resolve_host, IncomingRequest};
pub use crate::types::{Host, Item, MatchError, MatchOutcome, MatcherConfig};
