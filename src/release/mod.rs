//! Release workflow for OfflineIMAP
//!
//! Sequential orchestration of the whole release: version bump, changelog
//! curation, commit + tag + fast-forward merge, announcement draft and
//! website staging.
//!
//! # Core invariants
//!
//! 1. **Every step is a precondition for the next** — no step is re-entered
//!    automatically, and an unchanged version stops the run before any
//!    excerpt or tag exists.
//! 2. **The stable branch only ever fast-forwards** — a rejected
//!    fast-forward fails loudly; a merge commit is never created.
//! 3. **Failure rolls back best-effort** — an uncaught failure triggers
//!    exactly one `ReleaseState::restore()` pass before propagating, and
//!    restoration itself never raises.
//!
//! The current new version is threaded through the steps as an explicit
//! parameter; no step reads it from shared state.

pub mod announce;
pub mod changelog;
pub mod state;
pub mod testers;
pub mod version;
pub mod website;
pub mod workflow;

use crate::core::error::ReleaseResult;

/// Run a cleanup or restore task under the swallow-and-log policy
///
/// Failures are logged at warn level and converted to `None`; they never
/// propagate. Both the rollback path and post-run cleanup route every task
/// through here so the failure-tolerance policy stays in one place.
pub fn best_effort<T>(label: &str, result: ReleaseResult<T>) -> Option<T> {
  match result {
    Ok(value) => Some(value),
    Err(err) => {
      log::warn!("{}: {}", label, err);
      None
    }
  }
}
