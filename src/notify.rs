//! Hooks for telling the presentation layer that cached views are stale.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// View name for the rendered incident list.
pub const INCIDENT_LIST_VIEW: &str = "/";

/// Receives "this view is stale" signals after the store changes.
pub trait StaleNotifier: Send + Sync {
    fn invalidate(&self, view: &str);
}

impl<F> StaleNotifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn invalidate(&self, view: &str) {
        self(view)
    }
}

/// Discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl StaleNotifier for NoopNotifier {
    fn invalidate(&self, _view: &str) {}
}

/// Per-view revision counters.
///
/// Each invalidation bumps the view's revision; readers use the revision as a
/// cache validator (the HTTP layer turns it into an `ETag`).
#[derive(Debug, Clone, Default)]
pub struct ViewRevisions {
    revisions: Arc<Mutex<HashMap<String, u64>>>,
}

impl ViewRevisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current revision of `view`; 0 if it was never invalidated.
    pub fn revision(&self, view: &str) -> u64 {
        let revisions = self.revisions.lock().expect("view revisions lock poisoned");
        revisions.get(view).copied().unwrap_or(0)
    }
}

impl StaleNotifier for ViewRevisions {
    fn invalidate(&self, view: &str) {
        let mut revisions = self.revisions.lock().expect("view revisions lock poisoned");
        let revision = revisions.entry(view.to_string()).or_default();
        *revision += 1;
        tracing::debug!("Invalidated view {} (revision {})", view, revision);
    }
}
