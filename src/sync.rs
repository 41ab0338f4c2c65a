//! History synchronizer.
//!
//! Bridges fragment-change notifications to viewer transitions so the
//! browser's back button closes overlays instead of leaving the feed.
//!
//! Reconciliation is level-triggered: on each notification it reads the
//! *current* marker and compares it with the one the open overlay expects.
//! It only ever closes. Reopening comes exclusively from explicit clicks.
//!
//! The image viewer is checked before the post viewer. With mutually
//! exclusive states only one can be open, so the order only matters for
//! which branch reports the close.

use crate::history::{AddressHistory, NavigationMarkers, SubscriptionId};
use crate::viewer::{Phase, ViewerStateHolder};
use tracing::{debug, warn};

/// What a single reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The marker still matches the open overlay, or nothing is open.
    Unchanged,
    ClosedImages,
    ClosedPost,
    /// The fragment is not a marker this viewer understands; left alone.
    Ignored { fragment: String },
}

/// Compare the current marker with the open overlay and close it on mismatch.
pub fn reconcile<H>(viewer: &mut ViewerStateHolder, history: &H) -> SyncOutcome
where
    H: AddressHistory + ?Sized,
{
    let current = match history.read_marker() {
        Ok(marker) => marker,
        Err(err) => {
            warn!(%err, "ignoring navigation");
            return SyncOutcome::Ignored {
                fragment: history.current_fragment().to_string(),
            };
        }
    };

    let expected = viewer.state().expected_marker();
    let outcome = match viewer.state().phase() {
        Phase::ViewingImages if current != expected => {
            viewer.close_images();
            SyncOutcome::ClosedImages
        }
        Phase::ViewingPost if current != expected => {
            viewer.close_post();
            SyncOutcome::ClosedPost
        }
        _ => SyncOutcome::Unchanged,
    };
    debug!(marker = ?current, ?outcome, "reconciled viewer with history");
    outcome
}

/// Subscription to a history's fragment changes, driving [`reconcile`].
#[derive(Debug)]
pub struct HistorySynchronizer {
    subscription: SubscriptionId,
}

impl HistorySynchronizer {
    pub fn attach<H>(history: &mut H) -> Self
    where
        H: AddressHistory + ?Sized,
    {
        Self {
            subscription: history.subscribe(),
        }
    }

    pub fn detach<H>(self, history: &mut H)
    where
        H: AddressHistory + ?Sized,
    {
        history.unsubscribe(self.subscription);
    }

    /// Handle every pending notification, one at a time, in arrival order.
    pub fn dispatch<H>(&self, history: &mut H, viewer: &mut ViewerStateHolder) -> Vec<SyncOutcome>
    where
        H: AddressHistory + ?Sized,
    {
        let mut outcomes = Vec::new();
        while let Some(change) = history.next_change(self.subscription) {
            debug!(old = %change.old, new = %change.new, "navigation");
            outcomes.push(reconcile(viewer, &*history));
        }
        outcomes
    }
}
