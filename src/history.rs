//! Address/history service.
//!
//! [`AddressHistory`] is the platform contract the viewer depends on: read and
//! write the address fragment, step back and forward, and receive one
//! [`FragmentChanged`] notification per discrete navigation. Notifications are
//! queued per subscription and drained by the owner of the event loop, so
//! they are delivered serially and never while another handler is running.
//!
//! [`MemoryHistory`] models a browser tab's history in memory. It is used by
//! the CLI and by tests, and mirrors what browsers do with `location.hash`:
//!
//! - Setting the fragment to its current value is a no-op and fires nothing.
//! - Setting a new fragment drops any forward entries and pushes a new one.
//! - `back`/`forward` move through the entries and fire a change.
//!
//! [`NavigationMarkers`] is the narrow marker view over any history: the
//! viewer and synchronizer read and write [`Marker`]s, never raw fragments.

use crate::marker::{Marker, MarkerError};
use std::collections::{BTreeMap, VecDeque};
use tracing::trace;

/// Handle for one listener registered with [`AddressHistory::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// One discrete navigation: the fragment before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentChanged {
    pub old: String,
    pub new: String,
}

pub trait AddressHistory {
    /// Current fragment, `""` or `"#..."`.
    fn current_fragment(&self) -> &str;

    /// Navigate to `fragment`, creating a history entry if it differs from the
    /// current one.
    fn set_fragment(&mut self, fragment: &str);

    /// Step back one entry. Returns `false` at the start of history.
    fn back(&mut self) -> bool;

    /// Step forward one entry. Returns `false` at the end of history.
    fn forward(&mut self) -> bool;

    fn subscribe(&mut self) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Pop the oldest undelivered change for this subscription.
    fn next_change(&mut self, id: SubscriptionId) -> Option<FragmentChanged>;
}

/// Marker-level view of the address fragment.
pub trait NavigationMarkers {
    fn read_marker(&self) -> Result<Option<Marker>, MarkerError>;

    fn write_marker(&mut self, marker: &Marker);
}

impl<H: AddressHistory + ?Sized> NavigationMarkers for H {
    fn read_marker(&self) -> Result<Option<Marker>, MarkerError> {
        Marker::from_fragment(self.current_fragment())
    }

    fn write_marker(&mut self, marker: &Marker) {
        self.set_fragment(&marker.to_fragment());
    }
}

/// Normalize a fragment to the form `location.hash` reports.
fn normalize_fragment(fragment: &str) -> String {
    match fragment.strip_prefix('#').unwrap_or(fragment) {
        "" => String::new(),
        body => format!("#{body}"),
    }
}

/// In-memory browser history for a single tab.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
    next_id: u64,
    queues: BTreeMap<SubscriptionId, VecDeque<FragmentChanged>>,
}

impl MemoryHistory {
    /// History with a single entry and no fragment.
    pub fn new() -> Self {
        Self::starting_at("")
    }

    pub fn starting_at(fragment: &str) -> Self {
        Self {
            entries: vec![normalize_fragment(fragment)],
            cursor: 0,
            next_id: 1,
            queues: BTreeMap::new(),
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Index of the current entry in [`entries`](Self::entries).
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn notify(&mut self, old: String) {
        let change = FragmentChanged {
            old,
            new: self.entries[self.cursor].clone(),
        };
        trace!(old = %change.old, new = %change.new, "fragment changed");
        for queue in self.queues.values_mut() {
            queue.push_back(change.clone());
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressHistory for MemoryHistory {
    fn current_fragment(&self) -> &str {
        &self.entries[self.cursor]
    }

    fn set_fragment(&mut self, fragment: &str) {
        let fragment = normalize_fragment(fragment);
        if fragment == self.entries[self.cursor] {
            return;
        }
        let old = self.entries[self.cursor].clone();
        self.entries.truncate(self.cursor + 1);
        self.entries.push(fragment);
        self.cursor += 1;
        self.notify(old);
    }

    fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let old = self.entries[self.cursor].clone();
        self.cursor -= 1;
        self.notify(old);
        true
    }

    fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        let old = self.entries[self.cursor].clone();
        self.cursor += 1;
        self.notify(old);
        true
    }

    fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.queues.insert(id, VecDeque::new());
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.queues.remove(&id);
    }

    fn next_change(&mut self, id: SubscriptionId) -> Option<FragmentChanged> {
        self.queues.get_mut(&id)?.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_empty_fragment() {
        let history = MemoryHistory::new();
        assert_eq!(history.current_fragment(), "");
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn fragments_are_normalized() {
        let mut history = MemoryHistory::new();
        history.set_fragment("images");
        assert_eq!(history.current_fragment(), "#images");
        history.set_fragment("#");
        assert_eq!(history.current_fragment(), "");
    }

    #[test]
    fn set_fragment_pushes_entry_and_notifies() {
        let mut history = MemoryHistory::new();
        let sub = history.subscribe();

        history.set_fragment("#post:1");

        assert_eq!(history.entries(), ["", "#post:1"]);
        assert_eq!(
            history.next_change(sub),
            Some(FragmentChanged {
                old: String::new(),
                new: "#post:1".to_string(),
            })
        );
        assert_eq!(history.next_change(sub), None);
    }

    #[test]
    fn setting_same_fragment_is_silent() {
        let mut history = MemoryHistory::new();
        history.set_fragment("#images");
        let sub = history.subscribe();

        history.set_fragment("#images");

        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.next_change(sub), None);
    }

    #[test]
    fn back_and_forward_move_cursor() {
        let mut history = MemoryHistory::new();
        history.set_fragment("#post:1");
        history.set_fragment("#images");

        assert!(history.back());
        assert_eq!(history.current_fragment(), "#post:1");
        assert!(history.back());
        assert_eq!(history.current_fragment(), "");
        assert!(!history.back());

        assert!(history.forward());
        assert!(history.forward());
        assert_eq!(history.current_fragment(), "#images");
        assert!(!history.forward());
    }

    #[test]
    fn new_entry_drops_forward_history() {
        let mut history = MemoryHistory::new();
        history.set_fragment("#post:1");
        history.set_fragment("#post:2");
        history.back();

        history.set_fragment("#images");

        assert_eq!(history.entries(), ["", "#post:1", "#images"]);
        assert!(!history.forward());
    }

    #[test]
    fn back_notifies_with_old_and_new() {
        let mut history = MemoryHistory::new();
        history.set_fragment("#post:1");
        let sub = history.subscribe();

        history.back();

        let change = history.next_change(sub).unwrap();
        assert_eq!(change.old, "#post:1");
        assert_eq!(change.new, "");
    }

    #[test]
    fn each_subscription_has_its_own_queue() {
        let mut history = MemoryHistory::new();
        let a = history.subscribe();
        let b = history.subscribe();
        assert_ne!(a, b);

        history.set_fragment("#images");

        assert!(history.next_change(a).is_some());
        assert!(history.next_change(b).is_some());
        assert!(history.next_change(a).is_none());
    }

    #[test]
    fn unsubscribed_listener_receives_nothing() {
        let mut history = MemoryHistory::new();
        let sub = history.subscribe();
        history.unsubscribe(sub);

        history.set_fragment("#images");

        assert_eq!(history.next_change(sub), None);
    }

    #[test]
    fn changes_before_subscribing_are_not_delivered() {
        let mut history = MemoryHistory::new();
        history.set_fragment("#images");
        let sub = history.subscribe();
        assert_eq!(history.next_change(sub), None);
    }

    #[test]
    fn markers_read_and_write_through_fragment() {
        let mut history = MemoryHistory::new();
        assert_eq!(history.read_marker(), Ok(None));

        history.write_marker(&Marker::post("7"));
        assert_eq!(history.current_fragment(), "#post:7");
        assert_eq!(history.read_marker(), Ok(Some(Marker::post("7"))));

        history.set_fragment("#somewhere-else");
        assert!(history.read_marker().is_err());
    }
}
