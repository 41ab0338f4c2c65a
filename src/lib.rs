//! # DummyBook
//!
//! The feed view of the DummyBook social app: a column of post cards, a post
//! viewer overlay and an image viewer overlay, kept in step with browser
//! history so the back button closes overlays instead of leaving the page.
//!
//! # Architecture
//!
//! ```text
//!   click ──► FeedSession ──► ViewerStateHolder ──► state + marker write
//!                  │                                      │
//!                  │        AddressHistory ◄──────────────┘
//!                  │              │ FragmentChanged (queued)
//!                  └── dispatch ──┴──► HistorySynchronizer ──► close on mismatch
//! ```
//!
//! Opening an overlay replaces the viewer state and writes its navigation
//! marker (`#post:<id>` or `#images`) in one call. Back/forward changes the
//! fragment; the synchronizer compares the current marker with the one the
//! open overlay expects and closes it when they differ. It never reopens.
//!
//! Everything is single-threaded. Notifications are queued by the history and
//! delivered by [`session::FeedSession`] after the action that caused them has
//! finished, so the synchronizer never sees a new overlay with a stale marker.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`post`] | Post data model and its JSON wire format |
//! | [`marker`] | Navigation markers and their fragment encoding |
//! | [`history`] | Address/history contract and the in-memory browser history |
//! | [`viewer`] | Viewer state machine: closed, viewing a post, viewing images |
//! | [`sync`] | Closes overlays whose marker left the address |
//! | [`feed`] | Post sources (JSON file, built-in seed) and the feed list |
//! | [`session`] | One feed view wired together; stands in for the event loop |
//! | [`render`] | Feed, card, collage and overlay HTML using Maud |
//! | [`script`] | Replay scripts of clicks and navigation |
//! | [`config`] | `dummybook.toml` loading, merging and validation |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## State as a Sum Type
//!
//! [`viewer::ViewerState`] is one enum, not a set of nullable fields, so "post
//! viewer and image viewer both open" cannot be represented. Likewise
//! [`post::PostBody`] makes an image post without images unrepresentable.
//!
//! ## Injected History
//!
//! The viewer writes markers through [`history::NavigationMarkers`], passed in
//! per call. Tests and the CLI use [`history::MemoryHistory`]; nothing reaches
//! for a global.

pub mod config;
pub mod feed;
pub mod history;
pub mod logging;
pub mod marker;
pub mod output;
pub mod post;
pub mod render;
pub mod script;
pub mod session;
pub mod sync;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
