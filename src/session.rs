//! Feed session.
//!
//! Owns one feed view: the post list, the viewer state, the address history
//! and the synchronizer subscribed to it. Each action plays one turn of the UI
//! event loop. The intent runs to completion (state change plus marker
//! write), then pending navigation notifications are dispatched one by one.

use crate::feed::FeedList;
use crate::history::AddressHistory;
use crate::post::Post;
use crate::sync::{HistorySynchronizer, SyncOutcome};
use crate::viewer::{ViewerError, ViewerState, ViewerStateHolder};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no post with id {0:?} in the feed")]
    UnknownPost(String),
    #[error("post {0:?} has no images")]
    NoImages(String),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

#[derive(Debug)]
pub struct FeedSession<H: AddressHistory> {
    feed: FeedList,
    viewer: ViewerStateHolder,
    history: H,
    sync: HistorySynchronizer,
}

impl<H: AddressHistory> FeedSession<H> {
    pub fn new(feed: FeedList, mut history: H) -> Self {
        let sync = HistorySynchronizer::attach(&mut history);
        Self {
            feed,
            viewer: ViewerStateHolder::new(),
            history,
            sync,
        }
    }

    pub fn feed(&self) -> &FeedList {
        &self.feed
    }

    pub fn state(&self) -> &ViewerState {
        self.viewer.state()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Direct access to the history. Changes made through it are picked up
    /// by the next [`dispatch_pending`](Self::dispatch_pending).
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Deliver every queued navigation notification to the synchronizer.
    pub fn dispatch_pending(&mut self) -> Vec<SyncOutcome> {
        self.sync.dispatch(&mut self.history, &mut self.viewer)
    }

    /// Click on a post's text.
    pub fn open_post(&mut self, id: &str) -> Result<Vec<SyncOutcome>, SessionError> {
        let post = self.find(id)?.clone();
        self.viewer.open_post(post, &mut self.history);
        Ok(self.dispatch_pending())
    }

    /// Click on collage tile `index` of an image post.
    pub fn open_image(
        &mut self,
        post_id: &str,
        index: usize,
    ) -> Result<Vec<SyncOutcome>, SessionError> {
        let images = self
            .find(post_id)?
            .images()
            .ok_or_else(|| SessionError::NoImages(post_id.to_string()))?
            .as_slice()
            .to_vec();
        self.viewer
            .open_images(images, index, &mut self.history)
            .inspect_err(|err| warn!(post = post_id, %err, "rejected open image"))?;
        Ok(self.dispatch_pending())
    }

    /// Click on thumbnail `index` in the image viewer.
    pub fn select_image(&mut self, index: usize) -> Result<Vec<SyncOutcome>, SessionError> {
        self.viewer
            .set_image_index(index)
            .inspect_err(|err| warn!(%err, "rejected image selection"))?;
        Ok(self.dispatch_pending())
    }

    pub fn next_image(&mut self) -> Result<Vec<SyncOutcome>, SessionError> {
        self.viewer.next_image()?;
        Ok(self.dispatch_pending())
    }

    pub fn previous_image(&mut self) -> Result<Vec<SyncOutcome>, SessionError> {
        self.viewer.previous_image()?;
        Ok(self.dispatch_pending())
    }

    /// Dismiss whatever overlay is open. The address is left as is.
    pub fn close(&mut self) -> Vec<SyncOutcome> {
        self.viewer.close_all();
        self.dispatch_pending()
    }

    /// Platform back button. Returns no outcomes at the start of history.
    pub fn back(&mut self) -> Vec<SyncOutcome> {
        self.history.back();
        self.dispatch_pending()
    }

    pub fn forward(&mut self) -> Vec<SyncOutcome> {
        self.history.forward();
        self.dispatch_pending()
    }

    /// The user edits the address fragment by hand.
    pub fn navigate(&mut self, fragment: &str) -> Vec<SyncOutcome> {
        self.history.set_fragment(fragment);
        self.dispatch_pending()
    }

    fn find(&self, id: &str) -> Result<&Post, SessionError> {
        self.feed
            .get(id)
            .ok_or_else(|| SessionError::UnknownPost(id.to_string()))
    }
}
