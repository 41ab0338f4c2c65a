//! Viewer state holder.
//!
//! Single source of truth for which overlay, if any, is open on top of the
//! feed. The three states are mutually exclusive by construction:
//!
//! ```text
//!              open_post                   open_images
//!   Closed ───────────────► ViewingPost ───────────────► ViewingImages
//!     ▲ │                        │  ▲                        │   │
//!     │ └────────────────────────┼──┼── open_images ─────────┘   │
//!     │                          │  └── open_post ───────────────┤
//!     └──── close_all / close_post / close_images ◄──────────────┘
//! ```
//!
//! Every transition replaces the whole state. Opening an overlay writes its
//! navigation marker in the same call, before control returns to the event
//! loop, so a fragment-change notification can never observe the new state
//! with a stale marker.

use crate::history::NavigationMarkers;
use crate::marker::Marker;
use crate::post::{ImageList, Post};
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error("image index {index} is out of range for {len} images")]
    InvalidIndex { index: usize, len: usize },
    #[error("cannot open the image viewer without images")]
    InvalidOpenImages,
    #[error("the image viewer is not open")]
    NotViewingImages,
}

/// Payload-free discriminant of [`ViewerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Closed,
    ViewingPost,
    ViewingImages,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Closed => "closed",
            Phase::ViewingPost => "viewing post",
            Phase::ViewingImages => "viewing images",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewerState {
    #[default]
    Closed,
    ViewingPost(Post),
    ViewingImages {
        images: ImageList,
        /// Always within `0..images.len()`.
        index: usize,
    },
}

impl ViewerState {
    pub fn phase(&self) -> Phase {
        match self {
            ViewerState::Closed => Phase::Closed,
            ViewerState::ViewingPost(_) => Phase::ViewingPost,
            ViewerState::ViewingImages { .. } => Phase::ViewingImages,
        }
    }

    /// The marker the address must carry while this state is active.
    pub fn expected_marker(&self) -> Option<Marker> {
        match self {
            ViewerState::Closed => None,
            ViewerState::ViewingPost(post) => Some(Marker::post(post.id.as_str())),
            ViewerState::ViewingImages { .. } => Some(Marker::Images),
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewerStateHolder {
    state: ViewerState,
}

impl ViewerStateHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Open the post viewer on `post`.
    ///
    /// Opening the post that is already open leaves the state untouched and
    /// re-asserts its marker.
    pub fn open_post<N>(&mut self, post: Post, nav: &mut N)
    where
        N: NavigationMarkers + ?Sized,
    {
        let marker = Marker::post(post.id.as_str());
        let already_open =
            matches!(&self.state, ViewerState::ViewingPost(open) if open.id == post.id);
        if already_open {
            debug!(post = %post.id, "post viewer already open");
        } else {
            debug!(from = %self.state.phase(), post = %post.id, "open post viewer");
            self.state = ViewerState::ViewingPost(post);
        }
        nav.write_marker(&marker);
    }

    /// Open the image viewer on `images` at `start`.
    ///
    /// Replaces any open post viewer. Rejected without any effect when the
    /// list is empty or `start` is out of range.
    pub fn open_images<N>(
        &mut self,
        images: Vec<String>,
        start: usize,
        nav: &mut N,
    ) -> Result<(), ViewerError>
    where
        N: NavigationMarkers + ?Sized,
    {
        let images = ImageList::new(images).ok_or(ViewerError::InvalidOpenImages)?;
        if start >= images.len() {
            return Err(ViewerError::InvalidIndex {
                index: start,
                len: images.len(),
            });
        }
        debug!(
            from = %self.state.phase(),
            count = images.len(),
            index = start,
            "open image viewer"
        );
        self.state = ViewerState::ViewingImages {
            images,
            index: start,
        };
        nav.write_marker(&Marker::Images);
        Ok(())
    }

    pub fn close_all(&mut self) {
        if self.state != ViewerState::Closed {
            debug!(from = %self.state.phase(), "close overlay");
            self.state = ViewerState::Closed;
        }
    }

    /// Close the image viewer if it is open. Returns whether anything changed.
    pub fn close_images(&mut self) -> bool {
        if self.state.phase() != Phase::ViewingImages {
            return false;
        }
        debug!("close image viewer");
        self.state = ViewerState::Closed;
        true
    }

    /// Close the post viewer if it is open. Returns whether anything changed.
    pub fn close_post(&mut self) -> bool {
        if self.state.phase() != Phase::ViewingPost {
            return false;
        }
        debug!("close post viewer");
        self.state = ViewerState::Closed;
        true
    }

    /// Show image `index` of the open image viewer. Out-of-range indices are
    /// rejected, never clamped.
    pub fn set_image_index(&mut self, new_index: usize) -> Result<(), ViewerError> {
        match &mut self.state {
            ViewerState::ViewingImages { images, index } => {
                if new_index >= images.len() {
                    return Err(ViewerError::InvalidIndex {
                        index: new_index,
                        len: images.len(),
                    });
                }
                debug!(from = *index, to = new_index, "select image");
                *index = new_index;
                Ok(())
            }
            _ => Err(ViewerError::NotViewingImages),
        }
    }

    pub fn next_image(&mut self) -> Result<(), ViewerError> {
        let index = self.current_image_index()?;
        self.set_image_index(index + 1)
    }

    pub fn previous_image(&mut self) -> Result<(), ViewerError> {
        let index = self.current_image_index()?;
        let len = self.image_count();
        let previous = index
            .checked_sub(1)
            .ok_or(ViewerError::InvalidIndex { index, len })?;
        self.set_image_index(previous)
    }

    fn current_image_index(&self) -> Result<usize, ViewerError> {
        match &self.state {
            ViewerState::ViewingImages { index, .. } => Ok(*index),
            _ => Err(ViewerError::NotViewingImages),
        }
    }

    fn image_count(&self) -> usize {
        match &self.state {
            ViewerState::ViewingImages { images, .. } => images.len(),
            _ => 0,
        }
    }
}
