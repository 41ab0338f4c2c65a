//! Shared test utilities for the dummybook test suite.
//!
//! Post builders that skip the JSON boundary, plus lookups that panic with
//! the list of available ids on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let feed = sample_feed();
//! let post = find_post(&feed, "3");
//! assert_eq!(post.images().unwrap().len(), 4);
//! ```

use chrono::{TimeZone, Utc};

use crate::feed::FeedList;
use crate::post::{Author, ImageList, Impressions, Post, PostBody, Styling};

// =========================================================================
// Post builders
// =========================================================================

pub fn author() -> Author {
    Author {
        id: "a1".to_string(),
        fullname: "Alice Johnson".to_string(),
        avatar_url: "https://example.com/avatar1.jpg".to_string(),
        date_joined: Utc.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).unwrap(),
    }
}

fn post_with(id: &str, body: PostBody) -> Post {
    Post {
        id: id.to_string(),
        author: author(),
        posted_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        impressions: Impressions {
            likes: 10,
            dislikes: 1,
            comments: 2,
            shares: 3,
        },
        body,
    }
}

/// Plain text post with text `"post <id>"`.
pub fn text_post(id: &str) -> Post {
    post_with(
        id,
        PostBody::TextOnly {
            text: format!("post {id}"),
        },
    )
}

/// Text post on a dark blue background.
pub fn styled_post(id: &str) -> Post {
    post_with(
        id,
        PostBody::TextWithBackground {
            text: format!("styled {id}"),
            styling: Styling {
                background: "#1e3a8a".to_string(),
                foreground: "#ffffff".to_string(),
            },
        },
    )
}

/// Image post with `count` images named `/<id>-<n>.jpg`. Panics on zero.
pub fn image_post(id: &str, count: usize) -> Post {
    let images = (0..count).map(|n| format!("/{id}-{n}.jpg")).collect();
    post_with(
        id,
        PostBody::TextAndImage {
            text: Some(format!("gallery {id}")),
            images: ImageList::new(images).expect("image_post needs at least one image"),
        },
    )
}

pub fn image_list(names: &[&str]) -> ImageList {
    ImageList::new(names.iter().map(|s| s.to_string()).collect())
        .expect("image_list needs at least one name")
}

// =========================================================================
// Feeds
// =========================================================================

/// Four-post feed covering every kind: `1` text, `2` styled, `3` four
/// images, `4` one image.
pub fn sample_feed() -> FeedList {
    FeedList::new(vec![
        text_post("1"),
        styled_post("2"),
        image_post("3", 4),
        image_post("4", 1),
    ])
    .unwrap()
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a post by id. Panics if not found.
pub fn find_post<'a>(feed: &'a FeedList, id: &str) -> &'a Post {
    feed.get(id).unwrap_or_else(|| {
        let ids: Vec<&str> = feed.posts().iter().map(|p| p.id.as_str()).collect();
        panic!("post '{id}' not found. Available: {ids:?}")
    })
}
