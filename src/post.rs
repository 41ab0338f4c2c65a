//! Post data model.
//!
//! A post's payload depends on its kind, so the payload is a sum type
//! ([`PostBody`]) rather than a bag of optional fields. An image post without
//! images, or a background-styled post without colors, cannot be constructed.
//!
//! ## Wire Format
//!
//! Posts are exchanged as JSON in the same shape the DummyBook web client and
//! server use:
//!
//! ```json
//! {
//!   "id": "9",
//!   "author": { "id": "a8", "fullname": "Hannah White",
//!               "avatarUrl": "https://example.com/avatar8.jpg",
//!               "dateJoined": "2023-08-18" },
//!   "datePosted": "2024-06-08",
//!   "type": "text_and_image",
//!   "impressions": { "likes": 95, "dislikes": 2, "comments": 12, "shares": 6 },
//!   "data": { "text": "Two brains, one keyboard", "images": ["/img-3.webp"] }
//! }
//! ```
//!
//! The wire `type` only distinguishes `text_only` from `text_and_image`; a
//! `text_only` post carrying a `styling` object with both colors set becomes
//! [`PostBody::TextWithBackground`]. A partial or blank `styling` falls back to
//! plain text. Conversion goes through a private `RawPost` so that every
//! invariant is checked at the deserialization boundary.
//!
//! `datePosted` and `dateJoined` are RFC 3339 timestamps as the server writes
//! them (`2024-06-08T10:15:00.000Z`). A bare `YYYY-MM-DD` is also accepted and
//! read as midnight UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("post id must not be blank")]
    BlankId,
    #[error("post {id}: image post has no images")]
    EmptyImageList { id: String },
    #[error("post {id}: `{kind}` post has a mismatched data payload")]
    MismatchedPayload { id: String, kind: &'static str },
}

/// Which payload shape and rendering path applies to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostKind {
    TextOnly,
    TextWithBackground,
    TextAndImage,
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostKind::TextOnly => "text",
            PostKind::TextWithBackground => "text on background",
            PostKind::TextAndImage => "text and images",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub fullname: String,
    pub avatar_url: String,
    #[serde(with = "timestamp")]
    pub date_joined: DateTime<Utc>,
}

/// Reaction counters shown in a card footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Impressions {
    pub likes: u64,
    pub dislikes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// Foreground/background color pair for a text post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Styling {
    pub background: String,
    pub foreground: String,
}

impl Styling {
    fn is_blank(&self) -> bool {
        self.background.trim().is_empty() || self.foreground.trim().is_empty()
    }
}

/// Ordered, non-empty list of image references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageList(Vec<String>);

#[allow(clippy::len_without_is_empty)]
impl ImageList {
    /// Returns `None` for an empty list.
    pub fn new(images: Vec<String>) -> Option<Self> {
        if images.is_empty() {
            None
        } else {
            Some(Self(images))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Kind-specific post payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBody {
    TextOnly {
        text: String,
    },
    TextWithBackground {
        text: String,
        styling: Styling,
    },
    TextAndImage {
        text: Option<String>,
        images: ImageList,
    },
}

impl PostBody {
    pub fn kind(&self) -> PostKind {
        match self {
            PostBody::TextOnly { .. } => PostKind::TextOnly,
            PostBody::TextWithBackground { .. } => PostKind::TextWithBackground,
            PostBody::TextAndImage { .. } => PostKind::TextAndImage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPost", into = "RawPost")]
pub struct Post {
    pub id: String,
    pub author: Author,
    pub posted_at: DateTime<Utc>,
    pub impressions: Impressions,
    pub body: PostBody,
}

impl Post {
    pub fn kind(&self) -> PostKind {
        self.body.kind()
    }

    /// Text shown on the card, if any. Image posts may have none.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            PostBody::TextOnly { text } | PostBody::TextWithBackground { text, .. } => {
                Some(text.as_str())
            }
            PostBody::TextAndImage { text, .. } => text.as_deref(),
        }
    }

    pub fn images(&self) -> Option<&ImageList> {
        match &self.body {
            PostBody::TextAndImage { images, .. } => Some(images),
            _ => None,
        }
    }

    pub fn styling(&self) -> Option<&Styling> {
        match &self.body {
            PostBody::TextWithBackground { styling, .. } => Some(styling),
            _ => None,
        }
    }
}

// ============================================================================
// Wire representation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireKind {
    TextOnly,
    TextAndImage,
}

impl WireKind {
    fn as_str(self) -> &'static str {
        match self {
            WireKind::TextOnly => "text_only",
            WireKind::TextAndImage => "text_and_image",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawData {
    Text(String),
    Media {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        images: Vec<String>,
    },
}

/// Post exactly as it appears on the wire, before invariants are checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPost {
    id: String,
    author: Author,
    #[serde(with = "timestamp")]
    date_posted: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: WireKind,
    #[serde(default)]
    impressions: Impressions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    styling: Option<Styling>,
    data: RawData,
}

/// Serde adapter for wire dates.
mod timestamp {
    use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(text) {
            return Some(at.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Utc.from_utc_datetime(&midnight))
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| {
            D::Error::custom(format!("invalid date `{text}`, expected RFC 3339 or YYYY-MM-DD"))
        })
    }
}

impl TryFrom<RawPost> for Post {
    type Error = PostError;

    fn try_from(raw: RawPost) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(PostError::BlankId);
        }
        let id = raw.id;
        let body = match (raw.kind, raw.data, raw.styling) {
            (WireKind::TextOnly, RawData::Text(text), Some(styling)) if !styling.is_blank() => {
                PostBody::TextWithBackground { text, styling }
            }
            // Missing or blank colors render as plain text.
            (WireKind::TextOnly, RawData::Text(text), _) => PostBody::TextOnly { text },
            // Image posts never render a background; any styling is dropped.
            (WireKind::TextAndImage, RawData::Media { text, images }, _) => {
                let images =
                    ImageList::new(images).ok_or_else(|| PostError::EmptyImageList {
                        id: id.clone(),
                    })?;
                PostBody::TextAndImage { text, images }
            }
            (kind, _, _) => {
                return Err(PostError::MismatchedPayload {
                    id,
                    kind: kind.as_str(),
                });
            }
        };

        Ok(Post {
            id,
            author: raw.author,
            posted_at: raw.date_posted,
            impressions: raw.impressions,
            body,
        })
    }
}

impl From<Post> for RawPost {
    fn from(post: Post) -> Self {
        let (kind, styling, data) = match post.body {
            PostBody::TextOnly { text } => (WireKind::TextOnly, None, RawData::Text(text)),
            PostBody::TextWithBackground { text, styling } => {
                (WireKind::TextOnly, Some(styling), RawData::Text(text))
            }
            PostBody::TextAndImage { text, images } => (
                WireKind::TextAndImage,
                None,
                RawData::Media {
                    text,
                    images: images.into_vec(),
                },
            ),
        };
        RawPost {
            id: post.id,
            author: post.author,
            date_posted: post.posted_at,
            kind,
            impressions: post.impressions,
            styling,
            data,
        }
    }
}
