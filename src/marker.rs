//! Navigation markers.
//!
//! When an overlay opens, the viewer records a marker in the address fragment
//! (`#post:<id>` or `#images`). Back/forward navigation changes the fragment,
//! and comparing the new fragment with the marker the open overlay expects
//! tells the synchronizer whether to close it.
//!
//! Fragment strings are formatted and parsed only in this module. Everything
//! else works with [`Marker`] values.

use std::fmt;
use thiserror::Error;

const POST_PREFIX: &str = "post:";
const IMAGES: &str = "images";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("unrecognized navigation fragment: {0:?}")]
    Unrecognized(String),
}

/// Token identifying the overlay an address fragment refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The post viewer is open on the post with this id.
    Post(String),
    /// The image viewer is open.
    Images,
}

impl Marker {
    pub fn post(id: impl Into<String>) -> Self {
        Marker::Post(id.into())
    }

    /// Parse an address fragment, with or without its leading `#`.
    ///
    /// The empty fragment carries no marker and yields `Ok(None)`. A fragment
    /// in any other format yields an error, which callers treat as "no match".
    pub fn from_fragment(fragment: &str) -> Result<Option<Marker>, MarkerError> {
        let body = fragment.strip_prefix('#').unwrap_or(fragment);
        if body.is_empty() {
            return Ok(None);
        }
        if body == IMAGES {
            return Ok(Some(Marker::Images));
        }
        match body.strip_prefix(POST_PREFIX) {
            Some(id) if !id.trim().is_empty() => Ok(Some(Marker::Post(id.to_string()))),
            _ => Err(MarkerError::Unrecognized(fragment.to_string())),
        }
    }

    /// The fragment to write into the address, including the leading `#`.
    pub fn to_fragment(&self) -> String {
        format!("#{self}")
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Post(id) => write!(f, "{POST_PREFIX}{id}"),
            Marker::Images => f.write_str(IMAGES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_marker_fragment() {
        assert_eq!(Marker::post("P1").to_fragment(), "#post:P1");
        assert_eq!(Marker::post("P1").to_string(), "post:P1");
    }

    #[test]
    fn images_marker_fragment() {
        assert_eq!(Marker::Images.to_fragment(), "#images");
    }

    #[test]
    fn empty_fragment_has_no_marker() {
        assert_eq!(Marker::from_fragment(""), Ok(None));
        assert_eq!(Marker::from_fragment("#"), Ok(None));
    }

    #[test]
    fn parses_known_markers() {
        assert_eq!(Marker::from_fragment("#images"), Ok(Some(Marker::Images)));
        assert_eq!(Marker::from_fragment("images"), Ok(Some(Marker::Images)));
        assert_eq!(
            Marker::from_fragment("#post:42"),
            Ok(Some(Marker::post("42")))
        );
    }

    #[test]
    fn post_ids_may_contain_colons() {
        assert_eq!(
            Marker::from_fragment("#post:a:b"),
            Ok(Some(Marker::post("a:b")))
        );
    }

    #[test]
    fn unknown_fragments_are_errors() {
        for fragment in ["#comments", "#post:", "#post:  ", "#Images", "#openPostViewer"] {
            assert_eq!(
                Marker::from_fragment(fragment),
                Err(MarkerError::Unrecognized(fragment.to_string())),
                "{fragment}"
            );
        }
    }

    #[test]
    fn fragment_round_trips() {
        for marker in [Marker::Images, Marker::post("9")] {
            assert_eq!(Marker::from_fragment(&marker.to_fragment()), Ok(Some(marker)));
        }
    }
}
