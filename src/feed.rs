//! Feed list.
//!
//! Posts come from a [`PostSource`]: a JSON file in the wire format described
//! in [`crate::post`], or the seed feed compiled into the binary. A
//! [`FeedList`] is the ordered, read-only result. Post ids are unique within
//! it, so lookups by id are unambiguous.

use crate::config::FeedConfig;
use crate::post::Post;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const SEED_JSON: &str = include_str!("../static/seed.json");

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate post id: {0}")]
    DuplicateId(String),
}

/// Anything that can produce the posts of a feed.
pub trait PostSource {
    fn load(&self) -> Result<Vec<Post>, FeedError>;

    /// Short description for logs and summaries.
    fn describe(&self) -> String;
}

/// JSON array of wire-format posts on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PostSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Post>, FeedError> {
        let content = fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// The feed the web client ships with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSource;

impl PostSource for SeedSource {
    fn load(&self) -> Result<Vec<Post>, FeedError> {
        Ok(serde_json::from_str(SEED_JSON)?)
    }

    fn describe(&self) -> String {
        "built-in seed".to_string()
    }
}

/// Ordered, read-only collection of posts with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedList {
    posts: Vec<Post>,
}

impl FeedList {
    pub fn new(posts: Vec<Post>) -> Result<Self, FeedError> {
        let mut seen = HashSet::new();
        for post in &posts {
            if !seen.insert(post.id.as_str()) {
                return Err(FeedError::DuplicateId(post.id.clone()));
            }
        }
        Ok(Self { posts })
    }

    pub fn from_source<S: PostSource + ?Sized>(source: &S) -> Result<Self, FeedError> {
        let feed = Self::new(source.load()?)?;
        info!(source = %source.describe(), posts = feed.len(), "feed loaded");
        Ok(feed)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// The source named by config: the JSON file when a path is set, the seed
/// otherwise.
pub fn configured_source(config: &FeedConfig) -> Box<dyn PostSource> {
    match &config.path {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(SeedSource),
    }
}

pub fn load_feed(config: &FeedConfig) -> Result<FeedList, FeedError> {
    FeedList::from_source(configured_source(config).as_ref())
}
