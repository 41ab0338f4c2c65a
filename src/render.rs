//! HTML rendering.
//!
//! Pure functions from feed data and viewer state to [`Markup`]. The feed is
//! rendered as a column of post cards; the active overlay, if any, is
//! rendered after it as a full-screen layer.
//!
//! ## Open Affordances
//!
//! Clickable regions carry the intent they raise as data attributes, and link
//! to the marker fragment the viewer would write:
//!
//! - Post text: `data-open-post="<id>"`, `href="#post:<id>"`
//! - Collage tile: `data-open-post="<id>" data-open-image="<index>"`,
//!   `href="#images"`
//! - Thumbnail strip entry: `data-open-image="<index>"`
//!
//! ## Static Assets
//!
//! `static/feed.css` is embedded at compile time and inlined into the page.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! post text and author names are escaped automatically.

use crate::config::{AppConfig, RenderConfig};
use crate::feed::FeedList;
use crate::marker::Marker;
use crate::post::{Author, ImageList, Impressions, Post, PostBody};
use crate::viewer::ViewerState;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CSS: &str = include_str!("../static/feed.css");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the page and write it to `<dir>/index.html`.
pub fn write_page(
    dir: &Path,
    feed: &FeedList,
    state: &ViewerState,
    config: &AppConfig,
) -> Result<PathBuf, RenderError> {
    fs::create_dir_all(dir)?;
    let path = dir.join("index.html");
    fs::write(&path, render_page(feed, state, config).into_string())?;
    info!(path = %path.display(), overlay = %state.phase(), "page written");
    Ok(path)
}

/// Full HTML document: header, feed, then the overlay for `state`.
pub fn render_page(feed: &FeedList, state: &ViewerState, config: &AppConfig) -> Markup {
    let overlay_open = *state != ViewerState::Closed;
    let content = html! {
        header.site-header { (config.title) }
        main.feed {
            @for post in feed.posts() {
                (render_card(post, &config.render))
            }
        }
        (render_overlay(state, &config.render))
    };
    base_document(&config.title, overlay_open.then_some("overlay-open"), content)
}

fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

// ============================================================================
// Post cards
// ============================================================================

pub fn render_card(post: &Post, config: &RenderConfig) -> Markup {
    html! {
        article.post-card id={ "post-" (post.id) } {
            (render_card_header(&post.author))
            (render_body(post, config))
            (render_footer(&post.impressions))
        }
    }
}

/// Avatar, linked name and join date, with the "Add friend" action.
pub fn render_card_header(author: &Author) -> Markup {
    html! {
        div.post-header {
            div.post-author {
                img.avatar src=(author.avatar_url) alt=(author.fullname);
                div {
                    a.author-name href={ "/app/user/" (author.id) } { (author.fullname) }
                    p.joined { "Joined " (author.date_joined.format("%a %b %d %Y")) }
                }
            }
            button.add-friend type="button" data-add-friend=(author.id) { "Add friend" }
        }
    }
}

pub fn render_body(post: &Post, config: &RenderConfig) -> Markup {
    let href = Marker::post(post.id.as_str()).to_fragment();
    html! {
        @match &post.body {
            PostBody::TextOnly { text } => {
                a.post-text href=(href) data-open-post=(post.id) { (text) }
            }
            PostBody::TextWithBackground { text, styling } => {
                a.post-text.styled href=(href) data-open-post=(post.id)
                    style={ "background-color: " (styling.background) "; color: " (styling.foreground) } {
                    (text)
                }
            }
            PostBody::TextAndImage { text, images } => {
                @if let Some(text) = text {
                    a.post-text href=(href) data-open-post=(post.id) { (text) }
                }
                (render_collage(&post.id, images, config.collage_tiles))
            }
        }
    }
}

pub fn render_footer(impressions: &Impressions) -> Markup {
    html! {
        div.post-footer {
            span.likes title="Likes" { "👍 " (impressions.likes) }
            span.dislikes title="Dislikes" { "👎 " (impressions.dislikes) }
            span.comments title="Comments" { "💬 " (impressions.comments) }
            span.shares title="Shares" { "↗ " (impressions.shares) }
        }
    }
}

// ============================================================================
// Image collage
// ============================================================================

/// How many collage tiles to show and how many images are left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollageLayout {
    pub shown: usize,
    /// Images beyond the shown tiles, announced as `+N` on the last tile.
    pub overflow: usize,
}

pub fn collage_layout(images: usize, max_tiles: usize) -> CollageLayout {
    CollageLayout {
        shown: images.min(max_tiles),
        overflow: images.saturating_sub(max_tiles),
    }
}

pub fn render_collage(post_id: &str, images: &ImageList, max_tiles: usize) -> Markup {
    let layout = collage_layout(images.len(), max_tiles);
    let shape = match layout.shown {
        1 => "collage-1",
        2 => "collage-2",
        3 => "collage-3",
        _ => "collage-many",
    };
    let images_href = Marker::Images.to_fragment();
    html! {
        div class={ "collage " (shape) } {
            @for (index, src) in images.iter().take(layout.shown).enumerate() {
                a.collage-tile href=(images_href) data-open-post=(post_id) data-open-image=(index) {
                    img src=(src) alt="Post illustration" loading="lazy";
                    @if layout.overflow > 0 && index + 1 == layout.shown {
                        span.collage-more { "+" (layout.overflow) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Overlays
// ============================================================================

/// Overlay for the current viewer state; empty when closed.
pub fn render_overlay(state: &ViewerState, config: &RenderConfig) -> Markup {
    match state {
        ViewerState::Closed => html! {},
        ViewerState::ViewingPost(post) => render_post_viewer(post, config),
        ViewerState::ViewingImages { images, index } => render_image_viewer(images, *index),
    }
}

fn overlay_header(title: &str) -> Markup {
    html! {
        header.overlay-header {
            button.back type="button" onclick="history.back()" aria-label="Back" { "←" }
            h1 { (title) }
        }
    }
}

pub fn render_post_viewer(post: &Post, config: &RenderConfig) -> Markup {
    html! {
        div.overlay.post-viewer role="dialog" aria-modal="true" data-post=(post.id) {
            (overlay_header("Post Viewer"))
            div.overlay-body {
                (render_card(post, config))
                @if config.show_comment_input {
                    form.comment-input {
                        input type="text" name="comment" placeholder="Write a comment...";
                    }
                }
            }
        }
    }
}

pub fn render_image_viewer(images: &ImageList, index: usize) -> Markup {
    let current = images.get(index).unwrap_or_default();
    html! {
        div.overlay.image-viewer role="dialog" aria-modal="true" {
            (overlay_header("Image Viewer"))
            div.overlay-body.image-stage {
                img src=(current) alt=(current);
            }
            nav.thumbnails {
                @for (i, src) in images.iter().enumerate() {
                    @let is_current = i == index;
                    a href="#images" data-open-image=(i) class=[is_current.then_some("current")]
                        aria-current=[is_current.then_some("true")] {
                        img src=(src) alt=(src);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn render_config() -> RenderConfig {
        RenderConfig::default()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn base_document_includes_doctype() {
        let doc = base_document("Test", None, html! { p { "test" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Test</title>"));
    }

    #[test]
    fn card_header_shows_join_date() {
        let html = render_card_header(&author()).into_string();
        assert!(html.contains("Alice Johnson"));
        assert!(html.contains("Joined Sat Jan 15 2022"), "{html}");
        assert!(html.contains(r#"src="https://example.com/avatar1.jpg""#));
    }

    #[test]
    fn card_header_links_author_profile() {
        let html = render_card_header(&author()).into_string();
        assert!(
            html.contains(r#"<a class="author-name" href="/app/user/a1">Alice Johnson</a>"#),
            "{html}"
        );
        assert!(html.contains(r#"data-add-friend="a1""#), "{html}");
        assert!(html.contains("Add friend"));
    }

    #[test]
    fn text_card_opens_post() {
        let html = render_card(&text_post("7"), &render_config()).into_string();
        assert!(html.contains(r##"href="#post:7""##), "{html}");
        assert!(html.contains(r#"data-open-post="7""#));
        assert!(html.contains("post 7"));
        assert!(!html.contains("collage"));
    }

    #[test]
    fn styled_card_uses_colors() {
        let html = render_card(&styled_post("2"), &render_config()).into_string();
        assert!(html.contains("background-color: #1e3a8a; color: #ffffff"), "{html}");
        assert!(html.contains("post-text styled"));
    }

    #[test]
    fn footer_shows_counts() {
        let html = render_footer(&Impressions {
            likes: 150,
            dislikes: 5,
            comments: 20,
            shares: 10,
        })
        .into_string();
        for n in ["150", "5", "20", "10"] {
            assert!(html.contains(n), "missing {n}: {html}");
        }
    }

    #[test]
    fn post_text_is_escaped() {
        let mut post = text_post("1");
        post.body = PostBody::TextOnly {
            text: "<script>alert(1)</script>".to_string(),
        };
        let html = render_card(&post, &render_config()).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    // =========================================================================
    // Collage tests
    // =========================================================================

    #[test]
    fn collage_layout_shows_min_of_images_and_tiles() {
        assert_eq!(collage_layout(1, 3), CollageLayout { shown: 1, overflow: 0 });
        assert_eq!(collage_layout(3, 3), CollageLayout { shown: 3, overflow: 0 });
        assert_eq!(collage_layout(10, 3), CollageLayout { shown: 3, overflow: 7 });
        assert_eq!(collage_layout(4, 1), CollageLayout { shown: 1, overflow: 3 });
    }

    #[test]
    fn collage_marks_overflow_on_last_tile() {
        let post = image_post("9", 10);
        let html = render_collage("9", post.images().unwrap(), 3).into_string();
        assert_eq!(count(&html, "collage-tile"), 3);
        assert_eq!(count(&html, "+7"), 1);
        assert!(html.contains(r#"data-open-image="2""#));
        assert!(!html.contains(r#"data-open-image="3""#));
        assert!(html.contains("collage-3"));
    }

    #[test]
    fn collage_without_overflow() {
        let post = image_post("4", 2);
        let html = render_collage("4", post.images().unwrap(), 3).into_string();
        assert_eq!(count(&html, "collage-tile"), 2);
        assert!(!html.contains("collage-more"));
        assert!(html.contains(r##"href="#images""##));
        assert!(html.contains(r#"data-open-post="4""#));
    }

    #[test]
    fn image_card_respects_tile_config() {
        let config = RenderConfig {
            collage_tiles: 1,
            ..RenderConfig::default()
        };
        let html = render_card(&image_post("3", 4), &config).into_string();
        assert_eq!(count(&html, "collage-tile"), 1);
        assert!(html.contains("+3"));
        assert!(html.contains("gallery 3"));
    }

    // =========================================================================
    // Overlay tests
    // =========================================================================

    #[test]
    fn closed_renders_no_overlay() {
        assert_eq!(
            render_overlay(&ViewerState::Closed, &render_config()).into_string(),
            ""
        );
    }

    #[test]
    fn post_viewer_has_back_and_comment_input() {
        let state = ViewerState::ViewingPost(text_post("1"));
        let html = render_overlay(&state, &render_config()).into_string();
        assert!(html.contains("Post Viewer"));
        assert!(html.contains("history.back()"));
        assert!(html.contains("comment-input"));
        assert!(html.contains("post 1"));
    }

    #[test]
    fn post_viewer_comment_input_is_configurable() {
        let config = RenderConfig {
            show_comment_input: false,
            ..RenderConfig::default()
        };
        let html = render_post_viewer(&text_post("1"), &config).into_string();
        assert!(!html.contains("comment-input"));
    }

    #[test]
    fn image_viewer_shows_current_image_and_strip() {
        let state = ViewerState::ViewingImages {
            images: image_list(&["/a.jpg", "/b.jpg", "/c.jpg"]),
            index: 1,
        };
        let html = render_overlay(&state, &render_config()).into_string();
        assert!(html.contains("Image Viewer"));
        assert!(html.contains(r#"<img src="/b.jpg" alt="/b.jpg">"#), "{html}");
        assert_eq!(count(&html, "data-open-image="), 3);
        assert_eq!(count(&html, r#"aria-current="true""#), 1);
        assert!(html.contains(r#"data-open-image="1" class="current""#), "{html}");
    }

    // =========================================================================
    // Page tests
    // =========================================================================

    #[test]
    fn page_renders_feed_then_overlay() {
        let feed = sample_feed();
        let config = AppConfig::default();
        let state = ViewerState::ViewingPost(find_post(&feed, "2").clone());

        let html = render_page(&feed, &state, &config).into_string();

        assert_eq!(count(&html, r#"class="post-card""#), 5);
        assert!(html.contains(r#"<body class="overlay-open">"#));
        let feed_at = html.find("<main").unwrap();
        let overlay_at = html.find("post-viewer").unwrap();
        assert!(feed_at < overlay_at);
    }

    #[test]
    fn closed_page_has_no_body_class() {
        let html = render_page(&sample_feed(), &ViewerState::Closed, &AppConfig::default())
            .into_string();
        assert!(html.contains("<body>"));
        assert!(!html.contains(r#"role="dialog""#));
    }

    #[test]
    fn write_page_creates_index() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        let path = write_page(
            &dir,
            &sample_feed(),
            &ViewerState::Closed,
            &AppConfig::default(),
        )
        .unwrap();
        assert_eq!(path, dir.join("index.html"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
    }
}
