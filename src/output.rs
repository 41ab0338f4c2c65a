//! CLI output formatting.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts (built-in seed)
//! 001 Alice Johnson: text
//!     Just finished reading an amazing book on JavaScript patterns...
//! 009 Hannah White: text and images (10 images)
//!     Pair programming: Two brains, one keyboard, endless arguments.
//!
//! 9 posts: 4 text, 4 text on background, 1 text and images
//! ```
//!
//! ## Replay
//!
//! ```text
//! 001 open-image 9 0 → viewing images #images
//! 002 select 12 → rejected: image index 12 is out of range for 10 images
//! 003 back → closed
//!     closed image viewer
//! ```

use crate::feed::FeedList;
use crate::post::PostKind;
use crate::script::StepReport;
use crate::sync::SyncOutcome;
use crate::viewer::ViewerState;
use std::path::Path;

const PREVIEW_CHARS: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate_text(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// check
// ============================================================================

pub fn format_feed_summary(feed: &FeedList, source: &str) -> Vec<String> {
    let mut lines = vec![format!("Posts ({source})")];

    for (i, post) in feed.posts().iter().enumerate() {
        let header = format!("{} {}: {}", format_index(i + 1), post.author.fullname, post.kind());
        match post.images() {
            Some(images) => lines.push(format!("{header} ({})", plural(images.len(), "image"))),
            None => lines.push(header),
        }
        if let Some(text) = post.text() {
            lines.push(format!("{}{}", indent(1), truncate_text(text, PREVIEW_CHARS)));
        }
    }

    let kinds = [
        PostKind::TextOnly,
        PostKind::TextWithBackground,
        PostKind::TextAndImage,
    ]
    .iter()
    .map(|kind| {
        let n = feed.posts().iter().filter(|p| p.kind() == *kind).count();
        format!("{n} {kind}")
    })
    .collect::<Vec<_>>()
    .join(", ");

    lines.push(String::new());
    lines.push(format!("{}: {kinds}", plural(feed.len(), "post")));
    lines
}

pub fn print_feed_summary(feed: &FeedList, source: &str) {
    for line in format_feed_summary(feed, source) {
        println!("{}", line);
    }
}

// ============================================================================
// render
// ============================================================================

pub fn format_render_output(path: &Path, state: &ViewerState) -> Vec<String> {
    let overlay = match state {
        ViewerState::Closed => "no overlay".to_string(),
        ViewerState::ViewingPost(post) => format!("post viewer on {}", post.id),
        ViewerState::ViewingImages { images, index } => {
            format!("image viewer at {} of {}", index + 1, images.len())
        }
    };
    vec![format!("Rendered {} ({overlay})", path.display())]
}

pub fn print_render_output(path: &Path, state: &ViewerState) {
    for line in format_render_output(path, state) {
        println!("{}", line);
    }
}

// ============================================================================
// replay
// ============================================================================

fn outcome_line(outcome: &SyncOutcome) -> Option<String> {
    match outcome {
        SyncOutcome::Unchanged => None,
        SyncOutcome::ClosedImages => Some("closed image viewer".to_string()),
        SyncOutcome::ClosedPost => Some("closed post viewer".to_string()),
        SyncOutcome::Ignored { fragment } => Some(format!("ignored {fragment}")),
    }
}

/// One step: the command, then where it left the viewer.
pub fn format_step_report(position: usize, report: &StepReport) -> Vec<String> {
    let result = match &report.error {
        Some(err) => format!("rejected: {err}"),
        None if report.fragment.is_empty() => report.phase.to_string(),
        None => format!("{} {}", report.phase, report.fragment),
    };
    let mut lines = vec![format!("{} {} → {result}", format_index(position), report.step)];
    lines.extend(
        report
            .outcomes
            .iter()
            .filter_map(outcome_line)
            .map(|line| format!("{}{line}", indent(1))),
    );
    lines
}

pub fn print_replay_output(reports: &[StepReport]) {
    for (i, report) in reports.iter().enumerate() {
        for line in format_step_report(i + 1, report) {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Step;
    use crate::test_helpers::*;
    use crate::viewer::Phase;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn truncate_text_short_and_long() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text(&"a".repeat(12), 10), format!("{}...", "a".repeat(10)));
        assert_eq!(truncate_text("ééééé", 2), "éé...");
    }

    #[test]
    fn feed_summary_lists_posts_and_totals() {
        let lines = format_feed_summary(&sample_feed(), "test");
        assert_eq!(lines[0], "Posts (test)");
        assert_eq!(lines[1], "001 Alice Johnson: text");
        assert_eq!(lines[2], "    post 1");
        assert!(lines.contains(&"003 Alice Johnson: text and images (4 images)".to_string()));
        assert!(lines.contains(&"004 Alice Johnson: text and images (1 image)".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "4 posts: 1 text, 1 text on background, 2 text and images"
        );
    }

    #[test]
    fn render_output_names_overlay() {
        let state = ViewerState::ViewingImages {
            images: image_list(&["a", "b"]),
            index: 1,
        };
        let lines = format_render_output(Path::new("dist/index.html"), &state);
        assert_eq!(
            lines,
            vec!["Rendered dist/index.html (image viewer at 2 of 2)"]
        );
    }

    #[test]
    fn step_report_success() {
        let report = StepReport {
            step: Step::OpenPost("1".into()),
            error: None,
            outcomes: vec![SyncOutcome::Unchanged],
            phase: Phase::ViewingPost,
            fragment: "#post:1".into(),
        };
        assert_eq!(
            format_step_report(1, &report),
            vec!["001 open-post 1 → viewing post #post:1"]
        );
    }

    #[test]
    fn step_report_with_close_outcome() {
        let report = StepReport {
            step: Step::Back,
            error: None,
            outcomes: vec![SyncOutcome::ClosedImages],
            phase: Phase::Closed,
            fragment: String::new(),
        };
        assert_eq!(
            format_step_report(3, &report),
            vec!["003 back → closed", "    closed image viewer"]
        );
    }

    #[test]
    fn step_report_rejection() {
        let report = StepReport {
            step: Step::Select(5),
            error: Some("the image viewer is not open".into()),
            outcomes: vec![],
            phase: Phase::Closed,
            fragment: String::new(),
        };
        assert_eq!(
            format_step_report(2, &report),
            vec!["002 select 5 → rejected: the image viewer is not open"]
        );
    }
}
