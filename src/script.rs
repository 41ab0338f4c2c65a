//! Replay scripts.
//!
//! A line-oriented list of user and navigation events, applied in order to a
//! [`FeedSession`]. Blank lines and lines whose first non-blank character is
//! `#` are skipped. Fragments also start with `#`, so comments are whole
//! lines only.
//!
//! ```text
//! # open the gallery post, page through it, then go back
//! open-image 9 0
//! next
//! select 4
//! back
//! navigate #post:1
//! ```

use crate::history::AddressHistory;
use crate::session::FeedSession;
use crate::sync::SyncOutcome;
use crate::viewer::Phase;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    OpenPost(String),
    OpenImage { post: String, index: usize },
    Select(usize),
    Next,
    Previous,
    Close,
    Back,
    Forward,
    Navigate(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::OpenPost(id) => write!(f, "open-post {id}"),
            Step::OpenImage { post, index } => write!(f, "open-image {post} {index}"),
            Step::Select(index) => write!(f, "select {index}"),
            Step::Next => f.write_str("next"),
            Step::Previous => f.write_str("prev"),
            Step::Close => f.write_str("close"),
            Step::Back => f.write_str("back"),
            Step::Forward => f.write_str("forward"),
            Step::Navigate(fragment) => write!(f, "navigate {fragment}"),
        }
    }
}

pub fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let trimmed = raw.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('#')).then_some((i + 1, trimmed))
        })
        .map(|(line, text)| parse_line(text).map_err(|message| ScriptError { line, message }))
        .collect()
}

fn parse_line(text: &str) -> Result<Step, String> {
    let mut words = text.split_whitespace();
    let command = words.next().unwrap_or_default();
    let mut arg = |name: &str| {
        words
            .next()
            .map(str::to_string)
            .ok_or_else(|| format!("`{command}` needs <{name}>"))
    };

    let step = match command {
        "open-post" => Step::OpenPost(arg("id")?),
        "open-image" => {
            let post = arg("post-id")?;
            let index = parse_index(&arg("index")?)?;
            Step::OpenImage { post, index }
        }
        "select" => Step::Select(parse_index(&arg("index")?)?),
        "next" => Step::Next,
        "prev" => Step::Previous,
        "close" => Step::Close,
        "back" => Step::Back,
        "forward" => Step::Forward,
        "navigate" => Step::Navigate(arg("fragment")?),
        other => return Err(format!("unknown command `{other}`")),
    };
    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument `{extra}` after `{command}`"));
    }
    Ok(step)
}

fn parse_index(text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("expected a non-negative index, got `{text}`"))
}

/// What happened when one step ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    /// The rejection message when the step failed; state is unchanged then.
    pub error: Option<String>,
    pub outcomes: Vec<SyncOutcome>,
    pub phase: Phase,
    pub fragment: String,
}

/// Run one step. Failures are recorded in the report, never propagated.
pub fn apply<H: AddressHistory>(session: &mut FeedSession<H>, step: &Step) -> StepReport {
    let result = match step {
        Step::OpenPost(id) => session.open_post(id),
        Step::OpenImage { post, index } => session.open_image(post, *index),
        Step::Select(index) => session.select_image(*index),
        Step::Next => session.next_image(),
        Step::Previous => session.previous_image(),
        Step::Close => Ok(session.close()),
        Step::Back => Ok(session.back()),
        Step::Forward => Ok(session.forward()),
        Step::Navigate(fragment) => Ok(session.navigate(fragment)),
    };
    let (outcomes, error) = match result {
        Ok(outcomes) => (outcomes, None),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };
    StepReport {
        step: step.clone(),
        error,
        outcomes,
        phase: session.state().phase(),
        fragment: session.history().current_fragment().to_string(),
    }
}

/// Run every step in order.
pub fn replay<H: AddressHistory>(session: &mut FeedSession<H>, steps: &[Step]) -> Vec<StepReport> {
    steps.iter().map(|step| apply(session, step)).collect()
}
