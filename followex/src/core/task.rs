use chrono::{DateTime, Local};

use crate::models::Follower;

/// Where a run picks up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResumeFrom {
    #[default]
    Start,
    // the state file of an earlier rate limited run
    SavedState,
    Cursor(String),
}

/// How results are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Incomplete runs are parked in `<username>-tmp.json` and continued later.
    #[default]
    Resumable,
    /// Every run writes its records under a name carrying the last cursor seen,
    /// prefixed by the starting cursor when resumed from one.
    CursorSuffixed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub username: String,
    pub resume: ResumeFrom,
    pub mode: OutputMode,
}

impl FetchRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            resume: Default::default(),
            mode: Default::default(),
        }
    }

    pub fn with_resume(mut self, resume: ResumeFrom) -> Self {
        self.resume = resume;
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Result of driving the pagination loop until it finished or got rate limited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// Carried over followers followed by the ones fetched in this run.
    pub followers: Vec<Follower>,
    /// Cursor of the next page that has not been fetched. `None` once complete.
    pub next_token: Option<String>,
    pub complete: bool,
    pub fetched_this_run: usize,
    /// The most recent cursor the loop worked with.
    pub last_cursor: Option<String>,
    pub rate_limit_reset: Option<DateTime<Local>>,
}
