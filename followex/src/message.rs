use std::fmt;

use chrono::{DateTime, Local};

/// What a finished run tells the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Completed {
        username: String,
        count: usize,
    },
    /// Resumable mode: progress was parked in the state file.
    RetryLater {
        reset_at: Option<DateTime<Local>>,
    },
    /// Cursor-suffixed mode: resume by passing the cursor back in.
    RateLimited {
        next_token: String,
    },
    RateLimitedEmpty,
}

impl Notice {
    /// Whether the process should exit with an error status.
    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::RetryLater { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Completed { username, count } => {
                write!(f, "Fetched all followers of {username} ({count} records).")
            }
            Notice::RetryLater { reset_at: None } => write!(
                f,
                "Too many requests. Try again in 15 minutes with the --continue parameter."
            ),
            Notice::RetryLater {
                reset_at: Some(reset_at),
            } => write!(
                f,
                "Too many requests. Try again after {} with the --continue parameter.",
                reset_at.format("%H:%M:%S")
            ),
            Notice::RateLimited { next_token } => write!(
                f,
                "Rate limit reached. Resume with --pagination-token {next_token}."
            ),
            Notice::RateLimitedEmpty => {
                write!(f, "Rate limit reached before any followers were fetched.")
            }
        }
    }
}
