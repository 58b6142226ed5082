pub mod fetcher;
pub mod flatten;
pub mod task;

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::Result;
use crate::exporter::Exporter;
use crate::message::Notice;
use crate::storage::{RunState, RunStateStorage};
use crate::utils::make_file_stem;
pub use fetcher::FollowerFetcher;
pub use flatten::Flattener;
pub use task::{FetchOutcome, FetchRequest, OutputMode, ResumeFrom};

/// Summary of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub notice: Notice,
    /// Output files written by this run.
    pub files: Vec<PathBuf>,
    pub total: usize,
}

/// Ties the fetcher to run state and export handling.
#[derive(Debug, Clone)]
pub struct Core<A: ApiClient, S: RunStateStorage, E: Exporter> {
    fetcher: FollowerFetcher<A>,
    storage: S,
    exporter: E,
}

impl<A: ApiClient, S: RunStateStorage, E: Exporter> Core<A, S, E> {
    pub fn new(fetcher: FollowerFetcher<A>, storage: S, exporter: E) -> Self {
        Self {
            fetcher,
            storage,
            exporter,
        }
    }

    pub async fn run(&self, request: FetchRequest) -> Result<RunReport> {
        let FetchRequest {
            username,
            resume,
            mode,
        } = request;
        info!("Start exporting followers of {username}, mode: {mode:?}, resume: {resume:?}");

        let user = self.fetcher.resolve_user(&username).await?;
        let start = self.start_state(&username, resume).await?;
        let start_cursor = start.next_token.clone();
        let outcome = self.fetcher.fetch(&user.id, start).await?;

        let report = match mode {
            OutputMode::Resumable => self.finish_resumable(&username, outcome).await?,
            OutputMode::CursorSuffixed => {
                self.finish_cursor_suffixed(&username, start_cursor.as_deref(), outcome)
                    .await?
            }
        };
        info!("Finished exporting followers of {username}: {}", report.notice);
        Ok(report)
    }

    async fn start_state(&self, username: &str, resume: ResumeFrom) -> Result<RunState> {
        let state = match resume {
            ResumeFrom::Start => RunState::default(),
            ResumeFrom::SavedState => self.storage.load(username).await?.unwrap_or_else(|| {
                warn!("no saved state for {username}, starting from the first page");
                RunState::default()
            }),
            ResumeFrom::Cursor(cursor) => RunState {
                followers: Vec::new(),
                next_token: Some(cursor),
            },
        };
        Ok(state)
    }

    async fn finish_resumable(&self, username: &str, outcome: FetchOutcome) -> Result<RunReport> {
        let total = outcome.followers.len();
        if outcome.complete {
            let path = self.exporter.export_csv(username, &outcome.followers).await?;
            self.storage.discard(username).await?;
            return Ok(RunReport {
                notice: Notice::Completed {
                    username: username.to_string(),
                    count: total,
                },
                files: vec![path],
                total,
            });
        }

        let state = RunState {
            followers: outcome.followers,
            next_token: outcome.next_token,
        };
        self.storage.save(username, &state).await?;
        Ok(RunReport {
            notice: Notice::RetryLater {
                reset_at: outcome.rate_limit_reset,
            },
            files: Vec::new(),
            total,
        })
    }

    async fn finish_cursor_suffixed(
        &self,
        username: &str,
        start_cursor: Option<&str>,
        outcome: FetchOutcome,
    ) -> Result<RunReport> {
        let total = outcome.followers.len();
        let notice = match outcome.next_token.as_ref() {
            _ if outcome.complete => Notice::Completed {
                username: username.to_string(),
                count: total,
            },
            Some(next_token) if outcome.fetched_this_run > 0 => Notice::RateLimited {
                next_token: next_token.clone(),
            },
            _ => Notice::RateLimitedEmpty,
        };

        let mut files = Vec::new();
        if outcome.complete || !outcome.followers.is_empty() {
            let stem = make_file_stem(username, start_cursor, outcome.last_cursor.as_deref());
            files.push(self.exporter.export_json(&stem, &outcome.followers).await?);
            files.push(self.exporter.export_csv(&stem, &outcome.followers).await?);
        } else {
            debug!("nothing fetched for {username}, no files written");
        }
        Ok(RunReport {
            notice,
            files,
            total,
        })
    }
}
