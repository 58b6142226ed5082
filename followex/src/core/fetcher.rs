use log::{debug, info, warn};

use super::flatten::Flattener;
use super::task::FetchOutcome;
use crate::api::{ApiClient, FollowersQuery};
use crate::error::{Error, Result};
use crate::models::User;
use crate::storage::RunState;

/// Drives the followers endpoint page by page.
#[derive(Debug, Clone)]
pub struct FollowerFetcher<A: ApiClient> {
    api_client: A,
    flattener: Flattener,
}

impl<A: ApiClient> FollowerFetcher<A> {
    pub fn new(api_client: A, flattener: Flattener) -> Self {
        Self {
            api_client,
            flattener,
        }
    }

    pub async fn resolve_user(&self, username: &str) -> Result<User> {
        self.api_client
            .user_by_username(username)
            .await?
            .ok_or_else(|| Error::InvalidUsername(username.to_string()))
    }

    /// Fetches pages starting at `start.next_token` and appends the flattened
    /// followers to `start.followers`.
    ///
    /// Stops when a page carries no next token, or when the API rate limits a
    /// request. In the latter case the outcome is incomplete and its
    /// `next_token` is the cursor of the page that could not be fetched.
    pub async fn fetch(&self, user_id: &str, start: RunState) -> Result<FetchOutcome> {
        let RunState {
            mut followers,
            next_token: mut cursor,
        } = start;
        let carried_over = followers.len();
        let mut query = FollowersQuery::new(
            self.flattener.user_fields().clone(),
            self.flattener.tweet_fields().clone(),
        );
        info!(
            "start fetching followers of {user_id}, {carried_over} carried over, cursor: {cursor:?}"
        );

        let mut pages = 0;
        let (complete, rate_limit_reset) = loop {
            query.pagination_token = cursor.clone();
            let page = match self.api_client.followers(user_id, &query).await {
                Ok(page) => page,
                Err(e) if e.is_rate_limited() => {
                    warn!("rate limited after {pages} pages, resume cursor: {cursor:?}");
                    let reset_at = match e.root() {
                        Error::RateLimited { reset_at } => *reset_at,
                        _ => None,
                    };
                    break (false, reset_at);
                }
                Err(e) => return Err(e),
            };
            pages += 1;

            let records = self.flattener.flatten_page(&page);
            debug!("page {pages}: {} followers", records.len());
            followers.extend(records);

            match page.next_token() {
                Some(next) => cursor = Some(next.to_string()),
                None => break (true, None),
            }
        };

        let fetched_this_run = followers.len() - carried_over;
        info!(
            "fetched {fetched_this_run} followers in {pages} pages, {} in total, complete: {complete}",
            followers.len()
        );
        Ok(FetchOutcome {
            followers,
            next_token: if complete { None } else { cursor.clone() },
            complete,
            fetched_this_run,
            last_cursor: cursor,
            rate_limit_reset,
        })
    }
}
