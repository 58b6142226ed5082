use std::collections::BTreeSet;

use itertools::Itertools;
use log::{debug, info};

use super::ApiClientImpl;
use crate::error::Result;
use crate::models::FollowersPage;

/// Largest page the followers endpoint serves.
pub const MAX_RESULTS: u32 = 1000;
pub const PINNED_TWEET_EXPANSION: &str = "pinned_tweet_id";

/// Parameters of one followers page request.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowersQuery {
    pub user_fields: BTreeSet<String>,
    pub tweet_fields: BTreeSet<String>,
    pub max_results: u32,
    pub pagination_token: Option<String>,
}

impl FollowersQuery {
    pub fn new(user_fields: BTreeSet<String>, tweet_fields: BTreeSet<String>) -> Self {
        Self {
            user_fields,
            tweet_fields,
            max_results: MAX_RESULTS,
            pagination_token: None,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("max_results", self.max_results.to_string()),
            ("user.fields", self.user_fields.iter().join(",")),
            ("tweet.fields", self.tweet_fields.iter().join(",")),
            ("expansions", PINNED_TWEET_EXPANSION.to_string()),
        ];
        if let Some(token) = self.pagination_token.as_ref() {
            params.push(("pagination_token", token.clone()));
        }
        params
    }
}

pub trait FollowersApi {
    async fn followers(&self, user_id: &str, query: &FollowersQuery) -> Result<FollowersPage>;
}

impl FollowersApi for ApiClientImpl {
    async fn followers(&self, user_id: &str, query: &FollowersQuery) -> Result<FollowersPage> {
        info!(
            "getting followers of {user_id}, pagination token: {:?}",
            query.pagination_token
        );
        let url = self.endpoint(&["2", "users", user_id, "followers"])?;
        let page: FollowersPage = self.get_json(url, &query.to_params()).await?;
        debug!(
            "got {} followers, {} included posts, next token: {:?}",
            page.data.len(),
            page.includes.tweets.len(),
            page.meta.next_token
        );
        Ok(page)
    }
}
