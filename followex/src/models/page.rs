use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of the followers endpoint.
///
/// Follower objects and included posts are kept as plain JSON maps, the set of
/// fields they carry depends on the `user.fields`/`tweet.fields` selectors of
/// the request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FollowersPage {
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Includes {
    #[serde(default)]
    pub tweets: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageMeta {
    #[serde(default)]
    pub result_count: u64,
    pub next_token: Option<String>,
}

impl FollowersPage {
    pub fn next_token(&self) -> Option<&str> {
        self.meta.next_token.as_deref().filter(|t| !t.is_empty())
    }
}
