use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::models::{Follower, FollowersPage};

pub const PUBLIC_METRICS: &str = "public_metrics";
pub const PINNED_TWEET_ID: &str = "pinned_tweet_id";
pub const PINNED_TWEET_PREFIX: &str = "pinned_tweet_";

/// Turns raw follower objects into flat [`Follower`] records.
#[derive(Debug, Clone)]
pub struct Flattener {
    user_fields: BTreeSet<String>,
    tweet_fields: BTreeSet<String>,
}

impl Flattener {
    pub fn new(user_fields: BTreeSet<String>, tweet_fields: BTreeSet<String>) -> Self {
        Self {
            user_fields,
            tweet_fields,
        }
    }

    pub fn user_fields(&self) -> &BTreeSet<String> {
        &self.user_fields
    }

    pub fn tweet_fields(&self) -> &BTreeSet<String> {
        &self.tweet_fields
    }

    /// Flattens every follower of `page`, in page order.
    pub fn flatten_page(&self, page: &FollowersPage) -> Vec<Follower> {
        let pinned = index_by_id(&page.includes.tweets);
        page.data
            .iter()
            .map(|raw| self.flatten(raw, &pinned))
            .collect()
    }

    pub fn flatten(
        &self,
        raw: &Map<String, Value>,
        pinned: &HashMap<String, &Map<String, Value>>,
    ) -> Follower {
        let mut follower = Follower::new();
        let mut metrics = None;
        for field in self.user_fields.iter() {
            match raw.get(field) {
                Some(value) if field == PUBLIC_METRICS => metrics = Some(value),
                Some(value) => follower.insert(field.as_str(), value.clone()),
                None if field == PUBLIC_METRICS => {}
                None => follower.insert(field.as_str(), Value::Null),
            }
        }

        match metrics {
            Some(Value::Object(metrics)) => {
                for (key, value) in metrics {
                    follower.insert(key.as_str(), value.clone());
                }
            }
            Some(other) => warn!("dropping non-object {PUBLIC_METRICS}: {other}"),
            None => {}
        }

        let Some(pinned_id) = raw.get(PINNED_TWEET_ID).and_then(id_string) else {
            return follower;
        };
        match pinned.get(&pinned_id) {
            Some(tweet) => {
                for field in self.tweet_fields.iter() {
                    let value = tweet.get(field).cloned().unwrap_or(Value::Null);
                    follower.insert(format!("{PINNED_TWEET_PREFIX}{field}"), value);
                }
            }
            None => debug!("pinned post {pinned_id} not among included posts"),
        }
        follower
    }
}

/// Indexes included posts by id.
pub fn index_by_id(tweets: &[Map<String, Value>]) -> HashMap<String, &Map<String, Value>> {
    tweets
        .iter()
        .filter_map(|tweet| tweet.get("id").and_then(id_string).map(|id| (id, tweet)))
        .collect()
}

// ids are strings on the wire, numbers are accepted too; empty means none
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
