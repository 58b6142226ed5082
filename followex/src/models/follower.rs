use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flattened follower record.
///
/// Keys are the projected profile fields, the hoisted `public_metrics` counters
/// and, when the pinned post could be resolved, `pinned_tweet_<field>` entries.
/// Insertion order is kept so exported columns follow the order fields were added.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Follower(Map<String, Value>);

impl Follower {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Follower {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}
