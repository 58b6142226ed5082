use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::{
    api::{ApiClient, FollowersApi, FollowersQuery, UsersApi},
    error::{Error, Result},
    models::{FollowersPage, User},
};

#[derive(Debug, Clone)]
enum Scripted {
    Page(FollowersPage),
    RateLimited,
    Failure(String),
}

/// In-memory API answering followers requests from a script, one entry per call.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    user: Option<User>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    queries: Arc<Mutex<Vec<FollowersQuery>>>,
}

impl MockApi {
    pub fn new(user: Option<User>) -> Self {
        Self {
            user,
            ..Default::default()
        }
    }

    pub fn push_page(&self, page: Value) {
        let page = serde_json::from_value(page).unwrap();
        self.script.lock().unwrap().push_back(Scripted::Page(page));
    }

    pub fn push_rate_limit(&self) {
        self.script.lock().unwrap().push_back(Scripted::RateLimited);
    }

    pub fn push_failure(&self, msg: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(msg.to_string()));
    }

    /// Followers requests received so far.
    pub fn queries(&self) -> Vec<FollowersQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl UsersApi for MockApi {
    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .user
            .clone()
            .filter(|u| u.username.eq_ignore_ascii_case(username)))
    }
}

impl FollowersApi for MockApi {
    async fn followers(&self, _user_id: &str, query: &FollowersQuery) -> Result<FollowersPage> {
        self.queries.lock().unwrap().push(query.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Page(page)) => Ok(page),
            Some(Scripted::RateLimited) => Err(Error::RateLimited { reset_at: None }),
            Some(Scripted::Failure(msg)) => Err(Error::Other(msg)),
            None => Err(Error::Other("no scripted response left".to_string())),
        }
    }
}

impl ApiClient for MockApi {}

#[cfg(test)]
mod local_tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_script_order() {
        let api = MockApi::new(None);
        api.push_page(json!({"meta": {"result_count": 0, "next_token": "a"}}));
        api.push_rate_limit();

        let query = FollowersQuery::new(Default::default(), Default::default());
        let page = api.followers("1", &query).await.unwrap();
        assert_eq!(page.next_token(), Some("a"));
        assert!(api.followers("1", &query).await.unwrap_err().is_rate_limited());
        assert!(api.followers("1", &query).await.is_err());
        assert_eq!(api.queries().len(), 3);
        assert!(api.user_by_username("jack").await.unwrap().is_none());
    }
}
