use log::{debug, info, warn};
use serde::Deserialize;

use super::ApiClientImpl;
use crate::error::Result;
use crate::models::{ErrResponse, User};

#[derive(Debug, Clone, Deserialize)]
struct UserLookupResponse {
    data: Option<User>,
    #[serde(default)]
    errors: Vec<ErrResponse>,
}

pub trait UsersApi {
    /// Looks up an account by its username. `None` when no such account exists.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;
}

impl UsersApi for ApiClientImpl {
    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        info!("looking up user {username}");
        let url = self.endpoint(&["2", "users", "by", "username", username])?;
        let response: UserLookupResponse = self.get_json(url, &[]).await?;
        match response.data {
            Some(user) => {
                debug!("user {username} has id {}", user.id);
                Ok(Some(user))
            }
            None => {
                for err in response.errors {
                    warn!("lookup of {username} failed: {err}");
                }
                Ok(None)
            }
        }
    }
}
