#![allow(async_fn_in_trait)]
pub mod followers;
pub mod users;

use chrono::{DateTime, Local};
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::ErrResponse;

pub use followers::{FollowersApi, FollowersQuery};
pub use users::UsersApi;

const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

pub trait ApiClient: UsersApi + FollowersApi + Send + Sync + Clone {}

#[derive(Debug, Clone)]
pub struct ApiClientImpl {
    client: Client,
    base_url: Url,
    bearer_token: String,
}

impl ApiClientImpl {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("followex/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(
            client,
            config.api_url.clone(),
            config.bearer_token.clone(),
        ))
    }

    pub fn with_client(client: Client, base_url: Url, bearer_token: String) -> Self {
        ApiClientImpl {
            client,
            base_url,
            bearer_token,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Other(format!("api url {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        mut url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_reset);
            warn!("rate limited on {url}, reset at {reset_at:?}");
            return Err(Error::RateLimited { reset_at });
        }

        let text = response.text().await?;
        if !status.is_success() {
            let err = ErrResponse::from_status(status.as_u16(), &text);
            error!("request to {url} failed: {err}");
            return Err(Error::Api(err));
        }
        Ok(serde_json::from_str::<T>(&text)?)
    }
}

impl ApiClient for ApiClientImpl {}

// epoch seconds, as sent in the rate limit headers
fn parse_reset(value: &str) -> Option<DateTime<Local>> {
    let secs = value.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0).map(|t| t.with_timezone(&Local))
}
