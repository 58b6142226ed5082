use std::fmt;

use serde::{Deserialize, Serialize};

/// Problem document returned by the API, both as the body of failed requests
/// and as entries of the `errors` array of partially successful ones.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ErrResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, rename = "type")]
    pub problem_type: String,
    #[serde(default)]
    pub status: Option<u16>,
}

impl ErrResponse {
    pub fn from_status(status: u16, body: &str) -> Self {
        serde_json::from_str::<ErrResponse>(body)
            .ok()
            .filter(|e| !e.title.is_empty() || !e.detail.is_empty())
            .map(|mut e| {
                e.status.get_or_insert(status);
                e
            })
            .unwrap_or_else(|| ErrResponse {
                title: format!("HTTP {status}"),
                detail: body.trim().to_string(),
                problem_type: String::new(),
                status: Some(status),
            })
    }
}

impl fmt::Display for ErrResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "[{status}] ")?;
        }
        write!(f, "{}", self.title)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}
