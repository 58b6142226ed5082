use std::path::PathBuf;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::models::ErrResponse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: {1}")]
    Context(String, Box<Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Url parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Api error: {0}")]
    Api(ErrResponse),

    #[error("Too many requests{}", reset_suffix(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Local>> },

    #[error("Missing bearer token in config file {}", .0.display())]
    MissingBearerToken(PathBuf),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

fn reset_suffix(reset_at: &Option<DateTime<Local>>) -> String {
    reset_at
        .as_ref()
        .map(|t| format!(", limit resets at {}", t.format("%H:%M:%S")))
        .unwrap_or_default()
}

impl Error {
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Error::RateLimited { .. } => true,
            Error::Context(_, inner) => inner.is_rate_limited(),
            _ => false,
        }
    }

    /// Strips any `Context` layers and returns the underlying error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context(_, inner) => inner.root(),
            other => other,
        }
    }
}

pub trait Context<T, E> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e.into())))
    }
}
