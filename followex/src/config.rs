use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, error, info};
use serde::Deserialize;
use url::Url;

use crate::error::{Context, Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";
pub const DEFAULT_USER_FIELDS: [&str; 2] = ["username", "public_metrics"];
pub const DEFAULT_TWEET_FIELDS: [&str; 1] = ["text"];

// config file layout, every key optional so that a missing token can be
// reported by name instead of as a parse error
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    bearer_token: Option<String>,
    #[serde(default)]
    user_fields: Option<Vec<String>>,
    #[serde(default)]
    tweet_fields: Option<Vec<String>>,
    #[serde(default)]
    api_url: Option<String>,
}

/// Resolved settings for one export run. Immutable once loaded.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub bearer_token: String,
    pub user_fields: BTreeSet<String>,
    pub tweet_fields: BTreeSet<String>,
    pub api_url: Url,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bearer_token", &"<redacted>")
            .field("user_fields", &self.user_fields)
            .field("tweet_fields", &self.tweet_fields)
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

impl Config {
    /// Builds a config with the default field sets.
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            bearer_token: bearer_token.into(),
            user_fields: with_defaults(&DEFAULT_USER_FIELDS, None),
            tweet_fields: with_defaults(&DEFAULT_TWEET_FIELDS, None),
            api_url: Url::parse(DEFAULT_API_URL)?,
        })
    }
}

/// Loads the config file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or if it lacks `bearer_token`.
pub fn load(path: &Path) -> Result<Config> {
    info!("load config from: {}", path.display());
    let content = fs::read_to_string(path).context("reading config file")?;
    parse(&content, path)
}

/// Parses config file content. `path` is only used for error reporting.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let file = if content.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str::<ConfigFile>(content)?
    };

    let Some(bearer_token) = file.bearer_token else {
        error!("cannot find bearer token in {}", path.display());
        return Err(Error::MissingBearerToken(path.to_path_buf()));
    };

    let api_url = Url::parse(file.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
    let config = Config {
        bearer_token,
        user_fields: with_defaults(&DEFAULT_USER_FIELDS, file.user_fields),
        tweet_fields: with_defaults(&DEFAULT_TWEET_FIELDS, file.tweet_fields),
        api_url,
    };
    debug!("config: {config:?}");
    Ok(config)
}

fn with_defaults(defaults: &[&str], configured: Option<Vec<String>>) -> BTreeSet<String> {
    defaults
        .iter()
        .map(|f| f.to_string())
        .chain(configured.unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod local_tests {
    use std::path::PathBuf;

    use tempfile::tempdir;

    use super::*;

    fn fields(v: &[&str]) -> BTreeSet<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_only() {
        let config = parse("bearer_token: AAAA\n", Path::new("config.yml")).unwrap();
        assert_eq!(config.bearer_token, "AAAA");
        assert_eq!(config.user_fields, fields(&["public_metrics", "username"]));
        assert_eq!(config.tweet_fields, fields(&["text"]));
        assert_eq!(config.api_url.as_str(), "https://api.twitter.com/");
    }

    #[test]
    fn test_configured_fields_are_merged() {
        let content = "\
bearer_token: AAAA
user_fields:
  - description
  - username
  - location
tweet_fields:
  - created_at
api_url: http://localhost:8080
";
        let config = parse(content, Path::new("config.yml")).unwrap();
        assert_eq!(
            config.user_fields,
            fields(&["description", "location", "public_metrics", "username"])
        );
        assert_eq!(config.tweet_fields, fields(&["created_at", "text"]));
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_missing_bearer_token() {
        let content = "user_fields:\n  - description\n";
        let err = parse(content, Path::new("my.yml")).unwrap_err();
        match err {
            Error::MissingBearerToken(path) => assert_eq!(path, PathBuf::from("my.yml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_is_missing_token() {
        let err = parse("\n", Path::new("config.yml")).unwrap_err();
        assert!(matches!(err, Error::MissingBearerToken(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("bearer_token: [unclosed", Path::new("config.yml")).unwrap_err();
        assert!(matches!(err, Error::SerdeYaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "bearer_token: from-file\ntweet_fields: []\n").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.bearer_token, "from-file");
        assert_eq!(config.tweet_fields, fields(&["text"]));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err.root(), Error::Io(_)));
        assert!(err.to_string().starts_with("reading config file: "));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new("secret-token").unwrap();
        assert!(!format!("{config:?}").contains("secret-token"));
    }
}
