#![allow(async_fn_in_trait)]
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::Result;
use crate::models::Follower;
use crate::utils::make_state_file_name;

/// Progress of an interrupted run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RunState {
    pub followers: Vec<Follower>,
    pub next_token: Option<String>,
}

pub trait RunStateStorage: Send + Sync + Clone {
    async fn load(&self, username: &str) -> Result<Option<RunState>>;
    async fn save(&self, username: &str, state: &RunState) -> Result<()>;
    /// Removes saved state, if any.
    async fn discard(&self, username: &str) -> Result<()>;
}

/// Keeps run state in `<username>-tmp.json` inside one directory.
#[derive(Debug, Clone)]
pub struct FileRunStateStorage {
    dir: PathBuf,
}

impl FileRunStateStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn state_path(&self, username: &str) -> PathBuf {
        self.dir.join(make_state_file_name(username))
    }
}

impl RunStateStorage for FileRunStateStorage {
    async fn load(&self, username: &str) -> Result<Option<RunState>> {
        let path = self.state_path(username);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no saved state at {path:?}");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let state: RunState = serde_json::from_str(&content)?;
        info!(
            "loaded {} followers and cursor {:?} from {path:?}",
            state.followers.len(),
            state.next_token
        );
        Ok(Some(state))
    }

    async fn save(&self, username: &str, state: &RunState) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.state_path(username);
        fs::write(&path, serde_json::to_vec(state)?).await?;
        info!(
            "saved {} followers and cursor {:?} to {path:?}",
            state.followers.len(),
            state.next_token
        );
        Ok(())
    }

    async fn discard(&self, username: &str) -> Result<()> {
        let path = self.state_path(username);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("removed {path:?}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod local_tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn create_state() -> RunState {
        let mut follower = Follower::new();
        follower.insert("username", json!("ada"));
        follower.insert("followers_count", json!(3));
        RunState {
            followers: vec![follower],
            next_token: Some("abc".into()),
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let storage = FileRunStateStorage::new(temp_dir.path());
        let state = create_state();

        storage.save("jack", &state).await.unwrap();
        assert!(temp_dir.path().join("jack-tmp.json").is_file());
        let loaded = storage.load("jack").await.unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_file_layout() {
        let temp_dir = tempdir().unwrap();
        let storage = FileRunStateStorage::new(temp_dir.path());
        storage.save("jack", &create_state()).await.unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(storage.state_path("jack")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["next_token"], json!("abc"));
        assert_eq!(raw["followers"][0]["username"], json!("ada"));
    }

    #[tokio::test]
    async fn test_null_token_round_trip() {
        let temp_dir = tempdir().unwrap();
        let storage = FileRunStateStorage::new(temp_dir.path());
        std::fs::write(
            storage.state_path("jack"),
            r#"{"followers": [], "next_token": null}"#,
        )
        .unwrap();
        let loaded = storage.load("jack").await.unwrap().unwrap();
        assert!(loaded.followers.is_empty());
        assert_eq!(loaded.next_token, None);
    }

    #[tokio::test]
    async fn test_load_missing() {
        let temp_dir = tempdir().unwrap();
        let storage = FileRunStateStorage::new(temp_dir.path());
        assert!(storage.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_discard() {
        let temp_dir = tempdir().unwrap();
        let storage = FileRunStateStorage::new(temp_dir.path());
        storage.save("jack", &create_state()).await.unwrap();
        storage.discard("jack").await.unwrap();
        assert!(!storage.state_path("jack").exists());
        // nothing left to remove
        storage.discard("jack").await.unwrap();
    }
}
