#![allow(async_fn_in_trait)]
use std::io::ErrorKind;
use std::path::PathBuf;

use itertools::Itertools;
use log::{debug, error, info};
use serde_json::Value;
use tokio::fs::{self, DirBuilder};

use crate::error::{Error, Result};
use crate::models::Follower;
use crate::utils::{escape_newlines, make_csv_file_name, make_json_file_name};

pub trait Exporter: Send + Sync + Clone {
    /// Writes `<stem>.csv` and returns its path.
    async fn export_csv(&self, stem: &str, followers: &[Follower]) -> Result<PathBuf>;
    /// Writes `<stem>.json` and returns its path.
    async fn export_json(&self, stem: &str, followers: &[Follower]) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct ExporterImpl {
    export_dir: PathBuf,
}

impl ExporterImpl {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    async fn write(&self, file_name: String, content: Vec<u8>) -> Result<PathBuf> {
        let export_dir = self.export_dir.as_path();
        if !export_dir.exists() {
            debug!("Creating export directory at {export_dir:?}");
            let mut dir_builder = DirBuilder::new();
            dir_builder.recursive(true);
            dir_builder.create(export_dir).await?;
        } else if !export_dir.is_dir() {
            error!("Export path {} is not a directory", export_dir.display());
            return Err(std::io::Error::new(
                ErrorKind::AlreadyExists,
                "export folder is a already exist file",
            )
            .into());
        }
        let path = export_dir.join(file_name);
        fs::write(&path, content).await?;
        Ok(path)
    }
}

impl Exporter for ExporterImpl {
    async fn export_csv(&self, stem: &str, followers: &[Follower]) -> Result<PathBuf> {
        let content = render_csv(followers)?;
        let path = self.write(make_csv_file_name(stem), content).await?;
        info!("Exported {} followers to {path:?}", followers.len());
        Ok(path)
    }

    async fn export_json(&self, stem: &str, followers: &[Follower]) -> Result<PathBuf> {
        let content = serde_json::to_vec(followers)?;
        let path = self.write(make_json_file_name(stem), content).await?;
        info!("Exported {} followers to {path:?}", followers.len());
        Ok(path)
    }
}

/// Renders followers as CSV.
///
/// The first column is an unnamed row index, the remaining columns are all
/// keys in order of first appearance. Absent values are left empty.
pub fn render_csv(followers: &[Follower]) -> Result<Vec<u8>> {
    let columns = followers
        .iter()
        .flat_map(|f| f.keys())
        .unique()
        .collect::<Vec<_>>();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(std::iter::once("").chain(columns.iter().map(|c| c.as_str())))?;
    for (ix, follower) in followers.iter().enumerate() {
        let record = std::iter::once(ix.to_string())
            .chain(
                columns
                    .iter()
                    .map(|c| follower.get(c).map(render_cell).unwrap_or_default()),
            )
            .collect::<Vec<_>>();
        writer.write_record(&record)?;
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape_newlines(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // nested values are kept as compact JSON
        other => escape_newlines(&other.to_string()),
    }
}
