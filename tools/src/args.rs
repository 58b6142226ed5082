use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use followex::config::DEFAULT_CONFIG_FILE;
use followex::core::{FetchRequest, OutputMode, ResumeFrom};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// account whose followers are exported
    pub username: String,

    /// location of config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// continue a run that was stopped by the rate limit
    #[arg(long = "continue", conflicts_with = "pagination_token")]
    pub continue_: bool,

    /// pagination token to start from
    #[arg(short, long)]
    pub pagination_token: Option<String>,

    /// how results of incomplete runs are kept
    #[arg(long, value_enum, default_value_t = Mode::Resumable)]
    pub mode: Mode,

    /// directory for exported files
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// more log output, repeat for debug logs
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// park partial results in <username>-tmp.json
    Resumable,
    /// write partial results under a name carrying the cursor
    CursorSuffixed,
}

impl From<Mode> for OutputMode {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Resumable => OutputMode::Resumable,
            Mode::CursorSuffixed => OutputMode::CursorSuffixed,
        }
    }
}

impl Args {
    pub fn fetch_request(&self) -> Result<FetchRequest, String> {
        if self.continue_ && self.mode != Mode::Resumable {
            return Err("--continue is only available in resumable mode".to_string());
        }
        let resume = match (&self.pagination_token, self.continue_) {
            (Some(token), _) => ResumeFrom::Cursor(token.clone()),
            (None, true) => ResumeFrom::SavedState,
            (None, false) => ResumeFrom::Start,
        };
        Ok(FetchRequest::new(self.username.clone())
            .with_resume(resume)
            .with_mode(self.mode.into()))
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
