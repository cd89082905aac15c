//! Settings shared by both shells.
//!
//! Stored as JSON at `<config dir>/mailshell/settings.json`. Every field is
//! optional in the file; a missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Paths, tool locations and paging sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Email tool command line prefix, e.g. `["/opt/qtemail/bin/email.pl"]`.
    pub email_command: Vec<String>,
    /// Root of the email tool's header cache.
    pub cache_dir: PathBuf,
    /// Train schedule tool command line prefix.
    pub train_command: Vec<String>,
    /// Headers fetched when a folder is opened.
    pub page_initial_size: usize,
    /// Minimum number of headers fetched by "load more".
    pub page_more_size: usize,
    /// Share of the known total fetched by "load more", in percent.
    pub more_percentage: usize,
    /// Folder whose messages were sent by the user.
    pub sent_folder: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            email_command: vec!["/opt/qtemail/bin/email.pl".to_string()],
            cache_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cache")
                .join("email"),
            train_command: vec!["lirr_train_time".to_string()],
            page_initial_size: 200,
            page_more_size: 200,
            more_percentage: 30,
            sent_folder: "sent".to_string(),
        }
    }
}

impl Settings {
    /// Default settings file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailshell")
            .join("settings.json")
    }

    /// Loads settings from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))
    }
}
