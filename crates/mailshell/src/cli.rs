//! Command-line arguments for both binaries.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use mailshell_core::EmailManager;

use crate::model::{NavContext, Page};

/// Line-driven email shell over the email tool.
#[derive(Parser, Debug)]
#[command(name = "mailshell", author, version)]
pub struct EmailArgs {
    /// Page to start on
    #[arg(long, value_parser = parse_page)]
    pub page: Option<Page>,

    /// Account to select at startup
    #[arg(long, value_parser = single_word)]
    pub account: Option<String>,

    /// Folder to select at startup
    #[arg(long, value_parser = single_word)]
    pub folder: Option<String>,

    /// Message UID to select at startup
    #[arg(long, requires_all = ["account", "folder"])]
    pub uid: Option<u64>,

    /// Settings file (default: <config dir>/mailshell/settings.json)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl EmailArgs {
    /// Navigation context for the requested start page and selection.
    ///
    /// The header for `--uid` is read from the cache; if it cannot be read
    /// the selection stops at the folder.
    #[must_use]
    pub fn initial_nav(&self, manager: &EmailManager) -> NavContext {
        let header = match (&self.account, &self.folder, self.uid) {
            (Some(account), Some(folder), Some(uid)) => {
                let header = manager.get_header(account, folder, uid);
                if header.is_none() {
                    tracing::warn!("No readable header {uid} in {account}/{folder}");
                }
                header
            }
            _ => None,
        };
        NavContext::restored(
            self.page.unwrap_or_default(),
            self.account.clone(),
            self.folder.clone(),
            header,
        )
    }
}

/// Line-driven train schedule shell. Takes no arguments.
#[derive(Parser, Debug)]
#[command(name = "train-time-shell", author, version)]
pub struct TrainArgs {}

fn parse_page(s: &str) -> Result<Page, String> {
    s.parse()
}

fn single_word(s: &str) -> Result<String, String> {
    if !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Ok(s.to_string())
    } else {
        Err(format!("must be a single word: {s:?}"))
    }
}

/// Parses the process arguments, or prints usage to stderr and exits 1.
///
/// `--help` and `--version` print to stdout and exit 0.
#[must_use]
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}
