//! Read access to the email tool's on-disk header cache.
//!
//! Layout under the cache directory:
//!
//! ```text
//! <ACCOUNT>/<FOLDER>/all          every known UID, one per line
//! <ACCOUNT>/<FOLDER>/unread       unread UIDs, one per line
//! <ACCOUNT>/<FOLDER>/headers/<UID>  `Field: value` header file
//! ```
//!
//! A missing file means "no data", not an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::model::Header;
use crate::process::decode;
use crate::protocol::{parse_header_record, parse_uid_index};

/// Which UID index to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UidIndex {
    /// Every known message.
    All,
    /// Unread messages only.
    Unread,
}

impl UidIndex {
    const fn file_name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unread => "unread",
        }
    }
}

/// Reads UID indices and header files from the cache directory.
#[derive(Debug, Clone)]
pub struct HeaderStore {
    root: PathBuf,
}

impl HeaderStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn folder_dir(&self, account: &str, folder: &str) -> PathBuf {
        self.root.join(account).join(folder)
    }

    /// Reads a UID index. Missing or unreadable files yield an empty list.
    #[must_use]
    pub fn uids(&self, account: &str, folder: &str, index: UidIndex) -> Vec<u64> {
        let path = self.folder_dir(account, folder).join(index.file_name());
        read_text(&path).map_or_else(Vec::new, |text| parse_uid_index(&text))
    }

    /// Reads and parses the header file for `uid`.
    ///
    /// Returns `None` if the file is missing or not a well-formed record.
    #[must_use]
    pub fn header(&self, account: &str, folder: &str, uid: u64) -> Option<Header> {
        let path = self
            .folder_dir(account, folder)
            .join("headers")
            .join(uid.to_string());
        let text = read_text(&path)?;
        match parse_header_record(uid, &text) {
            Ok(header) => Some(header),
            Err(e) => {
                warn!("Skipping header {}: {e}", path.display());
                None
            }
        }
    }
}

fn read_text(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(decode(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Cannot read {}: {e}", path.display());
            None
        }
    }
}
