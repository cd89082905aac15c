//! Records produced from the email tool's output.

use std::fmt;

/// A configured mail account, as reported by `--accounts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Single-word account name.
    pub name: String,
    /// Last successful update, seconds since the epoch.
    pub last_updated: i64,
    /// Last update relative to now, e.g. `"5min ago"`.
    pub last_updated_rel: String,
    /// Number of unread messages.
    pub unread: u64,
    /// Total number of messages.
    pub total: u64,
    /// Error from the last update; empty when there was none.
    pub error: String,
    /// Whether an update command is currently running for this account.
    pub is_loading: bool,
}

impl Account {
    /// Whether the last update left an error behind.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Serializes the account back into the `--accounts` line format.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{}:{}:{}:{}/{}:{}",
            self.name, self.last_updated, self.last_updated_rel, self.unread, self.total, self.error
        )
    }
}

/// A folder within an account, as reported by `--folders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Folder name, e.g. `inbox`.
    pub name: String,
    /// Number of unread messages.
    pub unread: u64,
    /// Total number of messages.
    pub total: u64,
}

impl Folder {
    /// Serializes the folder back into the `--folders` line format.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{}:{}/{}", self.name, self.unread, self.total)
    }
}

/// Summary metadata for one message, read from the header cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Message identifier, unique within account and folder.
    pub uid: u64,
    /// `Date` header text.
    pub date: String,
    /// `From` header text.
    pub from: String,
    /// `To` header text.
    pub to: String,
    /// `Subject` header text.
    pub subject: String,
    /// Whether the message lives in the sent folder.
    pub is_sent: bool,
    /// Whether the message has been read.
    pub read: bool,
    /// Whether a read/unread toggle is in flight.
    pub is_loading: bool,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From: {}", self.from)?;
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "To: {}", self.to)?;
        writeln!(f, "Date: {}", self.date)
    }
}
