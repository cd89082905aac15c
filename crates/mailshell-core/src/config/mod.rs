//! Account and global options exposed on the config page.
//!
//! Config is owned by the email tool; this module only knows which fields
//! to show and how to turn the tool's `key=value` output into editable
//! [`ConfigField`]s.

mod schema;

pub use schema::{ACCOUNT_SCHEMA, OPTIONS_SCHEMA, SchemaEntry, resolve_fields};

use std::fmt;
use std::str::FromStr;

/// Which set of settings the config page edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigMode {
    /// Per-account settings (`--read-config` / `--write-config`).
    Account,
    /// Global options (`--read-options` / `--write-options`).
    Options,
}

impl ConfigMode {
    /// Fixed field schema for this mode.
    #[must_use]
    pub const fn schema(self) -> &'static [SchemaEntry] {
        match self {
            Self::Account => ACCOUNT_SCHEMA,
            Self::Options => OPTIONS_SCHEMA,
        }
    }

    /// Name used on the command line and in the UI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(Self::Account),
            "options" => Ok(Self::Options),
            other => Err(format!("invalid config mode: {other}")),
        }
    }
}

/// One editable setting bound to a schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    /// Field name, also the config key.
    pub name: String,
    /// Whether the value should be masked when displayed.
    pub is_sensitive: bool,
    /// Current value; empty when unset.
    pub value: String,
    /// Human-readable description.
    pub description: String,
}

impl ConfigField {
    /// Value suitable for display, masking sensitive fields.
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.is_sensitive && !self.value.is_empty() {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Result of a `--write-config` / `--write-options` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Exit code of the email tool.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl WriteOutcome {
    /// Whether the tool reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
