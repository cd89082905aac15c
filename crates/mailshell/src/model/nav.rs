//! Navigation context.
//!
//! The current page and selection are one immutable value; every transition
//! builds a new one.

use std::fmt;
use std::str::FromStr;

use mailshell_core::Header;

/// Folder selected when an account is opened.
pub const DEFAULT_FOLDER: &str = "inbox";

/// A screen of the email shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Account list.
    #[default]
    Account,
    /// Header list of one folder.
    Header,
    /// Account or options config.
    Config,
    /// Compose form.
    Send,
    /// Folder list of one account.
    Folder,
    /// Message body.
    Body,
}

impl Page {
    /// Every page.
    pub const ALL: [Self; 6] = [
        Self::Account,
        Self::Header,
        Self::Config,
        Self::Send,
        Self::Folder,
        Self::Body,
    ];

    /// Page name as used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Header => "header",
            Self::Config => "config",
            Self::Send => "send",
            Self::Folder => "folder",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| format!("invalid page: {s}"))
    }
}

/// Where the user is and what is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavContext {
    page: Page,
    account: Option<String>,
    folder: Option<String>,
    header: Option<Header>,
}

impl NavContext {
    /// A context with an explicit selection, e.g. restored from the command line.
    #[must_use]
    pub const fn restored(
        page: Page,
        account: Option<String>,
        folder: Option<String>,
        header: Option<Header>,
    ) -> Self {
        Self {
            page,
            account,
            folder,
            header,
        }
    }

    /// Current page.
    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    /// Selected account.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Selected folder.
    #[must_use]
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Selected header.
    #[must_use]
    pub const fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Same selection, different page.
    #[must_use]
    pub fn with_page(&self, page: Page) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Opens `account` at its inbox.
    #[must_use]
    pub fn with_account(&self, account: &str) -> Self {
        Self {
            page: self.page,
            account: Some(account.to_string()),
            folder: Some(DEFAULT_FOLDER.to_string()),
            header: None,
        }
    }

    /// Opens `folder` in the current account.
    #[must_use]
    pub fn with_folder(&self, folder: &str) -> Self {
        Self {
            folder: Some(folder.to_string()),
            header: None,
            ..self.clone()
        }
    }

    /// Selects `header`.
    #[must_use]
    pub fn with_header(&self, header: Header) -> Self {
        Self {
            header: Some(header),
            ..self.clone()
        }
    }

    /// Same page, nothing selected.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            page: self.page,
            ..Self::default()
        }
    }
}
