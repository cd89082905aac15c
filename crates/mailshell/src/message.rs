//! Message types for user actions.
//!
//! Every action the email shell can take is a [`Message`] handed to
//! [`crate::controller::Controller::update`]. Worker output arrives
//! separately as [`mailshell_core::WorkerEvent`]s.

use mailshell_core::{CommandId, ConfigMode};

use crate::model::{Page, SendKind};

/// Email shell actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Switch to a page, keeping the selection.
    ShowPage(Page),
    /// Select an account by name and open its inbox.
    SelectAccount(String),
    /// Drop the account, folder and header selection.
    ClearAccount,
    /// Select a folder of the current account.
    SelectFolder(String),
    /// Select a header of the current folder by UID.
    SelectHeader(u64),

    // Lists
    /// Reload the account list.
    SetupAccounts,
    /// Reload the folder list of the current account.
    SetupFolders,
    /// Load the first page of headers, clearing filters.
    SetupHeaders,
    /// Load more headers; `None` uses the configured percentage.
    MoreHeaders(Option<usize>),
    /// Search box text changed.
    SearchTextChanged(String),
    /// Show unread headers only, or everything.
    SetUnreadOnly(bool),

    // Email tool commands
    /// Update one account, or every non-skipped account.
    UpdateAccount(Option<String>),
    /// Flip the read flag of a header.
    ToggleRead(u64),
    /// Fetch bodies as HTML instead of plain text.
    SetHtmlMode(bool),
    /// Fetch the body of the selected header.
    FetchBody,
    /// Save the selected message's attachments to the home directory.
    SaveAttachments,

    // Compose
    /// Fill the compose form from the selected header.
    InitSend(SendKind),
    /// Edit the compose form.
    Compose(ComposeMessage),
    /// Send the compose form.
    SendEmail,

    // Config
    /// Choose which config the config page edits.
    SetConfigMode(ConfigMode),
    /// Load config fields for the current mode.
    SetupConfig,
    /// Edit one config value.
    UpdateConfigField {
        /// Field name.
        name: String,
        /// New value.
        value: String,
    },
    /// Write config fields back through the email tool.
    SaveConfig,

    // Processes
    /// Kill a running command; its completion is never handled.
    Cancel(CommandId),
    /// Launch a command line without waiting.
    RunCommand(Vec<String>),
    /// Launch `sh -c` with a script without waiting.
    ShellCommand(String),
}

/// Compose form edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeMessage {
    /// Comma-separated To addresses.
    To(String),
    /// Comma-separated Cc addresses.
    Cc(String),
    /// Comma-separated Bcc addresses.
    Bcc(String),
    /// Subject line.
    Subject(String),
    /// Body text.
    Body(String),
    /// Add a file to attach.
    Attach(String),
    /// Reset the whole form.
    Clear,
}
