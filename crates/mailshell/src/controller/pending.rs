//! Commands in flight and what to do when they finish.

use mailshell_core::{Invocation, WorkerHandle};

/// Where a fetched body goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyTarget {
    /// The body page.
    Viewer,
    /// The compose form, quoted under an attribution line.
    Compose {
        /// `Date` of the message being answered.
        date: String,
        /// First sender address, or `[unknown]`.
        author: String,
    },
}

/// Completion handler for an asynchronous command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// `--update`; refreshes the account list.
    UpdateAccount {
        /// Account being updated, `None` for all.
        account: Option<String>,
    },
    /// `--mark-read` / `--mark-unread`; flips the header's read flag.
    ///
    /// UIDs are only unique within one folder, so the folder is kept too.
    ToggleRead {
        /// Account of the header.
        account: String,
        /// Folder of the header.
        folder: String,
        /// Header being toggled.
        uid: u64,
    },
    /// `--body-plain` / `--body-html`.
    FetchBody {
        /// Where the body is shown.
        target: BodyTarget,
    },
    /// `--attachments`.
    SaveAttachments,
    /// `--smtp`.
    SendMail,
}

/// A running command owned by the controller.
#[derive(Debug)]
pub struct PendingCommand {
    /// Command line being run.
    pub invocation: Invocation,
    /// Whether output lines are appended to the message log.
    pub log_output: bool,
    /// Handler for the completion.
    pub completion: Completion,
    /// Worker control, for cancellation.
    pub handle: WorkerHandle,
}
