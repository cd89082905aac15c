//! # mailshell-core
//!
//! Core plumbing for the `mailshell` touchscreen front-ends.
//!
//! The heavy lifting (IMAP/SMTP, mail storage, schedule lookup) is done by
//! external command-line tools. This crate provides:
//! - Parsing of the tools' line-oriented output (accounts, folders, headers, config)
//! - A blocking-style command runner for quick queries
//! - An asynchronous command worker that streams output lines and supports cancellation
//! - The email domain manager built on top of both
//! - The train station catalog and query builder
//! - Settings loading

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod config;
mod error;
pub mod manager;
pub mod model;
pub mod process;
pub mod protocol;
pub mod settings;
pub mod store;
pub mod train;

pub use address::extract_addresses;
pub use config::{ConfigField, ConfigMode, WriteOutcome};
pub use error::{Error, Result};
pub use manager::{BodyFormat, EmailManager, OutgoingMail};
pub use model::{Account, Folder, Header};
pub use process::{
    CommandId, CommandOutput, Invocation, WorkerEvent, WorkerEventKind, WorkerHandle,
};
pub use protocol::ParseError;
pub use settings::Settings;
pub use store::HeaderStore;
pub use train::{Station, StationCatalog, StationField, TrainQuery};
