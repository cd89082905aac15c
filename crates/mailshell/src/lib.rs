//! # mailshell
//!
//! Line-driven front-ends for the email tool and the train schedule tool.
//!
//! The [`controller::Controller`] holds all email shell state and is driven
//! by [`message::Message`]s and worker events; [`shell`] wires it to text
//! input and output. [`train::TrainController`] does the same for the train
//! schedule shell.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod controller;
pub mod message;
pub mod model;
pub mod shell;
pub mod train;
pub mod view;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global tracing subscriber.
///
/// Logs go to stderr so the shell's own output on stdout stays clean. The
/// filter comes from `RUST_LOG`, defaulting to info for both crates.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailshell=info,mailshell_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
