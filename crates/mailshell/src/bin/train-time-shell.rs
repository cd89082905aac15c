//! `train-time-shell` - pick stations and a time, then launch the train tool.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use anyhow::Context;
use mailshell::cli::{TrainArgs, parse_or_exit};
use mailshell::shell::run_train_shell;
use mailshell::train::TrainController;
use mailshell_core::Settings;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let TrainArgs {} = parse_or_exit();
    mailshell::init_tracing();

    let settings_path = Settings::default_path();
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    info!("Starting train-time-shell");

    let controller = TrainController::new(&settings);
    let mut stdout = std::io::stdout();
    run_train_shell(controller, BufReader::new(tokio::io::stdin()), &mut stdout).await
}
