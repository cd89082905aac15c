//! `mailshell` - line-driven email shell over the email tool.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use anyhow::Context;
use mailshell::cli::{EmailArgs, parse_or_exit};
use mailshell::controller::Controller;
use mailshell::shell::run_email_shell;
use mailshell_core::Settings;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: EmailArgs = parse_or_exit();
    mailshell::init_tracing();

    let settings_path = args.settings.clone().unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    info!("Starting mailshell");

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut controller = Controller::new(&settings, events_tx);
    let nav = args.initial_nav(controller.manager());
    controller.restore(nav);

    let mut stdout = std::io::stdout();
    run_email_shell(
        controller,
        events_rx,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
    )
    .await?;
    info!("Exiting mailshell");
    Ok(())
}
