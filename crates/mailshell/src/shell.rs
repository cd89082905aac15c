//! Line-driven shells.
//!
//! Each input line is one command. The email shell multiplexes input lines
//! with worker events on a single task; after every step it prints whatever
//! the controller recorded as changed.

use std::io::Write;

use mailshell_core::train::StationField;
use mailshell_core::{CommandId, ConfigMode, WorkerEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::controller::{Controller, ViewUpdate};
use crate::message::{ComposeMessage, Message};
use crate::train::TrainController;
use crate::view;

/// Email shell command summary.
pub const EMAIL_HELP: &str = "\
commands:
  page NAME                 account|header|config|send|folder|body
  accounts                  reload the account list
  account NAME | clear      select an account | drop the selection
  folders | folder NAME     reload folders | select a folder
  headers | more [PCT]      first page of headers | load more
  search [REGEX]            filter headers (case-insensitive)
  unread on|off             show unread headers only
  header UID                select a header
  update [NAME]             update one account, or all
  toggle UID                flip read/unread
  html on|off | body        body format | fetch the selected body
  attachments               save attachments to the home directory
  reply | forward           start a message from the selected header
  to|cc|bcc ADDR,...        set recipients
  subject TEXT | text TEXT  set subject | set body (\\n for newlines)
  attach PATH | discard     add an attachment | clear the form
  send                      send the form
  config-mode account|options
  config | set KEY VALUE | save
  jobs | cancel ID          running commands | kill one
  run ARGV... | sh SCRIPT   launch a command without waiting
  help | quit";

/// Train shell command summary.
pub const TRAIN_HELP: &str = "\
commands:
  stations                  list stations
  from ID | to ID           select stations
  date DATE | time TIME     set date/time (`none` clears)
  search                    run the train tool
  help | quit";

/// A parsed email shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A controller action.
    Message(Message),
    /// List running commands.
    Jobs,
    /// Print the command summary.
    Help,
    /// Cancel everything and exit.
    Quit,
}

/// A parsed train shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainCommand {
    /// List stations.
    Stations,
    /// Select a station.
    Station(StationField, String),
    /// Set the date.
    Date(String),
    /// Set the time.
    Time(String),
    /// Launch the search.
    Search,
    /// Print the command summary.
    Help,
    /// Exit.
    Quit,
}

fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim();
    line.split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()))
}

fn required<'a>(rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("missing {what}"))
    } else {
        Ok(rest)
    }
}

fn optional(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn on_off(rest: &str) -> Result<bool, String> {
    match rest {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("expected on|off, got {other:?}")),
    }
}

fn number<T: std::str::FromStr>(rest: &str, what: &str) -> Result<T, String> {
    required(rest, what)?
        .trim_start_matches('#')
        .parse()
        .map_err(|_| format!("invalid {what}: {rest:?}"))
}

/// Parses one email shell line. Blank lines and `#` comments give `None`.
///
/// # Errors
///
/// Returns a message for unknown commands and bad arguments.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let (word, rest) = split_word(line);
    if word.is_empty() || word.starts_with('#') {
        return Ok(None);
    }
    let message = match word {
        "help" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "jobs" => return Ok(Some(Command::Jobs)),
        "page" => Message::ShowPage(required(rest, "page")?.parse()?),
        "accounts" => Message::SetupAccounts,
        "account" => Message::SelectAccount(required(rest, "account")?.to_string()),
        "clear" => Message::ClearAccount,
        "folders" => Message::SetupFolders,
        "folder" => Message::SelectFolder(required(rest, "folder")?.to_string()),
        "headers" => Message::SetupHeaders,
        "more" if rest.is_empty() => Message::MoreHeaders(None),
        "more" => Message::MoreHeaders(Some(number(rest, "percentage")?)),
        "search" => Message::SearchTextChanged(rest.to_string()),
        "unread" => Message::SetUnreadOnly(on_off(rest)?),
        "header" => Message::SelectHeader(number(rest, "uid")?),
        "update" => Message::UpdateAccount(optional(rest)),
        "toggle" => Message::ToggleRead(number(rest, "uid")?),
        "html" => Message::SetHtmlMode(on_off(rest)?),
        "body" => Message::FetchBody,
        "attachments" => Message::SaveAttachments,
        "reply" | "forward" => Message::InitSend(word.parse()?),
        "to" => Message::Compose(ComposeMessage::To(rest.to_string())),
        "cc" => Message::Compose(ComposeMessage::Cc(rest.to_string())),
        "bcc" => Message::Compose(ComposeMessage::Bcc(rest.to_string())),
        "subject" => Message::Compose(ComposeMessage::Subject(rest.to_string())),
        "text" => Message::Compose(ComposeMessage::Body(rest.replace("\\n", "\n"))),
        "attach" => Message::Compose(ComposeMessage::Attach(required(rest, "path")?.to_string())),
        "discard" => Message::Compose(ComposeMessage::Clear),
        "send" => Message::SendEmail,
        "config-mode" => Message::SetConfigMode(required(rest, "mode")?.parse::<ConfigMode>()?),
        "config" => Message::SetupConfig,
        "set" => {
            let (name, value) = split_word(required(rest, "field")?);
            Message::UpdateConfigField {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
        "save" => Message::SaveConfig,
        "cancel" => Message::Cancel(CommandId(number(rest, "command id")?)),
        "run" => Message::RunCommand(
            required(rest, "command")?
                .split_whitespace()
                .map(String::from)
                .collect(),
        ),
        "sh" => Message::ShellCommand(required(rest, "script")?.to_string()),
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(Command::Message(message)))
}

/// Parses one train shell line. Blank lines and `#` comments give `None`.
///
/// # Errors
///
/// Returns a message for unknown commands and missing arguments.
pub fn parse_train_command(line: &str) -> Result<Option<TrainCommand>, String> {
    let (word, rest) = split_word(line);
    let command = match word {
        "" => return Ok(None),
        w if w.starts_with('#') => return Ok(None),
        "help" => TrainCommand::Help,
        "quit" | "exit" => TrainCommand::Quit,
        "stations" => TrainCommand::Stations,
        "from" | "to" => TrainCommand::Station(word.parse()?, required(rest, "station")?.to_string()),
        "date" => TrainCommand::Date(required(rest, "date")?.to_string()),
        "time" => TrainCommand::Time(required(rest, "time")?.to_string()),
        "search" => TrainCommand::Search,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

/// Prints everything the controller recorded since the last call.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_email<W: Write>(controller: &mut Controller, out: &mut W) -> std::io::Result<()> {
    for update in controller.take_updates() {
        match update {
            ViewUpdate::Notify(text) => writeln!(out, ">> {}", text.trim_matches('\n'))?,
            ViewUpdate::Log(text) => write!(out, "{text}")?,
            ViewUpdate::Body(text) | ViewUpdate::HeaderText(text) => writeln!(out, "{text}")?,
            ViewUpdate::Compose => writeln!(out, "{}", view::compose_form(controller.compose()))?,
            ViewUpdate::Counter(text) => writeln!(out, "[{text}]")?,
            ViewUpdate::Page(page) => writeln!(out, "== {page} ==")?,
        }
    }

    let changes = controller.take_model_changes();
    let sections = [
        view::render_changes("accounts", controller.accounts(), &changes.accounts, view::account_row),
        view::render_changes("folders", controller.folders(), &changes.folders, view::folder_row),
        view::render_changes("headers", controller.headers(), &changes.headers, view::header_row),
        view::render_changes("config", controller.config_fields(), &changes.config, view::config_row),
    ];
    for line in sections.iter().flatten() {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Runs the email shell until `quit`, or until input ends and every running
/// command has finished.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run_email_shell<R, W>(
    mut controller: Controller,
    mut events: mpsc::UnboundedReceiver<WorkerEvent>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut input_open = true;
    writeln!(out, "== {} ==", controller.nav().page())?;

    loop {
        if !input_open && !controller.has_pending() {
            break;
        }
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => match parse_command(&line) {
                    Ok(Some(Command::Message(message))) => controller.update(message).await,
                    Ok(Some(Command::Jobs)) => {
                        for (id, invocation) in controller.pending_commands() {
                            writeln!(out, "{id} {invocation}")?;
                        }
                    }
                    Ok(Some(Command::Help)) => writeln!(out, "{EMAIL_HELP}")?,
                    Ok(Some(Command::Quit)) => {
                        controller.cancel_all();
                        render_email(&mut controller, out)?;
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => writeln!(out, "error: {e}")?,
                },
                None => input_open = false,
            },
            Some(event) = events.recv() => controller.handle_worker_event(event).await,
            else => break,
        }
        render_email(&mut controller, out)?;
    }
    Ok(())
}

/// Runs the train shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run_train_shell<R, W>(
    mut controller: TrainController,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", controller.label_text())?;
    while let Some(line) = lines.next_line().await? {
        match parse_train_command(&line) {
            Ok(Some(TrainCommand::Stations)) => {
                controller.setup_stations();
                let changes = controller.take_station_changes();
                for row in view::render_changes(
                    "stations",
                    controller.stations(),
                    &changes,
                    view::station_row,
                ) {
                    writeln!(out, "{row}")?;
                }
            }
            Ok(Some(TrainCommand::Station(field, id))) => controller.select_station(field, &id),
            Ok(Some(TrainCommand::Date(date))) => controller.select_date(&date),
            Ok(Some(TrainCommand::Time(time))) => controller.select_time(&time),
            Ok(Some(TrainCommand::Search)) => match controller.search() {
                Ok(invocation) => writeln!(out, ">> {invocation}")?,
                Err(e) => writeln!(out, "error: {e}")?,
            },
            Ok(Some(TrainCommand::Help)) => writeln!(out, "{TRAIN_HELP}")?,
            Ok(Some(TrainCommand::Quit)) => break,
            Ok(None) => continue,
            Err(e) => writeln!(out, "error: {e}")?,
        }
        writeln!(out, "{}", controller.label_text())?;
        out.flush()?;
    }
    Ok(())
}
