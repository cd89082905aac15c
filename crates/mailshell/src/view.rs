//! Plain-text rendering for the terminal shells.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use mailshell_core::{Account, ConfigField, Folder, Header, Station};

use crate::model::{ComposeState, ListModel, ModelChange};

/// Local time of an epoch timestamp, or empty if it is out of range.
#[must_use]
pub fn format_epoch(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// One account row: status marker, counts, last update and any error.
#[must_use]
pub fn account_row(account: &Account) -> String {
    let marker = if account.is_loading {
        '~'
    } else if account.has_error() {
        '!'
    } else {
        ' '
    };
    let mut row = format!(
        "{marker} {:<12} {:>5}/{:<6} {} ({})",
        account.name,
        account.unread,
        account.total,
        format_epoch(account.last_updated),
        account.last_updated_rel
    );
    if account.has_error() {
        let _ = write!(row, "  {}", account.error);
    }
    row
}

/// One folder row.
#[must_use]
pub fn folder_row(folder: &Folder) -> String {
    format!("{:<16} {}/{}", folder.name, folder.unread, folder.total)
}

/// One header row; `*` marks unread, `~` a pending read toggle.
#[must_use]
pub fn header_row(header: &Header) -> String {
    let marker = if header.is_loading {
        '~'
    } else if header.read {
        ' '
    } else {
        '*'
    };
    let who = if header.is_sent {
        &header.to
    } else {
        &header.from
    };
    format!(
        "{marker} {:>6}  {}  {}  {}",
        header.uid, header.date, who, header.subject
    )
}

/// One config field, masking sensitive values.
#[must_use]
pub fn config_row(field: &ConfigField) -> String {
    format!(
        "{} = {}    # {}",
        field.name,
        field.display_value(),
        field.description
    )
}

/// One station row.
#[must_use]
pub fn station_row(station: &Station) -> String {
    format!("{:<4} {}", station.id, station.name)
}

/// The compose form as it would be sent.
#[must_use]
pub fn compose_form(compose: &ComposeState) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "To: {}", compose.to.join(", "));
    let _ = writeln!(text, "Cc: {}", compose.cc.join(", "));
    let _ = writeln!(text, "Bcc: {}", compose.bcc.join(", "));
    let _ = writeln!(text, "Subject: {}", compose.subject);
    for path in &compose.attachments {
        let _ = writeln!(text, "Attach: {}", path.display());
    }
    let _ = write!(text, "\n{}", compose.body);
    text
}

/// Lines to print for `changes` to `model`.
///
/// A reset prints every row under a title; inserts print only the new rows;
/// an update reprints one row.
pub fn render_changes<T>(
    title: &str,
    model: &ListModel<T>,
    changes: &[ModelChange],
    row: impl Fn(&T) -> String,
) -> Vec<String> {
    let numbered = |index: usize| {
        model
            .items()
            .get(index)
            .map(|item| format!("[{index}] {}", row(item)))
    };

    let mut lines = Vec::new();
    for change in changes {
        match *change {
            ModelChange::Reset => {
                lines.push(format!("-- {title} ({}) --", model.len()));
                lines.extend((0..model.len()).filter_map(&numbered));
            }
            ModelChange::Inserted { start, count } => {
                lines.extend((start..start + count).filter_map(&numbered));
            }
            ModelChange::Updated(index) => lines.extend(numbered(index)),
        }
    }
    lines
}
