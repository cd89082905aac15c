//! Parser for the email tool's line-oriented output.
//!
//! Every function here turns one record into a typed value or a
//! [`ParseError`]. Callers skip records that fail to parse; a bad record
//! never aborts the surrounding batch.
//!
//! Formats:
//! - Account: `NAME:EPOCH:RELTIME:UNREAD/TOTAL:ERRORTEXT`
//! - Folder: `NAME:UNREAD/TOTAL`
//! - Header: `Field: value` lines (`Date`, `From`, `To`, `Subject`)
//! - Config: `key=value` lines
//! - UID index: one integer per line

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Account, Folder, Header};

#[allow(clippy::expect_used)]
static ACCOUNT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+):([^:]+):([a-z0-9_\- ]+):([^:/]+)/([^:]+):(.*)$").expect("account regex")
});

#[allow(clippy::expect_used)]
static FOLDER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+):([^/]+)/(.+)$").expect("folder regex"));

#[allow(clippy::expect_used)]
static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+): (.*)$").expect("header regex"));

#[allow(clippy::expect_used)]
static CONFIG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)=(.*)$").expect("config regex"));

/// Why a record could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line does not have the expected shape.
    #[error("malformed {kind} line: {line:?}")]
    Malformed {
        /// Which record type was expected.
        kind: &'static str,
        /// The offending line.
        line: String,
    },

    /// A numeric field did not hold an integer.
    #[error("invalid {field}: {value:?}")]
    InvalidNumber {
        /// Field name.
        field: &'static str,
        /// Raw text of the field.
        value: String,
    },

    /// A header record lacked one of the required fields.
    #[error("header record is missing `{0}`")]
    MissingField(&'static str),
}

fn number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Parses one line of `--accounts` output.
///
/// The error text is captured greedily to the end of the line and may itself
/// contain colons.
///
/// # Errors
///
/// Returns an error if the line does not match the format or a count is not
/// an integer.
pub fn parse_account_line(line: &str) -> Result<Account, ParseError> {
    let caps = ACCOUNT_LINE.captures(line).ok_or_else(|| ParseError::Malformed {
        kind: "account",
        line: line.to_string(),
    })?;

    Ok(Account {
        name: caps[1].to_string(),
        last_updated: number("last-updated epoch", &caps[2])?,
        last_updated_rel: caps[3].to_string(),
        unread: number("unread count", &caps[4])?,
        total: number("total count", &caps[5])?,
        error: caps[6].to_string(),
        is_loading: false,
    })
}

/// Parses one line of `--folders` output.
///
/// # Errors
///
/// Returns an error if the line does not match the format or a count is not
/// an integer.
pub fn parse_folder_line(line: &str) -> Result<Folder, ParseError> {
    let caps = FOLDER_LINE.captures(line).ok_or_else(|| ParseError::Malformed {
        kind: "folder",
        line: line.to_string(),
    })?;

    Ok(Folder {
        name: caps[1].to_string(),
        unread: number("unread count", &caps[2])?,
        total: number("total count", &caps[3])?,
    })
}

/// Parses a cached header file for message `uid`.
///
/// All of `Date`, `From`, `To` and `Subject` must be present. Other
/// well-formed fields are ignored. Any line that is not `Field: value`
/// invalidates the whole record.
///
/// # Errors
///
/// Returns an error for a malformed line or a missing field.
pub fn parse_header_record(uid: u64, text: &str) -> Result<Header, ParseError> {
    let mut date = None;
    let mut from = None;
    let mut to = None;
    let mut subject = None;

    for line in text.lines() {
        let caps = HEADER_LINE.captures(line).ok_or_else(|| ParseError::Malformed {
            kind: "header",
            line: line.to_string(),
        })?;
        let value = caps[2].to_string();
        match &caps[1] {
            "Date" => date = Some(value),
            "From" => from = Some(value),
            "To" => to = Some(value),
            "Subject" => subject = Some(value),
            _ => {}
        }
    }

    Ok(Header {
        uid,
        date: date.ok_or(ParseError::MissingField("Date"))?,
        from: from.ok_or(ParseError::MissingField("From"))?,
        to: to.ok_or(ParseError::MissingField("To"))?,
        subject: subject.ok_or(ParseError::MissingField("Subject"))?,
        is_sent: false,
        read: false,
        is_loading: false,
    })
}

/// Parses `key=value` lines into a mapping.
///
/// Unknown keys are kept; lines without `=` are skipped. A repeated key keeps
/// its last value.
#[must_use]
pub fn parse_config(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| CONFIG_LINE.captures(line))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Parses a UID index file, one identifier per line.
///
/// Lines that are not integers are skipped.
#[must_use]
pub fn parse_uid_index(text: &str) -> Vec<u64> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match number::<u64>("uid", line) {
            Ok(uid) => Some(uid),
            Err(e) => {
                tracing::warn!("Skipping UID index entry: {e}");
                None
            }
        })
        .collect()
}

/// Parses every line of `text` with `parse`, dropping failures.
pub fn parse_lines<T>(
    kind: &str,
    text: &str,
    parse: impl Fn(&str) -> Result<T, ParseError>,
) -> Vec<T> {
    text.lines()
        .filter_map(|line| match parse(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Skipping {kind} record: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_account_line() {
        let account = parse_account_line("Work:1700000000:5min ago:3/120:").unwrap();
        assert_eq!(account.name, "Work");
        assert_eq!(account.last_updated, 1_700_000_000);
        assert_eq!(account.last_updated_rel, "5min ago");
        assert_eq!(account.unread, 3);
        assert_eq!(account.total, 120);
        assert!(!account.has_error());
        assert!(!account.is_loading);
    }

    #[test]
    fn test_account_error_text_keeps_colons() {
        let account =
            parse_account_line("Gmail:1:1h ago:0/0:ERROR: login failed: bad password").unwrap();
        assert_eq!(account.error, "ERROR: login failed: bad password");
        assert!(account.has_error());
    }

    #[test]
    fn test_account_line_rejects_non_numeric_counts() {
        let err = parse_account_line("Work:1:now:x/10:").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                field: "unread count",
                ..
            }
        ));
        assert!(parse_account_line("Work:soon:now:1/10:").is_err());
    }

    #[test]
    fn test_account_line_rejects_garbage() {
        assert!(parse_account_line("").is_err());
        assert!(parse_account_line("no colons here").is_err());
        assert!(parse_account_line("Work:1:now:1/10").is_err());
    }

    #[test]
    fn test_parse_folder_line() {
        let folder = parse_folder_line("inbox:4/250").unwrap();
        assert_eq!(
            folder,
            Folder {
                name: "inbox".into(),
                unread: 4,
                total: 250,
            }
        );
        assert_eq!(folder.to_line(), "inbox:4/250");
    }

    #[test]
    fn test_folder_line_rejects_bad_counts() {
        assert!(parse_folder_line("inbox:four/250").is_err());
        assert!(parse_folder_line("inbox:4").is_err());
        assert!(parse_folder_line("Inbox:4/250").is_err());
    }

    #[test]
    fn test_parse_header_record() {
        let text = "Date: Mon, 1 Jan 2024 10:00:00\n\
                    From: Jane Doe <jane@example.com>\n\
                    To: bob@example.org\n\
                    Subject: hello: world\n";
        let header = parse_header_record(42, text).unwrap();
        assert_eq!(header.uid, 42);
        assert_eq!(header.date, "Mon, 1 Jan 2024 10:00:00");
        assert_eq!(header.from, "Jane Doe <jane@example.com>");
        assert_eq!(header.to, "bob@example.org");
        assert_eq!(header.subject, "hello: world");
        assert!(!header.read);
        assert!(!header.is_sent);
    }

    #[test]
    fn test_header_record_requires_every_field() {
        let text = "Date: today\nFrom: a@b.cd\nSubject: hi\n";
        assert_eq!(
            parse_header_record(1, text).unwrap_err(),
            ParseError::MissingField("To")
        );
        let text = "Date: today\nTo: a@b.cd\nSubject: hi\n";
        assert_eq!(
            parse_header_record(1, text).unwrap_err(),
            ParseError::MissingField("From")
        );
    }

    #[test]
    fn test_header_record_rejects_malformed_line() {
        let text = "Date: today\nFrom: a@b.cd\nthis is not a field\nTo: x@y.zz\nSubject: hi\n";
        assert!(matches!(
            parse_header_record(1, text),
            Err(ParseError::Malformed { kind: "header", .. })
        ));
    }

    #[test]
    fn test_header_record_ignores_unknown_fields() {
        let text = "Date: d\nFrom: f\nTo: t\nSubject: s\nX_Mailer: mutt\n";
        assert!(parse_header_record(7, text).is_ok());
    }

    #[test]
    fn test_header_record_allows_empty_subject() {
        let text = "Date: d\nFrom: f\nTo: t\nSubject: \n";
        assert_eq!(parse_header_record(7, text).unwrap().subject, "");
    }

    #[test]
    fn test_parse_config_keeps_unknown_keys() {
        let values = parse_config("user=me@example.com\nfavorite_color=blue\nnot a pair\nport=993\n");
        assert_eq!(values.len(), 3);
        assert_eq!(values["user"], "me@example.com");
        assert_eq!(values["favorite_color"], "blue");
        assert_eq!(values["port"], "993");
    }

    #[test]
    fn test_parse_config_value_may_contain_equals() {
        let values = parse_config("encrypt_cmd=gpg --armor --recipient=me\n");
        assert_eq!(values["encrypt_cmd"], "gpg --armor --recipient=me");
    }

    #[test]
    fn test_parse_uid_index_skips_bad_lines() {
        assert_eq!(parse_uid_index("10\n11\nabc\n\n12\n"), vec![10, 11, 12]);
        assert!(parse_uid_index("").is_empty());
    }

    #[test]
    fn test_parse_lines_skips_unparseable_records() {
        let text = "Work:1:now:1/2:\ngarbage\nHome:2:1d ago:0/5:timeout\n";
        let accounts = parse_lines("account", text, parse_account_line);
        let names: Vec<_> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Home"]);
    }

    proptest! {
        #[test]
        fn account_line_round_trips(
            name in "[A-Za-z0-9_]{1,12}",
            last_updated in 0i64..=i64::MAX,
            rel in "[a-z0-9_ -]{1,12}",
            unread in any::<u64>(),
            total in any::<u64>(),
            error in "[^\n]{0,24}",
        ) {
            let account = Account {
                name,
                last_updated,
                last_updated_rel: rel,
                unread,
                total,
                error,
                is_loading: false,
            };
            let parsed = parse_account_line(&account.to_line()).unwrap();
            prop_assert_eq!(parsed, account);
        }
    }
}
