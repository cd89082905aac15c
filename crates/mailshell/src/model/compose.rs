//! Compose form model and reply/forward helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use mailshell_core::OutgoingMail;

/// Whether a new message answers or passes on an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKind {
    /// Reply to the sender (or, from the sent folder, to the original recipients).
    Reply,
    /// Forward with no recipients filled in.
    Forward,
}

impl SendKind {
    /// Subject prefix for this kind.
    #[must_use]
    pub const fn subject_prefix(self) -> &'static str {
        match self {
            Self::Reply => "Re: ",
            Self::Forward => "Fwd: ",
        }
    }

    /// Name used by the shell.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::Forward => "forward",
        }
    }
}

impl fmt::Display for SendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reply" => Ok(Self::Reply),
            "forward" => Ok(Self::Forward),
            other => Err(format!("invalid send type: {other}")),
        }
    }
}

/// Adds the reply/forward prefix unless the subject already starts with it.
#[must_use]
pub fn prefixed_subject(kind: SendKind, subject: &str) -> String {
    let prefix = kind.subject_prefix();
    if subject.starts_with(prefix) {
        subject.to_string()
    } else {
        format!("{prefix}{subject}")
    }
}

/// Quotes `body` below an attribution line.
///
/// ```text
///
///
/// On DATE, AUTHOR wrote:
/// >
/// > first line
/// > second line
/// ```
#[must_use]
pub fn quote_body(body: &str, date: &str, author: &str) -> String {
    let mut quoted = format!("\n\nOn {date}, {author} wrote:\n");
    for line in std::iter::once("").chain(body.lines()) {
        quoted.push_str("> ");
        quoted.push_str(line);
        quoted.push('\n');
    }
    quoted
}

/// Splits a comma-separated address field, dropping blanks.
#[must_use]
pub fn split_addresses(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// State for the send page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    /// Recipient addresses (To).
    pub to: Vec<String>,
    /// CC addresses.
    pub cc: Vec<String>,
    /// BCC addresses.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Files to attach.
    pub attachments: Vec<PathBuf>,
}

impl ComposeState {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts the form into a message for the email tool.
    #[must_use]
    pub fn to_outgoing(&self) -> OutgoingMail {
        OutgoingMail {
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            attachments: self.attachments.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_idempotent() {
        assert_eq!(prefixed_subject(SendKind::Reply, "Hello"), "Re: Hello");
        assert_eq!(prefixed_subject(SendKind::Reply, "Re: Hello"), "Re: Hello");
        assert_eq!(prefixed_subject(SendKind::Forward, "Re: Hello"), "Fwd: Re: Hello");
        assert_eq!(prefixed_subject(SendKind::Forward, "Fwd: x"), "Fwd: x");
    }

    #[test]
    fn test_quote_body() {
        assert_eq!(
            quote_body("hi\nthere", "Mon, 1 Jan", "a@x.org"),
            "\n\nOn Mon, 1 Jan, a@x.org wrote:\n> \n> hi\n> there\n"
        );
        assert_eq!(
            quote_body("", "d", "[unknown]"),
            "\n\nOn d, [unknown] wrote:\n> \n"
        );
    }

    #[test]
    fn test_split_addresses() {
        assert_eq!(
            split_addresses(" a@x.org, ,b@y.org ,"),
            vec!["a@x.org", "b@y.org"]
        );
        assert!(split_addresses("").is_empty());
    }

    #[test]
    fn test_send_kind_parse() {
        assert_eq!("reply".parse::<SendKind>().unwrap(), SendKind::Reply);
        assert!("bounce".parse::<SendKind>().is_err());
    }
}
