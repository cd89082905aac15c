//! Fixed config schemas and field resolution.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::ConfigField;

/// A `(field name, description)` pair.
pub type SchemaEntry = (&'static str, &'static str);

/// Per-account settings, in display order.
pub const ACCOUNT_SCHEMA: &[SchemaEntry] = &[
    ("name", "single-word account ID, e.g.: \"Work\""),
    ("user", "IMAP user, usually the full email address"),
    ("password", "password, stored with optional encrypt_cmd"),
    ("server", "IMAP server, e.g.: \"imap.gmail.com\""),
    ("port", "IMAP port"),
    ("sent", "[OPT] sent folder, e.g: \"Sent\""),
    ("ssl", "[OPT] set to false if necessary"),
    ("smtp_server", "[OPT] SMTP server. e.g.: \"smtp.gmail.com\""),
    ("smtp_port", "[OPT] SMTP port"),
    ("new_unread_cmd", "[OPT] custom alert command"),
    ("skip", "[OPT] set to true to skip during --update"),
    ("preferHtml", "[OPT] set to false to prefer plaintext"),
];

/// Global options, in display order.
pub const OPTIONS_SCHEMA: &[SchemaEntry] = &[
    ("update_cmd", "[OPT] command to run after all updates"),
    ("encrypt_cmd", "[OPT] command to encrypt passwords on disk"),
    ("decrypt_cmd", "[OPT] command to decrypt saved passwords"),
];

#[allow(clippy::expect_used)]
static SENSITIVE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)password|pword|^pw$").expect("sensitive-name regex"));

/// Whether a field name looks like it holds a password.
#[must_use]
pub fn is_sensitive(name: &str) -> bool {
    SENSITIVE_NAME.is_match(name)
}

/// Builds one field per schema entry, in schema order.
///
/// Values missing from `values` default to empty. Keys in `values` that are
/// not in the schema are ignored.
#[must_use]
pub fn resolve_fields(schema: &[SchemaEntry], values: &BTreeMap<String, String>) -> Vec<ConfigField> {
    schema
        .iter()
        .map(|&(name, description)| ConfigField {
            name: name.to_string(),
            is_sensitive: is_sensitive(name),
            value: values.get(name).cloned().unwrap_or_default(),
            description: description.to_string(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ConfigMode;

    #[test]
    fn test_schema_sizes() {
        assert_eq!(ConfigMode::Account.schema().len(), 12);
        assert_eq!(ConfigMode::Options.schema().len(), 3);
    }

    #[test]
    fn test_is_sensitive() {
        assert!(is_sensitive("password"));
        assert!(is_sensitive("SMTP_Password"));
        assert!(is_sensitive("pword"));
        assert!(is_sensitive("PW"));
        assert!(!is_sensitive("pwd_hint"));
        assert!(!is_sensitive("user"));
    }

    #[test]
    fn test_resolve_fields_follows_schema() {
        let mut values = BTreeMap::new();
        values.insert("user".to_string(), "me@example.com".to_string());
        values.insert("password".to_string(), "hunter2".to_string());
        values.insert("not_in_schema".to_string(), "x".to_string());

        let fields = resolve_fields(ACCOUNT_SCHEMA, &values);
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[0].name, "name");
        assert_eq!(fields[0].value, "");
        assert_eq!(fields[1].value, "me@example.com");
        assert!(fields[2].is_sensitive);
        assert_eq!(fields[2].display_value(), "*******");
        assert!(fields.iter().all(|f| f.name != "not_in_schema"));
        assert_eq!(fields[11].name, "preferHtml");
    }

    #[test]
    fn test_config_mode_parse() {
        assert_eq!("account".parse::<ConfigMode>().unwrap(), ConfigMode::Account);
        assert_eq!("options".parse::<ConfigMode>().unwrap(), ConfigMode::Options);
        assert!("other".parse::<ConfigMode>().is_err());
    }
}
