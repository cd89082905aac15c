//! Permissive email address extraction from free-form header text.

use std::sync::LazyLock;

use regex::Regex;

/// `local@host.tld`, with the RFC 5322 atom characters allowed in the local
/// part and dots only between atoms.
#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    let c = r"[a-zA-Z0-9!#$%&'*+\-/=?^_`{|}~]";
    let user = format!(r"{c}+(?:\.{c})*{c}*");
    let host = r"[a-zA-Z0-9\-.]+\.[a-zA-Z]{2,}";
    Regex::new(&format!("{user}@{host}")).expect("email regex")
});

/// Extracts every email address found in `text`, in order of appearance.
///
/// Display names, angle brackets and separators are dropped:
/// `"Jane Doe <jane@example.com>, bob@sub.example.org"` yields
/// `["jane@example.com", "bob@sub.example.org"]`.
#[must_use]
pub fn extract_addresses(text: &str) -> Vec<String> {
    EMAIL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_display_name_and_bare_addresses() {
        assert_eq!(
            extract_addresses("Jane Doe <jane@example.com>, bob@sub.example.org"),
            vec!["jane@example.com", "bob@sub.example.org"]
        );
    }

    #[test]
    fn test_no_addresses() {
        assert!(extract_addresses("").is_empty());
        assert!(extract_addresses("undisclosed-recipients:;").is_empty());
        assert!(extract_addresses("user@localhost").is_empty());
    }

    #[test]
    fn test_dotted_and_tagged_local_parts() {
        assert_eq!(
            extract_addresses("\"First Last\" <first.last+news@mail.example.co.uk>"),
            vec!["first.last+news@mail.example.co.uk"]
        );
    }
}
