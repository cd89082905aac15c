//! Header filters.
//!
//! Filters are kept in insertion order under a name. A header is shown only
//! if every filter accepts it. Setting a filter under a name that is already
//! in use replaces the old one in place.

use mailshell_core::Header;
use regex::{Regex, RegexBuilder};

/// Name of the filter driven by the search box.
pub const QUICK_FILTER: &str = "quickFilter";
/// Name of the unread-only toggle.
pub const UNREAD_FILTER: &str = "unreadFilter";

/// Header text field a regex filter can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    /// `Subject`.
    Subject,
    /// `From`.
    From,
    /// `To`.
    To,
}

impl HeaderField {
    /// Every field, in the order they are checked.
    pub const ALL: [Self; 3] = [Self::Subject, Self::From, Self::To];

    fn value(self, header: &Header) -> &str {
        match self {
            Self::Subject => &header.subject,
            Self::From => &header.from,
            Self::To => &header.to,
        }
    }
}

/// A predicate over headers.
#[derive(Debug, Clone)]
pub enum HeaderFilter {
    /// Accepts everything.
    All,
    /// Accepts headers where any of `fields` contains a match.
    Matches {
        /// Pattern searched for (unanchored).
        regex: Regex,
        /// Fields to search.
        fields: Vec<HeaderField>,
    },
    /// Accepts unread headers only.
    Unread,
}

impl HeaderFilter {
    /// Case-insensitive search over subject, from and to.
    ///
    /// Surrounding whitespace is ignored; empty text matches everything.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `text` is not a valid pattern.
    pub fn quick_search(text: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(text.trim())
            .case_insensitive(true)
            .build()?;
        Ok(Self::Matches {
            regex,
            fields: HeaderField::ALL.to_vec(),
        })
    }

    /// Whether `header` passes this filter.
    #[must_use]
    pub fn accepts(&self, header: &Header) -> bool {
        match self {
            Self::All => true,
            Self::Matches { regex, fields } => fields
                .iter()
                .any(|field| regex.is_match(field.value(header))),
            Self::Unread => !header.read,
        }
    }
}

/// Named filters combined with AND.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<(String, HeaderFilter)>,
}

impl FilterSet {
    /// Adds `filter` under `name`, replacing any filter with that name.
    pub fn set(&mut self, name: &str, filter: HeaderFilter) {
        if let Some(slot) = self.filters.iter_mut().find(|(n, _)| n == name) {
            slot.1 = filter;
        } else {
            self.filters.push((name.to_string(), filter));
        }
    }

    /// Removes the filter called `name`, if any.
    pub fn remove(&mut self, name: &str) {
        self.filters.retain(|(n, _)| n != name);
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Whether every filter accepts `header`.
    #[must_use]
    pub fn accepts(&self, header: &Header) -> bool {
        self.filters.iter().all(|(_, f)| f.accepts(header))
    }

    /// Headers that pass every filter, in their original order.
    #[must_use]
    pub fn apply(&self, headers: &[Header]) -> Vec<Header> {
        headers
            .iter()
            .filter(|h| self.accepts(h))
            .cloned()
            .collect()
    }
}
