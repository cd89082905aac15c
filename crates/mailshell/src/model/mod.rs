//! Data models for the shells.

mod compose;
mod filter;
mod list;
mod nav;

pub use compose::{ComposeState, SendKind, prefixed_subject, quote_body, split_addresses};
pub use filter::{FilterSet, HeaderField, HeaderFilter, QUICK_FILTER, UNREAD_FILTER};
pub use list::{ListModel, ModelChange};
pub use nav::{DEFAULT_FOLDER, NavContext, Page};
