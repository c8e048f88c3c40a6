//! Internationalization (i18n) module for localized pages.
//!
//! # Architecture
//!
//! - `store`: Localization tables loaded once from `<lang>.json` files
//! - `language`: Request language negotiation against the loaded tables
//! - `format`: Positional and named placeholder substitution
//! - `validator`: Startup coverage checks between languages
//!
//! # Example
//!
//! ```rust,ignore
//! use page_render::i18n::{DirectoryStore, LocalizationStore};
//!
//! let store = DirectoryStore::load("localization/langs", "en")?;
//! let title = store.lookup("es", "home");
//! ```

mod format;
mod language;
mod store;
mod validator;

pub use format::{format_named, format_positional};
pub use language::negotiate;
pub use store::{DirectoryStore, LocalizationStore, StoreError};
pub use validator::{CoverageValidator, ValidationReport};
