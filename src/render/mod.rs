//! Page composition and error-page rendering.
//!
//! - `manager`: [`RenderManager`], the entry point used by page handlers
//! - `page`: master layout and error page data
//! - `response`: the [`ResponseSink`] the manager writes into

mod manager;
mod page;
mod response;

pub use manager::{Classification, RenderManager, DEV_ESCALATION_MARKER};
pub use page::{ErrorPageData, MasterPageData};
pub use response::{HtmlResponse, ResponseSink, HTML_UTF8};

use thiserror::Error;

use crate::i18n::StoreError;
use crate::template::RenderError;

/// Failure while building a [`RenderManager`]. The server must not start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load localization: {0}")]
    Localization(#[from] StoreError),

    #[error("failed to load template: {0}")]
    Template(#[from] RenderError),
}

/// A request-time failure that cannot be turned into an error page.
#[derive(Debug, Error)]
pub enum RenderFault {
    /// A template failed to execute (mismatched data or a broken template).
    #[error("page rendering failed: {0}")]
    Render(#[from] RenderError),

    /// An unexpected error escalated because dev-mode escalation is on.
    #[error("unexpected error (dev mode): {0}")]
    DevEscalation(anyhow::Error),
}
