use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use axum::http::{StatusCode, Uri};
use tracing::{error, info, warn};

use super::page::{ErrorPageData, MasterPageData};
use super::response::{ResponseSink, SinkWriter, HTML_UTF8};
use super::{RenderFault, StartupError};
use crate::config::RenderConfig;
use crate::i18n::{self, CoverageValidator, DirectoryStore, LocalizationStore};
use crate::template::{LocalizedView, RenderError, View};

const MASTER_TEMPLATE: &str = "master.html";
const ERROR_TEMPLATE: &str = "error.html";
const ERROR_PAGE_TITLE: &str = "Error";
const SITE_NAME_KEY: &str = "_siteName";
const NOT_FOUND_KEY: &str = "resourceNotFound";

/// Printed to stdout before a dev-mode escalation so it can be told apart from a real crash
pub const DEV_ESCALATION_MARKER: &str = "🙉 This message only appears in dev mode.";

/// Outcome of inspecting an [`ErrorPageData`] before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The caller anticipated the failure; nothing is changed.
    Expected,
    /// A lookup found no rows: rendered as a localized 404.
    NotFound,
    /// Anything else: rendered as a 500 (or escalated in dev mode).
    Internal,
}

impl Classification {
    /// Status the manager sets for this classification, if any.
    pub fn status(self) -> Option<StatusCode> {
        match self {
            Classification::Expected => None,
            Classification::NotFound => Some(StatusCode::NOT_FOUND),
            Classification::Internal => Some(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

/// Composes localized pages from the master layout and renders error pages.
///
/// Created once at startup and shared (behind an `Arc`) by every request.
/// Apart from the dev-mode template reload, its state is read-only.
pub struct RenderManager {
    dir: PathBuf,
    config: RenderConfig,
    store: Arc<dyn LocalizationStore>,
    master_view: LocalizedView,
    error_view: LocalizedView,
}

impl RenderManager {
    /// Load localization from `i18n_dir` and the master/error templates from `template_dir`.
    ///
    /// # Errors
    /// Any failure here means the server must not start: unreadable or invalid
    /// localization files, or a missing or unparsable `master.html` / `error.html`.
    pub fn create(
        template_dir: impl Into<PathBuf>,
        i18n_dir: impl AsRef<Path>,
        default_lang: &str,
        config: RenderConfig,
    ) -> Result<Self, StartupError> {
        let store = DirectoryStore::load(i18n_dir, default_lang)?;

        let report = CoverageValidator::validate(&store);
        if report.has_errors() {
            warn!(
                "{} localized strings fall back to '{}'",
                report.errors.len(),
                default_lang
            );
        }
        for missing in &report.errors {
            warn!("Localization gap: {}", missing);
        }
        for warning in &report.warnings {
            warn!("Localization: {}", warning);
        }

        Self::with_store(template_dir, Arc::new(store), config)
    }

    /// Same as [`create`](Self::create) with an already loaded store.
    pub fn with_store(
        template_dir: impl Into<PathBuf>,
        store: Arc<dyn LocalizationStore>,
        config: RenderConfig,
    ) -> Result<Self, StartupError> {
        if config.reload_views_on_refresh {
            warn!("⚠️ View dev mode is on: templates are re-parsed on every render");
        }

        let dir = template_dir.into();
        let master_view = parse_localized(&dir, MASTER_TEMPLATE, &store, config)?;
        let error_view = parse_localized(&dir, ERROR_TEMPLATE, &store, config)?;

        info!("✓ Templates loaded from {}", dir.display());

        Ok(Self {
            dir,
            config,
            store,
            master_view,
            error_view,
        })
    }

    pub fn store(&self) -> &dyn LocalizationStore {
        self.store.as_ref()
    }

    /// Parse a page template under the template root, with localized lookups.
    pub fn parse_localized_view(&self, relative_path: &str) -> Result<LocalizedView, RenderError> {
        parse_localized(&self.dir, relative_path, &self.store, self.config)
    }

    /// Parse a plain page template under the template root.
    pub fn parse_view(&self, relative_path: &str) -> Result<View, RenderError> {
        View::parse(self.dir.join(relative_path), self.config.reload_views_on_refresh)
    }

    // ==================== Success Path ====================

    /// Render `data` into the master layout and write it to `sink`.
    pub fn complete<R: ResponseSink + ?Sized>(
        &self,
        lang: &str,
        data: MasterPageData,
        sink: &mut R,
    ) -> Result<(), RenderFault> {
        sink.set_content_type(HTML_UTF8);

        let mut writer = SinkWriter::new(sink);
        self.master_view.execute(lang, &data, &mut writer)?;
        Ok(())
    }

    /// Write an already rendered document to `sink`.
    pub fn complete_with_content<R: ResponseSink + ?Sized>(&self, content: &[u8], sink: &mut R) {
        sink.set_content_type(HTML_UTF8);
        sink.write(content);
    }

    // ==================== Failure Path ====================

    /// Render an error page for `data`.
    ///
    /// Unexpected errors are classified first (404 for "no rows", 500 for the
    /// rest). Only then, if the result is still an internal error and dev-mode
    /// escalation is enabled, a [`RenderFault::DevEscalation`] is returned
    /// without touching `sink`.
    pub fn fail<R: ResponseSink + ?Sized>(
        &self,
        uri: &Uri,
        lang: &str,
        mut data: ErrorPageData,
        sink: &mut R,
    ) -> Result<(), RenderFault> {
        let classification = self.classify(uri, lang, &mut data);

        if classification == Classification::Internal && self.config.panic_on_unexpected_error {
            write_escalation_marker(&mut std::io::stdout().lock());
            let error = match data.error.take() {
                Some(error) => error,
                None => anyhow!(data.message),
            };
            return Err(RenderFault::DevEscalation(error));
        }

        if let Some(status) = classification.status() {
            sink.set_status(status);
        }

        let error_html = self.error_view.execute_to_string(lang, &data)?;
        self.complete(lang, MasterPageData::new(ERROR_PAGE_TITLE, error_html), sink)
    }

    /// Decide how an error page is reported, updating `data.message` for unexpected errors.
    pub fn classify(&self, uri: &Uri, lang: &str, data: &mut ErrorPageData) -> Classification {
        if data.expected {
            return Classification::Expected;
        }

        if data.error.as_ref().is_some_and(is_no_rows) {
            data.message = self.localized_string(lang, NOT_FOUND_KEY);
            if self.config.log_404 {
                info!(target: "not_found", url = %uri, "resource not found");
            }
            return Classification::NotFound;
        }

        if let Some(err) = &data.error {
            data.message = err.to_string();
        }
        error!(msg = %data.message, "fatal-error");
        Classification::Internal
    }

    // ==================== Localization ====================

    pub fn localized_string(&self, lang: &str, key: &str) -> String {
        self.store.lookup(lang, key)
    }

    /// `s` followed by the localized site name, e.g. "Home - Triton".
    pub fn page_title(&self, lang: &str, s: &str) -> String {
        format!("{} - {}", s, self.localized_string(lang, SITE_NAME_KEY))
    }

    pub fn localized_page_title(&self, lang: &str, key: &str) -> String {
        self.page_title(lang, &self.localized_string(lang, key))
    }

    /// Look up `key` and substitute `{0}`, `{1}`, ... with `args`.
    pub fn format_localized_string(&self, lang: &str, key: &str, args: &[&dyn Display]) -> String {
        i18n::format_positional(&self.localized_string(lang, key), args)
    }

    /// Look up `key` and substitute `{name}` placeholders with `args`.
    pub fn format_localized_string_named(
        &self,
        lang: &str,
        key: &str,
        args: &[(&str, &dyn Display)],
    ) -> String {
        i18n::format_named(&self.localized_string(lang, key), args)
    }
}

fn parse_localized(
    dir: &Path,
    relative_path: &str,
    store: &Arc<dyn LocalizationStore>,
    config: RenderConfig,
) -> Result<LocalizedView, RenderError> {
    let view = View::parse(dir.join(relative_path), config.reload_views_on_refresh)?;
    Ok(LocalizedView::new(view, Arc::clone(store)))
}

fn write_escalation_marker<W: Write>(out: &mut W) {
    let _ = writeln!(out, "{}", DEV_ESCALATION_MARKER);
}

/// Whether the error (or anything in its cause chain) is the "no rows" sentinel.
fn is_no_rows(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<sqlx::Error>(), Some(sqlx::Error::RowNotFound)))
}
