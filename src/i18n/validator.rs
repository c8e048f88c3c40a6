//! Localization coverage validation.
//!
//! Compares every loaded language against the default language so gaps are
//! reported at startup instead of surfacing as silently-fallen-back strings.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::i18n::{DirectoryStore, LocalizationStore};

/// Validation report containing errors and warnings about localization tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys missing from a translation (the default value will be shown instead)
    pub errors: Vec<String>,

    /// Non-critical issues (unknown keys, placeholder drift)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Validator for localization coverage.
pub struct CoverageValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CoverageValidator {
    /// Check every non-default language in `store` against the default language.
    ///
    /// This function checks that:
    /// - every default key exists in the translation (error otherwise)
    /// - the translation defines no keys unknown to the default language
    /// - shared keys use the same `{placeholder}` names
    pub fn validate(store: &DirectoryStore) -> ValidationReport {
        let mut report = ValidationReport::default();
        let default_lang = store.default_lang();
        let default_keys = store.keys(default_lang).unwrap_or_default();

        for lang in store.languages() {
            if lang == default_lang {
                continue;
            }
            let keys = store.keys(lang).unwrap_or_default();

            for key in default_keys.difference(&keys) {
                report
                    .errors
                    .push(format!("[{}] missing key '{}'", lang, key));
            }
            for key in keys.difference(&default_keys) {
                report.warnings.push(format!(
                    "[{}] key '{}' is not defined for default language '{}'",
                    lang, key, default_lang
                ));
            }

            for key in keys.intersection(&default_keys) {
                let expected = Self::extract_placeholders(&store.lookup(default_lang, key));
                let actual = Self::extract_placeholders(&store.lookup(lang, key));
                if expected != actual {
                    report.warnings.push(format!(
                        "[{}] placeholder mismatch for '{}': expected {:?}, found {:?}",
                        lang, key, expected, actual
                    ));
                }
            }
        }

        report
    }

    /// Extract the set of `{name}` / `{0}` placeholders in a string
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
