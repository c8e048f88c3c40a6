//! Localization store: immutable (language, key) → string tables.
//!
//! Tables are loaded once at startup from a directory holding one flat JSON
//! object per language (`en.json`, `es.json`, ...). After loading the store is
//! never mutated, so it can be shared across request tasks without locking.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Read access to localized strings.
///
/// Lookups never fail: a missing key resolves to a fallback (usually the
/// default language's value, otherwise an empty string).
pub trait LocalizationStore: Send + Sync {
    /// Get the localized value of `key` in `lang`.
    fn lookup(&self, lang: &str, key: &str) -> String;

    /// The language used when a request language or key is unavailable.
    fn default_lang(&self) -> &str;

    /// Whether strings were loaded for `code`.
    fn has_language(&self, code: &str) -> bool;
}

/// Errors raised while loading localization files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read localization directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read localization file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid localization file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no localization file found for default language '{0}'")]
    MissingDefault(String),
}

/// Localization tables loaded from a directory of `<lang>.json` files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    default_lang: String,
    tables: HashMap<String, HashMap<String, String>>,
}

impl DirectoryStore {
    /// Load every `*.json` file in `dir`; the file stem is the language code.
    ///
    /// # Errors
    /// Fails if the directory or a file cannot be read, a file is not a flat
    /// string-to-string JSON object, or there is no file for `default_lang`.
    pub fn load(dir: impl AsRef<Path>, default_lang: &str) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| StoreError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut tables = HashMap::new();
        for entry in entries {
            let path = entry
                .map_err(|source| StoreError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let lang = lang.to_string();

            let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let table: HashMap<String, String> = serde_json::from_str(&raw)
                .map_err(|source| StoreError::Parse { path: path.clone(), source })?;

            debug!("Loaded {} strings for '{}'", table.len(), lang);
            tables.insert(lang, table);
        }

        let store = Self::from_tables(default_lang, tables)?;
        info!(
            "Loaded localization for {} language(s) from {}",
            store.tables.len(),
            dir.display()
        );
        Ok(store)
    }

    /// Build a store from in-memory tables.
    pub fn from_tables(
        default_lang: &str,
        tables: HashMap<String, HashMap<String, String>>,
    ) -> Result<Self, StoreError> {
        if !tables.contains_key(default_lang) {
            return Err(StoreError::MissingDefault(default_lang.to_string()));
        }
        Ok(Self {
            default_lang: default_lang.to_string(),
            tables,
        })
    }

    /// All loaded language codes, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }

    /// Keys defined for `lang`, or `None` if the language is not loaded.
    pub fn keys(&self, lang: &str) -> Option<BTreeSet<&str>> {
        self.tables
            .get(lang)
            .map(|table| table.keys().map(String::as_str).collect())
    }
}

impl LocalizationStore for DirectoryStore {
    fn lookup(&self, lang: &str, key: &str) -> String {
        if let Some(value) = self.tables.get(lang).and_then(|t| t.get(key)) {
            return value.clone();
        }

        match self.tables.get(&self.default_lang).and_then(|t| t.get(key)) {
            Some(value) => value.clone(),
            None => {
                debug!(lang, key, "missing localized string");
                String::new()
            }
        }
    }

    fn default_lang(&self) -> &str {
        &self.default_lang
    }

    fn has_language(&self, code: &str) -> bool {
        self.tables.contains_key(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_lang(dir: &TempDir, lang: &str, json: &str) {
        std::fs::write(dir.path().join(format!("{}.json", lang)), json).unwrap();
    }

    fn sample_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_lang(
            &dir,
            "en",
            r#"{"_siteName": "Triton", "home": "Home", "resourceNotFound": "Not found"}"#,
        );
        write_lang(&dir, "es", r#"{"_siteName": "Tritón", "home": "Inicio"}"#);
        dir
    }

    // ==================== Loading Tests ====================

    #[test]
    fn test_load_directory() {
        let dir = sample_dir();
        let store = DirectoryStore::load(dir.path(), "en").expect("should load");

        assert_eq!(store.languages(), vec!["en", "es"]);
        assert_eq!(store.default_lang(), "en");
        assert!(store.has_language("es"));
        assert!(!store.has_language("fr"));
    }

    #[test]
    fn test_load_ignores_non_json_files() {
        let dir = sample_dir();
        std::fs::write(dir.path().join("README.md"), "# strings").unwrap();

        let store = DirectoryStore::load(dir.path(), "en").unwrap();
        assert_eq!(store.languages().len(), 2);
    }

    #[test]
    fn test_load_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = DirectoryStore::load(dir.path().join("nope"), "en");
        assert!(matches!(result, Err(StoreError::ReadDir { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = sample_dir();
        write_lang(&dir, "fr", r#"{"home": 42}"#);

        let result = DirectoryStore::load(dir.path(), "en");
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_load_without_default_language() {
        let dir = sample_dir();
        let result = DirectoryStore::load(dir.path(), "de");

        let err = result.unwrap_err();
        assert!(matches!(err, StoreError::MissingDefault(_)));
        assert!(err.to_string().contains("'de'"));
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_lookup_exact() {
        let store = DirectoryStore::load(sample_dir().path(), "en").unwrap();
        assert_eq!(store.lookup("en", "home"), "Home");
        assert_eq!(store.lookup("es", "home"), "Inicio");
    }

    #[test]
    fn test_lookup_falls_back_to_default_language_for_missing_key() {
        let store = DirectoryStore::load(sample_dir().path(), "en").unwrap();
        assert_eq!(store.lookup("es", "resourceNotFound"), "Not found");
    }

    #[test]
    fn test_lookup_unknown_language_uses_default() {
        let store = DirectoryStore::load(sample_dir().path(), "en").unwrap();
        assert_eq!(store.lookup("ja", "home"), "Home");
    }

    #[test]
    fn test_lookup_unknown_key_is_empty() {
        let store = DirectoryStore::load(sample_dir().path(), "en").unwrap();
        assert_eq!(store.lookup("en", "doesNotExist"), "");
    }

    #[test]
    fn test_keys() {
        let store = DirectoryStore::load(sample_dir().path(), "en").unwrap();
        let keys = store.keys("es").unwrap();
        assert!(keys.contains("home"));
        assert!(!keys.contains("resourceNotFound"));
        assert!(store.keys("fr").is_none());
    }
}
