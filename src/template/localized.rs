use std::io::Write;
use std::sync::Arc;

use minijinja::{context, Value};
use serde::Serialize;

use super::view::{RenderError, View};
use crate::i18n::LocalizationStore;

/// A [`View`] with access to localized strings.
///
/// On execution the template context gets two extra entries on top of the
/// page data:
/// - `lang`: the request language
/// - `t(key)`: looks up `key` in the localization store for that language
pub struct LocalizedView {
    view: View,
    store: Arc<dyn LocalizationStore>,
}

impl LocalizedView {
    pub fn new(view: View, store: Arc<dyn LocalizationStore>) -> Self {
        Self { view, store }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Render with `data` in `lang`, writing the output to `w`.
    pub fn execute<S: Serialize, W: Write>(
        &self,
        lang: &str,
        data: &S,
        w: &mut W,
    ) -> Result<(), RenderError> {
        self.view.execute(self.context(lang, data), w)
    }

    /// Render with `data` in `lang` into a string.
    pub fn execute_to_string<S: Serialize>(&self, lang: &str, data: &S) -> Result<String, RenderError> {
        self.view.execute_to_string(self.context(lang, data))
    }

    fn context<S: Serialize>(&self, lang: &str, data: &S) -> Value {
        let store = Arc::clone(&self.store);
        let request_lang = lang.to_string();
        let t = Value::from_function(move |key: String| store.lookup(&request_lang, &key));

        context! {
            lang => lang,
            t => t,
            ..Value::from_serialize(data)
        }
    }
}

impl std::fmt::Debug for LocalizedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizedView").field("view", &self.view).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::DirectoryStore;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn store() -> Arc<dyn LocalizationStore> {
        let mut en = HashMap::new();
        en.insert("hello".to_string(), "Hello".to_string());
        let mut es = HashMap::new();
        es.insert("hello".to_string(), "Hola".to_string());

        let mut tables = HashMap::new();
        tables.insert("en".to_string(), en);
        tables.insert("es".to_string(), es);
        Arc::new(DirectoryStore::from_tables("en", tables).unwrap())
    }

    fn localized(dir: &TempDir, content: &str) -> LocalizedView {
        let path = dir.path().join("page.html");
        std::fs::write(&path, content).unwrap();
        LocalizedView::new(View::parse(&path, false).unwrap(), store())
    }

    #[test]
    fn test_lookup_uses_request_language() {
        let dir = TempDir::new().unwrap();
        let view = localized(&dir, "{{ t('hello') }}, {{ name }}");

        let data = json!({"name": "Ana"});
        assert_eq!(view.execute_to_string("en", &data).unwrap(), "Hello, Ana");
        assert_eq!(view.execute_to_string("es", &data).unwrap(), "Hola, Ana");
    }

    #[test]
    fn test_lang_is_exposed() {
        let dir = TempDir::new().unwrap();
        let view = localized(&dir, "<html lang=\"{{ lang }}\">");

        let out = view.execute_to_string("es", &json!({})).unwrap();
        assert_eq!(out, "<html lang=\"es\">");
    }

    #[test]
    fn test_execute_to_writer() {
        let dir = TempDir::new().unwrap();
        let view = localized(&dir, "{{ t('hello') }}");

        let mut buf = Vec::new();
        view.execute("es", &json!({}), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Hola");
    }
}
