//! Views: templates bound to a file on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use minijinja::{path_loader, Environment};
use serde::Serialize;
use thiserror::Error;

/// Error type for template loading and execution.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template file could not be read.
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template file has a syntax error.
    #[error("failed to parse template {path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// Execution failed (undefined filter, type mismatch, include failure, ...).
    #[error("failed to execute template {name}: {source}")]
    Execute {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// A compiled template bound to a file.
///
/// With `hot_reload` off the file is parsed once and the compiled template is
/// kept for the lifetime of the view. With `hot_reload` on, every execution
/// re-reads and re-parses the file so edits show up without a restart.
pub struct View {
    path: PathBuf,
    name: String,
    cached: Option<Environment<'static>>,
}

impl View {
    /// Parse the template at `path`.
    ///
    /// The file is always parsed once here, so a broken template is reported
    /// at startup even in hot-reload mode. `{% include %}` and `{% extends %}`
    /// resolve relative to the file's directory.
    pub fn parse(path: impl AsRef<Path>, hot_reload: bool) -> Result<Self, RenderError> {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let env = compile(&path, &name)?;
        Ok(Self {
            path,
            name,
            cached: (!hot_reload).then_some(env),
        })
    }

    pub fn is_hot_reload(&self) -> bool {
        self.cached.is_none()
    }

    /// Render the view with `ctx`, writing the output to `w`.
    pub fn execute<S: Serialize, W: Write>(&self, ctx: S, w: &mut W) -> Result<(), RenderError> {
        match &self.cached {
            Some(env) => self.render_into(env, ctx, w),
            None => self.render_into(&compile(&self.path, &self.name)?, ctx, w),
        }
    }

    /// Render the view with `ctx` into a string.
    pub fn execute_to_string<S: Serialize>(&self, ctx: S) -> Result<String, RenderError> {
        match &self.cached {
            Some(env) => self.render(env, ctx),
            None => self.render(&compile(&self.path, &self.name)?, ctx),
        }
    }

    fn render<S: Serialize>(&self, env: &Environment<'static>, ctx: S) -> Result<String, RenderError> {
        env.get_template(&self.name)
            .and_then(|t| t.render(ctx))
            .map_err(|source| self.execute_error(source))
    }

    fn render_into<S: Serialize, W: Write>(
        &self,
        env: &Environment<'static>,
        ctx: S,
        w: &mut W,
    ) -> Result<(), RenderError> {
        env.get_template(&self.name)
            .and_then(|t| t.render_captured_to(ctx, w).map(|_| ()))
            .map_err(|source| self.execute_error(source))
    }

    fn execute_error(&self, source: minijinja::Error) -> RenderError {
        RenderError::Execute {
            name: self.name.clone(),
            source,
        }
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("path", &self.path)
            .field("hot_reload", &self.is_hot_reload())
            .finish()
    }
}

/// Read and compile a template file into a fresh environment.
///
/// The template is registered under its file name, so `.html` files get HTML
/// auto-escaping.
fn compile(path: &Path, name: &str) -> Result<Environment<'static>, RenderError> {
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut env = Environment::new();
    if let Some(dir) = path.parent() {
        env.set_loader(path_loader(dir));
    }
    env.add_template_owned(name.to_string(), source)
        .map_err(|source| RenderError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    // ==================== Parse Tests ====================

    #[test]
    fn test_parse_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = View::parse(dir.path().join("missing.html"), false);
        assert!(matches!(result, Err(RenderError::Io { .. })));
    }

    #[test]
    fn test_parse_syntax_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.html", "{% if %}");

        let result = View::parse(&path, false);
        assert!(matches!(result, Err(RenderError::Syntax { .. })));
    }

    #[test]
    fn test_parse_syntax_error_reported_in_hot_reload_mode() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.html", "{{ unclosed ");
        assert!(View::parse(&path, true).is_err());
    }

    // ==================== Execute Tests ====================

    #[test]
    fn test_execute_to_string() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "hello.html", "Hello, {{ name }}!");

        let view = View::parse(&path, false).unwrap();
        let out = view.execute_to_string(json!({"name": "World"})).unwrap();
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn test_execute_to_writer() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "hello.html", "<p>{{ n }}</p>");

        let view = View::parse(&path, false).unwrap();
        let mut buf = Vec::new();
        view.execute(json!({"n": 3}), &mut buf).unwrap();
        assert_eq!(buf, b"<p>3</p>");
    }

    #[test]
    fn test_html_templates_escape_values() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.html", "{{ raw }}|{{ raw|safe }}");

        let view = View::parse(&path, false).unwrap();
        let out = view.execute_to_string(json!({"raw": "<b>"})).unwrap();
        assert_eq!(out, "&lt;b&gt;|<b>");
    }

    #[test]
    fn test_include_resolves_relative_to_template_dir() {
        let dir = TempDir::new().unwrap();
        write(&dir, "footer.html", "footer");
        let path = write(&dir, "page.html", "body {% include 'footer.html' %}");

        let view = View::parse(&path, false).unwrap();
        assert_eq!(view.execute_to_string(json!({})).unwrap(), "body footer");
    }

    #[test]
    fn test_execute_failure() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.html", "{{ value|no_such_filter }}");

        // Unknown filters are only detected when the template runs
        let view = View::parse(&path, false).unwrap();
        let result = view.execute_to_string(json!({"value": 1}));
        assert!(matches!(result, Err(RenderError::Execute { .. })));
    }

    // ==================== Reload Tests ====================

    #[test]
    fn test_cached_view_ignores_file_changes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.html", "v1");

        let view = View::parse(&path, false).unwrap();
        write(&dir, "page.html", "v2");

        assert!(!view.is_hot_reload());
        assert_eq!(view.execute_to_string(json!({})).unwrap(), "v1");
    }

    #[test]
    fn test_hot_reload_view_sees_file_changes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "page.html", "v1");

        let view = View::parse(&path, true).unwrap();
        assert_eq!(view.execute_to_string(json!({})).unwrap(), "v1");

        write(&dir, "page.html", "v2");
        assert!(view.is_hot_reload());
        assert_eq!(view.execute_to_string(json!({})).unwrap(), "v2");
    }
}
