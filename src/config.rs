use anyhow::{bail, Context, Result};

/// Flags that change how pages are rendered and how failures are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Re-read and re-parse template files on every render (development only)
    pub reload_views_on_refresh: bool,

    /// Log requests classified as "not found"
    pub log_404: bool,

    /// Turn unexpected failures into a fault instead of an error page (development only)
    pub panic_on_unexpected_error: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Assets
    pub template_dir: String,
    pub i18n_dir: String,
    pub default_lang: String,

    // Server
    pub port: u16,

    // Rendering
    pub render: RenderConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            template_dir: std::env::var("TEMPLATE_DIR")
                .unwrap_or_else(|_| "templates".to_string()),
            i18n_dir: std::env::var("I18N_DIR")
                .unwrap_or_else(|_| "localization/langs".to_string()),
            default_lang: std::env::var("DEFAULT_LANG").unwrap_or_else(|_| "en".to_string()),

            port: match std::env::var("PORT") {
                Ok(v) => v
                    .parse()
                    .with_context(|| format!("PORT is not a valid port number: {}", v))?,
                Err(_) => 8080,
            },

            render: RenderConfig {
                reload_views_on_refresh: bool_var("RELOAD_VIEWS_ON_REFRESH", false)?,
                log_404: bool_var("LOG_404", true)?,
                panic_on_unexpected_error: bool_var("PANIC_ON_UNEXPECTED_ERROR", false)?,
            },
        })
    }
}

/// Read a boolean flag from the environment, falling back to `default` when unset.
fn bool_var(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(v) => parse_bool(&v).with_context(|| format!("{} is not a valid boolean", name)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized boolean '{}'", other),
    }
}
