use serde::Serialize;

/// Data for the master layout that wraps every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterPageData {
    /// Document title
    pub title: String,

    /// Pre-rendered inner HTML (trusted, inserted without escaping)
    pub content: String,

    /// Extra markup for `<head>` (stylesheets, meta tags)
    pub header: String,

    /// Extra markup before `</body>` (script tags)
    pub scripts: String,
}

impl MasterPageData {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Data for the error page.
///
/// `error` is never exposed to templates; only the render manager inspects it
/// to decide between a 404 and a 500 page.
#[derive(Debug, Default, Serialize)]
pub struct ErrorPageData {
    /// Whether the caller anticipated this failure (and set the status itself)
    pub expected: bool,

    #[serde(skip)]
    pub error: Option<anyhow::Error>,

    /// Text shown to the user; replaced during classification of unexpected errors
    pub message: String,
}

impl ErrorPageData {
    /// An anticipated failure with a user-facing message.
    pub fn expected(message: impl Into<String>) -> Self {
        Self {
            expected: true,
            error: None,
            message: message.into(),
        }
    }

    /// A failure the handler did not anticipate.
    pub fn unexpected(error: impl Into<anyhow::Error>) -> Self {
        Self {
            expected: false,
            error: Some(error.into()),
            message: String::new(),
        }
    }
}
