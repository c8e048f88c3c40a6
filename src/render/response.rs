//! Response sinks the render manager writes pages into.

use std::borrow::Cow;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Content type of every rendered page
pub const HTML_UTF8: &str = "text/html; charset=utf-8";

/// The part of an HTTP response the render manager needs.
pub trait ResponseSink {
    fn set_status(&mut self, status: StatusCode);
    fn set_content_type(&mut self, mime: &str);
    fn write(&mut self, bytes: &[u8]);
}

/// Adapts a [`ResponseSink`] to [`std::io::Write`] so templates can stream into it.
pub(crate) struct SinkWriter<'a, R: ResponseSink + ?Sized> {
    sink: &'a mut R,
}

impl<'a, R: ResponseSink + ?Sized> SinkWriter<'a, R> {
    pub(crate) fn new(sink: &'a mut R) -> Self {
        Self { sink }
    }
}

impl<R: ResponseSink + ?Sized> std::io::Write for SinkWriter<'_, R> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !buf.is_empty() {
            self.sink.write(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// In-memory response, converted into an axum [`Response`] by the handler.
///
/// Status defaults to 200 when never set.
#[derive(Debug, Default, Clone)]
pub struct HtmlResponse {
    status: Option<StatusCode>,
    content_type: Option<String>,
    body: Vec<u8>,
    writes: usize,
}

impl HtmlResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status explicitly set on this response, if any
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Number of `write` calls received
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl ResponseSink for HtmlResponse {
    fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn set_content_type(&mut self, mime: &str) {
        self.content_type = Some(mime.to_string());
    }

    fn write(&mut self, bytes: &[u8]) {
        self.writes += 1;
        self.body.extend_from_slice(bytes);
    }
}

impl IntoResponse for HtmlResponse {
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or(StatusCode::OK);
        let mut response = (status, self.body).into_response();
        if let Some(value) = self
            .content_type
            .and_then(|ct| HeaderValue::from_str(&ct).ok())
        {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_html_response_records_writes() {
        let mut response = HtmlResponse::new();
        response.set_content_type(HTML_UTF8);
        response.write(b"<p>");
        response.write(b"hi</p>");

        assert_eq!(response.status(), None);
        assert_eq!(response.content_type(), Some(HTML_UTF8));
        assert_eq!(response.body_str(), "<p>hi</p>");
        assert_eq!(response.write_count(), 2);
    }

    #[test]
    fn test_sink_writer_skips_empty_chunks() {
        let mut response = HtmlResponse::new();
        {
            let mut writer = SinkWriter::new(&mut response);
            writer.write_all(b"").unwrap();
            writer.write_all(b"abc").unwrap();
        }
        assert_eq!(response.write_count(), 1);
        assert_eq!(response.body(), b"abc");
    }

    #[test]
    fn test_into_response_defaults_to_ok() {
        let mut html = HtmlResponse::new();
        html.set_content_type(HTML_UTF8);

        let response = html.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            HTML_UTF8
        );
    }

    #[test]
    fn test_into_response_keeps_status() {
        let mut html = HtmlResponse::new();
        html.set_status(StatusCode::NOT_FOUND);

        assert_eq!(html.into_response().status(), StatusCode::NOT_FOUND);
    }
}
