//! Request language negotiation.
//!
//! Picks the language a page is rendered in from what the client asked for,
//! restricted to the languages the store actually has.

use crate::i18n::LocalizationStore;

/// Resolve the language for a request.
///
/// Order of preference:
/// 1. an explicit `requested` code (e.g. a `?lang=` query parameter)
/// 2. the first supported tag of an `Accept-Language` header, by quality
/// 3. the store's default language
pub fn negotiate(
    store: &dyn LocalizationStore,
    requested: Option<&str>,
    accept_language: Option<&str>,
) -> String {
    if let Some(code) = requested.and_then(|r| supported(store, r)) {
        return code;
    }

    if let Some(header) = accept_language {
        for tag in parse_accept_language(header) {
            if let Some(code) = supported(store, &tag) {
                return code;
            }
        }
    }

    store.default_lang().to_string()
}

/// Match a language tag against the store, trying the primary subtag too ("es-PE" → "es").
fn supported(store: &dyn LocalizationStore, tag: &str) -> Option<String> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() {
        return None;
    }
    if store.has_language(&tag) {
        return Some(tag);
    }
    let primary = tag.split(['-', '_']).next()?;
    store.has_language(primary).then(|| primary.to_string())
}

/// Parse an `Accept-Language` header into tags ordered by descending quality.
fn parse_accept_language(header: &str) -> Vec<String> {
    let mut tags: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then(|| (tag.to_string(), quality))
        })
        .collect();

    // Stable sort keeps header order among equal weights
    tags.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    tags.into_iter().map(|(tag, _)| tag).collect()
}
