//! Placeholder substitution for localized strings.
//!
//! Localized strings use `{0}`, `{1}` for positional arguments and `{name}`
//! for named ones. Placeholders without a matching argument are left as-is.

use regex::{Captures, Regex};
use std::fmt::Display;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap())
}

/// Replace `{0}`, `{1}`, ... with the matching entry of `args`.
pub fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map(|arg| arg.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace `{name}` placeholders with the value paired with `name` in `args`.
pub fn format_named(template: &str, args: &[(&str, &dyn Display)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
