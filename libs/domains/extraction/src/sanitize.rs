//! Input sanitization for raw job-description text.

use regex::Regex;
use std::sync::OnceLock;

/// Maximum text length (in characters) sent to the extraction model.
pub const MAX_TEXT_LEN: usize = 10_000;

/// Minimum text length (in characters) after sanitization; shorter inputs
/// are rejected as validation failures.
pub const MIN_TEXT_LEN: usize = 100;

fn markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup regex is valid"))
}

/// Sanitize raw job-description text.
///
/// - HTML/markup tags are replaced with spaces
/// - control characters are dropped
/// - whitespace runs (including newlines) collapse to single spaces
/// - the result is truncated to `MAX_TEXT_LEN` characters
pub fn sanitize_text(raw: &str) -> String {
    let without_markup = markup_re().replace_all(raw, " ");

    let without_control: String = without_markup
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    let collapsed = without_control
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.chars().count() > MAX_TEXT_LEN {
        collapsed.chars().take(MAX_TEXT_LEN).collect()
    } else {
        collapsed
    }
}
