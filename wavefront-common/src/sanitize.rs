//! Metric name sanitization.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Characters outside this set are not valid in Wavefront metric names.
static INVALID_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_.\-~]").expect("invalid regex"));

/// Replaces every character that is invalid in a Wavefront metric name with
/// an underscore.
///
/// Valid characters are ASCII alphanumerics, `_`, `.`, `-` and `~`. The
/// replacement is idempotent: sanitizing an already sanitized name returns it
/// unchanged, without allocating.
pub fn sanitize_name(name: &str) -> Cow<'_, str> {
    INVALID_NAME_CHARS.replace_all(name, "_")
}
