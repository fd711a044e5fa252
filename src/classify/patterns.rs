//! Compiled patterns used by artifact extraction.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::KEYWORD_CONTEXT_CHARS;

const EMAIL_PATTERN: &str = r"[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*";
const URL_PATTERN: &str =
    r"[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_\+.~#?&/=]*)?";
const IPV4_WITH_PORT_PATTERN: &str = r"\b[0-9]{1,3}(?:\.[0-9]{1,3}){3}(?::[0-9]{1,5})?\b";
// e.g. package names or version strings such as org.sonatype.sisu or 3.0.0
const DOTTED_NAME_PATTERN: &str = r"(\w+)\.(\w+)\.\w*";

/// Words whose surrounding text tends to carry credentials, contact or
/// payment details.
pub const INTERESTING_KEYWORDS: &[&str] = &[
    "app", "domain", "referrer", "referer", "url", "phone", "address", "email", "transfer",
    "balance", "payment", "user", "username", "password", "token", "chat", "message", "secret",
];

/// Helper function to compile a static regex pattern, panicking with a detailed error
/// message if compilation fails. Only used for compile-time constant patterns.
fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

pub(crate) static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(EMAIL_PATTERN, "EMAIL_RE"));
pub(crate) static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(URL_PATTERN, "URL_RE"));
pub(crate) static IPV4_WITH_PORT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(IPV4_WITH_PORT_PATTERN, "IPV4_WITH_PORT_RE"));
pub(crate) static DOTTED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(DOTTED_NAME_PATTERN, "DOTTED_NAME_RE"));

/// One case-insensitive pattern per keyword: the keyword followed by up to
/// `KEYWORD_CONTEXT_CHARS` characters on the same line.
pub(crate) static KEYWORD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    INTERESTING_KEYWORDS
        .iter()
        .map(|word| {
            let pattern = format!(
                "(?i)({}).{{1,{}}}",
                regex::escape(word),
                KEYWORD_CONTEXT_CHARS
            );
            compile_regex_unsafe(&pattern, "KEYWORD_RES")
        })
        .collect()
});
