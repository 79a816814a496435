use once_cell::sync::Lazy;
use regex::Regex;

static ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\u[0-9A-Fa-f]+").unwrap());

static TRAILING_NONWORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+$").unwrap());

static LEADING_HASHES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+").unwrap());

/// Keeps only printable basic-latin characters (U+0020 to U+007E).
///
/// Posts are serialized with their non-latin content escaped, so anything
/// outside this window is emoji or control noise rather than text.
pub fn retain_basic_latin(raw: &str) -> String {
    raw.chars().filter(|c| (' '..'\u{7f}').contains(c)).collect()
}

/// Cleans a raw text field and reports whether escaped unicode was present.
///
/// Escape sequences of the form `\u` followed by hex digits are stripped
/// outright rather than decoded. Remaining backslashes are dropped and
/// whitespace runs collapse to single spaces with the ends trimmed.
pub fn normalize(raw: &str) -> (String, bool) {
    if raw.is_empty() {
        return (String::new(), false);
    }

    // Double backslashes up front so multi-level escapes can't collapse into
    // new `\u` sequences while the strip below rewrites the text.
    let mut text = raw.replace('\\', "\\\\");

    let had_escape = ESCAPE_REGEX.is_match(&text);
    if had_escape {
        text = ESCAPE_REGEX.replace_all(&text, "").into_owned();
    }

    // Leftover backslashes are artifacts of the doubling, not content.
    text = text.replace('\\', "");

    // Collapse last: deleting escape runs and backslash-only tokens leaves
    // whitespace gaps behind.
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");

    (clean, had_escape)
}

/// True iff the string is empty after trimming.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// True iff every whitespace-delimited token consists entirely of ASCII
/// punctuation. A string with no tokens counts as punctuation-only.
pub fn is_only_punctuation(text: &str) -> bool {
    text.split_whitespace()
        .all(|token| token.chars().all(|c| c.is_ascii_punctuation()))
}

/// Extracts the set of hashtags from cleaned text.
///
/// Tokens starting with `#` are normalized by stripping trailing non-word
/// characters and collapsing a leading run of `#` to one. Tokens with no
/// content left beyond the `#` are dropped.
pub fn extract_hashtags(text: &str) -> rustc_hash::FxHashSet<String> {
    text.split_whitespace()
        .filter(|token| token.starts_with('#'))
        .map(|token| {
            let stripped = TRAILING_NONWORD_REGEX.replace(token, "");
            LEADING_HASHES_REGEX.replace(&stripped, "#").into_owned()
        })
        .filter(|tag| tag.len() > 1)
        .collect()
}
