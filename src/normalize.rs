//! Deterministic cleanup of extracted document text.
//!
//! Text pulled out of HTML and PDFs arrives with ragged whitespace, words
//! hyphenated across line wraps, decimal numbers split around the period, and
//! mojibake left over from mis-decoded editor output. [`clean_text`] repairs
//! all of that in one pass and is idempotent: cleaning already-clean text is
//! a no-op, so the fetch layers can apply it unconditionally.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static RE_HYPHEN_WRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)-\s+(\w)").unwrap());
static RE_SPLIT_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*\.\s*(\d+)").unwrap());

/// Byte sequences produced by decoding UTF-8 punctuation as Windows-1252,
/// paired with their intended characters. Longer sequences come first so the
/// bare right-quote artifact does not clobber the others.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€™", "'"),
    ("â€œ", "\""),
    ("â€\u{9d}", "\""),
    ("â€“", "-"),
    ("â€”", "--"),
    ("â€", "\""),
];

/// Clean extracted text: normalize whitespace, repair wrap artifacts, fix
/// mojibake, and drop non-printable characters.
///
/// The steps run in a fixed order:
/// 1. Substitute known mojibake sequences
/// 2. Strip non-printable characters (newline and tab survive)
/// 3. Collapse runs of spaces and tabs to a single space
/// 4. Collapse runs of blank lines to at most one blank line
/// 5. Rejoin words hyphenated across a line wrap
/// 6. Rejoin decimal numbers split around the period
/// 7. Trim leading/trailing whitespace
///
/// Mojibake substitution and the non-printable sweep run before whitespace
/// collapsing: both can remove characters, and a removal between two spaces
/// must still leave a single space behind. Empty input yields an empty
/// string. The transform is idempotent.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut text = text.to_string();
    for (broken, fixed) in MOJIBAKE {
        if text.contains(broken) {
            text = text.replace(broken, fixed);
        }
    }

    let text: String = text
        .chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect();

    let text = RE_SPACES.replace_all(&text, " ");
    let text = RE_BLANK_LINES.replace_all(&text, "\n\n");
    let text = replace_to_fixpoint(&RE_HYPHEN_WRAP, text.into_owned(), "$1$2");
    let text = replace_to_fixpoint(&RE_SPLIT_DECIMAL, text, "$1.$2");

    text.trim().to_string()
}

/// Apply a replacement until the text stops changing.
///
/// A single `replace_all` pass resumes scanning after each match, so chained
/// artifacts ("a- b- c", "3 . 5 . 7") survive one pass and would break
/// idempotence. Termination compares values, not the returned `Cow` variant:
/// `replace_all` yields `Owned` whenever the pattern matched at all, even
/// when the replacement reproduces the input ("3.5" matches with zero-width
/// whitespace and rewrites to itself).
fn replace_to_fixpoint(re: &Regex, mut text: String, replacement: &str) -> String {
    loop {
        let replaced = re.replace_all(&text, replacement);
        if replaced == text {
            return text;
        }
        text = replaced.into_owned();
    }
}
