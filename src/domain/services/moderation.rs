//! Moderation Engine
//!
//! Pure text filtering applied to every outgoing message. Three passes run
//! in a fixed order, each one on the output of the previous:
//!
//! 1. built-in banned words are masked,
//! 2. the channel's KEYWORD rules are applied in their stored order,
//! 3. runs of 4 or more identical characters are collapsed to 3.
//!
//! Every pass is single-shot: text produced by a replacement is not
//! re-scanned by the same pass.

use crate::domain::entities::FilterRule;

/// Words masked in every channel, matched case-insensitively.
pub const BANNED_WORDS: &[&str] = &["küfür", "hakaret", "spam"];

/// Replacement for banned words.
pub const BANNED_WORD_MASK: &str = "***";

/// Longest run of a repeated character left intact by the repetition pass.
pub const MAX_REPEATED_CHARS: usize = 3;

/// Result of running the moderation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Text after all passes
    pub text: String,
    /// True if any pass matched
    pub is_filtered: bool,
}

/// Run the full moderation pipeline over `text` with a channel's rules.
///
/// Never fails: rules that cannot match (empty KEYWORD value, SPAM kind,
/// FLAG action) are skipped.
pub fn filter(text: &str, rules: &[FilterRule]) -> FilterOutcome {
    let mut current = text.to_string();
    let mut is_filtered = false;

    for word in BANNED_WORDS {
        if let Some(masked) = replace_case_insensitive(&current, word, BANNED_WORD_MASK) {
            current = masked;
            is_filtered = true;
        }
    }

    for rule in rules.iter().filter(|rule| rule.is_replacing_keyword()) {
        if let Some(replaced) =
            replace_case_insensitive(&current, &rule.match_value, rule.replacement())
        {
            current = replaced;
            is_filtered = true;
        }
    }

    if let Some(collapsed) = collapse_repeats(&current, MAX_REPEATED_CHARS) {
        current = collapsed;
        is_filtered = true;
    }

    FilterOutcome {
        text: current,
        is_filtered,
    }
}

/// Replace every case-insensitive occurrence of `needle` in `haystack`.
///
/// Returns `None` when nothing matched, including when `needle` is empty.
pub fn replace_case_insensitive(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    let folded: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if folded.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(haystack.len());
    let mut rest = haystack;
    let mut matched = false;

    while let Some(ch) = rest.chars().next() {
        match folded_prefix_len(rest, &folded) {
            Some(len) => {
                out.push_str(replacement);
                rest = &rest[len..];
                matched = true;
            }
            None => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    matched.then_some(out)
}

/// Byte length of the prefix of `text` whose lowercase form equals `needle`.
fn folded_prefix_len(text: &str, needle: &[char]) -> Option<usize> {
    let mut pos = 0;
    for (offset, ch) in text.char_indices() {
        if pos == needle.len() {
            return Some(offset);
        }
        for lower in ch.to_lowercase() {
            if needle.get(pos) != Some(&lower) {
                return None;
            }
            pos += 1;
        }
    }
    (pos == needle.len()).then_some(text.len())
}

/// Trim every run of one repeated character down to `keep` characters.
///
/// Line terminators are never treated as repeated characters. Returns
/// `None` when no run exceeded `keep`.
pub fn collapse_repeats(text: &str, keep: usize) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    let mut run = 0usize;
    let mut collapsed = false;

    for ch in text.chars() {
        if previous == Some(ch) && !is_line_terminator(ch) {
            run += 1;
        } else {
            previous = Some(ch);
            run = 1;
        }

        if run <= keep {
            out.push(ch);
        } else {
            collapsed = true;
        }
    }

    collapsed.then_some(out)
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
