//! Text clean-up shared by every renderer: markup stripping, word wrapping,
//! unified diffs and mention-preserving truncation.

use std::sync::OnceLock;

use regex::Regex;
use similar::{ChangeTag, TextDiff};

/// Maximum length, in chars, of a long-text section before it is truncated.
pub const TRUNCATE_LIMIT: usize = 500;

/// Column width used when wrapping texts before diffing them.
pub const WRAP_WIDTH: usize = 80;

/// Lines of context around each diff hunk.
const DIFF_CONTEXT: usize = 3;

/// Separator between the kept head and the preserved mentions.
const ELLIPSIS: &str = " ... ";

/// Longest mention body looked for behind the cut.
const MAX_CUT_MENTION: usize = 20;

fn markup_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\{(#![a-z]+)*|\}\}\}").expect("markup pattern is valid"))
}

fn alnum_mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@[0-9A-Za-z]+").expect("mention pattern is valid"))
}

fn lowercase_mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@[a-z]+").expect("mention pattern is valid"))
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z0-9]+").expect("name pattern is valid"))
}

/// Which tokens count as a mention when truncating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionPattern {
    /// `@` followed by ASCII letters or digits, used for tickets and wiki pages.
    Alphanumeric,
    /// `@` followed by lowercase ASCII letters, used for blog posts.
    Lowercase,
}

impl MentionPattern {
    fn regex(self) -> &'static Regex {
        match self {
            MentionPattern::Alphanumeric => alnum_mention_regex(),
            MentionPattern::Lowercase => lowercase_mention_regex(),
        }
    }
}

/// Remove `{{{`, `{{{#!lang` and `}}}` fences, keeping the fenced content.
///
/// Deleting a fence can join two halves into a new one, so this repeats until
/// nothing matches, which keeps the function idempotent.
pub fn strip_markup(text: &str) -> String {
    let mut current = text.to_string();

    while markup_regex().is_match(&current) {
        current = markup_regex().replace_all(&current, "").into_owned();
    }

    current
}

/// Cut `text` down to `limit` chars, re-appending every mention found in the
/// part that was dropped.
pub fn truncate_with_mentions(text: &str, limit: usize, pattern: MentionPattern) -> String {
    let chars: Vec<char> = text.chars().collect();

    if chars.len() <= limit {
        return text.to_string();
    }

    let head: String = chars[..limit.saturating_sub(3)].iter().collect();

    // The tail starts at `limit - 2`; only a mention cut in half there is
    // pulled back in whole.
    let mut start = limit.saturating_sub(2);
    let mut k = start;
    while k > 0 && start - k < MAX_CUT_MENTION && chars[k - 1].is_ascii_alphanumeric() {
        k -= 1;
    }
    if k > 0 && chars[k - 1] == '@' {
        start = k - 1;
    }
    let tail: String = chars[start..].iter().collect();

    let mentions: Vec<&str> = pattern.regex().find_iter(&tail).map(|m| m.as_str()).collect();

    format!("{head}{ELLIPSIS}{}", mentions.join(" "))
}

/// Greedily wrap every line of `text` to `width` columns.
///
/// Blank lines are kept, and words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    out.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                out.push(word[..width].iter().collect());
                word.drain(..width);
            }

            if word.is_empty() {
                continue;
            }

            if current_len > 0 && current_len + 1 + word.len() > width {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        out.push(current);
    }

    out
}

/// Build a headerless unified diff of two wrapped texts.
///
/// Each hunk is introduced by a blank line instead of its `@@` header. The
/// first two chars (the leading separator and the first line's marker) are
/// dropped. Returns an empty string when the wrapped texts are equal.
pub fn unified_diff(old: &str, new: &str, width: usize) -> String {
    let old_lines = wrap(old, width);
    let new_lines = wrap(new, width);
    let old_refs: Vec<&str> = old_lines.iter().map(String::as_str).collect();
    let new_refs: Vec<&str> = new_lines.iter().map(String::as_str).collect();

    let diff = TextDiff::from_slices(&old_refs, &new_refs);
    let mut lines: Vec<String> = Vec::new();

    for group in diff.grouped_ops(DIFF_CONTEXT) {
        lines.push(String::new());

        for op in &group {
            for change in diff.iter_changes(op) {
                let marker = match change.tag() {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                };
                lines.push(format!("{marker}{}", change.value()));
            }
        }
    }

    lines.join("\n").chars().skip(2).collect()
}

/// Diff and truncate a changed long-text field for display.
pub fn diff_block(old: &str, new: &str) -> String {
    truncate_with_mentions(&unified_diff(old, new, WRAP_WIDTH), TRUNCATE_LIMIT, MentionPattern::Alphanumeric)
}

/// Truncate and strip a raw long-text field for display.
pub fn raw_block(text: &str, pattern: MentionPattern) -> String {
    strip_markup(&truncate_with_mentions(text, TRUNCATE_LIMIT, pattern))
}

/// Collapse line breaks so a value fits on one row.
pub fn inline(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Upper-case every letter that starts a word and lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }

    out
}

/// Prefix every lowercase alphanumeric run with `@`.
pub fn mentionify(text: &str) -> String {
    name_regex().replace_all(text, "@$0").into_owned()
}
