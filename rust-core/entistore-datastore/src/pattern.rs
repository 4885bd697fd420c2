// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redis-style glob patterns for key scans.
//
// Supported syntax:
//
// - `*` matches any run of characters, including none
// - `?` matches exactly one character
// - `[abc]`, `[a-z]` and `[^a]` match one character from (or not from) a set
// - `\x` matches `x` literally

use regex::Regex;

use crate::error::{DatastoreError, DatastoreResult};

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob pattern.
    pub fn compile(pattern: &str) -> DatastoreResult<Self> {
        let translated = translate(pattern)?;
        let regex = Regex::new(&translated).map_err(|e| invalid(pattern, e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether `key` matches the whole pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The original glob text.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn invalid(pattern: &str, reason: impl Into<String>) -> DatastoreError {
    DatastoreError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn translate(pattern: &str) -> DatastoreResult<String> {
    let mut out = String::with_capacity(pattern.len() * 2 + 8);
    out.push_str("(?s)^");

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => push_literal(&mut out, escaped),
                None => return Err(invalid(pattern, "trailing escape")),
            },
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('^');
                }
                let mut members = 0usize;
                let mut closed = false;
                while let Some(member) = chars.next() {
                    match member {
                        ']' if members > 0 => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some(escaped) => push_literal(&mut out, escaped),
                            None => return Err(invalid(pattern, "trailing escape")),
                        },
                        '-' if members > 0 && chars.peek().is_some_and(|next| *next != ']') => {
                            out.push('-');
                        }
                        other => push_literal(&mut out, other),
                    }
                    members += 1;
                }
                if !closed {
                    return Err(invalid(pattern, "unterminated character class"));
                }
                out.push(']');
            }
            other => push_literal(&mut out, other),
        }
    }

    out.push('$');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, key: &str) -> bool {
        GlobPattern::compile(pattern).unwrap().matches(key)
    }

    #[test]
    fn test_any_string() {
        assert!(matches("__ns__:*", "__ns__:tenant:t1"));
        assert!(matches("__ns__:*", "__ns__:"));
        assert!(!matches("__ns__:*", "__other__:tenant:t1"));
        assert!(matches("*", "anything:at:all"));
    }

    #[test]
    fn test_any_char() {
        assert!(matches("product:?", "product:1"));
        assert!(!matches("product:?", "product:12"));
        assert!(!matches("product:?", "product:"));
    }

    #[test]
    fn test_match_is_anchored() {
        assert!(!matches("product:*", "tenant:t1:product:1"));
        assert!(!matches("tenant", "tenant:t1"));
    }

    #[test]
    fn test_character_classes() {
        assert!(matches("v[12]", "v1"));
        assert!(!matches("v[12]", "v3"));
        assert!(matches("v[a-c]", "vb"));
        assert!(!matches("v[a-c]", "vd"));
        assert!(matches("v[^a]", "vb"));
        assert!(!matches("v[^a]", "va"));
        assert!(matches("v[a-]", "v-"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("f(x),y", "f(x),y"));
        assert!(!matches("a.b", "axb"));
        assert!(matches("a.b", "a.b"));
    }

    #[test]
    fn test_escapes() {
        assert!(matches(r"a\*b", "a*b"));
        assert!(!matches(r"a\*b", "axxb"));
        assert!(matches(r"a\?", "a?"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            GlobPattern::compile("v[12"),
            Err(DatastoreError::InvalidPattern { .. })
        ));
        assert!(matches!(
            GlobPattern::compile(r"abc\"),
            Err(DatastoreError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_as_str_keeps_source() {
        let pattern = GlobPattern::compile("tenant:*").unwrap();
        assert_eq!(pattern.as_str(), "tenant:*");
    }
}
