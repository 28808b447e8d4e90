//! Notation tokenizer
//!
//! Zone codes are first rewritten to their quoted form (`10 zr` and
//! `10' zr` both become `10 'zr`, read as `10'zr` once whitespace is
//! gone), then the expression is cut on `+` at parenthesis depth zero.
//! Repeat groups therefore stay whole, whatever they contain.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// A known zone code as a standalone word, with any quote already in front of it
static ZONE_CODE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)'?(\s*)\b(zr|zm|zs|ze|zt)\b").unwrap());

const SEPARATOR: char = '+';

/// Rewrite every known zone code to `'<code>`, keeping its case.
///
/// An existing quote moves next to the code; the whitespace around it is
/// kept. Idempotent. Quotes in front of anything that is not a known code are
/// left alone, so `1' ra` still reads as a duration with an unknown zone.
pub fn normalize_zones(expression: &str) -> Cow<'_, str> {
  ZONE_CODE.replace_all(expression, "${1}'$2")
}

/// Split an expression into top-level tokens, in source order.
///
/// `+` is the only separator: adjacent steps written without one
/// (`10'zr5'zm`) form a single token and fail to classify. Empty
/// segments (`++`, a trailing `+`) are dropped without error.
pub fn tokenize(expression: &str) -> Vec<String> {
  let compact: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
  split_sequence(&compact)
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Split on separators that are not inside parentheses.
pub fn split_sequence(sequence: &str) -> Vec<&str> {
  let mut segments = Vec::new();
  let mut depth = 0usize;
  let mut start = 0;

  for (index, c) in sequence.char_indices() {
    match c {
      '(' => depth += 1,
      ')' => depth = depth.saturating_sub(1),
      SEPARATOR if depth == 0 => {
        segments.push(&sequence[start..index]);
        start = index + c.len_utf8();
      }
      _ => {}
    }
  }
  segments.push(&sequence[start..]);

  segments
    .into_iter()
    .map(str::trim)
    .filter(|segment| !segment.is_empty())
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
