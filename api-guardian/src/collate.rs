//! A locale-style collation for export names, so `b` sorts between `a` and `C`.

use std::cmp::Ordering;

fn class(c: char) -> u8 {
  if c.is_alphabetic() {
    3
  } else if c.is_numeric() {
    2
  } else if c == '$' || (c.is_ascii_punctuation() && !matches!(c, '_' | '-' | '\'' | '.')) {
    1
  } else {
    0
  }
}

fn primary(c: char) -> (u8, char) {
  (class(c), c.to_lowercase().next().unwrap_or(c))
}

/// Compares case-insensitively first. Only names that are otherwise equal are ordered by case,
/// with lowercase first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
  let folded = a.chars().map(primary).cmp(b.chars().map(primary));
  folded.then_with(|| {
    a.chars()
      .zip(b.chars())
      .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
      .find(|o| o.is_ne())
      .unwrap_or(Ordering::Equal)
  })
}
