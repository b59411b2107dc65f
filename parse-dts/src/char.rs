use ahash::HashSet;
use ahash::HashSetExt;
use core::ops::RangeInclusive;
use once_cell::sync::Lazy;

/// A set of ASCII characters, optionally extended with "every non-ASCII character".
///
/// Declaration sources are overwhelmingly ASCII, so identifiers are classified by a lookup set
/// and any non-ASCII code point is treated as an identifier character.
#[derive(Clone)]
pub struct CharFilter {
  chars: HashSet<char>,
  non_ascii: bool,
}

impl CharFilter {
  pub fn new() -> CharFilter {
    CharFilter {
      chars: HashSet::new(),
      non_ascii: false,
    }
  }

  pub fn add_char(&mut self, c: char) {
    self.chars.insert(c);
  }

  pub fn add_chars(&mut self, chars: RangeInclusive<char>) {
    for c in chars {
      self.chars.insert(c);
    }
  }

  pub fn add_non_ascii(&mut self) {
    self.non_ascii = true;
  }

  pub fn has(&self, c: char) -> bool {
    if c.is_ascii() {
      self.chars.contains(&c)
    } else {
      self.non_ascii && !c.is_whitespace()
    }
  }
}

impl Default for CharFilter {
  fn default() -> Self {
    Self::new()
  }
}

pub static DIGIT: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('0'..='9');
  filter
});

pub static ID_START: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('a'..='z');
  filter.add_chars('A'..='Z');
  filter.add_char('_');
  filter.add_char('$');
  filter.add_non_ascii();
  filter
});

pub static ID_CONTINUE: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = (*ID_START).clone();
  filter.add_chars('0'..='9');
  filter
});

// Everything that can follow the first digit of a numeric literal, including separators, radix
// prefixes, hex digits and the bigint suffix.
pub static NUMBER_CONTINUE: Lazy<CharFilter> = Lazy::new(|| {
  let mut filter = CharFilter::new();
  filter.add_chars('0'..='9');
  filter.add_chars('a'..='z');
  filter.add_chars('A'..='Z');
  filter.add_char('_');
  filter.add_char('.');
  filter
});

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identifier_classes() {
    assert!(ID_START.has('$'));
    assert!(ID_START.has('é'));
    assert!(!ID_START.has('1'));
    assert!(ID_CONTINUE.has('1'));
    assert!(!ID_CONTINUE.has('-'));
    assert!(!ID_CONTINUE.has('\u{00A0}'));
  }
}
