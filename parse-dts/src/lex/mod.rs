use crate::char::CharFilter;
use crate::char::DIGIT;
use crate::char::ID_CONTINUE;
use crate::char::ID_START;
use crate::char::NUMBER_CONTINUE;
use crate::loc::Loc;
use crate::token::CommentRange;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use ahash::HashMapExt;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr;
use memchr::memchr2;
use memchr::memchr3;
use memchr::memmem;
use once_cell::sync::Lazy;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
  next: usize,
}

// Contains the match length.
#[derive(Copy, Clone)]
struct Match(usize);

impl Match {
  pub fn len(&self) -> usize {
    self.0
  }
}

struct PatternMatcher {
  patterns: Vec<TT>,
  matcher: AhoCorasick,
}

impl PatternMatcher {
  pub fn new(patterns: Vec<(TT, &'static str)>) -> Self {
    let (tts, syns): (Vec<_>, Vec<_>) = patterns.into_iter().unzip();
    let matcher = AhoCorasickBuilder::new()
      .start_kind(StartKind::Anchored)
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostLongest)
      .build(syns)
      // The pattern tables are static, so a build failure is a programming error.
      .expect("static token patterns must compile");
    PatternMatcher {
      patterns: tts,
      matcher,
    }
  }

  fn find(&self, lexer: &Lexer) -> Option<(TT, Match)> {
    self
      .matcher
      .find(Input::new(&lexer.source[lexer.next..]).anchored(Anchored::Yes))
      .map(|m| (self.patterns[m.pattern().as_usize()], Match(m.end())))
  }
}

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
  comments: Vec<Loc>,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    Lexer {
      source: code,
      next: 0,
      comments: Vec::new(),
    }
  }

  pub fn next(&self) -> usize {
    self.next
  }

  fn end(&self) -> usize {
    self.source.len()
  }

  fn remaining(&self) -> usize {
    self.end() - self.next
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.end())
  }

  fn at_end(&self) -> bool {
    self.next >= self.end()
  }

  fn peek_or_eof(&self, n: usize) -> Option<char> {
    self.source[self.next..].chars().nth(n)
  }

  fn rest(&self) -> &'a [u8] {
    &self.source.as_bytes()[self.next..]
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> Loc {
    Loc(checkpoint.next, self.next)
  }

  pub fn apply_checkpoint(&mut self, checkpoint: LexerCheckpoint) {
    self.next = checkpoint.next;
  }

  /// Comments seen so far, in source order. Tokens refer into this list by index.
  pub fn comments(&self) -> &[Loc] {
    &self.comments
  }

  pub fn into_comments(self) -> Vec<Loc> {
    self.comments
  }

  fn while_chars(&self, chars: &CharFilter) -> Match {
    let mut len = 0;
    for ch in self.source[self.next..].chars() {
      if chars.has(ch) {
        len += ch.len_utf8();
      } else {
        break;
      }
    }
    Match(len)
  }

  fn while_not_char(&self, c: u8) -> Match {
    Match(memchr(c, self.rest()).unwrap_or(self.remaining()))
  }

  fn consume(&mut self, m: Match) -> Match {
    self.next += m.len();
    m
  }

  fn skip_expect(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  fn skip_char(&mut self) {
    if let Some(c) = self.peek_or_eof(0) {
      self.next += c.len_utf8();
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

#[rustfmt::skip]
pub static OPERATORS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::Ampersand, "&");
  map.insert(TT::Asterisk, "*");
  map.insert(TT::At, "@");
  map.insert(TT::Bar, "|");
  map.insert(TT::BraceClose, "}");
  map.insert(TT::BraceOpen, "{");
  map.insert(TT::BracketClose, "]");
  map.insert(TT::BracketOpen, "[");
  map.insert(TT::Caret, "^");
  map.insert(TT::ChevronLeft, "<");
  map.insert(TT::ChevronRight, ">");
  map.insert(TT::Colon, ":");
  map.insert(TT::Comma, ",");
  map.insert(TT::Dot, ".");
  map.insert(TT::DotDotDot, "...");
  map.insert(TT::Equals, "=");
  map.insert(TT::EqualsChevronRight, "=>");
  map.insert(TT::Exclamation, "!");
  map.insert(TT::Hyphen, "-");
  map.insert(TT::ParenthesisClose, ")");
  map.insert(TT::ParenthesisOpen, "(");
  map.insert(TT::Percent, "%");
  map.insert(TT::Plus, "+");
  map.insert(TT::Question, "?");
  map.insert(TT::Semicolon, ";");
  map.insert(TT::Slash, "/");
  map.insert(TT::Tilde, "~");
  map
});

#[rustfmt::skip]
pub static KEYWORDS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::KeywordAbstract, "abstract");
  map.insert(TT::KeywordAccessor, "accessor");
  map.insert(TT::KeywordAny, "any");
  map.insert(TT::KeywordAs, "as");
  map.insert(TT::KeywordAsserts, "asserts");
  map.insert(TT::KeywordAsync, "async");
  map.insert(TT::KeywordBigIntType, "bigint");
  map.insert(TT::KeywordBooleanType, "boolean");
  map.insert(TT::KeywordClass, "class");
  map.insert(TT::KeywordConst, "const");
  map.insert(TT::KeywordConstructor, "constructor");
  map.insert(TT::KeywordDeclare, "declare");
  map.insert(TT::KeywordDefault, "default");
  map.insert(TT::KeywordEnum, "enum");
  map.insert(TT::KeywordExport, "export");
  map.insert(TT::KeywordExtends, "extends");
  map.insert(TT::KeywordFrom, "from");
  map.insert(TT::KeywordFunction, "function");
  map.insert(TT::KeywordGet, "get");
  map.insert(TT::KeywordGlobal, "global");
  map.insert(TT::KeywordImplements, "implements");
  map.insert(TT::KeywordImport, "import");
  map.insert(TT::KeywordIn, "in");
  map.insert(TT::KeywordInfer, "infer");
  map.insert(TT::KeywordInterface, "interface");
  map.insert(TT::KeywordIs, "is");
  map.insert(TT::KeywordKeyof, "keyof");
  map.insert(TT::KeywordLet, "let");
  map.insert(TT::KeywordModule, "module");
  map.insert(TT::KeywordNamespace, "namespace");
  map.insert(TT::KeywordNever, "never");
  map.insert(TT::KeywordNew, "new");
  map.insert(TT::KeywordNumberType, "number");
  map.insert(TT::KeywordObjectType, "object");
  map.insert(TT::KeywordOut, "out");
  map.insert(TT::KeywordOverride, "override");
  map.insert(TT::KeywordPrivate, "private");
  map.insert(TT::KeywordProtected, "protected");
  map.insert(TT::KeywordPublic, "public");
  map.insert(TT::KeywordReadonly, "readonly");
  map.insert(TT::KeywordRequire, "require");
  map.insert(TT::KeywordSet, "set");
  map.insert(TT::KeywordStatic, "static");
  map.insert(TT::KeywordStringType, "string");
  map.insert(TT::KeywordSymbolType, "symbol");
  map.insert(TT::KeywordThis, "this");
  map.insert(TT::KeywordType, "type");
  map.insert(TT::KeywordTypeof, "typeof");
  map.insert(TT::KeywordUndefinedType, "undefined");
  map.insert(TT::KeywordUnique, "unique");
  map.insert(TT::KeywordUnknown, "unknown");
  map.insert(TT::KeywordVar, "var");
  map.insert(TT::KeywordVoid, "void");
  map.insert(TT::LiteralFalse, "false");
  map.insert(TT::LiteralNull, "null");
  map.insert(TT::LiteralTrue, "true");
  map
});

pub static KEYWORD_STRS: Lazy<HashMap<&'static str, TT>> = Lazy::new(|| {
  KEYWORDS_MAPPING.iter().map(|(&tt, &s)| (s, tt)).collect()
});

static SIG: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new(OPERATORS_MAPPING.iter().map(|(&tt, &s)| (tt, s)).collect())
});

#[rustfmt::skip]
static INSIG: Lazy<PatternMatcher> = Lazy::new(|| {
  PatternMatcher::new(vec![
    (TT::LineTerminator, "\r"),
    (TT::LineTerminator, "\n"),
    (TT::LineTerminator, "\u{2028}"),
    (TT::LineTerminator, "\u{2029}"),
    (TT::Whitespace, "\x09"),
    (TT::Whitespace, "\x0b"),
    (TT::Whitespace, "\x0c"),
    (TT::Whitespace, "\x20"),
    (TT::Whitespace, "\u{00A0}"),
    (TT::Whitespace, "\u{1680}"),
    (TT::Whitespace, "\u{2000}"),
    (TT::Whitespace, "\u{2001}"),
    (TT::Whitespace, "\u{2002}"),
    (TT::Whitespace, "\u{2003}"),
    (TT::Whitespace, "\u{2004}"),
    (TT::Whitespace, "\u{2005}"),
    (TT::Whitespace, "\u{2006}"),
    (TT::Whitespace, "\u{2007}"),
    (TT::Whitespace, "\u{2008}"),
    (TT::Whitespace, "\u{2009}"),
    (TT::Whitespace, "\u{200A}"),
    (TT::Whitespace, "\u{202F}"),
    (TT::Whitespace, "\u{205F}"),
    (TT::Whitespace, "\u{3000}"),
    (TT::Whitespace, "\u{FEFF}"),
    (TT::CommentMultiline, "/*"),
    (TT::CommentSingle, "//"),
  ])
});

/// Returns whether the comment includes a line terminator. An unterminated comment runs to the end of the input.
fn lex_multiline_comment(lexer: &mut Lexer<'_>) -> bool {
  let body_start = lexer.next + 2;
  let body = &lexer.source.as_bytes()[body_start..];
  let len = memmem::find(body, b"*/")
    .map(|pos| pos + 2)
    .unwrap_or(body.len());
  let contains_newline = memchr2(b'\n', b'\r', &body[..len]).is_some();
  lexer.next = body_start + len;
  contains_newline
}

// The comment range excludes the line terminator, which the trivia loop lexes on its own.
fn lex_single_comment(lexer: &mut Lexer<'_>) {
  lexer.skip_expect(2);
  lexer.consume(lexer.while_not_char(b'\n'));
  if lexer.source[..lexer.next].ends_with('\r') {
    lexer.next -= 1;
  }
}

fn lex_unicode_escape(lexer: &mut Lexer<'_>) -> bool {
  // At `\`.
  lexer.skip_expect(1);
  if lexer.peek_or_eof(0) != Some('u') {
    return false;
  }
  lexer.skip_expect(1);
  if lexer.peek_or_eof(0) == Some('{') {
    match memchr(b'}', lexer.rest()) {
      Some(pos) => lexer.skip_expect(pos + 1),
      None => return false,
    };
  } else {
    for _ in 0..4 {
      match lexer.peek_or_eof(0) {
        Some(c) if c.is_ascii_hexdigit() => lexer.skip_expect(1),
        _ => return false,
      };
    }
  }
  true
}

fn lex_identifier(lexer: &mut Lexer<'_>, start: usize) -> TT {
  loop {
    lexer.consume(lexer.while_chars(&ID_CONTINUE));
    if lexer.peek_or_eof(0) == Some('\\') {
      if !lex_unicode_escape(lexer) {
        return TT::Invalid;
      }
    } else {
      break;
    }
  }
  KEYWORD_STRS
    .get(&lexer.source[start..lexer.next])
    .copied()
    .unwrap_or(TT::Identifier)
}

fn lex_number(lexer: &mut Lexer<'_>, start: usize) -> TT {
  loop {
    lexer.consume(lexer.while_chars(&NUMBER_CONTINUE));
    // Exponent sign, e.g. `1e+5`. Hex literals never reach here with a sign after `e`.
    let last = lexer.source[start..lexer.next].chars().last();
    let is_hex = lexer.source[start..].starts_with("0x") || lexer.source[start..].starts_with("0X");
    match (last, lexer.peek_or_eof(0)) {
      (Some('e' | 'E'), Some('+' | '-')) if !is_hex => lexer.skip_expect(1),
      _ => break,
    };
  }
  if lexer.source[start..lexer.next].ends_with('n') {
    TT::LiteralBigInt
  } else {
    TT::LiteralNumber
  }
}

fn lex_private_member(lexer: &mut Lexer<'_>, start: usize) -> TT {
  // Include the `#` in the token.
  lexer.skip_expect(1);
  match lexer.peek_or_eof(0) {
    Some(c) if ID_START.has(c) => match lex_identifier(lexer, start) {
      TT::Invalid => TT::Invalid,
      _ => TT::PrivateMember,
    },
    _ => TT::Invalid,
  }
}

fn lex_string(lexer: &mut Lexer<'_>) -> TT {
  let quote = lexer.source.as_bytes()[lexer.next];
  lexer.skip_expect(1);
  loop {
    match memchr3(b'\\', b'\n', quote, lexer.rest()) {
      None => {
        lexer.next = lexer.end();
        return TT::Invalid;
      }
      Some(pos) => {
        lexer.skip_expect(pos);
        match lexer.source.as_bytes()[lexer.next] {
          b'\\' => {
            lexer.skip_expect(1);
            // Escaped character, possibly a line continuation.
            if lexer.source[lexer.next..].starts_with("\r\n") {
              lexer.skip_expect(2);
            } else {
              lexer.skip_char();
            }
          }
          b'\n' => {
            // Unterminated on this line. Leave the line terminator for the trivia loop.
            return TT::Invalid;
          }
          _ => {
            lexer.skip_expect(1);
            return TT::LiteralString;
          }
        }
      }
    };
  }
}

// Lexes the whole template, including substitutions, as one token. Substitution contents are not
// tokenized; braces are only counted so that `}` inside a substitution doesn't end it early.
fn lex_template(lexer: &mut Lexer<'_>) -> TT {
  lexer.skip_expect(1);
  let mut depth = 0usize;
  loop {
    let Some(c) = lexer.peek_or_eof(0) else {
      return TT::Invalid;
    };
    match c {
      '\\' => {
        lexer.skip_expect(1);
        lexer.skip_char();
      }
      '`' if depth == 0 => {
        lexer.skip_expect(1);
        return TT::LiteralTemplate;
      }
      '$' if depth == 0 && lexer.peek_or_eof(1) == Some('{') => {
        lexer.skip_expect(2);
        depth = 1;
      }
      '{' if depth > 0 => {
        lexer.skip_expect(1);
        depth += 1;
      }
      '}' if depth > 0 => {
        lexer.skip_expect(1);
        depth -= 1;
      }
      c => lexer.skip_expect(c.len_utf8()),
    };
  }
}

pub fn lex_next(lexer: &mut Lexer<'_>) -> Token {
  let trivia_start = lexer.next();
  let comments_start = lexer.comments.len();
  let mut preceded_by_line_terminator = false;
  while let Some((tt, mat)) = INSIG.find(lexer) {
    match tt {
      TT::LineTerminator => {
        lexer.consume(mat);
        preceded_by_line_terminator = true;
      }
      TT::Whitespace => {
        lexer.consume(mat);
      }
      TT::CommentMultiline => {
        let start = lexer.next();
        preceded_by_line_terminator |= lex_multiline_comment(lexer);
        lexer.comments.push(Loc(start, lexer.next()));
      }
      TT::CommentSingle => {
        let start = lexer.next();
        lex_single_comment(lexer);
        lexer.comments.push(Loc(start, lexer.next()));
      }
      _ => unreachable!(),
    };
  }
  let leading_trivia = Loc(trivia_start, lexer.next());
  let leading_comments = CommentRange {
    start: comments_start,
    end: lexer.comments.len(),
  };

  let start = lexer.next();
  let typ = if lexer.at_end() {
    TT::EOF
  } else {
    lex_significant(lexer, start)
  };
  Token {
    loc: Loc(start, lexer.next()),
    preceded_by_line_terminator,
    typ,
    leading_trivia,
    leading_comments,
  }
}

fn lex_significant(lexer: &mut Lexer<'_>, start: usize) -> TT {
  // Not at the end, so there is at least one char.
  let Some(c) = lexer.peek_or_eof(0) else {
    return TT::EOF;
  };
  if ID_START.has(c) || c == '\\' {
    if c == '\\' {
      if !lex_unicode_escape(lexer) {
        return TT::Invalid;
      }
    } else {
      lexer.skip_expect(c.len_utf8());
    }
    return lex_identifier(lexer, start);
  }
  if DIGIT.has(c) || (c == '.' && lexer.peek_or_eof(1).is_some_and(|n| DIGIT.has(n))) {
    return lex_number(lexer, start);
  }
  match c {
    '"' | '\'' => return lex_string(lexer),
    '`' => return lex_template(lexer),
    '#' => return lex_private_member(lexer, start),
    _ => {}
  };
  match SIG.find(lexer) {
    Some((tt, mat)) => {
      lexer.consume(mat);
      tt
    }
    None => {
      lexer.skip_char();
      TT::Invalid
    }
  }
}

/// Lexes the entire source. The returned token list always ends with an `EOF` token, whose leading trivia is the trailing trivia of the file.
pub fn lex_all(source: &str) -> (Vec<Token>, Vec<Loc>) {
  let mut lexer = Lexer::new(source);
  let mut tokens = Vec::new();
  loop {
    let token = lex_next(&mut lexer);
    let done = token.typ == TT::EOF;
    tokens.push(token);
    if done {
      break;
    }
  }
  (tokens, lexer.into_comments())
}
