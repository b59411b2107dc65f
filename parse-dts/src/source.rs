use crate::ast::node::Node;
use crate::ast::stmt::TopLevel;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

/// A parsed source file. Besides the syntax tree, the full token stream and every comment are
/// kept so that callers can re-emit declarations verbatim, with or without their comments.
#[derive(Debug)]
pub struct SourceFile {
  pub text: String,
  pub tokens: Vec<Token>,
  pub comments: Vec<Loc>,
  pub top_level: Node<TopLevel>,
  line_starts: Vec<usize>,
}

impl SourceFile {
  pub fn new(text: String, tokens: Vec<Token>, comments: Vec<Loc>, top_level: Node<TopLevel>) -> Self {
    let mut line_starts = vec![0];
    let bytes = text.as_bytes();
    let mut i = 0;
    while let Some(pos) = memchr::memchr2(b'\n', b'\r', &bytes[i..]) {
      let at = i + pos;
      // Treat `\r\n` as a single terminator.
      let next = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
        at + 2
      } else {
        at + 1
      };
      line_starts.push(next);
      i = next;
    }
    SourceFile {
      text,
      tokens,
      comments,
      top_level,
      line_starts,
    }
  }

  pub fn text(&self, loc: Loc) -> &str {
    &self.text[loc.0..loc.1]
  }

  /// Zero-based line and zero-based column in characters.
  pub fn line_col(&self, offset: usize) -> (usize, usize) {
    let offset = offset.min(self.text.len());
    let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
    let start = self.line_starts[line];
    let col = self.text[start..offset].chars().count();
    (line, col)
  }

  /// Tokens starting within `loc`, never including the EOF token.
  pub fn tokens_in(&self, loc: Loc) -> &[Token] {
    let start = self.tokens.partition_point(|t| t.loc.0 < loc.0);
    let end = self.tokens.partition_point(|t| t.loc.0 < loc.1);
    let end = match self.tokens[..end].last() {
      Some(t) if t.typ == TT::EOF => end - 1,
      _ => end,
    };
    &self.tokens[start..end.max(start)]
  }

  /// The first token starting at or after `offset`.
  pub fn token_at(&self, offset: usize) -> Option<&Token> {
    let i = self.tokens.partition_point(|t| t.loc.0 < offset);
    self.tokens.get(i)
  }

  pub fn leading_comments(&self, token: &Token) -> &[Loc] {
    &self.comments[token.leading_comments.start..token.leading_comments.end]
  }

  /// Where a token's own text begins once its comments are dropped: the whitespace after its last
  /// leading comment is kept so that line structure survives.
  pub fn sanitized_start(&self, token: &Token) -> usize {
    match self.leading_comments(token).last() {
      Some(comment) => comment.1,
      None => token.leading_trivia.0,
    }
  }
}
