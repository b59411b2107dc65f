use crate::ast::node::EntityName;
use crate::ast::node::Ident;
use crate::ast::node::Node;
use crate::ast::stmt::TopLevel;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_all;
use crate::loc::Loc;
use crate::source::SourceFile;
use crate::token::Token;
use crate::token::TT;

pub mod func;
pub mod import_export;
pub mod member;
pub mod skip;
pub mod stmt;
#[cfg(test)]
mod tests;
pub mod type_expr;

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }

  pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
    Ok(if self.matched { Some(f()?) } else { None })
  }
}

#[derive(Clone, Copy)]
pub struct ParserCheckpoint {
  next_tok_i: usize,
}

/// The whole file is lexed up front; there is only one lexing mode because declaration files never
/// contain regular expression literals, and template literals are single tokens.
pub struct Parser<'a> {
  source: &'a str,
  tokens: Vec<Token>,
  comments: Vec<Loc>,
  next_tok_i: usize,
}

// Parsing functions are methods on `Parser`, spread across the submodules by the syntax they handle.
impl<'a> Parser<'a> {
  pub fn new(source: &'a str) -> Parser<'a> {
    let (tokens, comments) = lex_all(source);
    Parser {
      source,
      tokens,
      comments,
      next_tok_i: 0,
    }
  }

  pub fn into_source_file(self, top_level: Node<TopLevel>) -> SourceFile {
    SourceFile::new(self.source.to_string(), self.tokens, self.comments, top_level)
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.source.len())
  }

  pub fn str(&self, loc: Loc) -> &str {
    &self.source[loc.0..loc.1]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  /// The end of the most recently consumed token.
  pub fn prev_end(&self) -> usize {
    match self.next_tok_i {
      0 => 0,
      i => self.tokens[i - 1].loc.1,
    }
  }

  /// Location from `start` up to the end of the most recently consumed token.
  pub fn since(&self, start: usize) -> Loc {
    Loc(start, self.prev_end().max(start))
  }

  fn eof_index(&self) -> usize {
    self.tokens.len() - 1
  }

  /// Peeks `n` tokens ahead; `peek_n(0)` is the same as `peek()`. Past the end, the EOF token is returned.
  pub fn peek_n(&self, n: usize) -> Token {
    let i = (self.next_tok_i + n).min(self.eof_index());
    self.tokens[i]
  }

  pub fn peek(&self) -> Token {
    self.peek_n(0)
  }

  pub fn peek_typ(&self) -> TT {
    self.peek().typ
  }

  /// Consumes the next token. The EOF token is returned repeatedly but never stepped over.
  pub fn consume(&mut self) -> Token {
    let t = self.peek();
    if t.typ != TT::EOF {
      self.next_tok_i += 1;
    };
    t
  }

  pub fn consume_if_pred<F: FnOnce(&Token) -> bool>(&mut self, pred: F) -> MaybeToken {
    let t = self.peek();
    let matched = t.typ != TT::EOF && pred(&t);
    if matched {
      self.next_tok_i += 1;
    };
    MaybeToken {
      typ: t.typ,
      loc: t.loc,
      matched,
    }
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    self.consume_if_pred(|t| t.typ == typ)
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    let t = self.consume();
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require_predicate<P: FnOnce(TT) -> bool>(
    &mut self,
    pred: P,
    expected: &'static str,
  ) -> SyntaxResult<Token> {
    let t = self.consume();
    if !pred(t.typ) {
      Err(t.error(SyntaxErrorType::ExpectedSyntax(expected)))
    } else {
      Ok(t)
    }
  }

  pub fn require_binding_identifier(&mut self) -> SyntaxResult<Node<Ident>> {
    let t = self.require_predicate(TT::is_binding_identifier, "identifier")?;
    Ok(Node::new(t.loc, Ident {
      name: self.string(t.loc),
    }))
  }

  pub fn require_identifier_name(&mut self) -> SyntaxResult<Node<Ident>> {
    let t = self.require_predicate(TT::is_identifier_name, "identifier name")?;
    Ok(Node::new(t.loc, Ident {
      name: self.string(t.loc),
    }))
  }

  /// `a.b.c`. The first part may also be `this` or any other keyword usable as a type name.
  pub fn parse_entity_name(&mut self) -> SyntaxResult<Node<EntityName>> {
    let start = self.peek().loc.0;
    let mut parts = vec![self.require_identifier_name()?];
    while self.peek_typ() == TT::Dot && self.peek_n(1).typ.is_identifier_name() {
      self.consume();
      parts.push(self.require_identifier_name()?);
    }
    Ok(Node::new(self.since(start), EntityName { parts }))
  }

  /// The value of a string literal token, with quotes removed and simple escapes resolved.
  pub fn string_literal_value(&self, loc: Loc) -> String {
    let raw = self.str(loc);
    let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
      if c != '\\' {
        out.push(c);
        continue;
      };
      match chars.next() {
        Some('n') => out.push('\n'),
        Some('t') => out.push('\t'),
        Some('r') => out.push('\r'),
        Some('0') => out.push('\0'),
        Some(c) => out.push(c),
        None => {}
      };
    }
    out
  }

  pub fn require_string_literal(&mut self) -> SyntaxResult<String> {
    let t = self.require(TT::LiteralString)?;
    Ok(self.string_literal_value(t.loc))
  }

  pub fn parse_top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let mut body = Vec::new();
    while self.peek_typ() != TT::EOF {
      if self.peek().typ.is_close_bracket() {
        return Err(self.peek().error(SyntaxErrorType::UnbalancedBrackets));
      };
      body.push(self.parse_stmt()?);
    }
    Ok(Node::new(self.source_range(), TopLevel { body }))
  }
}
