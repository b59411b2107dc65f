use super::Parser;
use crate::ast::node::EntityName;
use crate::ast::node::Ident;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

fn closing(open: TT) -> TT {
  match open {
    TT::BraceOpen => TT::BraceClose,
    TT::BracketOpen => TT::BracketClose,
    _ => TT::ParenthesisClose,
  }
}

// Tokens that cannot end an expression, so a line break after them never ends it either.
fn continues_after(typ: TT) -> bool {
  matches!(
    typ,
    TT::Ampersand
      | TT::Asterisk
      | TT::Bar
      | TT::Caret
      | TT::ChevronLeft
      | TT::ChevronRight
      | TT::Colon
      | TT::Dot
      | TT::DotDotDot
      | TT::Equals
      | TT::EqualsChevronRight
      | TT::Exclamation
      | TT::Hyphen
      | TT::Percent
      | TT::Plus
      | TT::Question
      | TT::Slash
      | TT::Tilde
      | TT::KeywordAs
      | TT::KeywordIn
      | TT::KeywordNew
      | TT::KeywordTypeof
      | TT::KeywordVoid
  )
}

// Tokens that can only continue an expression from a previous line.
fn continues_before(typ: TT) -> bool {
  matches!(
    typ,
    TT::Ampersand
      | TT::Asterisk
      | TT::Bar
      | TT::Caret
      | TT::ChevronLeft
      | TT::ChevronRight
      | TT::Colon
      | TT::Dot
      | TT::Equals
      | TT::EqualsChevronRight
      | TT::Percent
      | TT::Question
      | TT::Slash
      | TT::KeywordAs
      | TT::KeywordIn
  )
}

impl<'a> Parser<'a> {
  /// Consumes a bracketed group starting at the next token, which must be `(`, `[` or `{`, up to and
  /// including its matching close bracket.
  pub fn skip_balanced(&mut self) -> SyntaxResult<Loc> {
    let open = self.require_predicate(TT::is_open_bracket, "opening bracket")?;
    let mut stack = vec![closing(open.typ)];
    while let Some(&expected) = stack.last() {
      let t = self.consume();
      match t.typ {
        TT::EOF => return Err(t.error(SyntaxErrorType::UnexpectedEnd)),
        typ if typ.is_open_bracket() => stack.push(closing(typ)),
        typ if typ.is_close_bracket() => {
          if typ != expected {
            return Err(t.error(SyntaxErrorType::UnbalancedBrackets));
          };
          stack.pop();
        }
        _ => {}
      };
    }
    Ok(self.since(open.loc.0))
  }

  /// Skips an expression such as an initializer. Stops before a `,` `;` or close bracket at the
  /// outermost level, or before a token on a new line that cannot continue the expression. Returns
  /// `None` if nothing was consumed.
  pub fn skip_expression(&mut self) -> SyntaxResult<Option<Loc>> {
    let start = self.peek().loc.0;
    let mut prev: Option<TT> = None;
    loop {
      let t = self.peek();
      match t.typ {
        TT::EOF | TT::Comma | TT::Semicolon => break,
        typ if typ.is_close_bracket() => break,
        typ => {
          if t.preceded_by_line_terminator
            && prev.is_some_and(|p| !continues_after(p))
            && !continues_before(typ)
          {
            break;
          };
          if typ.is_open_bracket() {
            self.skip_balanced()?;
          } else {
            self.consume();
          };
          prev = Some(typ);
        }
      };
    }
    Ok(prev.map(|_| self.since(start)))
  }

  /// Qualified names such as `a.b.C` among already consumed tokens within `loc`. Accesses on
  /// anything other than a plain identifier, like `f().a` or `this.b`, are not names.
  pub fn qualified_names_in(&self, loc: Loc) -> Vec<Node<EntityName>> {
    let start = self.tokens.partition_point(|t| t.loc.0 < loc.0);
    let end = self.tokens.partition_point(|t| t.loc.0 < loc.1);
    let tokens = &self.tokens[start..end];
    let ident = |i: usize| {
      Node::new(tokens[i].loc, Ident {
        name: self.string(tokens[i].loc),
      })
    };
    let mut names = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
      let follows_dot = i > 0 && tokens[i - 1].typ == TT::Dot;
      if follows_dot || !tokens[i].typ.is_binding_identifier() {
        i += 1;
        continue;
      };
      let mut parts = vec![ident(i)];
      let mut j = i + 1;
      while j + 1 < tokens.len() && tokens[j].typ == TT::Dot && tokens[j + 1].typ.is_identifier_name() {
        parts.push(ident(j + 1));
        j += 2;
      }
      if parts.len() > 1 {
        let loc = Loc(tokens[i].loc.0, tokens[j - 1].loc.1);
        names.push(Node::new(loc, EntityName { parts }));
      };
      i = j;
    }
    names
  }

  /// Skips a statement this parser does not model, including its terminating `;` if present.
  pub fn skip_statement(&mut self) -> SyntaxResult<Loc> {
    let start = self.peek().loc.0;
    if self.skip_expression()?.is_none() {
      // Always make progress: a stray separator or close bracket is its own statement.
      let t = self.consume();
      if t.typ.is_close_bracket() {
        return Err(t.error(SyntaxErrorType::UnbalancedBrackets));
      };
      if t.typ == TT::Semicolon {
        return Ok(t.loc);
      };
    };
    let _ = self.consume_if(TT::Semicolon);
    Ok(self.since(start))
  }
}

#[cfg(test)]
mod tests {
  use super::super::Parser;
  use crate::error::SyntaxErrorType;
  use crate::loc::Loc;
  use crate::token::TT;

  #[test]
  fn balanced_groups_nest() {
    let mut p = Parser::new("{ a: [1, (2)] } x");
    assert_eq!(p.skip_balanced().unwrap(), Loc(0, 15));
    assert_eq!(p.peek_typ(), TT::Identifier);
  }

  #[test]
  fn mismatched_brackets_fail() {
    let mut p = Parser::new("{ ( }");
    assert_eq!(
      p.skip_balanced().unwrap_err().typ,
      SyntaxErrorType::UnbalancedBrackets
    );
    let mut p = Parser::new("( a");
    assert_eq!(p.skip_balanced().unwrap_err().typ, SyntaxErrorType::UnexpectedEnd);
  }

  #[test]
  fn expressions_end_at_line_breaks_that_cannot_continue() {
    let mut p = Parser::new("1 +\n 2\nfoo");
    assert_eq!(p.skip_expression().unwrap(), Some(Loc(0, 6)));
    let mut p = Parser::new("a\n  .b(c, d), e");
    assert_eq!(p.skip_expression().unwrap(), Some(Loc(0, 12)));
    assert_eq!(p.peek_typ(), TT::Comma);
  }
}
