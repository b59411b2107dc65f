mod stmt;
mod type_expr;

use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::token::TT;

pub(super) fn parse_stmts(input: &str) -> Vec<Node<Stmt>> {
  let mut parser = Parser::new(input);
  parser.parse_top_level().unwrap().stx.body
}

pub(super) fn parse_one(input: &str) -> Node<Stmt> {
  let mut stmts = parse_stmts(input);
  assert_eq!(stmts.len(), 1, "expected exactly one statement in {input:?}");
  stmts.remove(0)
}

#[test]
fn test_parser() {
  let mut p = Parser::new("declare const x: number;");
  let cp = p.checkpoint();
  assert_eq!(p.next_tok_i, 0);

  let t = p.peek();
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(t.typ, TT::KeywordDeclare);
  assert_eq!(p.peek_n(2).typ, TT::Identifier);

  let t = p.consume();
  assert_eq!(p.next_tok_i, 1);
  assert_eq!(t.typ, TT::KeywordDeclare);
  assert_eq!(p.prev_end(), 7);

  assert!(!p.consume_if(TT::Identifier).is_match());
  assert!(p.consume_if(TT::KeywordConst).is_match());
  assert_eq!(p.next_tok_i, 2);

  p.restore_checkpoint(cp);
  assert_eq!(p.next_tok_i, 0);
  assert_eq!(p.peek().typ, TT::KeywordDeclare);

  // Consuming past the end keeps returning EOF.
  for _ in 0..10 {
    p.consume();
  }
  assert_eq!(p.consume().typ, TT::EOF);
  assert_eq!(p.peek_n(5).typ, TT::EOF);
}

#[test]
fn string_literal_values_are_unescaped() {
  let p = Parser::new(r#"'it\'s' "a\"b""#);
  let first = p.peek();
  assert_eq!(p.string_literal_value(first.loc), "it's");
  let second = p.peek_n(1);
  assert_eq!(p.string_literal_value(second.loc), "a\"b");
}

#[test]
fn stray_close_brace_is_an_error() {
  let mut p = Parser::new("declare const a: 1;\n}");
  assert!(p.parse_top_level().is_err());
}
