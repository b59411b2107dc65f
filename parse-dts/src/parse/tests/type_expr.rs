use super::super::Parser;
use crate::ast::node::Node;
use crate::ast::type_expr::MappedModifier;
use crate::ast::type_expr::TypeExpr;
use crate::ast::type_expr::TypeOperatorKind;
use crate::token::TT;

fn parse_type(input: &str) -> Node<TypeExpr> {
  let mut parser = Parser::new(input);
  let t = parser.parse_type_expr().unwrap();
  assert_eq!(parser.peek_typ(), TT::EOF, "type did not consume all of {input:?}");
  t
}

#[test]
fn unions_bind_looser_than_arrays() {
  let t = parse_type("string | number[]");
  let TypeExpr::Union(union) = t.stx.as_ref() else {
    panic!("expected union, got {:?}", t);
  };
  assert!(matches!(union.stx.types[0].stx.as_ref(), TypeExpr::Keyword(_)));
  assert!(matches!(union.stx.types[1].stx.as_ref(), TypeExpr::Array(_)));
}

#[test]
fn function_and_parenthesized_types() {
  assert!(matches!(parse_type("(a: string) => void").stx.as_ref(), TypeExpr::Function(_)));
  assert!(matches!(parse_type("() => void").stx.as_ref(), TypeExpr::Function(_)));
  assert!(matches!(parse_type("<T>(t: T) => T").stx.as_ref(), TypeExpr::Function(_)));
  let ctor = parse_type("abstract new () => object");
  let TypeExpr::Function(f) = ctor.stx.as_ref() else {
    panic!("expected constructor type");
  };
  assert!(f.stx.constructor && f.stx.abstract_);
  assert!(matches!(parse_type("(string | number)[]").stx.as_ref(), TypeExpr::Array(_)));
}

#[test]
fn references_and_nested_type_arguments() {
  let t = parse_type("Map<string, Array<ns.Item<T>>>");
  let TypeExpr::Reference(r) = t.stx.as_ref() else {
    panic!("expected reference");
  };
  assert_eq!(r.stx.name.stx.dotted(), "Map");
  assert_eq!(r.stx.type_arguments.len(), 2);
  let TypeExpr::Reference(inner) = r.stx.type_arguments[1].stx.as_ref() else {
    panic!("expected reference");
  };
  let TypeExpr::Reference(item) = inner.stx.type_arguments[0].stx.as_ref() else {
    panic!("expected reference");
  };
  assert_eq!(item.stx.name.stx.dotted(), "ns.Item");
  assert!(item.stx.name.stx.is_qualified());
}

#[test]
fn conditional_with_infer() {
  let t = parse_type("T extends Promise<infer U> ? U : never");
  let TypeExpr::Conditional(c) = t.stx.as_ref() else {
    panic!("expected conditional");
  };
  assert!(matches!(c.stx.false_type.stx.as_ref(), TypeExpr::Keyword(k) if k.stx.keyword == TT::KeywordNever));
}

#[test]
fn mapped_and_object_types() {
  let t = parse_type("{ -readonly [K in keyof T]?: T[K] }");
  let TypeExpr::Mapped(m) = t.stx.as_ref() else {
    panic!("expected mapped type");
  };
  assert_eq!(m.stx.readonly_modifier, Some(MappedModifier::Minus));
  assert_eq!(m.stx.optional_modifier, Some(MappedModifier::Bare));
  assert!(matches!(m.stx.constraint.stx.as_ref(), TypeExpr::Operator(o) if o.stx.operator == TypeOperatorKind::Keyof));
  assert!(matches!(m.stx.type_expr.as_ref().unwrap().stx.as_ref(), TypeExpr::IndexedAccess(_)));

  let t = parse_type("{ a: string; b?(): void }");
  let TypeExpr::Object(o) = t.stx.as_ref() else {
    panic!("expected object type");
  };
  assert_eq!(o.stx.members.len(), 2);
}

#[test]
fn tuples_literals_and_queries() {
  let t = parse_type("[first: string, second?: number, ...rest: boolean[]]");
  let TypeExpr::Tuple(tuple) = t.stx.as_ref() else {
    panic!("expected tuple");
  };
  assert_eq!(tuple.stx.elements.len(), 3);
  assert!(tuple.stx.elements[1].stx.optional);
  assert!(tuple.stx.elements[2].stx.rest);
  assert!(matches!(parse_type("-1").stx.as_ref(), TypeExpr::Literal(l) if l.stx.raw == "-1"));
  assert!(matches!(parse_type("`a${string}`").stx.as_ref(), TypeExpr::Literal(_)));
  assert!(matches!(parse_type("typeof a.b").stx.as_ref(), TypeExpr::Query(_)));
  assert!(matches!(parse_type("import('x').Y<Z>").stx.as_ref(), TypeExpr::Import(_)));
  assert!(matches!(parse_type("unique symbol").stx.as_ref(), TypeExpr::Operator(_)));
}

#[test]
fn type_predicates_in_return_position() {
  let mut p = Parser::new("x is string");
  assert!(matches!(p.parse_return_type().unwrap().stx.as_ref(), TypeExpr::Predicate(pr) if !pr.stx.asserts));
  let mut p = Parser::new("asserts this");
  let t = p.parse_return_type().unwrap();
  let TypeExpr::Predicate(pr) = t.stx.as_ref() else {
    panic!("expected predicate");
  };
  assert!(pr.stx.asserts && pr.stx.type_expr.is_none());
}

#[test]
fn missing_type_is_an_error() {
  let mut p = Parser::new(";");
  assert!(p.parse_type_expr().is_err());
}
