//! Structural rendering of type positions into short canonical strings.
//!
//! Rendering never looks at other declarations: a reference renders as its rightmost name, and
//! qualifiers are left to the serializer's module-identifier check.

use parse_dts::ast::func::Param;
use parse_dts::ast::func::TypeParameter;
use parse_dts::ast::member::ClassMember;
use parse_dts::ast::member::MemberKind;
use parse_dts::ast::node::Node;
use parse_dts::ast::type_expr::TypeExpr;
use parse_dts::loc::Loc;
use parse_dts::source::SourceFile;

pub fn render_type(source: &SourceFile, ty: Option<&Node<TypeExpr>>) -> String {
  match ty {
    Some(ty) => render(source, ty),
    None => "any".to_string(),
  }
}

fn render(source: &SourceFile, ty: &Node<TypeExpr>) -> String {
  match ty.stx.as_ref() {
    TypeExpr::Keyword(_) => source.text(ty.loc).to_string(),
    TypeExpr::Literal(lit) => lit.stx.raw.clone(),
    TypeExpr::Reference(reference) => {
      let name = &reference.stx.name.stx.rightmost().stx.name;
      if reference.stx.type_arguments.is_empty() {
        name.clone()
      } else {
        format!("{name}<{}>", join(source, &reference.stx.type_arguments, ","))
      }
    }
    TypeExpr::Array(array) => format!("{}[]", render(source, &array.stx.element_type)),
    TypeExpr::Tuple(tuple) => {
      let elements: Vec<String> = tuple
        .stx
        .elements
        .iter()
        .map(|e| {
          let e = e.stx.as_ref();
          let rest = if e.rest { "..." } else { "" };
          let ty = render(source, &e.type_expr);
          match &e.label {
            Some(label) => format!("{rest}{label}{}:{ty}", optional(e.optional)),
            None => format!("{rest}{ty}{}", optional(e.optional)),
          }
        })
        .collect();
      format!("[{}]", elements.join(", "))
    }
    TypeExpr::Union(union) => join(source, &union.stx.types, "|"),
    TypeExpr::Intersection(intersection) => join(source, &intersection.stx.types, "&"),
    TypeExpr::Parenthesized(inner) => format!("({})", render(source, &inner.stx.type_expr)),
    TypeExpr::Object(object) => {
      let members: Vec<String> = object
        .stx
        .members
        .iter()
        .map(|m| render_type_member(source, m))
        .collect();
      format!("{{{}}}", members.join(", "))
    }
    _ => raw_text(source, ty.loc),
  }
}

fn join(source: &SourceFile, types: &[Node<TypeExpr>], sep: &str) -> String {
  types
    .iter()
    .map(|t| render(source, t))
    .collect::<Vec<_>>()
    .join(sep)
}

fn optional(optional: bool) -> &'static str {
  if optional {
    "?"
  } else {
    ""
  }
}

// Members of an object type literal, in the compact `{a:T, b?:U}` form. Call, construct and
// accessor members are rare there and stay verbatim.
fn render_type_member(source: &SourceFile, node: &Node<ClassMember>) -> String {
  let member = node.stx.as_ref();
  let name = member.key_text();
  let opt = optional(member.modifiers.optional);
  match &member.kind {
    MemberKind::Property {
      type_annotation, ..
    } => format!("{name}{opt}:{}", render_type(source, type_annotation.as_ref())),
    MemberKind::Method { signature, .. } => format!(
      "{name}{opt}({}):{}",
      render_params(source, &signature.stx.parameters),
      render_type(source, signature.stx.return_type.as_ref())
    ),
    MemberKind::IndexSignature {
      parameter,
      type_annotation,
    } => format!(
      "[{}]:{}",
      render_param(source, parameter),
      render_type(source, type_annotation.as_ref())
    ),
    _ => raw_text(source, node.loc).trim_end_matches([';', ',']).to_string(),
  }
}

/// Source text with every whitespace run folded to one space.
pub fn raw_text(source: &SourceFile, loc: Loc) -> String {
  source.text(loc).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `name?:type=init`, with `...` in front of rest parameters.
pub fn render_param(source: &SourceFile, param: &Node<Param>) -> String {
  let p = param.stx.as_ref();
  let mut out = String::new();
  if p.rest {
    out.push_str("...");
  }
  out.push_str(&p.name.split_whitespace().collect::<String>());
  out.push_str(optional(p.optional));
  out.push(':');
  out.push_str(&render_type(source, p.type_annotation.as_ref()));
  if let Some(init) = p.initializer {
    out.push('=');
    out.push_str(&raw_text(source, init));
  }
  out
}

pub fn render_params(source: &SourceFile, params: &[Node<Param>]) -> String {
  params
    .iter()
    .map(|p| render_param(source, p))
    .collect::<Vec<_>>()
    .join(", ")
}

/// `<T,U>` from a type parameter list, or nothing for an empty one.
pub fn render_type_parameters(type_parameters: &[Node<TypeParameter>]) -> String {
  if type_parameters.is_empty() {
    return String::new();
  }
  let names: Vec<&str> = type_parameters.iter().map(|t| t.stx.name.as_str()).collect();
  format!("<{}>", names.join(","))
}

#[cfg(test)]
mod tests {
  use super::*;
  use parse_dts::ast::stmt::Stmt;
  use parse_dts::parse;

  fn rendered(ty: &str) -> String {
    let file = parse(&format!("type X = {ty};")).unwrap();
    let Stmt::TypeAlias(alias) = file.top_level.stx.body[0].stx.as_ref() else {
      panic!("expected a type alias");
    };
    render_type(&file, Some(&alias.stx.type_expr))
  }

  #[test]
  fn renders_primitives_and_references() {
    assert_eq!(rendered("string"), "string");
    assert_eq!(rendered("void"), "void");
    assert_eq!(rendered("foo.bar.Baz"), "Baz");
    assert_eq!(rendered("Map<string, Array<number>>"), "Map<string,Array<number>>");
    assert_eq!(rendered("'a'"), "'a'");
  }

  #[test]
  fn renders_compound_types() {
    assert_eq!(rendered("number[][]"), "number[][]");
    assert_eq!(rendered("[string,   number]"), "[string, number]");
    assert_eq!(rendered("[a: string, b?: number, ...rest: any[]]"), "[a:string, b?:number, ...rest:any[]]");
    assert_eq!(rendered("A | B | null"), "A|B|null");
    assert_eq!(rendered("(A & B)[]"), "(A&B)[]");
    assert_eq!(rendered("{ a: string; b?: number; [k: string]: any }"), "{a:string, b?:number, [k:string]:any}");
  }

  #[test]
  fn falls_back_to_folded_source_text() {
    assert_eq!(rendered("(a: string,\n   b: number) => void"), "(a: string, b: number) => void");
    assert_eq!(rendered("keyof   T"), "keyof T");
  }

  #[test]
  fn missing_types_render_as_any() {
    let file = parse("declare function f(a?, ...b: string[], c = 3): void;").unwrap();
    let Stmt::Function(func) = file.top_level.stx.body[0].stx.as_ref() else {
      panic!("expected a function");
    };
    assert_eq!(
      render_params(&file, &func.stx.signature.stx.parameters),
      "a?:any, ...b:string[], c:any=3"
    );
    assert_eq!(render_type(&file, None), "any");
  }
}
