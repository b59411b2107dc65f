use super::func::FuncSignature;
use super::member::ClassMember;
use super::node::EntityName;
use super::node::Node;
use crate::token::TT;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, From, Serialize)]
#[serde(tag = "$t")]
pub enum TypeExpr {
  Keyword(Node<TypeKeyword>),
  Reference(Node<TypeReference>),
  Literal(Node<TypeLiteral>),
  Array(Node<TypeArray>),
  Tuple(Node<TypeTuple>),
  Union(Node<TypeUnion>),
  Intersection(Node<TypeIntersection>),
  Function(Node<TypeFunction>),
  Object(Node<TypeObject>),
  Mapped(Node<TypeMapped>),
  Parenthesized(Node<TypeParenthesized>),
  Query(Node<TypeQuery>),
  Operator(Node<TypeOperator>),
  IndexedAccess(Node<TypeIndexedAccess>),
  Conditional(Node<TypeConditional>),
  Infer(Node<TypeInfer>),
  Predicate(Node<TypePredicate>),
  Import(Node<TypeImport>),
}

/// `any`, `string`, `this`, `void` and the other keyword types.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeKeyword {
  #[drive(skip)]
  pub keyword: TT,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeReference {
  pub name: Node<EntityName>,
  pub type_arguments: Vec<Node<TypeExpr>>,
}

/// String, number, bigint, boolean, null and template literal types, as raw text. A leading minus
/// sign is included.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeLiteral {
  #[drive(skip)]
  pub raw: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeArray {
  pub element_type: Node<TypeExpr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TupleElement {
  #[drive(skip)]
  pub label: Option<String>,
  #[drive(skip)]
  pub optional: bool,
  #[drive(skip)]
  pub rest: bool,
  pub type_expr: Node<TypeExpr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeTuple {
  pub elements: Vec<Node<TupleElement>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeUnion {
  pub types: Vec<Node<TypeExpr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeIntersection {
  pub types: Vec<Node<TypeExpr>>,
}

/// `(a: A) => R`, `new (a: A) => R` and `abstract new () => R`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeFunction {
  #[drive(skip)]
  pub constructor: bool,
  #[drive(skip)]
  pub abstract_: bool,
  pub signature: Node<FuncSignature>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeObject {
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MappedModifier {
  Plus,
  Minus,
  Bare,
}

/// `{ readonly [K in keyof T as N]?: V }`
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeMapped {
  #[drive(skip)]
  pub readonly_modifier: Option<MappedModifier>,
  #[drive(skip)]
  pub parameter: String,
  pub constraint: Node<TypeExpr>,
  pub name_type: Option<Node<TypeExpr>>,
  #[drive(skip)]
  pub optional_modifier: Option<MappedModifier>,
  pub type_expr: Option<Node<TypeExpr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeParenthesized {
  pub type_expr: Node<TypeExpr>,
}

/// `typeof a.b<T>`
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeQuery {
  pub name: Node<EntityName>,
  pub type_arguments: Vec<Node<TypeExpr>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TypeOperatorKind {
  Keyof,
  Unique,
  Readonly,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeOperator {
  #[drive(skip)]
  pub operator: TypeOperatorKind,
  pub type_expr: Node<TypeExpr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeIndexedAccess {
  pub object_type: Node<TypeExpr>,
  pub index_type: Node<TypeExpr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeConditional {
  pub check_type: Node<TypeExpr>,
  pub extends_type: Node<TypeExpr>,
  pub true_type: Node<TypeExpr>,
  pub false_type: Node<TypeExpr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeInfer {
  #[drive(skip)]
  pub name: String,
  pub constraint: Option<Node<TypeExpr>>,
}

/// `x is T`, `asserts x` and `asserts x is T`, only valid as a return type.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypePredicate {
  #[drive(skip)]
  pub asserts: bool,
  #[drive(skip)]
  pub parameter: String,
  pub type_expr: Option<Node<TypeExpr>>,
}

/// `typeof import("m").A<T>` and `import("m").A<T>`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeImport {
  #[drive(skip)]
  pub typeof_: bool,
  #[drive(skip)]
  pub module: String,
  pub qualifier: Option<Node<EntityName>>,
  pub type_arguments: Vec<Node<TypeExpr>>,
}
