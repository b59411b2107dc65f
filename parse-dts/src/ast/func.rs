use super::node::Decorator;
use super::node::Node;
use super::type_expr::TypeExpr;
use crate::loc::Loc;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Accessibility {
  Public,
  Protected,
  Private,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeParameter {
  #[drive(skip)]
  pub const_: bool,
  #[drive(skip)]
  pub in_: bool,
  #[drive(skip)]
  pub out: bool,
  #[drive(skip)]
  pub name: String,
  pub constraint: Option<Node<TypeExpr>>,
  pub default: Option<Node<TypeExpr>>,
}

/// A function or constructor parameter. Destructuring patterns are kept as raw source text in
/// `name`; declaration files only ever need them for display.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Param {
  pub decorators: Vec<Node<Decorator>>,
  #[drive(skip)]
  pub accessibility: Option<Accessibility>,
  #[drive(skip)]
  pub readonly: bool,
  #[drive(skip)]
  pub override_: bool,
  #[drive(skip)]
  pub rest: bool,
  #[drive(skip)]
  pub name: String,
  #[drive(skip)]
  pub optional: bool,
  pub type_annotation: Option<Node<TypeExpr>>,
  // Raw initializer expression, which is never parsed.
  #[drive(skip)]
  pub initializer: Option<Loc>,
}

impl Param {
  /// Parameter properties (`constructor(public x: number)`) declare a class member too.
  pub fn is_parameter_property(&self) -> bool {
    self.accessibility.is_some() || self.readonly || self.override_
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct FuncSignature {
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub parameters: Vec<Node<Param>>,
  pub return_type: Option<Node<TypeExpr>>,
}
