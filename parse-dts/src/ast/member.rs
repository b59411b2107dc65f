use super::func::Accessibility;
use super::func::FuncSignature;
use super::func::Param;
use super::node::Decorator;
use super::node::Node;
use super::type_expr::TypeExpr;
use crate::loc::Loc;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemberModifiers {
  pub accessibility: Option<Accessibility>,
  pub static_: bool,
  pub abstract_: bool,
  pub readonly: bool,
  pub declare: bool,
  pub override_: bool,
  pub accessor: bool,
  pub async_: bool,
  pub generator: bool,
  // `?` after the key.
  pub optional: bool,
  // `!` after the key.
  pub definite: bool,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum MemberKey {
  Ident(#[drive(skip)] String),
  String(#[drive(skip)] String),
  Number(#[drive(skip)] String),
  // `#name`, including the hash.
  Private(#[drive(skip)] String),
  // `[expr]`, kept as the raw source text including brackets.
  Computed(#[drive(skip)] String),
}

impl MemberKey {
  /// The key text used for ordering and display. String keys keep their quotes.
  pub fn text(&self) -> &str {
    match self {
      MemberKey::Ident(t)
      | MemberKey::String(t)
      | MemberKey::Number(t)
      | MemberKey::Private(t)
      | MemberKey::Computed(t) => t,
    }
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum MemberKind {
  Property {
    type_annotation: Option<Node<TypeExpr>>,
    #[drive(skip)]
    initializer: Option<Loc>,
  },
  Method {
    signature: Node<FuncSignature>,
    #[drive(skip)]
    body: Option<Loc>,
  },
  Getter {
    signature: Node<FuncSignature>,
    #[drive(skip)]
    body: Option<Loc>,
  },
  Setter {
    signature: Node<FuncSignature>,
    #[drive(skip)]
    body: Option<Loc>,
  },
  Constructor {
    parameters: Vec<Node<Param>>,
    #[drive(skip)]
    body: Option<Loc>,
  },
  CallSignature {
    signature: Node<FuncSignature>,
  },
  ConstructSignature {
    signature: Node<FuncSignature>,
  },
  IndexSignature {
    parameter: Node<Param>,
    type_annotation: Option<Node<TypeExpr>>,
  },
  // A stray `;` in a class body.
  Semicolon,
  StaticBlock {
    #[drive(skip)]
    body: Loc,
  },
}

/// A member of a class body, interface body or object type literal.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassMember {
  pub decorators: Vec<Node<Decorator>>,
  #[drive(skip)]
  pub modifiers: MemberModifiers,
  pub key: Option<Node<MemberKey>>,
  pub kind: MemberKind,
}

impl ClassMember {
  pub fn is_private(&self) -> bool {
    self.modifiers.accessibility == Some(Accessibility::Private)
      || matches!(self.key.as_ref().map(|k| k.stx.as_ref()), Some(MemberKey::Private(_)))
  }

  pub fn key_text(&self) -> &str {
    self.key.as_ref().map(|k| k.stx.text()).unwrap_or("")
  }
}
