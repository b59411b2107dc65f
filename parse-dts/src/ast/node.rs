use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

#[derive(Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  // Covers the node's tokens only, never its leading trivia.
  #[drive(skip)]
  pub loc: Loc,
  pub stx: Box<S>,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      stx: Box::new(stx),
    }
  }

  pub fn into_stx<T: From<S> + Drive + DriveMut>(self) -> Node<T> {
    Node {
      loc: self.loc,
      stx: Box::new(T::from(*self.stx)),
    }
  }

  /// Maps the syntax, keeping the location.
  pub fn map_stx<T: Drive + DriveMut, F: FnOnce(S) -> T>(self, f: F) -> Node<T> {
    Node {
      loc: self.loc,
      stx: Box::new(f(*self.stx)),
    }
  }

  /// Wraps the node inside another node with the same loc.
  pub fn wrap<T: Drive + DriveMut, F: FnOnce(Node<S>) -> T>(self, f: F) -> Node<T> {
    let loc = self.loc;
    let stx = f(self);
    Node::new(loc, stx)
  }

  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, None)
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

/// An identifier as written, after any keyword-as-name coercion.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Ident {
  #[drive(skip)]
  pub name: String,
}

/// A dotted name such as `a.b.C`. Always has at least one part.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct EntityName {
  pub parts: Vec<Node<Ident>>,
}

impl EntityName {
  pub fn leftmost(&self) -> &Node<Ident> {
    &self.parts[0]
  }

  pub fn rightmost(&self) -> &Node<Ident> {
    &self.parts[self.parts.len() - 1]
  }

  pub fn is_qualified(&self) -> bool {
    self.parts.len() > 1
  }

  pub fn dotted(&self) -> String {
    self
      .parts
      .iter()
      .map(|p| p.stx.name.as_str())
      .collect::<Vec<_>>()
      .join(".")
  }
}

/// `@name` or `@name(...)` before a member or parameter. Arguments are not parsed; only the
/// qualified names read inside them are kept.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Decorator {
  pub name: Node<EntityName>,
  pub references: Vec<Node<EntityName>>,
}
