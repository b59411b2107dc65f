use super::node::EntityName;
use super::node::Node;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportSpecifier {
  #[drive(skip)]
  pub type_only: bool,
  // The name in the other module, which may be a string literal's value.
  #[drive(skip)]
  pub imported: String,
  #[drive(skip)]
  pub local: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ImportNames {
  // `import * as name`
  Namespace(#[drive(skip)] String),
  // `import {a as b, c}`
  Specific(Vec<Node<ImportSpecifier>>),
}

/// `import d, {a as b} from "m"`, `import * as ns from "m"` and the bare `import "m"`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportStmt {
  #[drive(skip)]
  pub type_only: bool,
  #[drive(skip)]
  pub default: Option<String>,
  pub names: Option<ImportNames>,
  #[drive(skip)]
  pub module: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ImportEqualsTarget {
  Require(#[drive(skip)] String),
  Entity(Node<EntityName>),
}

/// `import x = require("m")` and `import x = a.b`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportEqualsStmt {
  #[drive(skip)]
  pub export: bool,
  #[drive(skip)]
  pub type_only: bool,
  #[drive(skip)]
  pub name: String,
  pub target: ImportEqualsTarget,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportSpecifier {
  #[drive(skip)]
  pub type_only: bool,
  #[drive(skip)]
  pub local: String,
  #[drive(skip)]
  pub exported: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ExportNames {
  // `export * from "m"` and `export * as name from "m"`
  All(#[drive(skip)] Option<String>),
  // `export {a as b, c}` with or without `from "m"`
  Specific(Vec<Node<ExportSpecifier>>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportListStmt {
  #[drive(skip)]
  pub type_only: bool,
  pub names: ExportNames,
  #[drive(skip)]
  pub from: Option<String>,
}

/// `export = x` and `export default x` where `x` is an expression rather than a declaration.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportAssignmentStmt {
  #[drive(skip)]
  pub equals: bool,
  // Set when the expression is a lone identifier.
  #[drive(skip)]
  pub identifier: Option<String>,
}
