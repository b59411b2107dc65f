use super::func::FuncSignature;
use super::func::TypeParameter;
use super::import_export::ExportAssignmentStmt;
use super::import_export::ExportListStmt;
use super::import_export::ImportEqualsStmt;
use super::import_export::ImportStmt;
use super::member::ClassMember;
use super::node::EntityName;
use super::node::Ident;
use super::node::Node;
use super::type_expr::TypeExpr;
use crate::loc::Loc;
use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TopLevel {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, From, Serialize)]
#[serde(tag = "$t")]
pub enum Stmt {
  Class(Node<ClassDecl>),
  Interface(Node<InterfaceDecl>),
  Enum(Node<EnumDecl>),
  Function(Node<FuncDecl>),
  Var(Node<VarDecl>),
  TypeAlias(Node<TypeAliasDecl>),
  Namespace(Node<NamespaceDecl>),
  Import(Node<ImportStmt>),
  ImportEquals(Node<ImportEqualsStmt>),
  ExportList(Node<ExportListStmt>),
  ExportAssignment(Node<ExportAssignmentStmt>),
  // Anything else, such as expression statements or a stray `;`, skipped as tokens.
  Other(Node<OtherStmt>),
}

impl Stmt {
  /// Modifiers for declaration statements; `None` for everything else.
  pub fn modifiers(&self) -> Option<StmtModifiers> {
    Some(match self {
      Stmt::Class(n) => n.stx.modifiers,
      Stmt::Interface(n) => n.stx.modifiers,
      Stmt::Enum(n) => n.stx.modifiers,
      Stmt::Function(n) => n.stx.modifiers,
      Stmt::Var(n) => n.stx.modifiers,
      Stmt::TypeAlias(n) => n.stx.modifiers,
      Stmt::Namespace(n) => n.stx.modifiers,
      _ => return None,
    })
  }

  /// Names declared by this statement, with the location of each name.
  pub fn declared_names(&self) -> Vec<(&str, Loc)> {
    fn ident(n: &Node<Ident>) -> (&str, Loc) {
      (n.stx.name.as_str(), n.loc)
    }
    match self {
      Stmt::Class(n) => n.stx.name.iter().map(ident).collect(),
      Stmt::Interface(n) => vec![ident(&n.stx.name)],
      Stmt::Enum(n) => vec![ident(&n.stx.name)],
      Stmt::Function(n) => n.stx.name.iter().map(ident).collect(),
      Stmt::Var(n) => n
        .stx
        .declarators
        .iter()
        .map(|d| (d.stx.name.as_str(), d.loc))
        .collect(),
      Stmt::TypeAlias(n) => vec![ident(&n.stx.name)],
      Stmt::Namespace(n) => match &n.stx.name {
        NamespaceName::Identifier(name) => vec![ident(name.stx.leftmost())],
        _ => Vec::new(),
      },
      _ => Vec::new(),
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StmtModifiers {
  pub export: bool,
  pub default: bool,
  pub declare: bool,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct OtherStmt {}

/// An `extends` or `implements` clause entry.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Heritage {
  pub name: Option<Node<EntityName>>,
  pub type_arguments: Vec<Node<TypeExpr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassDecl {
  #[drive(skip)]
  pub modifiers: StmtModifiers,
  #[drive(skip)]
  pub abstract_: bool,
  // Only anonymous with `export default class {}`.
  pub name: Option<Node<Ident>>,
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub extends: Option<Node<Heritage>>,
  pub implements: Vec<Node<Heritage>>,
  // The braces and everything between them.
  #[drive(skip)]
  pub body: Loc,
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct InterfaceDecl {
  #[drive(skip)]
  pub modifiers: StmtModifiers,
  pub name: Node<Ident>,
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub extends: Vec<Node<Heritage>>,
  #[drive(skip)]
  pub body: Loc,
  pub members: Vec<Node<ClassMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct EnumMember {
  #[drive(skip)]
  pub name: String,
  #[drive(skip)]
  pub initializer: Option<Loc>,
  // Qualified names read by the initializer, such as `foo.B` in `A = foo.B | 1`.
  pub references: Vec<Node<EntityName>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct EnumDecl {
  #[drive(skip)]
  pub modifiers: StmtModifiers,
  #[drive(skip)]
  pub const_: bool,
  pub name: Node<Ident>,
  pub members: Vec<Node<EnumMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct FuncDecl {
  #[drive(skip)]
  pub modifiers: StmtModifiers,
  #[drive(skip)]
  pub async_: bool,
  #[drive(skip)]
  pub generator: bool,
  pub name: Option<Node<Ident>>,
  pub signature: Node<FuncSignature>,
  #[drive(skip)]
  pub body: Option<Loc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VarDeclMode {
  Const,
  Let,
  Var,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct VarDeclarator {
  // Raw text for destructuring patterns.
  #[drive(skip)]
  pub name: String,
  #[drive(skip)]
  pub definite: bool,
  pub type_annotation: Option<Node<TypeExpr>>,
  #[drive(skip)]
  pub initializer: Option<Loc>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct VarDecl {
  #[drive(skip)]
  pub modifiers: StmtModifiers,
  #[drive(skip)]
  pub mode: VarDeclMode,
  pub declarators: Vec<Node<VarDeclarator>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct TypeAliasDecl {
  #[drive(skip)]
  pub modifiers: StmtModifiers,
  pub name: Node<Ident>,
  pub type_parameters: Vec<Node<TypeParameter>>,
  pub type_expr: Node<TypeExpr>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum NamespaceName {
  // `namespace a.b.c`
  Identifier(Node<EntityName>),
  // `module "m"`
  String(#[drive(skip)] String),
  // `declare global`
  Global,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NamespaceKind {
  Namespace,
  Module,
  Global,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct NamespaceBody {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct NamespaceDecl {
  #[drive(skip)]
  pub modifiers: StmtModifiers,
  #[drive(skip)]
  pub kind: NamespaceKind,
  pub name: NamespaceName,
  // Absent for shorthand ambient modules such as `declare module "m";`.
  pub body: Option<Node<NamespaceBody>>,
}
