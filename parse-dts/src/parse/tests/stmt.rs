use super::parse_one;
use super::parse_stmts;
use crate::ast::import_export::ExportNames;
use crate::ast::import_export::ImportEqualsTarget;
use crate::ast::import_export::ImportNames;
use crate::ast::stmt::NamespaceKind;
use crate::ast::stmt::NamespaceName;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::VarDeclMode;
use crate::loc::Loc;

#[test]
fn export_modifiers_are_recorded() {
  let stmt = parse_one("export declare class A<T> extends B<T> implements C, D.E {}");
  assert_eq!(stmt.loc, Loc(0, 59));
  let Stmt::Class(class) = stmt.stx.as_ref() else {
    panic!("expected class, got {:?}", stmt);
  };
  assert!(class.stx.modifiers.export);
  assert!(class.stx.modifiers.declare);
  assert!(!class.stx.modifiers.default);
  assert_eq!(class.stx.name.as_ref().unwrap().stx.name, "A");
  assert_eq!(class.stx.type_parameters.len(), 1);
  let extends = class.stx.extends.as_ref().unwrap();
  assert_eq!(extends.stx.name.as_ref().unwrap().stx.dotted(), "B");
  assert_eq!(extends.stx.type_arguments.len(), 1);
  let implements: Vec<_> = class
    .stx
    .implements
    .iter()
    .map(|h| h.stx.name.as_ref().unwrap().stx.dotted())
    .collect();
  assert_eq!(implements, vec!["C", "D.E"]);
}

#[test]
fn class_extending_a_call_is_opaque() {
  let stmt = parse_one("export class A extends mixin(B, C) {}");
  let Stmt::Class(class) = stmt.stx.as_ref() else {
    panic!("expected class");
  };
  assert!(class.stx.extends.as_ref().unwrap().stx.name.is_none());
}

#[test]
fn default_exports() {
  let stmts = parse_stmts("export default class {}\nexport default foo;\nexport = bar;\nexport default a.b;");
  assert_eq!(stmts.len(), 4);
  let Stmt::Class(class) = stmts[0].stx.as_ref() else {
    panic!("expected class");
  };
  assert!(class.stx.modifiers.default);
  assert!(class.stx.name.is_none());
  let Stmt::ExportAssignment(a) = stmts[1].stx.as_ref() else {
    panic!("expected export assignment");
  };
  assert!(!a.stx.equals);
  assert_eq!(a.stx.identifier.as_deref(), Some("foo"));
  let Stmt::ExportAssignment(b) = stmts[2].stx.as_ref() else {
    panic!("expected export assignment");
  };
  assert!(b.stx.equals);
  assert_eq!(b.stx.identifier.as_deref(), Some("bar"));
  let Stmt::ExportAssignment(c) = stmts[3].stx.as_ref() else {
    panic!("expected export assignment");
  };
  assert_eq!(c.stx.identifier, None);
}

#[test]
fn variables_and_functions() {
  let stmts = parse_stmts(
    "export declare const a: string, b = 1;\nexport let c: number\nexport function f<T>(x?: T, ...rest: any[]): void;\nexport function f(): void { return; }",
  );
  assert_eq!(stmts.len(), 4);
  let Stmt::Var(var) = stmts[0].stx.as_ref() else {
    panic!("expected var");
  };
  assert_eq!(var.stx.mode, VarDeclMode::Const);
  assert_eq!(var.stx.declarators.len(), 2);
  assert!(var.stx.declarators[1].stx.initializer.is_some());
  let Stmt::Var(var) = stmts[1].stx.as_ref() else {
    panic!("expected var");
  };
  assert_eq!(var.stx.mode, VarDeclMode::Let);
  let Stmt::Function(func) = stmts[2].stx.as_ref() else {
    panic!("expected function");
  };
  let params = &func.stx.signature.stx.parameters;
  assert!(params[0].stx.optional);
  assert!(params[1].stx.rest);
  assert!(func.stx.body.is_none());
  let Stmt::Function(func) = stmts[3].stx.as_ref() else {
    panic!("expected function");
  };
  assert!(func.stx.body.is_some());
}

#[test]
fn enums_and_aliases() {
  let stmts = parse_stmts("export declare const enum E { A = 1, 'B', C }\nexport type T<U> = U | null;");
  let Stmt::Enum(e) = stmts[0].stx.as_ref() else {
    panic!("expected enum");
  };
  assert!(e.stx.const_);
  let names: Vec<_> = e.stx.members.iter().map(|m| m.stx.name.as_str()).collect();
  assert_eq!(names, vec!["A", "B", "C"]);
  let Stmt::TypeAlias(alias) = stmts[1].stx.as_ref() else {
    panic!("expected type alias");
  };
  assert_eq!(alias.stx.name.stx.name, "T");
}

#[test]
fn enum_initializers_keep_qualified_names() {
  let stmt = parse_one("declare enum E { A = foo.B | 1, C = D, F = g().h, I = x.y.z }");
  let Stmt::Enum(e) = stmt.stx.as_ref() else {
    panic!("expected enum");
  };
  let references: Vec<Vec<String>> = e
    .stx
    .members
    .iter()
    .map(|m| m.stx.references.iter().map(|r| r.stx.dotted()).collect())
    .collect();
  assert_eq!(references, vec![vec!["foo.B"], vec![], vec![], vec!["x.y.z"]]);
}

#[test]
fn namespaces() {
  let stmts = parse_stmts(
    "export declare namespace a.b { const x: 1; }\ndeclare module 'm' { export interface I {} }\ndeclare global { interface Window {} }\ndeclare module 'shorthand';",
  );
  assert_eq!(stmts.len(), 4);
  let Stmt::Namespace(ns) = stmts[0].stx.as_ref() else {
    panic!("expected namespace");
  };
  assert_eq!(ns.stx.kind, NamespaceKind::Namespace);
  let NamespaceName::Identifier(name) = &ns.stx.name else {
    panic!("expected identifier name");
  };
  assert_eq!(name.stx.dotted(), "a.b");
  assert_eq!(ns.stx.body.as_ref().unwrap().stx.body.len(), 1);
  let Stmt::Namespace(module) = stmts[1].stx.as_ref() else {
    panic!("expected module");
  };
  assert!(matches!(&module.stx.name, NamespaceName::String(m) if m == "m"));
  let Stmt::Namespace(global) = stmts[2].stx.as_ref() else {
    panic!("expected global");
  };
  assert_eq!(global.stx.kind, NamespaceKind::Global);
  let Stmt::Namespace(shorthand) = stmts[3].stx.as_ref() else {
    panic!("expected module");
  };
  assert!(shorthand.stx.body.is_none());
}

#[test]
fn imports() {
  let stmts = parse_stmts(
    "import d, {a as b, type c} from './x';\nimport * as ns from 'y';\nimport type {T} from 'z';\nimport q = require('q');\nimport r = a.b;\nimport 'side';",
  );
  assert_eq!(stmts.len(), 6);
  let Stmt::Import(i) = stmts[0].stx.as_ref() else {
    panic!("expected import");
  };
  assert_eq!(i.stx.default.as_deref(), Some("d"));
  assert_eq!(i.stx.module, "./x");
  let Some(ImportNames::Specific(specs)) = &i.stx.names else {
    panic!("expected named imports");
  };
  assert_eq!(specs[0].stx.imported, "a");
  assert_eq!(specs[0].stx.local, "b");
  assert!(specs[1].stx.type_only);
  assert_eq!(specs[1].stx.local, "c");
  let Stmt::Import(i) = stmts[1].stx.as_ref() else {
    panic!("expected import");
  };
  assert!(matches!(&i.stx.names, Some(ImportNames::Namespace(ns)) if ns == "ns"));
  let Stmt::Import(i) = stmts[2].stx.as_ref() else {
    panic!("expected import");
  };
  assert!(i.stx.type_only);
  let Stmt::ImportEquals(q) = stmts[3].stx.as_ref() else {
    panic!("expected import equals");
  };
  assert!(matches!(&q.stx.target, ImportEqualsTarget::Require(m) if m == "q"));
  let Stmt::ImportEquals(r) = stmts[4].stx.as_ref() else {
    panic!("expected import equals");
  };
  assert!(matches!(&r.stx.target, ImportEqualsTarget::Entity(e) if e.stx.dotted() == "a.b"));
  let Stmt::Import(side) = stmts[5].stx.as_ref() else {
    panic!("expected import");
  };
  assert!(side.stx.names.is_none());
}

#[test]
fn export_lists() {
  let stmts = parse_stmts(
    "export {a, b as c} from './m';\nexport * from './n';\nexport * as ns from './o';\nexport type {T};\nexport as namespace Lib;",
  );
  assert_eq!(stmts.len(), 5);
  let Stmt::ExportList(e) = stmts[0].stx.as_ref() else {
    panic!("expected export list");
  };
  assert_eq!(e.stx.from.as_deref(), Some("./m"));
  let ExportNames::Specific(specs) = &e.stx.names else {
    panic!("expected specifiers");
  };
  assert_eq!(specs[1].stx.local, "b");
  assert_eq!(specs[1].stx.exported, "c");
  let Stmt::ExportList(e) = stmts[1].stx.as_ref() else {
    panic!("expected export list");
  };
  assert!(matches!(e.stx.names, ExportNames::All(None)));
  let Stmt::ExportList(e) = stmts[2].stx.as_ref() else {
    panic!("expected export list");
  };
  assert!(matches!(&e.stx.names, ExportNames::All(Some(ns)) if ns == "ns"));
  let Stmt::ExportList(e) = stmts[3].stx.as_ref() else {
    panic!("expected export list");
  };
  assert!(e.stx.type_only);
  assert!(e.stx.from.is_none());
  assert!(matches!(stmts[4].stx.as_ref(), Stmt::Other(_)));
}

#[test]
fn unmodelled_statements_are_skipped() {
  let stmts = parse_stmts("foo(1, 2);\nif (a) { b }\nexport declare const x: 1;");
  assert_eq!(stmts.len(), 3);
  assert!(matches!(stmts[0].stx.as_ref(), Stmt::Other(_)));
  assert!(matches!(stmts[1].stx.as_ref(), Stmt::Other(_)));
  assert!(matches!(stmts[2].stx.as_ref(), Stmt::Var(_)));
}
