//! The flattened one-line-per-item form of a module's public API.

use crate::bind::Declaration;
use crate::bind::ExportedSymbol;
use crate::members::is_protected;
use crate::members::is_public;
use crate::members::sort_key;
use crate::members::MemberSortKey;
use crate::program::Program;
use crate::render::raw_text;
use crate::render::render_param;
use crate::render::render_params;
use crate::render::render_type;
use crate::render::render_type_parameters;
use parse_dts::ast::func::Accessibility;
use parse_dts::ast::func::FuncSignature;
use parse_dts::ast::member::ClassMember;
use parse_dts::ast::member::MemberKind;
use parse_dts::ast::node::Node;
use parse_dts::ast::stmt::NamespaceName;
use parse_dts::ast::stmt::Stmt;
use parse_dts::ast::stmt::VarDeclMode;
use parse_dts::source::SourceFile;

/// Lines for every exported symbol, in export order. Placeholders and re-exported namespaces
/// have nothing to show and are skipped.
pub fn public_api_lines(program: &Program, symbols: &[ExportedSymbol]) -> Vec<String> {
  let mut lines = Vec::new();
  for symbol in symbols {
    let Some(decl) = primary_declaration(program, &symbol.declarations) else {
      continue;
    };
    let source = program.source(decl.file);
    let stmt = &source.top_level.stx.body[decl.stmt];
    let before = lines.len();
    match stmt.stx.as_ref() {
      Stmt::Var(var) => {
        let keyword = match var.stx.mode {
          VarDeclMode::Const => "const",
          VarDeclMode::Let | VarDeclMode::Var => "var",
        };
        for declarator in var.stx.declarators.iter().filter(|d| d.loc == decl.loc) {
          lines.push(format!(
            "{keyword} {}:{}",
            declarator.stx.name,
            render_type(source, declarator.stx.type_annotation.as_ref())
          ));
        }
      }
      Stmt::Function(_) => {
        // Every overload is part of the API.
        for overload in &symbol.declarations {
          let source = program.source(overload.file);
          let stmt = &source.top_level.stx.body[overload.stmt];
          if let Stmt::Function(func) = stmt.stx.as_ref() {
            let line = format!("{}{}", symbol.name, signature(source, &func.stx.signature));
            if !lines[before..].contains(&line) {
              lines.push(line);
            }
          }
        }
      }
      Stmt::Class(class) => {
        let name = class.stx.name.as_ref().map_or(symbol.name.as_str(), |n| n.stx.name.as_str());
        lines.push(format!("{name}{}", render_type_parameters(&class.stx.type_parameters)));
        lines.extend(member_lines(source, name, &class.stx.members));
      }
      Stmt::Interface(interface) => {
        let name = interface.stx.name.stx.name.as_str();
        lines.push(format!("{name}{}", render_type_parameters(&interface.stx.type_parameters)));
        lines.extend(member_lines(source, name, &interface.stx.members));
      }
      Stmt::Enum(enum_decl) => {
        let name = enum_decl.stx.name.stx.name.as_str();
        lines.push(name.to_string());
        for member in &enum_decl.stx.members {
          lines.push(format!("{name}.{}", member.stx.name));
        }
      }
      Stmt::TypeAlias(alias) => lines.push(format!(
        "type {}{}={}",
        alias.stx.name.stx.name,
        render_type_parameters(&alias.stx.type_parameters),
        render_type(source, Some(&alias.stx.type_expr))
      )),
      Stmt::Namespace(namespace) => {
        let name = match &namespace.stx.name {
          NamespaceName::Identifier(name) => name.stx.dotted(),
          _ => symbol.name.clone(),
        };
        lines.push(format!("namespace {name}"));
      }
      _ => {}
    }
    tracing::debug!(name = %symbol.name, lines = lines.len() - before, "summarized export");
  }
  lines
}

// Prefers value declarations, so a class merged with an interface shows as the class.
fn primary_declaration(program: &Program, declarations: &[Declaration]) -> Option<Declaration> {
  let is_value = |decl: &&Declaration| {
    let stmt = &program.source(decl.file).top_level.stx.body[decl.stmt];
    !matches!(stmt.stx.as_ref(), Stmt::Interface(_) | Stmt::TypeAlias(_))
  };
  declarations
    .iter()
    .find(is_value)
    .or_else(|| declarations.first())
    .copied()
}

fn signature(source: &SourceFile, signature: &Node<FuncSignature>) -> String {
  format!(
    "({}):{}",
    render_params(source, &signature.stx.parameters),
    render_type(source, signature.stx.return_type.as_ref())
  )
}

fn member_lines(source: &SourceFile, owner: &str, members: &[Node<ClassMember>]) -> Vec<String> {
  let mut keyed: Vec<(MemberSortKey, String)> = Vec::new();
  for member in members.iter().filter(|m| is_public(&m.stx)) {
    let Some(key) = sort_key(source, &member.stx) else {
      continue;
    };
    let m = member.stx.as_ref();
    let name = m.key_text();
    let text = match &m.kind {
      MemberKind::Property {
        type_annotation, ..
      } => format!("{name}:{}", render_type(source, type_annotation.as_ref())),
      MemberKind::Method { signature: sig, .. } => format!("{name}{}", signature(source, sig)),
      MemberKind::Getter { signature, .. } => format!(
        "{name}:{}",
        render_type(source, signature.stx.return_type.as_ref())
      ),
      MemberKind::Setter { signature, .. } => {
        format!("{name}=({})", render_params(source, &signature.stx.parameters))
      }
      MemberKind::Constructor { parameters, .. } => {
        for param in parameters {
          let accessibility = param.stx.accessibility;
          let synthesized = matches!(
            accessibility,
            Some(Accessibility::Public | Accessibility::Protected)
          );
          if !synthesized || param.stx.name.starts_with('_') {
            continue;
          }
          let mut line = format!(
            "{}:{}",
            param.stx.name,
            render_type(source, param.stx.type_annotation.as_ref())
          );
          if let Some(init) = param.stx.initializer {
            line.push('=');
            line.push_str(&raw_text(source, init));
          }
          if accessibility == Some(Accessibility::Protected) {
            line.push_str(" //protected");
          }
          let key = MemberSortKey {
            is_static: false,
            kind_rank: 0,
            display_name: param.stx.name.clone(),
          };
          keyed.push((key, line));
        }
        format!("constructor({})", render_params(source, parameters))
      }
      MemberKind::CallSignature { signature: sig } => signature(source, sig),
      MemberKind::ConstructSignature { signature: sig } => format!("new{}", signature(source, sig)),
      MemberKind::IndexSignature {
        parameter,
        type_annotation,
      } => format!(
        "[{}]:{}",
        render_param(source, parameter),
        render_type(source, type_annotation.as_ref())
      ),
      MemberKind::Semicolon | MemberKind::StaticBlock { .. } => continue,
    };
    let mut line = String::new();
    if m.modifiers.static_ {
      line.push_str("static ");
    }
    line.push_str(&text);
    if is_protected(m) {
      line.push_str(" //protected");
    }
    keyed.push((key, line));
  }
  keyed.sort_by(|a, b| a.0.cmp(&b.0));
  keyed
    .into_iter()
    .map(|(_, line)| format!("{owner}.{line}"))
    .collect()
}
