//! Golden text for exported declarations.
//!
//! Declarations are re-emitted from their own tokens, so the output keeps the author's layout.
//! Comments disappear because every token is emitted from the end of its last leading comment.
//! Class and interface bodies lose their non-public members and are put in canonical order.

use crate::bind::ExportedSymbol;
use crate::bind::ModuleSymbols;
use crate::collate::locale_compare;
use crate::diagnostic::DiagnosticSink;
use crate::members::is_public;
use crate::members::sort_members;
use crate::options::SerializationOptions;
use crate::options::StabilityPolicy;
use crate::program::FileId;
use crate::program::Program;
use derive_visitor::Drive;
use derive_visitor::Visitor;
use once_cell::sync::Lazy;
use parse_dts::ast::func::Accessibility;
use parse_dts::ast::func::Param;
use parse_dts::ast::member::ClassMember;
use parse_dts::ast::member::MemberKind;
use parse_dts::ast::node::Decorator;
use parse_dts::ast::node::EntityName;
use parse_dts::ast::node::Node;
use parse_dts::ast::stmt::ClassDecl;
use parse_dts::ast::stmt::EnumMember;
use parse_dts::ast::stmt::Heritage;
use parse_dts::ast::stmt::InterfaceDecl;
use parse_dts::ast::stmt::Stmt;
use parse_dts::ast::type_expr::TypeObject;
use parse_dts::ast::type_expr::TypeQuery;
use parse_dts::ast::type_expr::TypeReference;
use parse_dts::loc::Loc;
use parse_dts::source::SourceFile;
use regex::Regex;

static STABILITY_TAG: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"@(experimental|stable|deprecated)\b").expect("valid stability regex"));

/// Serializes every symbol in locale order, separating blocks with one blank line.
pub fn serialize_exports(
  program: &Program,
  symbols: &[ExportedSymbol],
  options: &SerializationOptions,
  sink: &mut DiagnosticSink,
) -> String {
  let mut sorted: Vec<&ExportedSymbol> = symbols.iter().collect();
  sorted.sort_by(|a, b| locale_compare(&a.name, &b.name));
  let blocks: Vec<String> = sorted
    .into_iter()
    .map(|symbol| serialize_symbol(program, symbol, options, sink))
    .filter(|block| !block.is_empty())
    .collect();
  blocks.join("\n")
}

/// The text block of one symbol, ending in a newline, or an empty string when the symbol is
/// stripped or has nothing exported to show.
pub fn serialize_symbol(
  program: &Program,
  symbol: &ExportedSymbol,
  options: &SerializationOptions,
  sink: &mut DiagnosticSink,
) -> String {
  let name = &symbol.name;
  if options.strips(name) {
    return String::new();
  }
  tracing::debug!(name, "serializing export");
  if symbol.namespace {
    sink.warn(format!("No declaration found for symbol \"{name}\""), symbol.origin.clone());
    return String::new();
  }
  if symbol.is_placeholder() {
    sink.warn(format!("No export declaration found for symbol \"{name}\""), symbol.origin.clone());
    return String::new();
  }

  // Walk up from each declaration to the statement that carries `export`.
  let mut statements: Vec<(FileId, usize)> = Vec::new();
  for decl in &symbol.declarations {
    let stmt = &program.source(decl.file).top_level.stx.body[decl.stmt];
    let exported = stmt.stx.modifiers().is_some_and(|m| m.export);
    if exported && !statements.contains(&(decl.file, decl.stmt)) {
      statements.push((decl.file, decl.stmt));
    }
  }
  if statements.is_empty() {
    let first = symbol.declarations[0];
    sink.warn(
      format!("No export declaration found for symbol \"{name}\""),
      Some(program.position(first.file, first.loc.0)),
    );
    return String::new();
  }

  let mut out = String::new();
  for (i, &(file, index)) in statements.iter().enumerate() {
    let source = program.source(file);
    let stmt = &source.top_level.stx.body[index];
    if i == 0 {
      match stability_tag(source, stmt.loc.0) {
        Some(tag) => {
          out.push_str(&format!("/** @{tag} */\n"));
        }
        None => {
          let message = format!("No stability annotation found for symbol \"{name}\"");
          let position = Some(program.position(file, stmt.loc.0));
          match options.on_stability_missing {
            StabilityPolicy::None => {}
            StabilityPolicy::Warn => sink.warn(message, position),
            StabilityPolicy::Error => sink.error(message, position),
          }
        }
      }
    }
    let mut emitter = Emitter::new(program, file, options, sink);
    emitter.check_module_identifiers(stmt);
    emitter.statement(stmt);
    out.push_str(&strip_empty_lines(emitter.out.trim_start()));
    out.push('\n');
  }
  out
}

/// The stability tag in the comments directly before the token at `offset`.
fn stability_tag(source: &SourceFile, offset: usize) -> Option<String> {
  let token = source.token_at(offset)?;
  source
    .leading_comments(token)
    .iter()
    .rev()
    .find_map(|&comment| STABILITY_TAG.captures(source.text(comment)))
    .map(|caps| caps[1].to_string())
}

pub fn strip_empty_lines(text: &str) -> String {
  text
    .split('\n')
    .filter(|line| !line.trim().is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

struct Emitter<'a, 'h> {
  program: &'a Program<'h>,
  file: FileId,
  source: &'a SourceFile,
  symbols: &'a ModuleSymbols,
  options: &'a SerializationOptions,
  sink: &'a mut DiagnosticSink,
  out: String,
}

impl<'a, 'h> Emitter<'a, 'h> {
  fn new(
    program: &'a Program<'h>,
    file: FileId,
    options: &'a SerializationOptions,
    sink: &'a mut DiagnosticSink,
  ) -> Self {
    Emitter {
      program,
      file,
      source: program.source(file),
      symbols: program.symbols(file),
      options,
      sink,
      out: String::new(),
    }
  }

  fn emit_tokens(&mut self, loc: Loc) {
    self.emit_tokens_except(loc, &[]);
  }

  // The token after a skipped run takes the whitespace that preceded the run.
  fn emit_tokens_except(&mut self, loc: Loc, skipped: &[Loc]) {
    let source = self.source;
    let mut run_space: Option<&str> = None;
    for token in source.tokens_in(loc) {
      if skipped.iter().any(|s| s.0 <= token.loc.0 && token.loc.0 < s.1) {
        if run_space.is_none() {
          run_space = Some(&source.text[source.sanitized_start(token)..token.loc.0]);
        }
        continue;
      }
      match run_space.take() {
        Some(space) => {
          self.out.push_str(space);
          self.out.push_str(source.text(token.loc));
        }
        None => {
          let start = source.sanitized_start(token);
          self.out.push_str(&source.text[start..token.loc.1]);
        }
      }
    }
  }

  fn statement(&mut self, stmt: &Node<Stmt>) {
    let start = self.out.len();
    match stmt.stx.as_ref() {
      Stmt::Class(class) => self.class_like(stmt.loc, class.stx.body, &class.stx.members),
      Stmt::Interface(interface) => {
        self.class_like(stmt.loc, interface.stx.body, &interface.stx.members)
      }
      Stmt::Namespace(namespace) => match &namespace.stx.body {
        Some(body) => {
          self.emit_tokens(Loc(stmt.loc.0, body.loc.0 + 1));
          for nested in &body.stx.body {
            self.statement(nested);
          }
          self.emit_tokens(Loc(body.loc.1 - 1, stmt.loc.1));
        }
        None => self.emit_tokens(stmt.loc),
      },
      _ => self.emit_tokens(stmt.loc),
    }
    self.restore_line_break(start, stmt.loc.0);
  }

  /// A comment on the same line as a declaration takes the line break before it along when it is
  /// dropped. Puts the break and indentation back if the original had one.
  fn restore_line_break(&mut self, start: usize, offset: usize) {
    let source = self.source;
    let Some(token) = source.token_at(offset) else {
      return;
    };
    let trivia = source.text(token.leading_trivia);
    let Some(newline) = trivia.rfind('\n') else {
      return;
    };
    let emitted = &self.out[start..];
    let space = emitted.len() - emitted.trim_start().len();
    if emitted[..space].contains('\n') {
      return;
    }
    let line = &trivia[newline + 1..];
    let indent = &line[..line.len() - line.trim_start().len()];
    let terminator = if trivia[..newline].ends_with('\r') { "\r\n" } else { "\n" };
    self.out.replace_range(start..start + space, &format!("{terminator}{indent}"));
  }

  fn class_like(&mut self, loc: Loc, body: Loc, members: &[Node<ClassMember>]) {
    self.emit_tokens(Loc(loc.0, body.0 + 1));
    let kept = members.iter().filter(|m| is_public(&m.stx));
    for member in sort_members(self.source, kept) {
      self.member(member);
    }
    self.emit_tokens(Loc(body.1 - 1, loc.1));
  }

  fn member(&mut self, member: &Node<ClassMember>) {
    let start = self.out.len();
    match &member.stx.kind {
      MemberKind::Constructor { parameters, .. } => {
        let skipped = private_parameter_ranges(parameters);
        self.emit_tokens_except(member.loc, &skipped);
      }
      _ => self.emit_tokens(member.loc),
    }
    self.restore_line_break(start, member.loc.0);
    let taggable = matches!(
      member.stx.kind,
      MemberKind::Property { .. }
        | MemberKind::Method { .. }
        | MemberKind::Getter { .. }
        | MemberKind::Setter { .. }
        | MemberKind::Constructor { .. }
    );
    if taggable {
      if let Some(tag) = stability_tag(self.source, member.loc.0) {
        let text = &self.out[start..];
        let indent = text.len() - text.trim_start().len();
        self.out.insert_str(start + indent, &format!("/** @{tag} */ "));
      }
    }
  }

  fn check_module_identifiers(&mut self, stmt: &Node<Stmt>) {
    let mut check = ModuleIdentifierCheck::default();
    stmt.drive(&mut check);
    for (name, loc) in check.qualifiers {
      let allowed = self.options.allows_module_identifier(&name)
        || (self.symbols.locals.contains_key(&name) && !self.symbols.is_namespace_import(&name));
      if !allowed {
        self.sink.error(
          format!(
            "Module identifier \"{name}\" is not allowed. Remove it from source or whitelist it via --allowModuleIdentifiers."
          ),
          Some(self.program.position(self.file, loc.0)),
        );
      }
    }
  }
}

// Each run of private parameters is dropped together with one neighbouring comma: the one after
// the run, or the one before it when the run ends the list.
fn private_parameter_ranges(parameters: &[Node<Param>]) -> Vec<Loc> {
  let is_private = |p: &Node<Param>| p.stx.accessibility == Some(Accessibility::Private);
  let mut ranges = Vec::new();
  let mut i = 0;
  while i < parameters.len() {
    if !is_private(&parameters[i]) {
      i += 1;
      continue;
    }
    let mut end = i + 1;
    while end < parameters.len() && is_private(&parameters[end]) {
      end += 1;
    }
    let last = &parameters[end - 1];
    let range = match (parameters.get(end), i.checked_sub(1)) {
      (Some(next), _) => Loc(parameters[i].loc.0, next.loc.0),
      (None, Some(prev)) => Loc(parameters[prev].loc.1, last.loc.1),
      (None, None) => Loc(parameters[i].loc.0, last.loc.1),
    };
    ranges.push(range);
    i = end;
  }
  ranges
}

type ClassDeclNode = Node<ClassDecl>;
type InterfaceDeclNode = Node<InterfaceDecl>;
type TypeObjectNode = Node<TypeObject>;
type ClassMemberNode = Node<ClassMember>;
type ParamNode = Node<Param>;
type TypeReferenceNode = Node<TypeReference>;
type TypeQueryNode = Node<TypeQuery>;
type HeritageNode = Node<Heritage>;
type EnumMemberNode = Node<EnumMember>;
type DecoratorNode = Node<Decorator>;

/// Collects the leftmost identifier of every qualified name that ends up in the output. Members
/// dropped from class and interface bodies are skipped, as are private parameter properties.
#[derive(Default, Visitor)]
#[visitor(
  ClassDeclNode,
  InterfaceDeclNode,
  TypeObjectNode,
  ClassMemberNode,
  ParamNode,
  TypeReferenceNode(enter),
  TypeQueryNode(enter),
  HeritageNode(enter),
  EnumMemberNode(enter),
  DecoratorNode(enter)
)]
struct ModuleIdentifierCheck {
  // Whether each enclosing member list is a class or interface body.
  member_lists: Vec<bool>,
  hidden: Vec<bool>,
  hidden_depth: usize,
  qualifiers: Vec<(String, Loc)>,
}

impl ModuleIdentifierCheck {
  fn push_hidden(&mut self, hidden: bool) {
    self.hidden.push(hidden);
    if hidden {
      self.hidden_depth += 1;
    }
  }

  fn pop_hidden(&mut self) {
    if self.hidden.pop() == Some(true) {
      self.hidden_depth -= 1;
    }
  }

  fn record(&mut self, name: &EntityName) {
    if self.hidden_depth > 0 || !name.is_qualified() {
      return;
    }
    let first = name.leftmost();
    self.qualifiers.push((first.stx.name.clone(), first.loc));
  }

  fn enter_class_decl_node(&mut self, _node: &ClassDeclNode) {
    self.member_lists.push(true);
  }

  fn exit_class_decl_node(&mut self, _node: &ClassDeclNode) {
    self.member_lists.pop();
  }

  fn enter_interface_decl_node(&mut self, _node: &InterfaceDeclNode) {
    self.member_lists.push(true);
  }

  fn exit_interface_decl_node(&mut self, _node: &InterfaceDeclNode) {
    self.member_lists.pop();
  }

  fn enter_type_object_node(&mut self, _node: &TypeObjectNode) {
    self.member_lists.push(false);
  }

  fn exit_type_object_node(&mut self, _node: &TypeObjectNode) {
    self.member_lists.pop();
  }

  fn enter_class_member_node(&mut self, node: &ClassMemberNode) {
    let in_body = self.member_lists.last() == Some(&true);
    self.push_hidden(in_body && !is_public(&node.stx));
  }

  fn exit_class_member_node(&mut self, _node: &ClassMemberNode) {
    self.pop_hidden();
  }

  fn enter_param_node(&mut self, node: &ParamNode) {
    self.push_hidden(node.stx.accessibility == Some(Accessibility::Private));
  }

  fn exit_param_node(&mut self, _node: &ParamNode) {
    self.pop_hidden();
  }

  fn enter_type_reference_node(&mut self, node: &TypeReferenceNode) {
    self.record(&node.stx.name.stx);
  }

  fn enter_type_query_node(&mut self, node: &TypeQueryNode) {
    self.record(&node.stx.name.stx);
  }

  fn enter_heritage_node(&mut self, node: &HeritageNode) {
    if let Some(name) = &node.stx.name {
      self.record(&name.stx);
    }
  }

  fn enter_enum_member_node(&mut self, node: &EnumMemberNode) {
    for name in &node.stx.references {
      self.record(&name.stx);
    }
  }

  fn enter_decorator_node(&mut self, node: &DecoratorNode) {
    self.record(&node.stx.name.stx);
    for name in &node.stx.references {
      self.record(&name.stx);
    }
  }
}
