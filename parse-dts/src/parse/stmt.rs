use super::Parser;
use crate::ast::import_export::ExportAssignmentStmt;
use crate::ast::node::EntityName;
use crate::ast::node::Node;
use crate::ast::stmt::ClassDecl;
use crate::ast::stmt::EnumDecl;
use crate::ast::stmt::EnumMember;
use crate::ast::stmt::FuncDecl;
use crate::ast::stmt::Heritage;
use crate::ast::stmt::InterfaceDecl;
use crate::ast::stmt::NamespaceBody;
use crate::ast::stmt::NamespaceDecl;
use crate::ast::stmt::NamespaceKind;
use crate::ast::stmt::NamespaceName;
use crate::ast::stmt::OtherStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::StmtModifiers;
use crate::ast::stmt::TypeAliasDecl;
use crate::ast::stmt::VarDecl;
use crate::ast::stmt::VarDeclMode;
use crate::ast::stmt::VarDeclarator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Whether the next tokens start a declaration, once any `export`/`declare`/`default` modifiers
  /// have been consumed.
  fn at_declaration(&self) -> bool {
    let (a, b) = (self.peek(), self.peek_n(1));
    match a.typ {
      TT::KeywordClass | TT::KeywordFunction | TT::KeywordEnum => true,
      TT::KeywordVar | TT::KeywordLet | TT::KeywordConst => true,
      TT::KeywordAbstract => b.typ == TT::KeywordClass && !b.preceded_by_line_terminator,
      TT::KeywordAsync => b.typ == TT::KeywordFunction && !b.preceded_by_line_terminator,
      TT::KeywordInterface | TT::KeywordType => {
        b.typ.is_binding_identifier() && !b.preceded_by_line_terminator
      }
      TT::KeywordNamespace | TT::KeywordModule => {
        (b.typ.is_binding_identifier() || b.typ == TT::LiteralString)
          && !b.preceded_by_line_terminator
      }
      TT::KeywordGlobal => b.typ == TT::BraceOpen,
      _ => false,
    }
  }

  /// Declarations that can follow `export default`; anything else is an expression.
  fn at_default_declaration(&self) -> bool {
    let (a, b) = (self.peek(), self.peek_n(1));
    match a.typ {
      TT::KeywordClass | TT::KeywordFunction => true,
      TT::KeywordAbstract => b.typ == TT::KeywordClass,
      TT::KeywordAsync => b.typ == TT::KeywordFunction && !b.preceded_by_line_terminator,
      TT::KeywordInterface => b.typ.is_binding_identifier(),
      _ => false,
    }
  }

  pub fn parse_stmt(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.peek().loc.0;
    let mut modifiers = StmtModifiers::default();
    match self.peek_typ() {
      TT::KeywordExport => {
        let next = self.peek_n(1).typ;
        match next {
          TT::Equals => return self.parse_export_assignment(),
          TT::Asterisk | TT::BraceOpen => return self.parse_export_list(),
          TT::KeywordType if matches!(self.peek_n(2).typ, TT::BraceOpen | TT::Asterisk) => {
            return self.parse_export_list()
          }
          TT::KeywordImport => return self.parse_import_equals(),
          TT::KeywordAs => {
            // `export as namespace Foo;`
            let loc = self.skip_statement()?;
            return Ok(Node::new(loc, OtherStmt {}).wrap(Stmt::from));
          }
          TT::KeywordDefault => {
            self.consume();
            self.consume();
            modifiers.export = true;
            modifiers.default = true;
            if !self.at_default_declaration() {
              return self.parse_export_default_expression(start);
            };
          }
          _ => {
            self.consume();
            modifiers.export = true;
          }
        };
      }
      TT::KeywordImport if !matches!(self.peek_n(1).typ, TT::ParenthesisOpen | TT::Dot) => {
        return self.parse_import();
      }
      _ => {}
    };
    if self.peek_typ() == TT::KeywordDeclare {
      let checkpoint = self.checkpoint();
      self.consume();
      if self.at_declaration() && !self.peek().preceded_by_line_terminator {
        modifiers.declare = true;
      } else {
        self.restore_checkpoint(checkpoint);
      };
    };
    if !self.at_declaration() {
      if modifiers.export || modifiers.declare {
        return Err(self.peek().error(SyntaxErrorType::ExpectedSyntax("declaration")));
      };
      let loc = self.skip_statement()?;
      return Ok(Node::new(loc, OtherStmt {}).wrap(Stmt::from));
    };
    self.parse_declaration(start, modifiers)
  }

  fn parse_declaration(&mut self, start: usize, modifiers: StmtModifiers) -> SyntaxResult<Node<Stmt>> {
    Ok(match self.peek_typ() {
      TT::KeywordClass | TT::KeywordAbstract => self.parse_class(start, modifiers)?.wrap(Stmt::Class),
      TT::KeywordInterface => self.parse_interface(start, modifiers)?.wrap(Stmt::Interface),
      TT::KeywordEnum => self.parse_enum(start, modifiers)?.wrap(Stmt::Enum),
      TT::KeywordConst if self.peek_n(1).typ == TT::KeywordEnum => {
        self.parse_enum(start, modifiers)?.wrap(Stmt::Enum)
      }
      TT::KeywordFunction | TT::KeywordAsync => self.parse_function(start, modifiers)?.wrap(Stmt::Function),
      TT::KeywordVar | TT::KeywordLet | TT::KeywordConst => self.parse_var(start, modifiers)?.wrap(Stmt::Var),
      TT::KeywordType => self.parse_type_alias(start, modifiers)?.wrap(Stmt::TypeAlias),
      TT::KeywordNamespace | TT::KeywordModule | TT::KeywordGlobal => {
        self.parse_namespace(start, modifiers)?.wrap(Stmt::Namespace)
      }
      _ => return Err(self.peek().error(SyntaxErrorType::ExpectedSyntax("declaration"))),
    })
  }

  fn parse_export_assignment(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordExport)?.loc.0;
    self.require(TT::Equals)?;
    self.finish_export_expression(start, true)
  }

  fn parse_export_default_expression(&mut self, start: usize) -> SyntaxResult<Node<Stmt>> {
    self.finish_export_expression(start, false)
  }

  fn finish_export_expression(&mut self, start: usize, equals: bool) -> SyntaxResult<Node<Stmt>> {
    let first = self.peek();
    let expr = self.skip_expression()?;
    let identifier = match expr {
      Some(loc) if first.typ.is_identifier_name() && loc == first.loc => Some(self.string(loc)),
      Some(_) => None,
      None => return Err(first.error(SyntaxErrorType::ExpectedSyntax("expression"))),
    };
    let _ = self.consume_if(TT::Semicolon);
    Ok(
      Node::new(self.since(start), ExportAssignmentStmt { equals, identifier })
        .wrap(Stmt::ExportAssignment),
    )
  }

  /// Class `extends` clauses take an arbitrary expression. Anything beyond a type reference is
  /// skipped and recorded without a name.
  fn parse_class_heritage(&mut self) -> SyntaxResult<Node<Heritage>> {
    let start = self.peek().loc.0;
    let checkpoint = self.checkpoint();
    if self.peek().typ.is_identifier_name() {
      let name = self.parse_entity_name()?;
      let type_arguments = self.parse_type_arguments_if_present()?;
      if matches!(self.peek_typ(), TT::BraceOpen | TT::KeywordImplements | TT::Comma) {
        return Ok(Node::new(self.since(start), Heritage {
          name: Some(name),
          type_arguments,
        }));
      };
    };
    self.restore_checkpoint(checkpoint);
    while !matches!(self.peek_typ(), TT::BraceOpen | TT::KeywordImplements | TT::EOF) {
      if self.peek().typ.is_open_bracket() {
        self.skip_balanced()?;
      } else {
        self.consume();
      };
    }
    Ok(Node::new(self.since(start), Heritage {
      name: None,
      type_arguments: Vec::new(),
    }))
  }

  fn parse_heritage(&mut self) -> SyntaxResult<Node<Heritage>> {
    let start = self.peek().loc.0;
    let name = self.parse_entity_name()?;
    let type_arguments = self.parse_type_arguments_if_present()?;
    Ok(Node::new(self.since(start), Heritage {
      name: Some(name),
      type_arguments,
    }))
  }

  fn parse_heritage_list(&mut self) -> SyntaxResult<Vec<Node<Heritage>>> {
    let mut list = vec![self.parse_heritage()?];
    while self.consume_if(TT::Comma).is_match() {
      list.push(self.parse_heritage()?);
    }
    Ok(list)
  }

  pub fn parse_class(&mut self, start: usize, modifiers: StmtModifiers) -> SyntaxResult<Node<ClassDecl>> {
    let abstract_ = self.consume_if(TT::KeywordAbstract).is_match();
    self.require(TT::KeywordClass)?;
    let name = match self.peek() {
      t if t.typ.is_binding_identifier() && t.typ != TT::KeywordImplements => {
        Some(self.require_binding_identifier()?)
      }
      _ => None,
    };
    if name.is_none() && !modifiers.default {
      return Err(self.peek().error(SyntaxErrorType::ExpectedSyntax("class name")));
    };
    let type_parameters = self.parse_type_parameters_if_present()?;
    let extends = match self.consume_if(TT::KeywordExtends).is_match() {
      true => Some(self.parse_class_heritage()?),
      false => None,
    };
    let implements = match self.consume_if(TT::KeywordImplements).is_match() {
      true => self.parse_heritage_list()?,
      false => Vec::new(),
    };
    let (body, members) = self.parse_class_body()?;
    Ok(Node::new(self.since(start), ClassDecl {
      modifiers,
      abstract_,
      name,
      type_parameters,
      extends,
      implements,
      body,
      members,
    }))
  }

  pub fn parse_interface(
    &mut self,
    start: usize,
    modifiers: StmtModifiers,
  ) -> SyntaxResult<Node<InterfaceDecl>> {
    self.require(TT::KeywordInterface)?;
    let name = self.require_binding_identifier()?;
    let type_parameters = self.parse_type_parameters_if_present()?;
    let extends = match self.consume_if(TT::KeywordExtends).is_match() {
      true => self.parse_heritage_list()?,
      false => Vec::new(),
    };
    let (body, members) = self.parse_interface_body()?;
    Ok(Node::new(self.since(start), InterfaceDecl {
      modifiers,
      name,
      type_parameters,
      extends,
      body,
      members,
    }))
  }

  pub fn parse_enum(&mut self, start: usize, modifiers: StmtModifiers) -> SyntaxResult<Node<EnumDecl>> {
    let const_ = self.consume_if(TT::KeywordConst).is_match();
    self.require(TT::KeywordEnum)?;
    let name = self.require_binding_identifier()?;
    self.require(TT::BraceOpen)?;
    let mut members = Vec::new();
    while self.peek_typ() != TT::BraceClose {
      let t = self.peek();
      let name = match t.typ {
        TT::BracketOpen => {
          let loc = self.skip_balanced()?;
          self.string(loc)
        }
        TT::LiteralString => self.require_string_literal()?,
        typ if typ.is_identifier_name() || typ == TT::LiteralNumber => {
          self.consume();
          self.string(t.loc)
        }
        _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("enum member"))),
      };
      let initializer = match self.consume_if(TT::Equals).is_match() {
        true => self.skip_expression()?,
        false => None,
      };
      let references = initializer.map(|loc| self.qualified_names_in(loc)).unwrap_or_default();
      members.push(Node::new(self.since(t.loc.0), EnumMember {
        name,
        initializer,
        references,
      }));
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.require(TT::BraceClose)?;
    Ok(Node::new(self.since(start), EnumDecl {
      modifiers,
      const_,
      name,
      members,
    }))
  }

  pub fn parse_function(&mut self, start: usize, modifiers: StmtModifiers) -> SyntaxResult<Node<FuncDecl>> {
    let async_ = self.consume_if(TT::KeywordAsync).is_match();
    self.require(TT::KeywordFunction)?;
    let generator = self.consume_if(TT::Asterisk).is_match();
    let name = match self.peek().typ.is_binding_identifier() {
      true => Some(self.require_binding_identifier()?),
      false if modifiers.default => None,
      false => return Err(self.peek().error(SyntaxErrorType::ExpectedSyntax("function name"))),
    };
    let signature = self.parse_func_signature()?;
    let body = match self.peek_typ() {
      TT::BraceOpen => Some(self.skip_balanced()?),
      _ => {
        let _ = self.consume_if(TT::Semicolon);
        None
      }
    };
    Ok(Node::new(self.since(start), FuncDecl {
      modifiers,
      async_,
      generator,
      name,
      signature,
      body,
    }))
  }

  pub fn parse_var(&mut self, start: usize, modifiers: StmtModifiers) -> SyntaxResult<Node<VarDecl>> {
    let mode = match self.consume().typ {
      TT::KeywordConst => VarDeclMode::Const,
      TT::KeywordLet => VarDeclMode::Let,
      _ => VarDeclMode::Var,
    };
    let mut declarators = Vec::new();
    loop {
      let decl_start = self.peek().loc.0;
      let name = match self.peek_typ() {
        TT::BraceOpen | TT::BracketOpen => {
          let loc = self.skip_balanced()?;
          self.string(loc)
        }
        _ => self.require_binding_identifier()?.stx.name,
      };
      let definite = self.consume_if(TT::Exclamation).is_match();
      let type_annotation = match self.consume_if(TT::Colon).is_match() {
        true => Some(self.parse_type_expr()?),
        false => None,
      };
      let initializer = match self.consume_if(TT::Equals).is_match() {
        true => self.skip_expression()?,
        false => None,
      };
      declarators.push(Node::new(self.since(decl_start), VarDeclarator {
        name,
        definite,
        type_annotation,
        initializer,
      }));
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    let _ = self.consume_if(TT::Semicolon);
    Ok(Node::new(self.since(start), VarDecl {
      modifiers,
      mode,
      declarators,
    }))
  }

  pub fn parse_type_alias(
    &mut self,
    start: usize,
    modifiers: StmtModifiers,
  ) -> SyntaxResult<Node<TypeAliasDecl>> {
    self.require(TT::KeywordType)?;
    let name = self.require_binding_identifier()?;
    let type_parameters = self.parse_type_parameters_if_present()?;
    self.require(TT::Equals)?;
    let type_expr = self.parse_type_expr()?;
    let _ = self.consume_if(TT::Semicolon);
    Ok(Node::new(self.since(start), TypeAliasDecl {
      modifiers,
      name,
      type_parameters,
      type_expr,
    }))
  }

  pub fn parse_namespace(
    &mut self,
    start: usize,
    modifiers: StmtModifiers,
  ) -> SyntaxResult<Node<NamespaceDecl>> {
    let keyword = self.consume();
    let (kind, name) = match keyword.typ {
      TT::KeywordGlobal => (NamespaceKind::Global, NamespaceName::Global),
      typ => {
        let kind = match typ {
          TT::KeywordModule => NamespaceKind::Module,
          _ => NamespaceKind::Namespace,
        };
        let name = match self.peek_typ() {
          TT::LiteralString => NamespaceName::String(self.require_string_literal()?),
          _ => {
            let name_start = self.peek().loc.0;
            let mut parts = vec![self.require_binding_identifier()?];
            while self.consume_if(TT::Dot).is_match() {
              parts.push(self.require_identifier_name()?);
            }
            NamespaceName::Identifier(Node::new(self.since(name_start), EntityName { parts }))
          }
        };
        (kind, name)
      }
    };
    let body = match self.peek_typ() {
      TT::BraceOpen => {
        let body_start = self.consume().loc.0;
        let mut body = Vec::new();
        while !matches!(self.peek_typ(), TT::BraceClose | TT::EOF) {
          body.push(self.parse_stmt()?);
        }
        self.require(TT::BraceClose)?;
        Some(Node::new(self.since(body_start), NamespaceBody { body }))
      }
      _ => {
        let _ = self.consume_if(TT::Semicolon);
        None
      }
    };
    Ok(Node::new(self.since(start), NamespaceDecl {
      modifiers,
      kind,
      name,
      body,
    }))
  }
}
