use super::Parser;
use crate::ast::import_export::ExportListStmt;
use crate::ast::import_export::ExportNames;
use crate::ast::import_export::ExportSpecifier;
use crate::ast::import_export::ImportEqualsStmt;
use crate::ast::import_export::ImportEqualsTarget;
use crate::ast::import_export::ImportNames;
use crate::ast::import_export::ImportSpecifier;
use crate::ast::import_export::ImportStmt;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// A module export or import name: an identifier name or, since ES2022, a string literal.
  fn parse_module_name(&mut self) -> SyntaxResult<String> {
    let t = self.peek();
    match t.typ {
      TT::LiteralString => self.require_string_literal(),
      typ if typ.is_identifier_name() => {
        self.consume();
        Ok(self.string(t.loc))
      }
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("module export name"))),
    }
  }

  // `type` inside braces is a modifier unless it is itself the name, as in `{ type }` or `{ type as T }`.
  fn consume_specifier_type_modifier(&mut self) -> bool {
    let next = self.peek_n(1).typ;
    let is_modifier = self.peek_typ() == TT::KeywordType
      && (next == TT::LiteralString || (next.is_identifier_name() && next != TT::KeywordAs));
    if is_modifier {
      self.consume();
    };
    is_modifier
  }

  /// Skips an import attributes clause (`with { type: "json" }`), which never affects declarations.
  fn skip_import_attributes(&mut self) -> SyntaxResult<()> {
    let t = self.peek();
    if matches!(t.typ, TT::Identifier | TT::KeywordAsserts)
      && matches!(self.str(t.loc), "with" | "assert")
      && !t.preceded_by_line_terminator
      && self.peek_n(1).typ == TT::BraceOpen
    {
      self.consume();
      self.skip_balanced()?;
    };
    Ok(())
  }

  fn parse_module_specifier(&mut self) -> SyntaxResult<String> {
    self.require(TT::KeywordFrom)?;
    let module = self.require_string_literal()?;
    self.skip_import_attributes()?;
    Ok(module)
  }

  pub fn parse_import(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.peek().loc.0;
    // `import x = ...` with or without a `type` modifier.
    let (a, b, c) = (self.peek_n(1), self.peek_n(2), self.peek_n(3));
    if (a.typ.is_binding_identifier() && b.typ == TT::Equals)
      || (a.typ == TT::KeywordType && b.typ.is_binding_identifier() && c.typ == TT::Equals)
    {
      return self.parse_import_equals();
    };
    self.require(TT::KeywordImport)?;

    if self.peek_typ() == TT::LiteralString {
      let module = self.require_string_literal()?;
      self.skip_import_attributes()?;
      let _ = self.consume_if(TT::Semicolon);
      return Ok(
        Node::new(self.since(start), ImportStmt {
          type_only: false,
          default: None,
          names: None,
          module,
        })
        .wrap(Stmt::Import),
      );
    };

    let type_only = {
      let (a, b) = (self.peek_n(1), self.peek_n(2));
      let is_modifier = self.peek_typ() == TT::KeywordType
        && (matches!(a.typ, TT::BraceOpen | TT::Asterisk)
          || (a.typ.is_binding_identifier() && a.typ != TT::KeywordFrom)
          || (a.typ == TT::KeywordFrom && b.typ == TT::KeywordFrom));
      if is_modifier {
        self.consume();
      };
      is_modifier
    };

    // `from` is only a default binding name in `import from from "m"`.
    let has_default = match self.peek_typ() {
      TT::KeywordFrom => self.peek_n(1).typ == TT::KeywordFrom,
      typ => typ.is_binding_identifier(),
    };
    let default = match has_default {
      true => Some(self.require_binding_identifier()?.stx.name),
      false => None,
    };
    let names = if default.is_none() || self.consume_if(TT::Comma).is_match() {
      match self.peek_typ() {
        TT::Asterisk => {
          self.consume();
          self.require(TT::KeywordAs)?;
          Some(ImportNames::Namespace(self.require_binding_identifier()?.stx.name))
        }
        TT::BraceOpen => {
          self.consume();
          let mut specifiers = Vec::new();
          while self.peek_typ() != TT::BraceClose {
            let spec_start = self.peek().loc.0;
            let type_only = self.consume_specifier_type_modifier();
            let imported = self.parse_module_name()?;
            let local = match self.consume_if(TT::KeywordAs).is_match() {
              true => self.require_binding_identifier()?.stx.name,
              false => imported.clone(),
            };
            specifiers.push(Node::new(self.since(spec_start), ImportSpecifier {
              type_only,
              imported,
              local,
            }));
            if !self.consume_if(TT::Comma).is_match() {
              break;
            };
          }
          self.require(TT::BraceClose)?;
          Some(ImportNames::Specific(specifiers))
        }
        _ => return Err(self.peek().error(SyntaxErrorType::ExpectedSyntax("import names"))),
      }
    } else {
      None
    };
    let module = self.parse_module_specifier()?;
    let _ = self.consume_if(TT::Semicolon);
    Ok(
      Node::new(self.since(start), ImportStmt {
        type_only,
        default,
        names,
        module,
      })
      .wrap(Stmt::Import),
    )
  }

  /// `[export] import [type] x = require("m")` and `[export] import x = a.b`.
  pub fn parse_import_equals(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.peek().loc.0;
    let export = self.consume_if(TT::KeywordExport).is_match();
    self.require(TT::KeywordImport)?;
    let type_only = self.peek_typ() == TT::KeywordType && self.peek_n(1).typ.is_binding_identifier();
    if type_only {
      self.consume();
    };
    let name = self.require_binding_identifier()?.stx.name;
    self.require(TT::Equals)?;
    let target = match (self.peek_typ(), self.peek_n(1).typ) {
      (TT::KeywordRequire, TT::ParenthesisOpen) => {
        self.consume();
        self.require(TT::ParenthesisOpen)?;
        let module = self.require_string_literal()?;
        self.require(TT::ParenthesisClose)?;
        ImportEqualsTarget::Require(module)
      }
      _ => ImportEqualsTarget::Entity(self.parse_entity_name()?),
    };
    let _ = self.consume_if(TT::Semicolon);
    Ok(
      Node::new(self.since(start), ImportEqualsStmt {
        export,
        type_only,
        name,
        target,
      })
      .wrap(Stmt::ImportEquals),
    )
  }

  /// `export {a as b}`, `export * from "m"`, `export * as ns from "m"` and their `type` forms.
  pub fn parse_export_list(&mut self) -> SyntaxResult<Node<Stmt>> {
    let start = self.require(TT::KeywordExport)?.loc.0;
    let type_only = self.consume_if(TT::KeywordType).is_match();
    let (names, from) = match self.peek_typ() {
      TT::Asterisk => {
        self.consume();
        let alias = match self.consume_if(TT::KeywordAs).is_match() {
          true => Some(self.parse_module_name()?),
          false => None,
        };
        (ExportNames::All(alias), Some(self.parse_module_specifier()?))
      }
      _ => {
        self.require(TT::BraceOpen)?;
        let mut specifiers = Vec::new();
        while self.peek_typ() != TT::BraceClose {
          let spec_start = self.peek().loc.0;
          let type_only = self.consume_specifier_type_modifier();
          let local = self.parse_module_name()?;
          let exported = match self.consume_if(TT::KeywordAs).is_match() {
            true => self.parse_module_name()?,
            false => local.clone(),
          };
          specifiers.push(Node::new(self.since(spec_start), ExportSpecifier {
            type_only,
            local,
            exported,
          }));
          if !self.consume_if(TT::Comma).is_match() {
            break;
          };
        }
        self.require(TT::BraceClose)?;
        let from = match self.peek_typ() {
          TT::KeywordFrom => Some(self.parse_module_specifier()?),
          _ => None,
        };
        (ExportNames::Specific(specifiers), from)
      }
    };
    let _ = self.consume_if(TT::Semicolon);
    Ok(
      Node::new(self.since(start), ExportListStmt {
        type_only,
        names,
        from,
      })
      .wrap(Stmt::ExportList),
    )
  }
}
