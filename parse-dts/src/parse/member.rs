use super::Parser;
use crate::ast::func::Accessibility;
use crate::ast::member::ClassMember;
use crate::ast::member::MemberKey;
use crate::ast::member::MemberKind;
use crate::ast::member::MemberModifiers;
use crate::ast::node::Decorator;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MemberContext {
  Class,
  // Interface bodies and object type literals.
  TypeMembers,
}

fn is_constructor_key(key: &MemberKey) -> bool {
  match key {
    MemberKey::Ident(name) => name == "constructor",
    MemberKey::String(raw) => matches!(raw.as_str(), "\"constructor\"" | "'constructor'"),
    _ => false,
  }
}

fn starts_key(typ: TT) -> bool {
  typ.is_identifier_name()
    || matches!(
      typ,
      TT::LiteralString | TT::LiteralNumber | TT::LiteralBigInt | TT::PrivateMember | TT::BracketOpen
    )
}

impl<'a> Parser<'a> {
  /// A modifier keyword is only a modifier if a member key or another modifier follows it on the
  /// same member; `static: number` and `get()` are members named by the keyword.
  fn is_member_modifier_at(&self, n: usize) -> bool {
    let next = self.peek_n(n + 1);
    starts_key(next.typ) || matches!(next.typ, TT::Asterisk | TT::BraceOpen)
  }

  pub fn parse_class_body(&mut self) -> SyntaxResult<(Loc, Vec<Node<ClassMember>>)> {
    self.parse_member_block(MemberContext::Class)
  }

  pub fn parse_interface_body(&mut self) -> SyntaxResult<(Loc, Vec<Node<ClassMember>>)> {
    self.parse_member_block(MemberContext::TypeMembers)
  }

  pub fn parse_member_block(&mut self, ctx: MemberContext) -> SyntaxResult<(Loc, Vec<Node<ClassMember>>)> {
    let start = self.require(TT::BraceOpen)?.loc.0;
    let mut members = Vec::new();
    loop {
      match self.peek_typ() {
        TT::BraceClose => break,
        TT::EOF => return Err(self.peek().error(SyntaxErrorType::UnexpectedEnd)),
        TT::Semicolon if ctx == MemberContext::Class => {
          let t = self.consume();
          members.push(Node::new(t.loc, ClassMember {
            decorators: Vec::new(),
            modifiers: MemberModifiers::default(),
            key: None,
            kind: MemberKind::Semicolon,
          }));
        }
        TT::Semicolon | TT::Comma => {
          self.consume();
        }
        _ => members.push(self.parse_member(ctx)?),
      };
    }
    self.require(TT::BraceClose)?;
    Ok((self.since(start), members))
  }

  fn parse_member_key(&mut self) -> SyntaxResult<Node<MemberKey>> {
    let t = self.peek();
    let key = match t.typ {
      TT::BracketOpen => {
        let loc = self.skip_balanced()?;
        return Ok(Node::new(loc, MemberKey::Computed(self.string(loc))));
      }
      TT::LiteralString => MemberKey::String(self.string(t.loc)),
      TT::LiteralNumber | TT::LiteralBigInt => MemberKey::Number(self.string(t.loc)),
      TT::PrivateMember => MemberKey::Private(self.string(t.loc)),
      typ if typ.is_identifier_name() => MemberKey::Ident(self.string(t.loc)),
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("member name"))),
    };
    self.consume();
    Ok(Node::new(t.loc, key))
  }

  // Members end at a `;` or `,`, which belongs to the member, or at a line break.
  fn finish_member(&mut self) {
    let _ = self.consume_if_pred(|t| matches!(t.typ, TT::Semicolon | TT::Comma));
  }

  fn is_index_signature(&self) -> bool {
    self.peek_typ() == TT::BracketOpen
      && self.peek_n(1).typ.is_binding_identifier()
      && self.peek_n(2).typ == TT::Colon
  }

  /// Decorators are kept for their names only; argument lists are skipped.
  pub fn parse_decorators(&mut self) -> SyntaxResult<Vec<Node<Decorator>>> {
    let mut decorators = Vec::new();
    while self.peek_typ() == TT::At {
      let start = self.consume().loc.0;
      let name = self.parse_entity_name()?;
      let references = match self.peek_typ() {
        TT::ParenthesisOpen => {
          let arguments = self.skip_balanced()?;
          self.qualified_names_in(arguments)
        }
        _ => Vec::new(),
      };
      decorators.push(Node::new(self.since(start), Decorator { name, references }));
    }
    Ok(decorators)
  }

  pub fn parse_member(&mut self, ctx: MemberContext) -> SyntaxResult<Node<ClassMember>> {
    let start = self.peek().loc.0;
    let decorators = self.parse_decorators()?;

    let mut modifiers = MemberModifiers::default();
    loop {
      let typ = self.peek_typ();
      if !self.is_member_modifier_at(0) {
        break;
      };
      match typ {
        TT::KeywordPublic => modifiers.accessibility = Some(Accessibility::Public),
        TT::KeywordProtected => modifiers.accessibility = Some(Accessibility::Protected),
        TT::KeywordPrivate => modifiers.accessibility = Some(Accessibility::Private),
        TT::KeywordStatic if self.peek_n(1).typ == TT::BraceOpen && ctx == MemberContext::Class => {
          self.consume();
          let body = self.skip_balanced()?;
          return Ok(Node::new(self.since(start), ClassMember {
            decorators,
            modifiers,
            key: None,
            kind: MemberKind::StaticBlock { body },
          }));
        }
        TT::KeywordStatic => modifiers.static_ = true,
        TT::KeywordAbstract => modifiers.abstract_ = true,
        TT::KeywordReadonly => modifiers.readonly = true,
        TT::KeywordDeclare => modifiers.declare = true,
        TT::KeywordOverride => modifiers.override_ = true,
        TT::KeywordAccessor => modifiers.accessor = true,
        TT::KeywordAsync => modifiers.async_ = true,
        _ => break,
      };
      self.consume();
    }
    if self.consume_if(TT::Asterisk).is_match() {
      modifiers.generator = true;
    };

    // Signatures without a key.
    let t = self.peek();
    match t.typ {
      TT::ParenthesisOpen | TT::ChevronLeft => {
        let signature = self.parse_func_signature()?;
        let kind = MemberKind::CallSignature { signature };
        return Ok(self.finish_keyless(start, decorators, modifiers, kind));
      }
      TT::KeywordNew
        if ctx == MemberContext::TypeMembers
          && matches!(self.peek_n(1).typ, TT::ParenthesisOpen | TT::ChevronLeft) =>
      {
        self.consume();
        let signature = self.parse_func_signature()?;
        let kind = MemberKind::ConstructSignature { signature };
        return Ok(self.finish_keyless(start, decorators, modifiers, kind));
      }
      _ if self.is_index_signature() => {
        self.consume();
        let parameter = self.parse_param()?;
        self.require(TT::BracketClose)?;
        let type_annotation = match self.consume_if(TT::Colon).is_match() {
          true => Some(self.parse_type_expr()?),
          false => None,
        };
        let kind = MemberKind::IndexSignature {
          parameter,
          type_annotation,
        };
        return Ok(self.finish_keyless(start, decorators, modifiers, kind));
      }
      _ => {}
    };

    // Accessors.
    let accessor = match t.typ {
      TT::KeywordGet | TT::KeywordSet if starts_key(self.peek_n(1).typ) => {
        self.consume();
        Some(t.typ)
      }
      _ => None,
    };

    let key = self.parse_member_key()?;
    if self.consume_if(TT::Question).is_match() {
      modifiers.optional = true;
    };
    if self.consume_if(TT::Exclamation).is_match() {
      modifiers.definite = true;
    };

    if matches!(self.peek_typ(), TT::ParenthesisOpen | TT::ChevronLeft) {
      let is_constructor =
        ctx == MemberContext::Class && accessor.is_none() && is_constructor_key(&key.stx);
      let signature = self.parse_func_signature()?;
      let body = match self.peek_typ() {
        TT::BraceOpen => Some(self.skip_balanced()?),
        _ => None,
      };
      self.finish_member();
      let kind = match accessor {
        Some(TT::KeywordGet) => MemberKind::Getter { signature, body },
        Some(_) => MemberKind::Setter { signature, body },
        None if is_constructor => MemberKind::Constructor {
          parameters: signature.stx.parameters,
          body,
        },
        None => MemberKind::Method { signature, body },
      };
      return Ok(Node::new(self.since(start), ClassMember {
        decorators,
        modifiers,
        key: Some(key),
        kind,
      }));
    };

    if accessor.is_some() {
      return Err(self.peek().error(SyntaxErrorType::RequiredTokenNotFound(TT::ParenthesisOpen)));
    };
    let type_annotation = match self.consume_if(TT::Colon).is_match() {
      true => Some(self.parse_type_expr()?),
      false => None,
    };
    let initializer = match self.consume_if(TT::Equals).is_match() {
      true => self.skip_expression()?,
      false => None,
    };
    self.finish_member();
    Ok(Node::new(self.since(start), ClassMember {
      decorators,
      modifiers,
      key: Some(key),
      kind: MemberKind::Property {
        type_annotation,
        initializer,
      },
    }))
  }

  fn finish_keyless(
    &mut self,
    start: usize,
    decorators: Vec<Node<Decorator>>,
    modifiers: MemberModifiers,
    kind: MemberKind,
  ) -> Node<ClassMember> {
    self.finish_member();
    Node::new(self.since(start), ClassMember {
      decorators,
      modifiers,
      key: None,
      kind,
    })
  }
}
