use super::member::MemberContext;
use super::Parser;
use crate::ast::func::FuncSignature;
use crate::ast::node::Node;
use crate::ast::type_expr::MappedModifier;
use crate::ast::type_expr::TupleElement;
use crate::ast::type_expr::TypeArray;
use crate::ast::type_expr::TypeConditional;
use crate::ast::type_expr::TypeExpr;
use crate::ast::type_expr::TypeFunction;
use crate::ast::type_expr::TypeImport;
use crate::ast::type_expr::TypeIndexedAccess;
use crate::ast::type_expr::TypeInfer;
use crate::ast::type_expr::TypeIntersection;
use crate::ast::type_expr::TypeKeyword;
use crate::ast::type_expr::TypeLiteral;
use crate::ast::type_expr::TypeMapped;
use crate::ast::type_expr::TypeObject;
use crate::ast::type_expr::TypeOperator;
use crate::ast::type_expr::TypeOperatorKind;
use crate::ast::type_expr::TypeParenthesized;
use crate::ast::type_expr::TypePredicate;
use crate::ast::type_expr::TypeQuery;
use crate::ast::type_expr::TypeReference;
use crate::ast::type_expr::TypeTuple;
use crate::ast::type_expr::TypeUnion;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

fn is_keyword_type(typ: TT) -> bool {
  matches!(
    typ,
    TT::KeywordAny
      | TT::KeywordBigIntType
      | TT::KeywordBooleanType
      | TT::KeywordNever
      | TT::KeywordNumberType
      | TT::KeywordObjectType
      | TT::KeywordStringType
      | TT::KeywordSymbolType
      | TT::KeywordThis
      | TT::KeywordUndefinedType
      | TT::KeywordUnknown
      | TT::KeywordVoid
  )
}

fn is_literal_type(typ: TT) -> bool {
  matches!(
    typ,
    TT::LiteralBigInt
      | TT::LiteralFalse
      | TT::LiteralNull
      | TT::LiteralNumber
      | TT::LiteralString
      | TT::LiteralTemplate
      | TT::LiteralTrue
  )
}

impl<'a> Parser<'a> {
  fn is_start_of_function_type(&mut self) -> SyntaxResult<bool> {
    match self.peek_typ() {
      TT::ChevronLeft | TT::KeywordNew => return Ok(true),
      TT::KeywordAbstract => return Ok(self.peek_n(1).typ == TT::KeywordNew),
      TT::ParenthesisOpen => {}
      _ => return Ok(false),
    };
    let checkpoint = self.checkpoint();
    let res = self.skip_balanced().map(|_| self.peek_typ() == TT::EqualsChevronRight);
    self.restore_checkpoint(checkpoint);
    res
  }

  pub fn parse_type_expr(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    if self.is_start_of_function_type()? {
      return self.parse_function_type();
    };
    let start = self.peek().loc.0;
    let check_type = self.parse_type_union()?;
    if self.peek_typ() != TT::KeywordExtends || self.peek().preceded_by_line_terminator {
      return Ok(check_type);
    };
    self.consume();
    let extends_type = self.parse_type_union()?;
    self.require(TT::Question)?;
    let true_type = self.parse_type_expr()?;
    self.require(TT::Colon)?;
    let false_type = self.parse_type_expr()?;
    Ok(
      Node::new(self.since(start), TypeConditional {
        check_type,
        extends_type,
        true_type,
        false_type,
      })
      .wrap(TypeExpr::Conditional),
    )
  }

  fn parse_function_type(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.peek().loc.0;
    let abstract_ = self.consume_if(TT::KeywordAbstract).is_match();
    let constructor = self.consume_if(TT::KeywordNew).is_match();
    let sig_start = self.peek().loc.0;
    let type_parameters = self.parse_type_parameters_if_present()?;
    let parameters = self.parse_params()?;
    self.require(TT::EqualsChevronRight)?;
    let return_type = Some(self.parse_return_type()?);
    let signature = Node::new(self.since(sig_start), FuncSignature {
      type_parameters,
      parameters,
      return_type,
    });
    Ok(
      Node::new(self.since(start), TypeFunction {
        constructor,
        abstract_,
        signature,
      })
      .wrap(TypeExpr::Function),
    )
  }

  /// A return type position, which additionally allows type predicates.
  pub fn parse_return_type(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.peek().loc.0;
    let (a, b, c) = (self.peek(), self.peek_n(1), self.peek_n(2));
    let asserts = a.typ == TT::KeywordAsserts
      && (b.typ.is_binding_identifier() || b.typ == TT::KeywordThis)
      && !b.preceded_by_line_terminator;
    let is_predicate = (a.typ.is_binding_identifier() || a.typ == TT::KeywordThis)
      && b.typ == TT::KeywordIs
      && !b.preceded_by_line_terminator;
    if !asserts && !is_predicate {
      return self.parse_type_expr();
    };
    if asserts {
      self.consume();
    };
    let parameter_loc = self.consume().loc;
    let parameter = self.string(parameter_loc);
    let type_expr = match !asserts || c.typ == TT::KeywordIs {
      true => {
        self.require(TT::KeywordIs)?;
        Some(self.parse_type_expr()?)
      }
      false => None,
    };
    Ok(
      Node::new(self.since(start), TypePredicate {
        asserts,
        parameter,
        type_expr,
      })
      .wrap(TypeExpr::Predicate),
    )
  }

  fn parse_type_union(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.peek().loc.0;
    let leading = self.consume_if(TT::Bar).is_match();
    let mut types = vec![self.parse_type_intersection()?];
    while self.consume_if(TT::Bar).is_match() {
      types.push(self.parse_type_intersection_or_function()?);
    }
    if types.len() == 1 && !leading {
      return Ok(types.remove(0));
    };
    Ok(Node::new(self.since(start), TypeUnion { types }).wrap(TypeExpr::Union))
  }

  fn parse_type_intersection_or_function(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    if self.is_start_of_function_type()? {
      return self.parse_function_type();
    };
    self.parse_type_intersection()
  }

  fn parse_type_intersection(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.peek().loc.0;
    let leading = self.consume_if(TT::Ampersand).is_match();
    let mut types = vec![self.parse_type_operator()?];
    while self.consume_if(TT::Ampersand).is_match() {
      types.push(self.parse_type_operator()?);
    }
    if types.len() == 1 && !leading {
      return Ok(types.remove(0));
    };
    Ok(Node::new(self.since(start), TypeIntersection { types }).wrap(TypeExpr::Intersection))
  }

  fn parse_type_operator(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.peek().loc.0;
    let operator = match self.peek_typ() {
      TT::KeywordKeyof => TypeOperatorKind::Keyof,
      TT::KeywordUnique => TypeOperatorKind::Unique,
      TT::KeywordReadonly => TypeOperatorKind::Readonly,
      TT::KeywordInfer => return self.parse_type_infer(),
      _ => return self.parse_type_postfix(),
    };
    self.consume();
    let type_expr = self.parse_type_operator()?;
    Ok(Node::new(self.since(start), TypeOperator { operator, type_expr }).wrap(TypeExpr::Operator))
  }

  fn parse_type_infer(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.require(TT::KeywordInfer)?.loc.0;
    let name = self.require_binding_identifier()?.stx.name;
    // `infer U extends X` only has a constraint if it is not itself the check type of a conditional.
    let mut constraint = None;
    if self.peek_typ() == TT::KeywordExtends {
      let checkpoint = self.checkpoint();
      self.consume();
      let candidate = self.parse_type_union()?;
      if self.peek_typ() == TT::Question {
        self.restore_checkpoint(checkpoint);
      } else {
        constraint = Some(candidate);
      };
    };
    Ok(Node::new(self.since(start), TypeInfer { name, constraint }).wrap(TypeExpr::Infer))
  }

  fn parse_type_postfix(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.peek().loc.0;
    let mut t = self.parse_type_primary()?;
    while self.peek_typ() == TT::BracketOpen && !self.peek().preceded_by_line_terminator {
      self.consume();
      if self.consume_if(TT::BracketClose).is_match() {
        t = Node::new(self.since(start), TypeArray { element_type: t }).wrap(TypeExpr::Array);
      } else {
        let index_type = self.parse_type_expr()?;
        self.require(TT::BracketClose)?;
        t = Node::new(self.since(start), TypeIndexedAccess {
          object_type: t,
          index_type,
        })
        .wrap(TypeExpr::IndexedAccess);
      };
    }
    Ok(t)
  }

  fn is_start_of_mapped_type(&self) -> bool {
    // After `{`.
    let mut n = 1;
    if matches!(self.peek_n(n).typ, TT::Plus | TT::Hyphen) {
      n += 1;
    };
    if self.peek_n(n).typ == TT::KeywordReadonly {
      n += 1;
    };
    self.peek_n(n).typ == TT::BracketOpen
      && self.peek_n(n + 1).typ.is_binding_identifier()
      && self.peek_n(n + 2).typ == TT::KeywordIn
  }

  fn parse_mapped_modifier(&mut self, keyword: TT) -> Option<MappedModifier> {
    let sign = match self.peek_typ() {
      TT::Plus => Some(MappedModifier::Plus),
      TT::Hyphen => Some(MappedModifier::Minus),
      _ => None,
    };
    if sign.is_some() {
      if self.peek_n(1).typ != keyword {
        return None;
      };
      self.consume();
    };
    match self.consume_if(keyword).is_match() {
      true => Some(sign.unwrap_or(MappedModifier::Bare)),
      false => None,
    }
  }

  fn parse_type_mapped(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.require(TT::BraceOpen)?.loc.0;
    let readonly_modifier = self.parse_mapped_modifier(TT::KeywordReadonly);
    self.require(TT::BracketOpen)?;
    let parameter = self.require_binding_identifier()?.stx.name;
    self.require(TT::KeywordIn)?;
    let constraint = self.parse_type_expr()?;
    let name_type = match self.consume_if(TT::KeywordAs).is_match() {
      true => Some(self.parse_type_expr()?),
      false => None,
    };
    self.require(TT::BracketClose)?;
    let optional_modifier = self.parse_mapped_modifier(TT::Question);
    let type_expr = match self.consume_if(TT::Colon).is_match() {
      true => Some(self.parse_type_expr()?),
      false => None,
    };
    let _ = self.consume_if_pred(|t| matches!(t.typ, TT::Semicolon | TT::Comma));
    self.require(TT::BraceClose)?;
    Ok(
      Node::new(self.since(start), TypeMapped {
        readonly_modifier,
        parameter,
        constraint,
        name_type,
        optional_modifier,
        type_expr,
      })
      .wrap(TypeExpr::Mapped),
    )
  }

  fn parse_tuple_element(&mut self) -> SyntaxResult<Node<TupleElement>> {
    let start = self.peek().loc.0;
    let rest = self.consume_if(TT::DotDotDot).is_match();
    let (a, b, c) = (self.peek(), self.peek_n(1), self.peek_n(2));
    let labelled = a.typ.is_identifier_name()
      && (b.typ == TT::Colon || (b.typ == TT::Question && c.typ == TT::Colon));
    let mut optional = false;
    let label = match labelled {
      true => {
        let label = self.require_identifier_name()?.stx.name;
        optional = self.consume_if(TT::Question).is_match();
        self.require(TT::Colon)?;
        Some(label)
      }
      false => None,
    };
    let type_expr = self.parse_type_expr()?;
    if label.is_none() && self.consume_if(TT::Question).is_match() {
      optional = true;
    };
    Ok(Node::new(self.since(start), TupleElement {
      label,
      optional,
      rest,
      type_expr,
    }))
  }

  fn parse_type_import(&mut self, typeof_: bool) -> SyntaxResult<Node<TypeExpr>> {
    let start = self.peek().loc.0;
    if typeof_ {
      self.require(TT::KeywordTypeof)?;
    };
    self.require(TT::KeywordImport)?;
    self.require(TT::ParenthesisOpen)?;
    let module = self.require_string_literal()?;
    self.require(TT::ParenthesisClose)?;
    let qualifier = match self.consume_if(TT::Dot).is_match() {
      true => Some(self.parse_entity_name()?),
      false => None,
    };
    let type_arguments = self.parse_type_arguments_if_present()?;
    Ok(
      Node::new(self.since(start), TypeImport {
        typeof_,
        module,
        qualifier,
        type_arguments,
      })
      .wrap(TypeExpr::Import),
    )
  }

  fn parse_type_primary(&mut self) -> SyntaxResult<Node<TypeExpr>> {
    let t = self.peek();
    let start = t.loc.0;
    match t.typ {
      TT::ParenthesisOpen => {
        self.consume();
        let type_expr = self.parse_type_expr()?;
        self.require(TT::ParenthesisClose)?;
        Ok(Node::new(self.since(start), TypeParenthesized { type_expr }).wrap(TypeExpr::Parenthesized))
      }
      TT::BraceOpen if self.is_start_of_mapped_type() => self.parse_type_mapped(),
      TT::BraceOpen => {
        let (_, members) = self.parse_member_block(MemberContext::TypeMembers)?;
        Ok(Node::new(self.since(start), TypeObject { members }).wrap(TypeExpr::Object))
      }
      TT::BracketOpen => {
        self.consume();
        let mut elements = Vec::new();
        while self.peek_typ() != TT::BracketClose {
          elements.push(self.parse_tuple_element()?);
          if !self.consume_if(TT::Comma).is_match() {
            break;
          };
        }
        self.require(TT::BracketClose)?;
        Ok(Node::new(self.since(start), TypeTuple { elements }).wrap(TypeExpr::Tuple))
      }
      TT::KeywordTypeof if self.peek_n(1).typ == TT::KeywordImport => self.parse_type_import(true),
      TT::KeywordTypeof => {
        self.consume();
        let name = self.parse_entity_name()?;
        let type_arguments = match self.peek().preceded_by_line_terminator {
          true => Vec::new(),
          false => self.parse_type_arguments_if_present()?,
        };
        Ok(Node::new(self.since(start), TypeQuery { name, type_arguments }).wrap(TypeExpr::Query))
      }
      TT::KeywordImport => self.parse_type_import(false),
      TT::Hyphen if matches!(self.peek_n(1).typ, TT::LiteralNumber | TT::LiteralBigInt) => {
        self.consume();
        self.consume();
        Ok(
          Node::new(self.since(start), TypeLiteral {
            raw: self.string(self.since(start)),
          })
          .wrap(TypeExpr::Literal),
        )
      }
      typ if is_literal_type(typ) => {
        self.consume();
        Ok(Node::new(t.loc, TypeLiteral { raw: self.string(t.loc) }).wrap(TypeExpr::Literal))
      }
      // `this.x` is a qualified name rather than the `this` type.
      typ if is_keyword_type(typ) && self.peek_n(1).typ != TT::Dot => {
        self.consume();
        Ok(Node::new(t.loc, TypeKeyword { keyword: typ }).wrap(TypeExpr::Keyword))
      }
      typ if typ.is_identifier_name() => {
        let name = self.parse_entity_name()?;
        let type_arguments = self.parse_type_arguments_if_present()?;
        Ok(Node::new(self.since(start), TypeReference { name, type_arguments }).wrap(TypeExpr::Reference))
      }
      TT::EOF => Err(t.error(SyntaxErrorType::UnexpectedEnd)),
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("type"))),
    }
  }
}
