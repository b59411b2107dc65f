use super::Parser;
use crate::ast::func::Accessibility;
use crate::ast::func::FuncSignature;
use crate::ast::func::Param;
use crate::ast::func::TypeParameter;
use crate::ast::node::Node;
use crate::ast::type_expr::TypeExpr;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Whether a contextual modifier keyword at `peek_n(n)` really is a modifier, given what follows it.
  pub(crate) fn is_param_modifier_at(&self, n: usize) -> bool {
    let next = self.peek_n(n + 1).typ;
    next.is_binding_identifier() || matches!(next, TT::BraceOpen | TT::BracketOpen | TT::DotDotDot)
  }

  pub fn parse_type_parameters_if_present(&mut self) -> SyntaxResult<Vec<Node<TypeParameter>>> {
    if self.peek_typ() != TT::ChevronLeft {
      return Ok(Vec::new());
    };
    self.require(TT::ChevronLeft)?;
    let mut params = Vec::new();
    while self.peek_typ() != TT::ChevronRight {
      let start = self.peek().loc.0;
      let mut const_ = false;
      let mut in_ = false;
      let mut out = false;
      loop {
        let flag = match self.peek_typ() {
          TT::KeywordConst => &mut const_,
          TT::KeywordIn => &mut in_,
          TT::KeywordOut if self.peek_n(1).typ.is_binding_identifier() => &mut out,
          _ => break,
        };
        *flag = true;
        self.consume();
      }
      let name = self.require_binding_identifier()?.stx.name;
      let constraint = match self.consume_if(TT::KeywordExtends).is_match() {
        true => Some(self.parse_type_expr()?),
        false => None,
      };
      let default = match self.consume_if(TT::Equals).is_match() {
        true => Some(self.parse_type_expr()?),
        false => None,
      };
      params.push(Node::new(self.since(start), TypeParameter {
        const_,
        in_,
        out,
        name,
        constraint,
        default,
      }));
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.require(TT::ChevronRight)?;
    Ok(params)
  }

  pub fn parse_type_arguments_if_present(&mut self) -> SyntaxResult<Vec<Node<TypeExpr>>> {
    if self.peek_typ() != TT::ChevronLeft {
      return Ok(Vec::new());
    };
    self.require(TT::ChevronLeft)?;
    let mut args = Vec::new();
    while self.peek_typ() != TT::ChevronRight {
      args.push(self.parse_type_expr()?);
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.require(TT::ChevronRight)?;
    Ok(args)
  }

  pub fn parse_param(&mut self) -> SyntaxResult<Node<Param>> {
    let start = self.peek().loc.0;
    let decorators = self.parse_decorators()?;
    let mut accessibility = None;
    let mut readonly = false;
    let mut override_ = false;
    loop {
      match self.peek_typ() {
        TT::KeywordPublic if self.is_param_modifier_at(0) => accessibility = Some(Accessibility::Public),
        TT::KeywordProtected if self.is_param_modifier_at(0) => {
          accessibility = Some(Accessibility::Protected)
        }
        TT::KeywordPrivate if self.is_param_modifier_at(0) => accessibility = Some(Accessibility::Private),
        TT::KeywordReadonly if self.is_param_modifier_at(0) => readonly = true,
        TT::KeywordOverride if self.is_param_modifier_at(0) => override_ = true,
        _ => break,
      };
      self.consume();
    }
    let rest = self.consume_if(TT::DotDotDot).is_match();
    let name = match self.peek_typ() {
      TT::BraceOpen | TT::BracketOpen => {
        let loc = self.skip_balanced()?;
        self.string(loc)
      }
      TT::KeywordThis => {
        self.consume();
        "this".to_string()
      }
      _ => self.require_binding_identifier()?.stx.name,
    };
    let optional = self.consume_if(TT::Question).is_match();
    let type_annotation = match self.consume_if(TT::Colon).is_match() {
      true => Some(self.parse_type_expr()?),
      false => None,
    };
    let initializer = match self.consume_if(TT::Equals).is_match() {
      true => Some(
        self
          .skip_expression()?
          .ok_or_else(|| self.peek().error(SyntaxErrorType::ExpectedSyntax("initializer")))?,
      ),
      false => None,
    };
    Ok(Node::new(self.since(start), Param {
      decorators,
      accessibility,
      readonly,
      override_,
      rest,
      name,
      optional,
      type_annotation,
      initializer,
    }))
  }

  pub fn parse_params(&mut self) -> SyntaxResult<Vec<Node<Param>>> {
    self.require(TT::ParenthesisOpen)?;
    let mut params = Vec::new();
    while self.peek_typ() != TT::ParenthesisClose {
      params.push(self.parse_param()?);
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
    }
    self.require(TT::ParenthesisClose)?;
    Ok(params)
  }

  /// `<T>(a: A): R`. The return type is optional, as in a declaration or method signature.
  pub fn parse_func_signature(&mut self) -> SyntaxResult<Node<FuncSignature>> {
    let start = self.peek().loc.0;
    let type_parameters = self.parse_type_parameters_if_present()?;
    let parameters = self.parse_params()?;
    let return_type = match self.consume_if(TT::Colon).is_match() {
      true => Some(self.parse_return_type()?),
      false => None,
    };
    Ok(Node::new(self.since(start), FuncSignature {
      type_parameters,
      parameters,
      return_type,
    }))
  }
}
