use crate::loc::Loc;
use crate::token::TT;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of syntax errors produced by the parser.
///
/// Codes (prefix `DS`) are assigned per variant:
/// - `DS0001`: [`SyntaxErrorType::ExpectedNotFound`]
/// - `DS0002`: [`SyntaxErrorType::ExpectedSyntax`]
/// - `DS0003`: [`SyntaxErrorType::RequiredTokenNotFound`]
/// - `DS0004`: [`SyntaxErrorType::UnbalancedBrackets`]
/// - `DS0005`: [`SyntaxErrorType::UnexpectedEnd`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedNotFound,
  ExpectedSyntax(&'static str),
  RequiredTokenNotFound(TT),
  UnbalancedBrackets,
  UnexpectedEnd,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }

  pub fn message(&self) -> String {
    self.typ.message(self.actual_token)
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} [token={:?}]", self.typ, self.actual_token)
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxErrorType {
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::ExpectedNotFound => "DS0001",
      SyntaxErrorType::ExpectedSyntax(_) => "DS0002",
      SyntaxErrorType::RequiredTokenNotFound(_) => "DS0003",
      SyntaxErrorType::UnbalancedBrackets => "DS0004",
      SyntaxErrorType::UnexpectedEnd => "DS0005",
    }
  }

  pub fn message(&self, actual_token: Option<TT>) -> String {
    let found = actual_token
      .map(|tok| format!(", found {:?}", tok))
      .unwrap_or_default();
    match self {
      SyntaxErrorType::ExpectedNotFound => format!("expected token not found{found}"),
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {expected}{found}"),
      SyntaxErrorType::RequiredTokenNotFound(token) => format!("expected token {token:?}{found}"),
      SyntaxErrorType::UnbalancedBrackets => "unbalanced brackets".into(),
      SyntaxErrorType::UnexpectedEnd => "unexpected end of input".into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_mention_the_found_token() {
    let err = Loc(3, 4).error(SyntaxErrorType::ExpectedSyntax("type"), Some(TT::Semicolon));
    assert_eq!(err.message(), "expected type, found Semicolon");
    assert_eq!(err.typ.code(), "DS0002");
  }

  #[test]
  fn equality_ignores_location() {
    let a = Loc(0, 1).error(SyntaxErrorType::UnexpectedEnd, None);
    let b = Loc(5, 9).error(SyntaxErrorType::UnexpectedEnd, Some(TT::EOF));
    assert_eq!(a, b);
  }
}
