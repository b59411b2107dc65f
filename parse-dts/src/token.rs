use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::lex::KEYWORDS_MAPPING;
use crate::loc::Loc;
use ahash::HashSet;
use ahash::HashSetExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token used to represent the end of the source code.
  EOF,
  // Source text that could not be lexed (unterminated string, stray character). The parser decides whether it matters.
  Invalid,
  // These are only used by the lexer.
  CommentMultiline,
  CommentSingle,
  LineTerminator,
  Whitespace,

  Ampersand,
  Asterisk,
  At,
  Bar,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  Caret,
  // `>` is always its own token; nested type argument lists rely on this.
  ChevronLeft,
  ChevronRight,
  Colon,
  Comma,
  Dot,
  DotDotDot,
  Equals,
  EqualsChevronRight,
  Exclamation,
  Hyphen,
  Identifier,
  KeywordAbstract,
  KeywordAccessor,
  KeywordAny,
  KeywordAs,
  KeywordAsserts,
  KeywordAsync,
  KeywordBigIntType,
  KeywordBooleanType,
  KeywordClass,
  KeywordConst,
  KeywordConstructor,
  KeywordDeclare,
  KeywordDefault,
  KeywordEnum,
  KeywordExport,
  KeywordExtends,
  KeywordFrom,
  KeywordFunction,
  KeywordGet,
  KeywordGlobal,
  KeywordImplements,
  KeywordImport,
  KeywordIn,
  KeywordInfer,
  KeywordInterface,
  KeywordIs,
  KeywordKeyof,
  KeywordLet,
  KeywordModule,
  KeywordNamespace,
  KeywordNever,
  KeywordNew,
  KeywordNumberType,
  KeywordObjectType,
  KeywordOut,
  KeywordOverride,
  KeywordPrivate,
  KeywordProtected,
  KeywordPublic,
  KeywordReadonly,
  KeywordRequire,
  KeywordSet,
  KeywordStatic,
  KeywordStringType,
  KeywordSymbolType,
  KeywordThis,
  KeywordType,
  KeywordTypeof,
  KeywordUndefinedType,
  KeywordUnique,
  KeywordUnknown,
  KeywordVar,
  KeywordVoid,
  LiteralBigInt,
  LiteralFalse,
  LiteralNull,
  LiteralNumber,
  LiteralString,
  LiteralTemplate,
  LiteralTrue,
  ParenthesisClose,
  ParenthesisOpen,
  Percent,
  Plus,
  PrivateMember,
  Question,
  Semicolon,
  Slash,
  Tilde,
}

impl TT {
  pub fn is_keyword(self) -> bool {
    KEYWORDS_MAPPING.contains_key(&self)
  }

  /// Whether a token of this type can be used where an IdentifierName is expected, such as a member key or the right side of a dot.
  pub fn is_identifier_name(self) -> bool {
    self == TT::Identifier || self.is_keyword()
  }

  /// Whether a token of this type can name a binding (parameter, declaration, import).
  pub fn is_binding_identifier(self) -> bool {
    self == TT::Identifier || UNRESERVED_KEYWORDS.contains(&self)
  }

  pub fn is_open_bracket(self) -> bool {
    matches!(self, TT::BraceOpen | TT::BracketOpen | TT::ParenthesisOpen)
  }

  pub fn is_close_bracket(self) -> bool {
    matches!(self, TT::BraceClose | TT::BracketClose | TT::ParenthesisClose)
  }
}

// Reserved words can never be binding names; everything else in the keyword table is contextual.
static RESERVED_KEYWORDS: Lazy<HashSet<TT>> = Lazy::new(|| {
  let mut set = HashSet::<TT>::new();
  set.insert(TT::KeywordClass);
  set.insert(TT::KeywordConst);
  set.insert(TT::KeywordDefault);
  set.insert(TT::KeywordEnum);
  set.insert(TT::KeywordExport);
  set.insert(TT::KeywordExtends);
  set.insert(TT::KeywordFunction);
  set.insert(TT::KeywordImport);
  set.insert(TT::KeywordIn);
  set.insert(TT::KeywordNew);
  set.insert(TT::KeywordThis);
  set.insert(TT::KeywordTypeof);
  set.insert(TT::KeywordVar);
  set.insert(TT::KeywordVoid);
  set.insert(TT::LiteralFalse);
  set.insert(TT::LiteralNull);
  set.insert(TT::LiteralTrue);
  set
});

pub static UNRESERVED_KEYWORDS: Lazy<HashSet<TT>> = Lazy::new(|| {
  KEYWORDS_MAPPING
    .keys()
    .copied()
    .filter(|tt| !RESERVED_KEYWORDS.contains(tt))
    .collect()
});

/// Index range into the comment list of a [`SourceFile`](crate::source::SourceFile).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CommentRange {
  pub start: usize,
  pub end: usize,
}

impl CommentRange {
  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }
}

#[derive(Clone, Copy, Debug)]
pub struct Token {
  pub loc: Loc,
  // Whether one or more whitespace characters appear immediately before this token, and at least
  // one of those whitespace characters is a line terminator.
  pub preceded_by_line_terminator: bool,
  pub typ: TT,
  // All whitespace and comments between the end of the previous token and the start of this one.
  pub leading_trivia: Loc,
  pub leading_comments: CommentRange,
}

impl Token {
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, Some(self.typ))
  }
}
