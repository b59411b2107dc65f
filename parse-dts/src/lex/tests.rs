use super::lex_all;
use crate::loc::Loc;
use crate::token::TT;

fn types(source: &str) -> Vec<TT> {
  lex_all(source).0.into_iter().map(|t| t.typ).collect()
}

#[test]
fn lexes_declaration_tokens() {
  assert_eq!(
    types("export declare const A: string;"),
    vec![
      TT::KeywordExport,
      TT::KeywordDeclare,
      TT::KeywordConst,
      TT::Identifier,
      TT::Colon,
      TT::KeywordStringType,
      TT::Semicolon,
      TT::EOF,
    ]
  );
}

#[test]
fn closing_chevrons_stay_separate() {
  assert_eq!(
    types("A<B<C>>=>"),
    vec![
      TT::Identifier,
      TT::ChevronLeft,
      TT::Identifier,
      TT::ChevronLeft,
      TT::Identifier,
      TT::ChevronRight,
      TT::ChevronRight,
      TT::EqualsChevronRight,
      TT::EOF,
    ]
  );
}

#[test]
fn comments_are_recorded_and_attached() {
  let src = "/** doc */\n// line\r\nexport class A {}";
  let (tokens, comments) = lex_all(src);
  assert_eq!(comments, vec![Loc(0, 10), Loc(11, 18)]);
  let export = tokens[0];
  assert_eq!(export.typ, TT::KeywordExport);
  assert_eq!(export.leading_comments.start, 0);
  assert_eq!(export.leading_comments.end, 2);
  assert_eq!(export.leading_trivia, Loc(0, 20));
  assert!(export.preceded_by_line_terminator);
  assert!(tokens[1].leading_comments.is_empty());
}

#[test]
fn literals() {
  assert_eq!(
    types(r#"'a\'b' "c" `x${ {a:1} }y` 0x1F 1e-5 .5 10n #priv"#),
    vec![
      TT::LiteralString,
      TT::LiteralString,
      TT::LiteralTemplate,
      TT::LiteralNumber,
      TT::LiteralNumber,
      TT::LiteralNumber,
      TT::LiteralBigInt,
      TT::PrivateMember,
      TT::EOF,
    ]
  );
}

#[test]
fn unterminated_comment_runs_to_end() {
  let (tokens, comments) = lex_all("a /* never closed");
  assert_eq!(comments, vec![Loc(2, 17)]);
  assert_eq!(tokens.last().map(|t| t.typ), Some(TT::EOF));
}

#[test]
fn stray_characters_are_invalid_tokens() {
  assert_eq!(types("a \\ b"), vec![TT::Identifier, TT::Invalid, TT::Identifier, TT::EOF]);
  assert_eq!(types("'open\nx"), vec![TT::Invalid, TT::Identifier, TT::EOF]);
}
