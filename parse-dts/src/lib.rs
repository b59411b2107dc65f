use error::SyntaxResult;
use parse::Parser;
use source::SourceFile;

pub mod ast;
pub mod char;
pub mod error;
pub mod lex;
pub mod loc;
pub mod parse;
pub mod source;
pub mod token;

/// Parses a TypeScript declaration (or plain TypeScript) source.
///
/// Function bodies and initializer expressions are skipped as balanced token runs, so only the
/// declaration shapes end up in the tree. Comments are never attached to nodes; they stay with
/// the tokens they precede and can be looked up through [`SourceFile::leading_comments`].
pub fn parse(source: &str) -> SyntaxResult<SourceFile> {
  let mut parser = Parser::new(source);
  let top_level = parser.parse_top_level()?;
  Ok(parser.into_source_file(top_level))
}
