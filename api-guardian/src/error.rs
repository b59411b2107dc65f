use crate::diagnostic::join_diagnostics;
use crate::diagnostic::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
  #[error("file not found: {}", .0.display())]
  NotFound(PathBuf),
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("Source file \"{}\" is not a declaration file", .0.display())]
  NotDeclarationFile(PathBuf),
  #[error("Source file \"{}\" not found", .0.display())]
  SourceNotFound(PathBuf),
  #[error("{0}")]
  Syntax(Diagnostic),
  #[error("Symbol \"{target}\" was aliased as \"{alias}\". Aliases are not supported.")]
  AliasRenamed { target: String, alias: String },
  #[error("{}", join_diagnostics(.0))]
  Diagnostics(Vec<Diagnostic>),
  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error(transparent)]
  Host(#[from] HostError),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_match_the_command_line_tool() {
    let err = Error::AliasRenamed {
      target: "A".into(),
      alias: "Apple".into(),
    };
    assert_eq!(
      err.to_string(),
      "Symbol \"A\" was aliased as \"Apple\". Aliases are not supported."
    );
    assert_eq!(
      Error::NotDeclarationFile(PathBuf::from("a/b.ts")).to_string(),
      "Source file \"a/b.ts\" is not a declaration file"
    );
    assert_eq!(
      Error::SourceNotFound(PathBuf::from("missing.d.ts")).to_string(),
      "Source file \"missing.d.ts\" not found"
    );
  }
}
