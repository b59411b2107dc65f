use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Error,
  Warning,
}

impl Severity {
  pub fn as_str(self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A one-based source position. Columns count characters, not bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
  pub file: String,
  pub line: usize,
  pub column: usize,
}

impl Display for Position {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}({},{})", self.file, self.line, self.column)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub severity: Severity,
  pub message: String,
  pub position: Option<Position>,
}

impl Diagnostic {
  pub fn error(message: impl Into<String>, position: Option<Position>) -> Self {
    Diagnostic {
      severity: Severity::Error,
      message: message.into(),
      position,
    }
  }

  pub fn warning(message: impl Into<String>, position: Option<Position>) -> Self {
    Diagnostic {
      severity: Severity::Warning,
      message: message.into(),
      position,
    }
  }

  pub fn is_error(&self) -> bool {
    self.severity == Severity::Error
  }
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.position {
      Some(position) => write!(f, "{position}: {}: {}", self.severity, self.message),
      None => write!(f, "<unknown>: {}: {}", self.severity, self.message),
    }
  }
}

/// Collects the diagnostics of a single run. Nothing is reported until [`DiagnosticSink::finish`],
/// so one bad symbol never hides problems in the ones after it.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
  diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn report(&mut self, diagnostic: Diagnostic) {
    tracing::debug!(%diagnostic, "recorded diagnostic");
    self.diagnostics.push(diagnostic);
  }

  pub fn warn(&mut self, message: impl Into<String>, position: Option<Position>) {
    self.report(Diagnostic::warning(message, position));
  }

  pub fn error(&mut self, message: impl Into<String>, position: Option<Position>) {
    self.report(Diagnostic::error(message, position));
  }

  pub fn has_errors(&self) -> bool {
    self.diagnostics.iter().any(Diagnostic::is_error)
  }

  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  /// Ends the run. Without errors the warnings are logged and handed back; otherwise every
  /// diagnostic, warnings included, becomes a single [`Error::Diagnostics`].
  pub fn finish(self) -> Result<Vec<Diagnostic>, Error> {
    if self.has_errors() {
      return Err(Error::Diagnostics(self.diagnostics));
    }
    for warning in &self.diagnostics {
      tracing::warn!("{warning}");
    }
    Ok(self.diagnostics)
  }
}

pub(crate) fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
  diagnostics
    .iter()
    .map(|d| d.to_string())
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pos(line: usize, column: usize) -> Option<Position> {
    Some(Position {
      file: "test/fixtures/simple.d.ts".into(),
      line,
      column,
    })
  }

  #[test]
  fn display_includes_position_and_severity() {
    let d = Diagnostic::warning("No stability annotation found for symbol \"A\"", pos(1, 1));
    assert_eq!(
      d.to_string(),
      "test/fixtures/simple.d.ts(1,1): warning: No stability annotation found for symbol \"A\""
    );
    let d = Diagnostic::error("boom", None);
    assert_eq!(d.to_string(), "<unknown>: error: boom");
  }

  #[test]
  fn finish_returns_warnings_without_errors() {
    let mut sink = DiagnosticSink::new();
    sink.warn("first", pos(1, 1));
    sink.warn("second", None);
    let warnings = sink.finish().unwrap();
    assert_eq!(warnings.len(), 2);
  }

  #[test]
  fn finish_fails_with_every_message_once_an_error_is_seen() {
    let mut sink = DiagnosticSink::new();
    sink.warn("first", pos(1, 1));
    sink.error("second", pos(2, 3));
    assert!(sink.has_errors());
    let err = sink.finish().unwrap_err();
    assert_eq!(
      err.to_string(),
      "test/fixtures/simple.d.ts(1,1): warning: first\ntest/fixtures/simple.d.ts(2,3): error: second"
    );
  }
}
