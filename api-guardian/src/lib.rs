//! Extracts the public API surface of a TypeScript declaration file as canonical text, so that
//! API changes show up as diffs against a checked-in golden file.

use bind::resolve_exports;
use diagnostic::DiagnosticSink;
use program::Program;
use resolve::NodeThenClassic;
use serialize::serialize_exports;
use std::path::Path;
use summary::public_api_lines;

pub mod bind;
pub mod collate;
pub mod diagnostic;
pub mod error;
pub mod golden;
pub mod host;
pub mod members;
pub mod options;
pub mod program;
pub mod render;
pub mod resolve;
pub mod serialize;
pub mod summary;

pub use diagnostic::Diagnostic;
pub use diagnostic::Position;
pub use diagnostic::Severity;
pub use error::Error;
pub use error::HostError;
pub use golden::generate_golden_file;
pub use golden::strip_patch_header;
pub use golden::text_diff;
pub use golden::verify_against_golden_file;
pub use host::DiskHost;
pub use host::Host;
pub use host::MemoryHost;
pub use options::SerializationOptions;
pub use options::StabilityPolicy;

/// The golden text of one entry point, plus the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReport {
  pub text: String,
  pub warnings: Vec<Diagnostic>,
}

/// Computes the golden text of a declaration file on disk. Warnings are only logged.
pub fn compute_api_text(entry: &Path, options: &SerializationOptions) -> Result<String, Error> {
  let host = DiskHost::new();
  compute_api_text_with_host(&host, entry, options).map(|report| report.text)
}

pub fn compute_api_text_with_host(
  host: &dyn Host,
  entry: &Path,
  options: &SerializationOptions,
) -> Result<ApiReport, Error> {
  let (mut program, entry_id) = Program::load(host, &NodeThenClassic, entry)?;
  let symbols = resolve_exports(&mut program, entry_id, options)?;
  tracing::debug!(entry = %entry.display(), exports = symbols.len(), "resolved exports");
  let mut sink = DiagnosticSink::new();
  let text = serialize_exports(&program, &symbols, options, &mut sink);
  let warnings = sink.finish()?;
  Ok(ApiReport { text, warnings })
}

/// The flattened public API of a module on disk, one line per exported item and member.
pub fn public_api(entry: &Path) -> Result<Vec<String>, Error> {
  let host = DiskHost::new();
  public_api_with_host(&host, entry)
}

pub fn public_api_with_host(host: &dyn Host, entry: &Path) -> Result<Vec<String>, Error> {
  let (mut program, entry_id) = Program::open(host, &NodeThenClassic, entry)?;
  let symbols = resolve_exports(&mut program, entry_id, &SerializationOptions::default())?;
  Ok(public_api_lines(&program, &symbols))
}
