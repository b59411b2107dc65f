use anyhow::Context;
use api_guardian::SerializationOptions;
use std::fs;
use std::path::Path;

/// Reads serialization options from a JSON file using the flag names as keys, e.g.
/// `{"stripExportPattern": "^__", "allowModuleIdentifiers": ["foo"], "onStabilityMissing": "warn"}`.
pub fn load_config(path: &Path) -> anyhow::Result<SerializationOptions> {
  let text = fs::read_to_string(path)
    .with_context(|| format!("failed to read config {}", path.display()))?;
  serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
