use crate::host::normalize_path;
use crate::host::Host;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

/// Maps an import specifier to a file, relative to the file containing the import.
pub trait ModuleResolver {
  fn resolve(&self, host: &dyn Host, containing_file: &Path, specifier: &str) -> Option<PathBuf>;
}

/// Node-style resolution, falling back to classic resolution when that finds nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeThenClassic;

impl ModuleResolver for NodeThenClassic {
  fn resolve(&self, host: &dyn Host, containing_file: &Path, specifier: &str) -> Option<PathBuf> {
    let resolved = resolve_node_like(host, containing_file, specifier)
      .or_else(|| resolve_classic(host, containing_file, specifier));
    tracing::debug!(
      from = %containing_file.display(),
      specifier,
      resolved = ?resolved,
      "resolved module"
    );
    resolved
  }
}

const EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts"];

#[derive(Deserialize)]
struct PackageJson {
  types: Option<String>,
  typings: Option<String>,
}

fn is_relative(specifier: &str) -> bool {
  specifier == "."
    || specifier == ".."
    || specifier.starts_with("./")
    || specifier.starts_with("../")
    || specifier.starts_with('/')
}

fn base_dir(from: &Path) -> &Path {
  from.parent().unwrap_or_else(|| Path::new(""))
}

fn resolve_relative(host: &dyn Host, from: &Path, specifier: &str) -> Option<PathBuf> {
  let joined = base_dir(from).join(specifier);
  resolve_with_candidates(host, &joined)
}

fn resolve_node_like(host: &dyn Host, from: &Path, specifier: &str) -> Option<PathBuf> {
  if is_relative(specifier) {
    return resolve_relative(host, from, specifier)
      .or_else(|| resolve_package_dir(host, &base_dir(from).join(specifier)));
  }

  let mut current = Some(base_dir(from));
  while let Some(dir) = current {
    for root in [dir.join("node_modules"), dir.join("node_modules").join("@types")] {
      let candidate = root.join(specifier);
      if let Some(found) = resolve_with_candidates(host, &candidate)
        .or_else(|| resolve_package_dir(host, &candidate))
      {
        return Some(found);
      }
    }
    current = dir.parent();
  }

  None
}

/// Classic resolution: relative specifiers resolve next to the importer, anything else is looked
/// up in the importer's directory and then every ancestor directory.
fn resolve_classic(host: &dyn Host, from: &Path, specifier: &str) -> Option<PathBuf> {
  if is_relative(specifier) {
    return resolve_relative(host, from, specifier);
  }

  let mut current = Some(base_dir(from));
  while let Some(dir) = current {
    let candidate = dir.join(specifier);
    for ext in ["ts", "d.ts"] {
      let path = normalize_path(&with_extension(&candidate, ext));
      if host.file_exists(&path) {
        return Some(path);
      }
    }
    current = dir.parent();
  }

  None
}

/// Follows the `types` or `typings` field of a package directory's `package.json`.
fn resolve_package_dir(host: &dyn Host, dir: &Path) -> Option<PathBuf> {
  let manifest = normalize_path(&dir.join("package.json"));
  if !host.file_exists(&manifest) {
    return None;
  }
  let text = host.file_text(&manifest).ok()?;
  let package: PackageJson = match serde_json::from_str(&text) {
    Ok(package) => package,
    Err(err) => {
      tracing::debug!(path = %manifest.display(), %err, "ignoring unreadable package.json");
      return None;
    }
  };
  let types = package.types.or(package.typings)?;
  resolve_with_candidates(host, &dir.join(types))
}

fn resolve_with_candidates(host: &dyn Host, base: &Path) -> Option<PathBuf> {
  candidate_paths(base)
    .into_iter()
    .map(|cand| normalize_path(&cand))
    .find(|cand| host.file_exists(cand))
}

fn candidate_paths(base: &Path) -> Vec<PathBuf> {
  let mut candidates = Vec::new();
  if has_known_extension(base) {
    candidates.push(base.to_path_buf());
  }
  for ext in EXTENSIONS {
    candidates.push(with_extension(base, ext));
  }
  for ext in EXTENSIONS {
    candidates.push(base.join("index").with_extension(ext));
  }
  candidates
}

fn has_known_extension(path: &Path) -> bool {
  let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
  name.ends_with(".d.ts") || matches!(path.extension().and_then(|e| e.to_str()), Some("ts" | "tsx"))
}

/// Appends rather than replaces, so `./a.b` looks for `a.b.ts`. A trailing `.js` is swapped out
/// since declaration sources import their compiled names.
fn with_extension(base: &Path, ext: &str) -> PathBuf {
  let mut raw = base.as_os_str().to_os_string();
  if matches!(base.extension().and_then(|e| e.to_str()), Some("js" | "jsx")) {
    raw = base.with_extension("").into_os_string();
  }
  raw.push(".");
  raw.push(ext);
  PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::host::MemoryHost;

  fn resolve(host: &MemoryHost, from: &str, specifier: &str) -> Option<PathBuf> {
    NodeThenClassic.resolve(host, Path::new(from), specifier)
  }

  #[test]
  fn resolves_relative_declaration_files() {
    let host = MemoryHost::new()
      .with_file("src/a.d.ts", "")
      .with_file("src/dir/index.d.ts", "")
      .with_file("lib/b.ts", "");
    assert_eq!(resolve(&host, "src/main.d.ts", "./a"), Some(PathBuf::from("src/a.d.ts")));
    assert_eq!(resolve(&host, "src/main.d.ts", "./a.js"), Some(PathBuf::from("src/a.d.ts")));
    assert_eq!(resolve(&host, "src/main.d.ts", "./dir"), Some(PathBuf::from("src/dir/index.d.ts")));
    assert_eq!(resolve(&host, "src/main.d.ts", "../lib/b"), Some(PathBuf::from("lib/b.ts")));
    assert_eq!(resolve(&host, "src/main.d.ts", "./missing"), None);
  }

  #[test]
  fn prefers_ts_over_declarations() {
    let host = MemoryHost::new().with_file("a.ts", "").with_file("a.d.ts", "");
    assert_eq!(resolve(&host, "main.d.ts", "./a"), Some(PathBuf::from("a.ts")));
  }

  #[test]
  fn walks_up_node_modules() {
    let host = MemoryHost::new()
      .with_file("node_modules/pkg/package.json", r#"{"typings": "out/pkg.d.ts"}"#)
      .with_file("node_modules/pkg/out/pkg.d.ts", "")
      .with_file("node_modules/@types/other/index.d.ts", "");
    assert_eq!(
      resolve(&host, "src/deep/main.d.ts", "pkg"),
      Some(PathBuf::from("node_modules/pkg/out/pkg.d.ts"))
    );
    assert_eq!(
      resolve(&host, "src/deep/main.d.ts", "other"),
      Some(PathBuf::from("node_modules/@types/other/index.d.ts"))
    );
  }

  #[test]
  fn falls_back_to_classic_lookup_in_parent_directories() {
    let host = MemoryHost::new().with_file("shared.d.ts", "");
    assert_eq!(resolve(&host, "src/deep/main.d.ts", "shared"), Some(PathBuf::from("shared.d.ts")));
    assert_eq!(resolve(&host, "src/deep/main.d.ts", "unknown"), None);
  }
}
