use crate::error::HostError;
use ahash::AHashMap;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

/// Everything the guardian needs from the outside world to read sources.
pub trait Host {
  fn file_text(&self, path: &Path) -> Result<Arc<str>, HostError>;

  fn file_exists(&self, path: &Path) -> bool;

  /// The file providing built-in types. It is never part of a public API.
  fn default_lib_file_name(&self) -> PathBuf {
    PathBuf::from("lib.d.ts")
  }
}

/// Reads from the file system, caching every text it hands out.
#[derive(Default)]
pub struct DiskHost {
  texts: Mutex<AHashMap<PathBuf, Arc<str>>>,
}

impl DiskHost {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Host for DiskHost {
  fn file_text(&self, path: &Path) -> Result<Arc<str>, HostError> {
    let path = normalize_path(path);
    let mut texts = self.texts.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(text) = texts.get(&path) {
      return Ok(text.clone());
    }
    let text = fs::read_to_string(&path).map_err(|source| match source.kind() {
      io::ErrorKind::NotFound => HostError::NotFound(path.clone()),
      _ => HostError::Read {
        path: path.clone(),
        source,
      },
    })?;
    let arc: Arc<str> = Arc::from(text);
    texts.insert(path, arc.clone());
    Ok(arc)
  }

  fn file_exists(&self, path: &Path) -> bool {
    path.is_file()
  }
}

/// An in-memory file map, used by tests and by embedders that already hold their sources.
#[derive(Clone, Default)]
pub struct MemoryHost {
  files: AHashMap<PathBuf, Arc<str>>,
}

impl MemoryHost {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_file(&mut self, path: impl AsRef<Path>, text: impl Into<Arc<str>>) {
    self.files.insert(normalize_path(path.as_ref()), text.into());
  }

  pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<Arc<str>>) -> Self {
    self.add_file(path, text);
    self
  }
}

impl Host for MemoryHost {
  fn file_text(&self, path: &Path) -> Result<Arc<str>, HostError> {
    let path = normalize_path(path);
    self
      .files
      .get(&path)
      .cloned()
      .ok_or(HostError::NotFound(path))
  }

  fn file_exists(&self, path: &Path) -> bool {
    self.files.contains_key(&normalize_path(path))
  }
}

/// Folds `.` and `..` components without touching the file system, so paths keep the shape the
/// user gave them. Leading `..` components of relative paths are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut parts: Vec<Component> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match parts.last() {
        Some(Component::Normal(_)) => {
          parts.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => parts.push(component),
      },
      other => parts.push(other),
    }
  }
  if parts.is_empty() {
    return PathBuf::from(".");
  }
  parts.iter().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_lexically() {
    assert_eq!(normalize_path(Path::new("./a/b/../c.d.ts")), PathBuf::from("a/c.d.ts"));
    assert_eq!(normalize_path(Path::new("../a/./b")), PathBuf::from("../a/b"));
    assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    assert_eq!(normalize_path(Path::new("/a/../../b")), PathBuf::from("/b"));
    assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
  }

  #[test]
  fn memory_host_looks_up_normalized_paths() {
    let host = MemoryHost::new().with_file("src/./index.d.ts", "export {};");
    assert!(host.file_exists(Path::new("src/lib/../index.d.ts")));
    assert_eq!(&*host.file_text(Path::new("src/index.d.ts")).unwrap(), "export {};");
    assert!(matches!(
      host.file_text(Path::new("src/other.d.ts")),
      Err(HostError::NotFound(_))
    ));
  }

  #[test]
  fn disk_host_reads_and_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.d.ts");
    fs::write(&path, "export declare const a: string;").unwrap();
    let host = DiskHost::new();
    assert!(host.file_exists(&path));
    assert_eq!(&*host.file_text(&path).unwrap(), "export declare const a: string;");
    // Served from the cache even after the file disappears.
    fs::remove_file(&path).unwrap();
    assert!(host.file_text(&path).is_ok());
    assert!(matches!(
      host.file_text(&dir.path().join("b.d.ts")),
      Err(HostError::NotFound(_))
    ));
  }
}
