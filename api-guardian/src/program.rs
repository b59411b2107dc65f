use crate::bind::bind_module;
use crate::bind::ModuleSymbols;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::Position;
use crate::error::Error;
use crate::error::HostError;
use crate::host::normalize_path;
use crate::host::Host;
use crate::resolve::ModuleResolver;
use ahash::AHashMap;
use parse_dts::parse;
use parse_dts::source::SourceFile;
use std::path::Path;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

pub struct ProgramFile {
  pub path: PathBuf,
  pub source: SourceFile,
  pub symbols: ModuleSymbols,
}

/// The entry file plus every module reached from it so far. Imported modules are only parsed
/// once something asks for them.
pub struct Program<'h> {
  host: &'h dyn Host,
  resolver: &'h dyn ModuleResolver,
  files: Vec<ProgramFile>,
  by_path: AHashMap<PathBuf, FileId>,
  resolutions: AHashMap<(FileId, String), Option<FileId>>,
}

impl<'h> Program<'h> {
  pub fn load(
    host: &'h dyn Host,
    resolver: &'h dyn ModuleResolver,
    entry: &Path,
  ) -> Result<(Self, FileId), Error> {
    let entry = normalize_path(entry);
    let is_declaration = entry
      .file_name()
      .and_then(|n| n.to_str())
      .is_some_and(|n| n.ends_with(".d.ts"));
    if !is_declaration {
      return Err(Error::NotDeclarationFile(entry));
    }
    Program::open(host, resolver, &entry)
  }

  /// Like [`Program::load`], but accepts any TypeScript source as the entry.
  pub fn open(
    host: &'h dyn Host,
    resolver: &'h dyn ModuleResolver,
    entry: &Path,
  ) -> Result<(Self, FileId), Error> {
    let entry = normalize_path(entry);
    if !host.file_exists(&entry) {
      return Err(Error::SourceNotFound(entry));
    }
    let mut program = Program {
      host,
      resolver,
      files: Vec::new(),
      by_path: AHashMap::new(),
      resolutions: AHashMap::new(),
    };
    let id = match program.add_file(entry.clone()) {
      Err(Error::Host(HostError::NotFound(_))) => return Err(Error::SourceNotFound(entry)),
      other => other?,
    };
    Ok((program, id))
  }

  fn add_file(&mut self, path: PathBuf) -> Result<FileId, Error> {
    if let Some(id) = self.by_path.get(&path) {
      return Ok(*id);
    }
    let text = self.host.file_text(&path)?;
    let source = parse(&text).map_err(|err| {
      let (line, col) = line_col_of(&text, err.loc.0);
      Error::Syntax(Diagnostic::error(
        err.message(),
        Some(Position {
          file: path.display().to_string(),
          line: line + 1,
          column: col + 1,
        }),
      ))
    })?;
    let id = FileId(self.files.len() as u32);
    tracing::debug!(path = %path.display(), ?id, "parsed module");
    let symbols = bind_module(id, &source);
    self.by_path.insert(path.clone(), id);
    self.files.push(ProgramFile {
      path,
      source,
      symbols,
    });
    Ok(id)
  }

  /// Resolves and, the first time, loads the module `specifier` names from inside `from`.
  /// Modules that cannot be found resolve to `None`; they are never an error.
  pub fn resolve_module(&mut self, from: FileId, specifier: &str) -> Result<Option<FileId>, Error> {
    let key = (from, specifier.to_string());
    if let Some(resolved) = self.resolutions.get(&key) {
      return Ok(*resolved);
    }
    let resolved = match self.resolver.resolve(self.host, self.path(from), specifier) {
      Some(path) if self.is_default_lib(&path) => {
        tracing::debug!(specifier, "skipping the default library");
        None
      }
      Some(path) => match self.add_file(path) {
        Ok(id) => Some(id),
        Err(Error::Host(err)) => {
          tracing::debug!(specifier, %err, "module could not be read");
          None
        }
        Err(err) => return Err(err),
      },
      None => {
        tracing::debug!(specifier, "module is missing");
        None
      }
    };
    self.resolutions.insert(key, resolved);
    Ok(resolved)
  }

  fn is_default_lib(&self, path: &Path) -> bool {
    normalize_path(&self.host.default_lib_file_name()) == path
  }

  pub fn file(&self, id: FileId) -> &ProgramFile {
    &self.files[id.0 as usize]
  }

  pub fn path(&self, id: FileId) -> &Path {
    &self.file(id).path
  }

  pub fn source(&self, id: FileId) -> &SourceFile {
    &self.file(id).source
  }

  pub fn symbols(&self, id: FileId) -> &ModuleSymbols {
    &self.file(id).symbols
  }

  pub fn file_count(&self) -> usize {
    self.files.len()
  }

  pub fn position(&self, id: FileId, offset: usize) -> Position {
    let (line, col) = self.source(id).line_col(offset);
    Position {
      file: self.path(id).display().to_string(),
      line: line + 1,
      column: col + 1,
    }
  }
}

// Syntax errors have no `SourceFile` to ask yet.
fn line_col_of(text: &str, offset: usize) -> (usize, usize) {
  let offset = offset.min(text.len());
  let before = &text[..offset];
  let line = before.matches('\n').count();
  let line_start = before.rfind('\n').map_or(0, |i| i + 1);
  (line, before[line_start..].chars().count())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::host::MemoryHost;
  use crate::resolve::NodeThenClassic;

  #[test]
  fn rejects_non_declaration_entries_before_reading() {
    let host = MemoryHost::new();
    let err = Program::load(&host, &NodeThenClassic, Path::new("./src/a.ts"))
      .err()
      .unwrap();
    assert_eq!(err.to_string(), "Source file \"src/a.ts\" is not a declaration file");
  }

  #[test]
  fn reports_missing_entries() {
    let host = MemoryHost::new();
    let err = Program::load(&host, &NodeThenClassic, Path::new("a.d.ts"))
      .err()
      .unwrap();
    assert_eq!(err.to_string(), "Source file \"a.d.ts\" not found");
  }

  #[test]
  fn reports_syntax_errors_with_positions() {
    let host = MemoryHost::new().with_file("a.d.ts", "export declare const a: string;\n}");
    let err = Program::load(&host, &NodeThenClassic, Path::new("a.d.ts"))
      .err()
      .unwrap();
    assert!(err.to_string().starts_with("a.d.ts(2,1): error: "), "{err}");
  }

  #[test]
  fn loads_imports_lazily_and_once() {
    let host = MemoryHost::new()
      .with_file("a.d.ts", "export * from './b';")
      .with_file("b.d.ts", "export declare const b: string;");
    let (mut program, entry) = Program::load(&host, &NodeThenClassic, Path::new("a.d.ts")).unwrap();
    assert_eq!(program.file_count(), 1);
    let b = program.resolve_module(entry, "./b").unwrap();
    assert_eq!(b, Some(FileId(1)));
    assert_eq!(program.resolve_module(entry, "./b").unwrap(), b);
    assert_eq!(program.file_count(), 2);
    assert_eq!(program.resolve_module(entry, "./c").unwrap(), None);
    assert_eq!(program.position(FileId(1), 15), Position {
      file: "b.d.ts".into(),
      line: 1,
      column: 16,
    });
  }
}
