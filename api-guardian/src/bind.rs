use crate::diagnostic::Position;
use crate::error::Error;
use crate::options::SerializationOptions;
use crate::program::FileId;
use crate::program::Program;
use ahash::AHashMap;
use ahash::AHashSet;
use parse_dts::ast::import_export::ExportNames;
use parse_dts::ast::import_export::ImportEqualsTarget;
use parse_dts::ast::import_export::ImportNames;
use parse_dts::ast::stmt::Stmt;
use parse_dts::loc::Loc;
use parse_dts::source::SourceFile;

/// One declaration of a name: a top-level statement of some file. Variable declarators point at
/// their whole statement, which is where the `export` flag lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
  pub file: FileId,
  // Index into the file's top-level statements.
  pub stmt: usize,
  // The declared name, or the statement for anonymous defaults.
  pub loc: Loc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportBinding {
  // `import {imported as local}` and `import local` (as `default`).
  Named { module: String, imported: String },
  // `import * as local` and `import local = require(...)`.
  Namespace { module: String },
  // `import local = a.b`, which never leads to a declaration we serialize.
  Equals,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportEntry {
  Declared(Vec<Declaration>),
  // `export {local as name}` and `export default local`.
  Local { local: String, loc: Loc },
  // `export {name} from "module"`.
  Reexport { module: String, name: String, loc: Loc },
  // `export * as ns from "module"`.
  Namespace { module: String, loc: Loc },
  // `export default <expression>`.
  Expression { loc: Loc },
}

impl ExportEntry {
  fn loc(&self) -> Option<Loc> {
    match self {
      ExportEntry::Declared(_) => None,
      ExportEntry::Local { loc, .. }
      | ExportEntry::Reexport { loc, .. }
      | ExportEntry::Namespace { loc, .. }
      | ExportEntry::Expression { loc } => Some(*loc),
    }
  }
}

/// The module-level symbol table of one file.
#[derive(Debug, Default)]
pub struct ModuleSymbols {
  pub locals: AHashMap<String, Vec<Declaration>>,
  pub imports: AHashMap<String, ImportBinding>,
  // In source order, one entry per exported name.
  pub exports: Vec<(String, ExportEntry)>,
  pub star_exports: Vec<String>,
}

impl ModuleSymbols {
  pub fn export(&self, name: &str) -> Option<&ExportEntry> {
    self.exports.iter().find(|(n, _)| n == name).map(|(_, e)| e)
  }

  pub fn is_namespace_import(&self, name: &str) -> bool {
    matches!(self.imports.get(name), Some(ImportBinding::Namespace { .. }))
  }

  fn add_export(&mut self, name: &str, entry: ExportEntry) {
    match (self.exports.iter_mut().find(|(n, _)| n == name), entry) {
      (Some((_, ExportEntry::Declared(existing))), ExportEntry::Declared(more)) => {
        existing.extend(more)
      }
      (Some(_), _) => tracing::debug!(name, "ignoring duplicate export"),
      (None, entry) => self.exports.push((name.to_string(), entry)),
    }
  }
}

pub fn bind_module(file: FileId, source: &SourceFile) -> ModuleSymbols {
  let mut symbols = ModuleSymbols::default();
  for (index, stmt) in source.top_level.stx.body.iter().enumerate() {
    if let Some(modifiers) = stmt.stx.modifiers() {
      let names = stmt.stx.declared_names();
      for &(name, loc) in &names {
        let decl = Declaration {
          file,
          stmt: index,
          loc,
        };
        symbols.locals.entry(name.to_string()).or_default().push(decl);
        if modifiers.export && !modifiers.default {
          symbols.add_export(name, ExportEntry::Declared(vec![decl]));
        }
      }
      if modifiers.export && modifiers.default {
        let loc = names.first().map_or(stmt.loc, |(_, loc)| *loc);
        symbols.add_export(
          "default",
          ExportEntry::Declared(vec![Declaration {
            file,
            stmt: index,
            loc,
          }]),
        );
      }
      continue;
    }

    match stmt.stx.as_ref() {
      Stmt::Import(import) => {
        let import = import.stx.as_ref();
        if let Some(local) = &import.default {
          symbols.imports.insert(local.clone(), ImportBinding::Named {
            module: import.module.clone(),
            imported: "default".to_string(),
          });
        }
        match &import.names {
          Some(ImportNames::Namespace(local)) => {
            symbols.imports.insert(local.clone(), ImportBinding::Namespace {
              module: import.module.clone(),
            });
          }
          Some(ImportNames::Specific(specifiers)) => {
            for spec in specifiers {
              symbols.imports.insert(spec.stx.local.clone(), ImportBinding::Named {
                module: import.module.clone(),
                imported: spec.stx.imported.clone(),
              });
            }
          }
          None => {}
        }
      }
      Stmt::ImportEquals(import) => {
        let binding = match &import.stx.target {
          ImportEqualsTarget::Require(module) => ImportBinding::Namespace {
            module: module.clone(),
          },
          ImportEqualsTarget::Entity(_) => ImportBinding::Equals,
        };
        symbols.imports.insert(import.stx.name.clone(), binding);
        if import.stx.export {
          symbols.add_export(&import.stx.name, ExportEntry::Local {
            local: import.stx.name.clone(),
            loc: import.loc,
          });
        }
      }
      Stmt::ExportList(list) => match (&list.stx.names, &list.stx.from) {
        (ExportNames::All(None), Some(module)) => symbols.star_exports.push(module.clone()),
        (ExportNames::All(Some(name)), Some(module)) => {
          symbols.add_export(name, ExportEntry::Namespace {
            module: module.clone(),
            loc: list.loc,
          })
        }
        (ExportNames::All(_), None) => {}
        (ExportNames::Specific(specifiers), from) => {
          for spec in specifiers {
            let entry = match from {
              Some(module) => ExportEntry::Reexport {
                module: module.clone(),
                name: spec.stx.local.clone(),
                loc: spec.loc,
              },
              None => ExportEntry::Local {
                local: spec.stx.local.clone(),
                loc: spec.loc,
              },
            };
            symbols.add_export(&spec.stx.exported, entry);
          }
        }
      },
      Stmt::ExportAssignment(assignment) => {
        if assignment.stx.equals {
          tracing::debug!("ignoring `export =` assignment");
          continue;
        }
        let entry = match &assignment.stx.identifier {
          Some(local) => ExportEntry::Local {
            local: local.clone(),
            loc: assignment.loc,
          },
          None => ExportEntry::Expression {
            loc: assignment.loc,
          },
        };
        symbols.add_export("default", entry);
      }
      _ => {}
    }
  }
  symbols
}

/// An exported name of the entry module, with aliases followed to their declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedSymbol {
  pub name: String,
  // Empty for placeholders, whose target could not be reached.
  pub declarations: Vec<Declaration>,
  pub is_alias: bool,
  // Re-exported module namespace objects have no declaration of their own.
  pub namespace: bool,
  // Where the alias was written, for symbols that are aliases.
  pub origin: Option<Position>,
}

impl ExportedSymbol {
  pub fn is_placeholder(&self) -> bool {
    self.declarations.is_empty() && !self.namespace
  }
}

enum Target {
  Declarations {
    name: String,
    declarations: Vec<Declaration>,
  },
  Namespace,
}

/// Lists the exports of `entry`, explicit ones first and then those pulled in by `export *`.
///
/// Names matching the strip pattern are dropped before aliases are checked, so a stripped alias
/// never fails the run. Renamed aliases fail immediately.
pub fn resolve_exports(
  program: &mut Program,
  entry: FileId,
  options: &SerializationOptions,
) -> Result<Vec<ExportedSymbol>, Error> {
  let exports = collect_exports(program, entry, &mut AHashSet::new())?;
  let mut symbols = Vec::with_capacity(exports.len());
  for (name, owner, export) in exports {
    if options.strips(&name) {
      tracing::debug!(name, "stripped export");
      continue;
    }
    let is_alias = !matches!(export, ExportEntry::Declared(_));
    let origin = export.loc().map(|loc| program.position(owner, loc.0));
    let mut visited = AHashSet::new();
    visited.insert((owner, name.clone()));
    let symbol = match resolve_entry(program, owner, &name, &export, &mut visited)? {
      Some(Target::Declarations {
        name: target,
        declarations,
      }) => {
        if is_alias && target != name {
          return Err(Error::AliasRenamed {
            target,
            alias: name,
          });
        }
        ExportedSymbol {
          name,
          declarations,
          is_alias,
          namespace: false,
          origin,
        }
      }
      Some(Target::Namespace) => ExportedSymbol {
        name,
        declarations: Vec::new(),
        is_alias,
        namespace: true,
        origin,
      },
      None => {
        tracing::debug!(name, "export target is unreachable");
        ExportedSymbol {
          name,
          declarations: Vec::new(),
          is_alias,
          namespace: false,
          origin,
        }
      }
    };
    symbols.push(symbol);
  }
  Ok(symbols)
}

fn collect_exports(
  program: &mut Program,
  file: FileId,
  seen: &mut AHashSet<FileId>,
) -> Result<Vec<(String, FileId, ExportEntry)>, Error> {
  if !seen.insert(file) {
    return Ok(Vec::new());
  }
  let symbols = program.symbols(file);
  let mut names: AHashSet<String> = symbols.exports.iter().map(|(n, _)| n.clone()).collect();
  let mut out: Vec<_> = symbols
    .exports
    .iter()
    .map(|(name, entry)| (name.clone(), file, entry.clone()))
    .collect();
  for star in symbols.star_exports.clone() {
    let Some(module) = program.resolve_module(file, &star)? else {
      continue;
    };
    for (name, owner, entry) in collect_exports(program, module, seen)? {
      if name != "default" && names.insert(name.clone()) {
        out.push((name, owner, entry));
      }
    }
  }
  Ok(out)
}

fn resolve_export(
  program: &mut Program,
  file: FileId,
  name: &str,
  visited: &mut AHashSet<(FileId, String)>,
) -> Result<Option<Target>, Error> {
  if !visited.insert((file, name.to_string())) {
    tracing::debug!(name, "export cycle");
    return Ok(None);
  }
  if let Some(entry) = program.symbols(file).export(name).cloned() {
    return resolve_entry(program, file, name, &entry, visited);
  }
  if name == "default" {
    return Ok(None);
  }
  for star in program.symbols(file).star_exports.clone() {
    if let Some(module) = program.resolve_module(file, &star)? {
      if let Some(target) = resolve_export(program, module, name, visited)? {
        return Ok(Some(target));
      }
    }
  }
  Ok(None)
}

fn resolve_entry(
  program: &mut Program,
  file: FileId,
  name: &str,
  entry: &ExportEntry,
  visited: &mut AHashSet<(FileId, String)>,
) -> Result<Option<Target>, Error> {
  match entry {
    ExportEntry::Declared(declarations) => Ok(Some(Target::Declarations {
      name: name.to_string(),
      declarations: declarations.clone(),
    })),
    ExportEntry::Local { local, .. } => resolve_local(program, file, local, visited),
    ExportEntry::Reexport { module, name, .. } => match program.resolve_module(file, module)? {
      Some(module) => resolve_export(program, module, name, visited),
      None => Ok(None),
    },
    ExportEntry::Namespace { .. } => Ok(Some(Target::Namespace)),
    ExportEntry::Expression { .. } => Ok(None),
  }
}

fn resolve_local(
  program: &mut Program,
  file: FileId,
  local: &str,
  visited: &mut AHashSet<(FileId, String)>,
) -> Result<Option<Target>, Error> {
  let symbols = program.symbols(file);
  if let Some(declarations) = symbols.locals.get(local) {
    return Ok(Some(Target::Declarations {
      name: local.to_string(),
      declarations: declarations.clone(),
    }));
  }
  match symbols.imports.get(local).cloned() {
    Some(ImportBinding::Named { module, imported }) => match program.resolve_module(file, &module)? {
      Some(module) => resolve_export(program, module, &imported, visited),
      None => Ok(None),
    },
    Some(ImportBinding::Namespace { .. }) => Ok(Some(Target::Namespace)),
    Some(ImportBinding::Equals) | None => Ok(None),
  }
}
