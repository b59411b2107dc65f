mod config;

use anyhow::bail;
use anyhow::Context;
use api_guardian::compute_api_text_with_host;
use api_guardian::host::normalize_path;
use api_guardian::strip_patch_header;
use api_guardian::text_diff;
use api_guardian::Diagnostic;
use api_guardian::DiskHost;
use api_guardian::SerializationOptions;
use api_guardian::StabilityPolicy;
use clap::ArgAction;
use clap::CommandFactory;
use clap::Parser;
use clap::ValueEnum;
use config::load_config;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(
  author,
  version,
  about = "Checks the public API of TypeScript declaration files against golden files",
  override_usage = "api-guardian-cli --out <FILE> <ENTRY>\n       \
    api-guardian-cli --outDir <DIR> --rootDir <DIR> <ENTRY>...\n       \
    api-guardian-cli --verify <GOLDEN> <ENTRY>\n       \
    api-guardian-cli --verifyDir <DIR> --rootDir <DIR> <ENTRY>..."
)]
struct Cli {
  /// Entry declaration files.
  entries: Vec<PathBuf>,

  /// Write the golden file for a single entry.
  #[arg(long, value_name = "FILE")]
  out: Option<PathBuf>,

  /// Write golden files for several entries, mirroring their paths below --rootDir.
  #[arg(long = "outDir", value_name = "DIR")]
  out_dir: Option<PathBuf>,

  /// Directory that entry paths are taken relative to in the batch modes.
  #[arg(long = "rootDir", value_name = "DIR")]
  root_dir: Option<PathBuf>,

  /// Compare a single entry with its golden file.
  #[arg(long, value_name = "GOLDEN")]
  verify: Option<PathBuf>,

  /// Compare several entries with the golden files mirrored below this directory.
  #[arg(long = "verifyDir", value_name = "DIR")]
  verify_dir: Option<PathBuf>,

  /// Leave out exports whose name matches this regular expression.
  #[arg(long = "stripExportPattern", value_name = "REGEX")]
  strip_export_pattern: Option<String>,

  /// Allow this identifier to qualify names in the output. Repeatable.
  #[arg(long = "allowModuleIdentifiers", value_name = "NAME", action = ArgAction::Append)]
  allow_module_identifiers: Vec<String>,

  /// What to do about exports without a stability tag.
  #[arg(long = "onStabilityMissing", value_enum, value_name = "POLICY")]
  on_stability_missing: Option<StabilityArg>,

  /// JSON file with default options; flags take precedence.
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Log debug events to stderr.
  #[arg(long)]
  trace: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StabilityArg {
  None,
  Warn,
  Error,
}

impl From<StabilityArg> for StabilityPolicy {
  fn from(value: StabilityArg) -> Self {
    match value {
      StabilityArg::None => StabilityPolicy::None,
      StabilityArg::Warn => StabilityPolicy::Warn,
      StabilityArg::Error => StabilityPolicy::Error,
    }
  }
}

enum Mode<'a> {
  Out(&'a Path),
  OutDir(&'a Path),
  Verify(&'a Path),
  VerifyDir(&'a Path),
}

fn main() -> ExitCode {
  match try_main() {
    Ok(code) => code,
    Err(err) => {
      eprintln!("{err:#}");
      ExitCode::FAILURE
    }
  }
}

fn try_main() -> anyhow::Result<ExitCode> {
  if std::env::args_os().len() <= 1 {
    eprintln!("{}", Cli::command().render_help());
    return Ok(ExitCode::FAILURE);
  }
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let code = if err.use_stderr() {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS
      };
      let _ = err.print();
      return Ok(code);
    }
  };
  init_tracing(cli.trace);

  let options = build_options(&cli)?;
  let mode = mode(&cli)?;
  let ok = match mode {
    Mode::Out(out) => {
      let entry = single_entry(&cli)?;
      generate(entry, out, &options)?;
      true
    }
    Mode::Verify(golden) => {
      let entry = single_entry(&cli)?;
      verify(entry, golden, &options)?
    }
    Mode::OutDir(dir) => run_batch(&cli, dir, |entry, target| {
      generate(entry, target, &options).map(|()| true)
    })?,
    Mode::VerifyDir(dir) => run_batch(&cli, dir, |entry, target| verify(entry, target, &options))?,
  };
  Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_max_level(Level::DEBUG)
    .with_ansi(false)
    .try_init();
}

fn build_options(cli: &Cli) -> anyhow::Result<SerializationOptions> {
  let mut options = match &cli.config {
    Some(path) => load_config(path)?,
    None => SerializationOptions::default(),
  };
  if let Some(pattern) = &cli.strip_export_pattern {
    let pattern = Regex::new(pattern)
      .with_context(|| format!("invalid --stripExportPattern '{pattern}'"))?;
    options = options.with_strip_export_pattern(pattern);
  }
  if !cli.allow_module_identifiers.is_empty() {
    options.allow_module_identifiers = cli.allow_module_identifiers.clone();
  }
  if let Some(policy) = cli.on_stability_missing {
    options = options.with_on_stability_missing(policy.into());
  }
  Ok(options)
}

fn mode(cli: &Cli) -> anyhow::Result<Mode<'_>> {
  let modes: Vec<Mode> = [
    cli.out.as_deref().map(Mode::Out),
    cli.out_dir.as_deref().map(Mode::OutDir),
    cli.verify.as_deref().map(Mode::Verify),
    cli.verify_dir.as_deref().map(Mode::VerifyDir),
  ]
  .into_iter()
  .flatten()
  .collect();
  let [mode] = <[Mode; 1]>::try_from(modes).map_err(|_| {
    anyhow::anyhow!("specify exactly one of --out, --outDir, --verify or --verifyDir")
  })?;
  Ok(mode)
}

fn single_entry(cli: &Cli) -> anyhow::Result<&Path> {
  match cli.entries.as_slice() {
    [entry] => Ok(entry.as_path()),
    _ => bail!("--out and --verify take exactly one entry file"),
  }
}

/// Runs `step` for every entry with its mirrored path below `dir`. Failures are reported and the
/// remaining entries still run.
fn run_batch(
  cli: &Cli,
  dir: &Path,
  mut step: impl FnMut(&Path, &Path) -> anyhow::Result<bool>,
) -> anyhow::Result<bool> {
  let Some(root_dir) = &cli.root_dir else {
    bail!("--outDir and --verifyDir require --rootDir");
  };
  if cli.entries.is_empty() {
    bail!("no entry files given");
  }
  let mut ok = true;
  for entry in &cli.entries {
    let result = mirrored_path(root_dir, dir, entry).and_then(|target| step(entry, &target));
    match result {
      Ok(passed) => ok &= passed,
      Err(err) => {
        eprintln!("{err:#}");
        ok = false;
      }
    }
  }
  Ok(ok)
}

// `./src/a.d.ts` and `src/./a.d.ts` are both inside `src`.
fn mirrored_path(root_dir: &Path, dir: &Path, entry: &Path) -> anyhow::Result<PathBuf> {
  let root_dir = normalize_path(root_dir);
  let entry = normalize_path(entry);
  if root_dir == Path::new(".") && entry.is_relative() && !entry.starts_with("..") {
    return Ok(dir.join(entry));
  }
  let relative = entry.strip_prefix(&root_dir).with_context(|| {
    format!(
      "entry {} is not inside --rootDir {}",
      entry.display(),
      root_dir.display()
    )
  })?;
  Ok(dir.join(relative))
}

fn print_warnings(warnings: &[Diagnostic]) {
  for warning in warnings {
    eprintln!("{warning}");
  }
}

fn generate(entry: &Path, out: &Path, options: &SerializationOptions) -> anyhow::Result<()> {
  let report = compute_api_text_with_host(&DiskHost::new(), entry, options)?;
  print_warnings(&report.warnings);
  if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create directory {}", parent.display()))?;
  }
  fs::write(out, report.text).with_context(|| format!("failed to write {}", out.display()))?;
  Ok(())
}

fn verify(entry: &Path, golden: &Path, options: &SerializationOptions) -> anyhow::Result<bool> {
  let report = compute_api_text_with_host(&DiskHost::new(), entry, options)?;
  print_warnings(&report.warnings);
  let expected = fs::read_to_string(golden)
    .with_context(|| format!("failed to read golden file {}", golden.display()))?;
  let diff = strip_patch_header(&text_diff(
    &golden.display().to_string(),
    &expected,
    &report.text,
  ));
  if diff.is_empty() {
    return Ok(true);
  }
  print!("{diff}");
  eprintln!("{} does not match {}", golden.display(), entry.display());
  Ok(false)
}
