use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

fn cli() -> Command {
  let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("api-guardian-cli");
  cmd.timeout(Duration::from_secs(5));
  cmd
}

fn guardian_dir() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../api-guardian")
}

fn fixture(name: &str) -> PathBuf {
  guardian_dir().join("tests/fixtures").join(name)
}

fn read(path: impl Into<PathBuf>) -> String {
  fs::read_to_string(path.into()).unwrap()
}

fn stdout_of(output: &std::process::Output) -> String {
  String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr_of(output: &std::process::Output) -> String {
  String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn prints_usage_to_stderr_without_arguments() {
  let assert = cli().assert().code(1);
  let output = assert.get_output();
  assert!(stderr_of(output).contains("Usage"), "{}", stderr_of(output));
  assert_eq!(stdout_of(output), "");
}

#[test]
fn prints_usage_to_stdout_with_help() {
  let assert = cli().arg("--help").assert().success();
  let output = assert.get_output();
  let stdout = stdout_of(output);
  assert!(stdout.contains("Usage"), "{stdout}");
  assert!(stdout.contains("--allowModuleIdentifiers"), "{stdout}");
}

#[test]
fn writes_a_golden_file() {
  let dir = tempdir().unwrap();
  let out = dir.path().join("simple.d.ts");
  cli().arg("--out").arg(&out).arg(fixture("simple.d.ts")).assert().success();
  assert_eq!(read(&out), read(fixture("simple_expected.d.ts")));
}

#[test]
fn verifies_a_matching_golden_file() {
  let assert = cli()
    .arg("--verify")
    .arg(fixture("simple_expected.d.ts"))
    .arg(fixture("simple.d.ts"))
    .assert()
    .success();
  assert_eq!(stdout_of(assert.get_output()), "");
}

#[test]
fn prints_the_patch_for_a_mismatching_golden_file() {
  let assert = cli()
    .arg("--verify")
    .arg(fixture("verify_expected.d.ts"))
    .arg(fixture("verify_entrypoint.d.ts"))
    .assert()
    .code(1);
  let output = assert.get_output();
  assert_eq!(stdout_of(output), read(fixture("verify.patch")));
  assert!(stderr_of(output).contains("does not match"), "{}", stderr_of(output));
}

#[test]
fn generates_and_verifies_directories() {
  let dir = tempdir().unwrap();
  let root = guardian_dir().join("tests/fixtures");
  cli()
    .arg("--outDir")
    .arg(dir.path())
    .arg("--rootDir")
    .arg(&root)
    .arg(fixture("simple.d.ts"))
    .arg(fixture("sorting.d.ts"))
    .assert()
    .success();
  assert_eq!(read(dir.path().join("simple.d.ts")), read(fixture("simple_expected.d.ts")));
  assert_eq!(read(dir.path().join("sorting.d.ts")), read(fixture("sorting_expected.d.ts")));

  let assert = cli()
    .arg("--verifyDir")
    .arg(dir.path())
    .arg("--rootDir")
    .arg(&root)
    .arg(fixture("simple.d.ts"))
    .arg(fixture("sorting.d.ts"))
    .assert()
    .success();
  assert_eq!(stdout_of(assert.get_output()), "");
}

#[test]
fn batch_entries_are_matched_to_the_root_dir_after_normalizing() {
  let dir = tempdir().unwrap();
  cli()
    .current_dir(guardian_dir())
    .arg("--outDir")
    .arg(dir.path())
    .args(["--rootDir", "tests/fixtures", "./tests/fixtures/simple.d.ts"])
    .assert()
    .success();
  assert_eq!(read(dir.path().join("simple.d.ts")), read(fixture("simple_expected.d.ts")));
}

#[test]
fn batch_runs_continue_past_failures() {
  let dir = tempdir().unwrap();
  let root = guardian_dir().join("tests/fixtures");
  let assert = cli()
    .arg("--outDir")
    .arg(dir.path())
    .arg("--rootDir")
    .arg(&root)
    .arg(fixture("missing.d.ts"))
    .arg(fixture("simple.d.ts"))
    .assert()
    .code(1);
  let stderr = stderr_of(assert.get_output());
  assert!(stderr.contains("missing.d.ts\" not found"), "{stderr}");
  assert_eq!(read(dir.path().join("simple.d.ts")), read(fixture("simple_expected.d.ts")));
}

#[test]
fn batch_modes_require_a_root_dir() {
  let dir = tempdir().unwrap();
  let assert = cli()
    .arg("--outDir")
    .arg(dir.path())
    .arg(fixture("simple.d.ts"))
    .assert()
    .code(1);
  assert!(stderr_of(assert.get_output()).contains("--rootDir"));
}

#[test]
fn rejects_conflicting_modes() {
  let dir = tempdir().unwrap();
  let assert = cli()
    .arg("--out")
    .arg(dir.path().join("a.d.ts"))
    .arg("--verify")
    .arg(fixture("simple_expected.d.ts"))
    .arg(fixture("simple.d.ts"))
    .assert()
    .code(1);
  assert!(stderr_of(assert.get_output()).contains("exactly one of"));
}

#[test]
fn strips_exports_including_aliases() {
  let dir = tempdir().unwrap();
  let out = dir.path().join("stripped.d.ts");
  cli()
    .args(["--stripExportPattern", "^__.*", "--out"])
    .arg(&out)
    .arg(fixture("stripped_alias.d.ts"))
    .assert()
    .success();
  assert_eq!(read(&out), read(fixture("stripped_alias_expected.d.ts")));

  cli()
    .args(["--stripExportPattern", "^__.*", "--out"])
    .arg(&out)
    .arg(fixture("underscored.d.ts"))
    .assert()
    .success();
  assert_eq!(read(&out), read(fixture("underscored_expected.d.ts")));
}

#[test]
fn aliases_are_fatal_errors() {
  let dir = tempdir().unwrap();
  let assert = cli()
    .arg("--out")
    .arg(dir.path().join("out.d.ts"))
    .arg(fixture("stripped_alias.d.ts"))
    .assert()
    .code(1);
  let output = assert.get_output();
  assert_eq!(
    stderr_of(output),
    "Symbol \"A\" was aliased as \"__A__\". Aliases are not supported.\n"
  );
  assert_eq!(stdout_of(output), "");
}

#[test]
fn module_identifiers_can_be_whitelisted() {
  let dir = tempdir().unwrap();
  let out = dir.path().join("out.d.ts");
  let assert = cli()
    .arg("--out")
    .arg(&out)
    .arg(fixture("module_identifier.d.ts"))
    .assert()
    .code(1);
  assert!(stderr_of(assert.get_output()).contains("Module identifier \"foo\" is not allowed"));

  cli()
    .args(["--allowModuleIdentifiers", "foo", "--out"])
    .arg(&out)
    .arg(fixture("module_identifier.d.ts"))
    .assert()
    .success();
  assert_eq!(read(&out), read(fixture("module_identifier_expected.d.ts")));
}

#[test]
fn warns_about_missing_stability_tags() {
  let dir = tempdir().unwrap();
  let assert = cli()
    .current_dir(guardian_dir())
    .args(["--onStabilityMissing", "warn", "--out"])
    .arg(dir.path().join("out.d.ts"))
    .arg("tests/fixtures/simple.d.ts")
    .assert()
    .success();
  assert_eq!(
    stderr_of(assert.get_output()),
    "tests/fixtures/simple.d.ts(1,1): warning: No stability annotation found for symbol \"A\"\n\
     tests/fixtures/simple.d.ts(2,1): warning: No stability annotation found for symbol \"B\"\n"
  );
}

#[test]
fn reads_options_from_a_config_file() {
  let dir = tempdir().unwrap();
  let config = dir.path().join("guardian.json");
  fs::write(&config, r#"{"allowModuleIdentifiers": ["foo"]}"#).unwrap();
  let out = dir.path().join("out.d.ts");
  cli()
    .arg("--config")
    .arg(&config)
    .arg("--out")
    .arg(&out)
    .arg(fixture("module_identifier.d.ts"))
    .assert()
    .success();
  assert_eq!(read(&out), read(fixture("module_identifier_expected.d.ts")));
}
