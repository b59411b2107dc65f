use api_guardian::compute_api_text;
use api_guardian::public_api;
use api_guardian::verify_against_golden_file;
use api_guardian::Error;
use api_guardian::SerializationOptions;
use regex::Regex;
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests/fixtures")
    .join(name)
}

fn assert_golden(entry: &str, expected: &str, options: &SerializationOptions) {
  let actual = compute_api_text(&fixture(entry), options).unwrap();
  let expected = fs::read_to_string(fixture(expected)).unwrap();
  assert_eq!(actual, expected, "golden text of {entry}");
}

fn strip_underscored() -> SerializationOptions {
  SerializationOptions::default().with_strip_export_pattern(Regex::new("^__.*").unwrap())
}

#[test]
fn simple_declarations() {
  assert_golden("simple.d.ts", "simple_expected.d.ts", &SerializationOptions::default());
}

#[test]
fn exports_and_members_are_sorted() {
  assert_golden("sorting.d.ts", "sorting_expected.d.ts", &SerializationOptions::default());
}

#[test]
fn reexports_serialize_like_their_targets() {
  let options = SerializationOptions::default();
  assert_golden("reexported.d.ts", "simple_expected.d.ts", &options);
  assert_golden("reexported_star.d.ts", "simple_expected.d.ts", &options);
}

#[test]
fn strip_pattern_removes_exports() {
  assert_golden("underscored.d.ts", "underscored_expected.d.ts", &strip_underscored());
}

#[test]
fn stripped_aliases_are_not_rejected() {
  assert_golden("stripped_alias.d.ts", "stripped_alias_expected.d.ts", &strip_underscored());
  let err = compute_api_text(&fixture("stripped_alias.d.ts"), &SerializationOptions::default())
    .unwrap_err();
  assert_eq!(err.to_string(), "Symbol \"A\" was aliased as \"__A__\". Aliases are not supported.");
}

#[test]
fn module_identifiers_need_whitelisting() {
  let err = compute_api_text(&fixture("module_identifier.d.ts"), &SerializationOptions::default())
    .unwrap_err();
  assert!(matches!(err, Error::Diagnostics(_)));
  let message = err.to_string();
  assert!(message.ends_with(
    "module_identifier.d.ts(3,12): error: Module identifier \"foo\" is not allowed. Remove it from source or whitelist it via --allowModuleIdentifiers."
  ), "{message}");

  assert_golden(
    "module_identifier.d.ts",
    "module_identifier_expected.d.ts",
    &SerializationOptions::default().with_allow_module_identifiers(["foo"]),
  );
}

#[test]
fn empty_files_have_empty_golden_text() {
  assert_eq!(compute_api_text(&fixture("empty.d.ts"), &SerializationOptions::default()).unwrap(), "");
}

#[test]
fn verification_reports_the_patch() {
  let diff = verify_against_golden_file(
    &fixture("verify_entrypoint.d.ts"),
    &fixture("verify_expected.d.ts"),
    &SerializationOptions::default(),
  )
  .unwrap();
  assert_eq!(diff, fs::read_to_string(fixture("verify.patch")).unwrap());

  let matching = verify_against_golden_file(
    &fixture("simple.d.ts"),
    &fixture("simple_expected.d.ts"),
    &SerializationOptions::default(),
  )
  .unwrap();
  assert_eq!(matching, "");
}

#[test]
fn entry_points_must_be_existing_declaration_files() {
  let options = SerializationOptions::default();
  let err = compute_api_text(&fixture("classes_and_interfaces.ts"), &options).unwrap_err();
  assert!(matches!(err, Error::NotDeclarationFile(_)), "{err}");
  let err = compute_api_text(&fixture("missing.d.ts"), &options).unwrap_err();
  assert!(matches!(err, Error::SourceNotFound(_)), "{err}");
}

#[test]
fn summary_of_typescript_sources_and_declarations() {
  let expected = [
    "A",
    "A.field:string",
    "A.method(a:string):number",
    "B",
    "B.field:A",
    "C",
    "C.propWithDefault:any=3",
    "C.protectedProp:number //protected",
    "C.someProp:string",
    "C.constructor(someProp:string, propWithDefault:any=3, privateProp:any, protectedProp:number)",
  ];
  assert_eq!(public_api(&fixture("classes_and_interfaces.ts")).unwrap(), expected);

  let declared = public_api(&fixture("classes_and_interfaces.d.ts")).unwrap();
  assert_eq!(declared, [
    "A",
    "A.field:string",
    "A.method(a:string):number",
    "B",
    "B.field:A",
    "C",
    "C.propWithDefault:number",
    "C.protectedProp:number //protected",
    "C.someProp:string",
    "C.constructor(someProp:string, propWithDefault:number, privateProp:any, protectedProp:number)",
  ]);
}

#[test]
fn summary_of_simple_declarations() {
  assert_eq!(public_api(&fixture("simple.d.ts")).unwrap(), ["const A:string", "var B:any"]);
  assert_eq!(public_api(&fixture("reexported_star.d.ts")).unwrap(), ["const A:string", "var B:any"]);
}
