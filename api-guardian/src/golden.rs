use crate::compute_api_text;
use crate::error::Error;
use crate::options::SerializationOptions;
use similar::TextDiff;
use std::fs;
use std::path::Path;

/// A unified diff from `expected` to `actual`, or an empty string when they are equal.
pub fn text_diff(expected_name: &str, expected: &str, actual: &str) -> String {
  if expected == actual {
    return String::new();
  }
  TextDiff::from_lines(expected, actual)
    .unified_diff()
    .header(expected_name, "Generated API")
    .to_string()
}

/// Drops the `---`/`+++` file header lines of a unified diff, keeping the hunks.
pub fn strip_patch_header(diff: &str) -> String {
  let mut lines = diff.split_inclusive('\n').peekable();
  let mut out = String::new();
  while let Some(line) = lines.peek() {
    if line.starts_with("--- ") || line.starts_with("+++ ") {
      lines.next();
    } else {
      break;
    }
  }
  out.extend(lines);
  out
}

/// Writes the golden text of `entry` to `out`, creating missing parent directories.
pub fn generate_golden_file(
  entry: &Path,
  out: &Path,
  options: &SerializationOptions,
) -> Result<(), Error> {
  let text = compute_api_text(entry, options)?;
  let write_err = |source| Error::Write {
    path: out.to_path_buf(),
    source,
  };
  if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(write_err)?;
  }
  fs::write(out, text).map_err(write_err)?;
  tracing::debug!(entry = %entry.display(), out = %out.display(), "wrote golden file");
  Ok(())
}

/// Compares the golden text of `entry` with the file at `golden`. An empty string means the two
/// match; otherwise the diff hunks are returned.
pub fn verify_against_golden_file(
  entry: &Path,
  golden: &Path,
  options: &SerializationOptions,
) -> Result<String, Error> {
  let actual = compute_api_text(entry, options)?;
  let expected = fs::read_to_string(golden).map_err(|source| {
    Error::Host(crate::error::HostError::Read {
      path: golden.to_path_buf(),
      source,
    })
  })?;
  Ok(strip_patch_header(&text_diff(
    &golden.display().to_string(),
    &expected,
    &actual,
  )))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn equal_texts_have_no_diff() {
    assert_eq!(text_diff("a", "x\ny\n", "x\ny\n"), "");
  }

  #[test]
  fn diffs_are_unified_with_headers() {
    let diff = text_diff("golden.d.ts", "export declare const A: string;\n", "export declare const A: number;\n");
    assert_eq!(
      diff,
      "--- golden.d.ts\n+++ Generated API\n@@ -1 +1 @@\n-export declare const A: string;\n+export declare const A: number;\n"
    );
    assert_eq!(
      strip_patch_header(&diff),
      "@@ -1 +1 @@\n-export declare const A: string;\n+export declare const A: number;\n"
    );
  }

  #[test]
  fn generates_then_verifies() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("entry.d.ts");
    fs::write(&entry, "export declare const A: string;\nexport declare var B: any;\n").unwrap();
    let golden = dir.path().join("nested/dir/golden.d.ts");
    let options = SerializationOptions::default();
    generate_golden_file(&entry, &golden, &options).unwrap();
    assert_eq!(
      fs::read_to_string(&golden).unwrap(),
      "export declare const A: string;\n\nexport declare var B: any;\n"
    );
    assert_eq!(verify_against_golden_file(&entry, &golden, &options).unwrap(), "");

    fs::write(&golden, "export declare const A: string;\n").unwrap();
    let diff = verify_against_golden_file(&entry, &golden, &options).unwrap();
    assert!(diff.starts_with("@@"), "{diff}");
    assert!(diff.contains("+export declare var B: any;\n"), "{diff}");
  }

  #[test]
  fn missing_golden_files_are_errors() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("entry.d.ts");
    fs::write(&entry, "export declare const A: string;\n").unwrap();
    let err = verify_against_golden_file(&entry, &dir.path().join("nope.d.ts"), &SerializationOptions::default())
      .unwrap_err();
    assert!(matches!(err, Error::Host(_)), "{err}");
  }
}
