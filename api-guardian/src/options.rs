use regex::Regex;
use serde::de::Error as _;
use serde::Deserialize;
use serde::Deserializer;
use std::str::FromStr;

/// What to do when a top-level export has no `@experimental`, `@stable` or `@deprecated` tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityPolicy {
  #[default]
  None,
  Warn,
  Error,
}

impl FromStr for StabilityPolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "none" => Ok(StabilityPolicy::None),
      "warn" => Ok(StabilityPolicy::Warn),
      "error" => Ok(StabilityPolicy::Error),
      other => Err(format!("unknown stability policy '{other}'")),
    }
  }
}

/// Options shared by every step of one run. Deserializes from the same camelCase keys the
/// command line uses.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SerializationOptions {
  /// Exports whose name matches are left out entirely.
  #[serde(deserialize_with = "deserialize_pattern")]
  pub strip_export_pattern: Option<Regex>,
  /// Identifiers that may qualify a name in emitted text, such as `foo` in `foo.Bar`.
  pub allow_module_identifiers: Vec<String>,
  pub on_stability_missing: StabilityPolicy,
}

impl SerializationOptions {
  pub fn with_strip_export_pattern(mut self, pattern: Regex) -> Self {
    self.strip_export_pattern = Some(pattern);
    self
  }

  pub fn with_allow_module_identifiers<I, S>(mut self, identifiers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .allow_module_identifiers
      .extend(identifiers.into_iter().map(Into::into));
    self
  }

  pub fn with_on_stability_missing(mut self, policy: StabilityPolicy) -> Self {
    self.on_stability_missing = policy;
    self
  }

  pub fn strips(&self, name: &str) -> bool {
    self
      .strip_export_pattern
      .as_ref()
      .is_some_and(|p| p.is_match(name))
  }

  pub fn allows_module_identifier(&self, name: &str) -> bool {
    self.allow_module_identifiers.iter().any(|id| id == name)
  }
}

fn deserialize_pattern<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Regex>, D::Error> {
  let raw = Option::<String>::deserialize(d)?;
  raw
    .map(|raw| Regex::new(&raw).map_err(D::Error::custom))
    .transpose()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserializes_camel_case_keys() {
    let options: SerializationOptions = serde_json::from_str(
      r#"{"stripExportPattern": "^__.*", "allowModuleIdentifiers": ["foo"], "onStabilityMissing": "warn"}"#,
    )
    .unwrap();
    assert!(options.strips("__a__"));
    assert!(!options.strips("a__"));
    assert!(options.allows_module_identifier("foo"));
    assert_eq!(options.on_stability_missing, StabilityPolicy::Warn);
  }

  #[test]
  fn missing_keys_fall_back_to_defaults() {
    let options: SerializationOptions = serde_json::from_str("{}").unwrap();
    assert!(options.strip_export_pattern.is_none());
    assert!(options.allow_module_identifiers.is_empty());
    assert_eq!(options.on_stability_missing, StabilityPolicy::None);
  }

  #[test]
  fn rejects_invalid_patterns() {
    let err = serde_json::from_str::<SerializationOptions>(r#"{"stripExportPattern": "("}"#)
      .unwrap_err();
    assert!(err.to_string().contains("regex"), "{err}");
  }

  #[test]
  fn builders_accumulate() {
    let options = SerializationOptions::default()
      .with_allow_module_identifiers(["foo"])
      .with_allow_module_identifiers(vec![String::from("bar")])
      .with_on_stability_missing("error".parse().unwrap());
    assert_eq!(options.allow_module_identifiers, ["foo", "bar"]);
    assert_eq!(options.on_stability_missing, StabilityPolicy::Error);
  }
}
