//! Loading and writing service documents.
//!
//! YAML templates may use the short intrinsic forms (`!Ref Stage`,
//! `!GetAtt Jobs.Arn`). Those are rewritten to their long mapping forms
//! before typed decoding, so the rest of the crate only ever sees
//! `{"Ref": ...}` and `{"Fn::GetAtt": ...}`.

use std::path::Path;

use super::Service;
use crate::resolve::LoadError;

impl Service {
    /// Parse a service from JSON.
    pub fn from_json_str(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a service from YAML.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(source: &str) -> Result<Self, LoadError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(source)?;
        Ok(serde_yaml::from_value(yaml::expand_short_forms(raw))?)
    }

    /// Serialize to YAML, with references in their long forms.
    #[cfg(feature = "yaml")]
    pub fn to_yaml_string(&self) -> Result<String, LoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load a service from a `.yml`, `.yaml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        tracing::debug!(path = %path.display(), "loading service document");
        match extension {
            "json" => Self::from_json_str(&source),
            #[cfg(feature = "yaml")]
            "yml" | "yaml" => Self::from_yaml_str(&source),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_owned(),
            }),
        }
    }
}

#[cfg(feature = "yaml")]
mod yaml {
    use serde_yaml::value::TaggedValue;
    use serde_yaml::{Mapping, Value};

    use crate::resolve::{GET_ATT_KEY, REF_KEY};

    /// Rewrite every `!Tag value` node into a single-key mapping.
    ///
    /// `!Ref` and `!GetAtt` map to `Ref` and `Fn::GetAtt`; any other
    /// intrinsic (`!Sub`, `!Join`, ...) maps to `Fn::<Tag>` and is left
    /// for the walker to treat as a literal.
    pub(super) fn expand_short_forms(value: Value) -> Value {
        match value {
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                let tag = tag.to_string();
                let key = match tag.trim_start_matches('!') {
                    "Ref" => REF_KEY.to_string(),
                    "GetAtt" => GET_ATT_KEY.to_string(),
                    other => format!("Fn::{}", other),
                };
                let mut mapping = Mapping::new();
                mapping.insert(Value::String(key), expand_short_forms(value));
                Value::Mapping(mapping)
            }
            Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(expand_short_forms).collect())
            }
            Value::Mapping(mapping) => Value::Mapping(
                mapping
                    .into_iter()
                    .map(|(key, value)| (key, expand_short_forms(value)))
                    .collect(),
            ),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::RefExpr;
    use std::io::Write;

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_short_forms() {
        let service = Service::from_yaml_str(
            r#"
provider:
  environment:
    STAGE: !Ref Stage
    QUEUE_ARN: !GetAtt Jobs.Arn
    GREETING: !Sub "hello-${Stage}"
    PLAIN: value
"#,
        )
        .unwrap();

        let env = &service.provider.environment;
        assert_eq!(env["STAGE"], RefExpr::reference("Stage"));
        assert_eq!(env["QUEUE_ARN"], RefExpr::get_att("Jobs", "Arn"));
        assert_eq!(
            env["GREETING"].as_literal(),
            Some(&serde_json::json!({"Fn::Sub": "hello-${Stage}"}))
        );
        assert_eq!(env["PLAIN"].as_str(), Some("value"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_long_forms() {
        let service = Service::from_yaml_str(
            r#"
provider:
  environment:
    STAGE:
      Ref: Stage
    QUEUE_ARN:
      Fn::GetAtt: [Jobs, Arn]
"#,
        )
        .unwrap();

        let env = &service.provider.environment;
        assert_eq!(env["STAGE"], RefExpr::reference("Stage"));
        assert_eq!(env["QUEUE_ARN"], RefExpr::get_att("Jobs", "Arn"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_malformed_reference() {
        let result = Service::from_yaml_str(
            r#"
provider:
  environment:
    STAGE:
      Ref: [not, a, name]
"#,
        );
        assert!(matches!(result, Err(LoadError::Yaml(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_references() {
        let source = r#"{"provider":{"environment":{"STAGE":{"Ref":"Stage"}}}}"#;
        let service = Service::from_json_str(source).unwrap();
        let out = service.to_json_string().unwrap();
        assert_eq!(Service::from_json_str(&out).unwrap(), service);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("serverless.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"provider":{{"environment":{{"A":"b"}}}}}}"#).unwrap();

        let service = Service::load(&path).unwrap();
        assert_eq!(service.provider.environment["A"].as_str(), Some("b"));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(Service::load(&missing), Err(LoadError::Io { .. })));

        let toml = dir.path().join("serverless.toml");
        std::fs::write(&toml, "x = 1").unwrap();
        assert!(matches!(
            Service::load(&toml),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }
}
