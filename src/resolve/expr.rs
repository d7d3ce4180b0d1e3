//! Reference expressions, the values a template can put where a string goes.
//!
//! Configuration values are decoded into [`RefExpr`] once, when the
//! service document is deserialized. The walker then matches on the
//! variant instead of probing arbitrary values for `Ref` keys.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use smol_str::SmolStr;

use super::error::LoadError;
use crate::base::LogicalName;

/// Key of a direct reference object.
pub const REF_KEY: &str = "Ref";
/// Key of an attribute reference object.
pub const GET_ATT_KEY: &str = "Fn::GetAtt";

/// A configuration value that may be a reference.
#[derive(Clone, Debug, PartialEq)]
pub enum RefExpr {
    /// `{"Ref": "Name"}`, resolves to the primary value of `Name`.
    Ref(LogicalName),
    /// `{"Fn::GetAtt": ["Name", "Arn"]}`, resolves to a secondary value of `Name`.
    ///
    /// `attribute` is `None` for the one-element form `["Name"]`, which
    /// accepts whatever attribute the resource exposes.
    GetAtt {
        /// The referenced logical name.
        name: LogicalName,
        /// The requested attribute.
        attribute: Option<SmolStr>,
    },
    /// Anything else. Passed through resolution unchanged.
    Literal(Value),
}

impl RefExpr {
    /// A direct reference.
    pub fn reference(name: impl Into<LogicalName>) -> Self {
        RefExpr::Ref(name.into())
    }

    /// An attribute reference naming a specific attribute.
    pub fn get_att(name: impl Into<LogicalName>, attribute: impl AsRef<str>) -> Self {
        RefExpr::GetAtt {
            name: name.into(),
            attribute: Some(SmolStr::new(attribute)),
        }
    }

    /// A string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        RefExpr::Literal(Value::String(value.into()))
    }

    /// Decode a raw value into an expression.
    ///
    /// Objects with a single `Ref` or `Fn::GetAtt` key are references and
    /// must be well-formed; every other value is a literal.
    pub fn decode(value: Value) -> Result<Self, LoadError> {
        let map = match value {
            Value::Object(map) => map,
            other => return Ok(RefExpr::Literal(other)),
        };
        if map.len() != 1 {
            return Ok(RefExpr::Literal(Value::Object(map)));
        }
        if let Some(target) = map.get(REF_KEY) {
            return decode_ref(target);
        }
        if let Some(target) = map.get(GET_ATT_KEY) {
            return decode_get_att(target);
        }
        Ok(RefExpr::Literal(Value::Object(map)))
    }

    /// Encode back into the raw template form.
    pub fn encode(&self) -> Value {
        match self {
            RefExpr::Ref(name) => {
                let mut map = Map::new();
                map.insert(REF_KEY.to_string(), Value::String(name.to_string()));
                Value::Object(map)
            }
            RefExpr::GetAtt { name, attribute } => {
                let mut parts = vec![Value::String(name.to_string())];
                if let Some(attribute) = attribute {
                    parts.push(Value::String(attribute.to_string()));
                }
                let mut map = Map::new();
                map.insert(GET_ATT_KEY.to_string(), Value::Array(parts));
                Value::Object(map)
            }
            RefExpr::Literal(value) => value.clone(),
        }
    }

    /// Check if this is a `Ref` or `Fn::GetAtt`.
    pub fn is_reference(&self) -> bool {
        !matches!(self, RefExpr::Literal(_))
    }

    /// The referenced logical name, if this is a reference.
    pub fn logical_name(&self) -> Option<&LogicalName> {
        match self {
            RefExpr::Ref(name) | RefExpr::GetAtt { name, .. } => Some(name),
            RefExpr::Literal(_) => None,
        }
    }

    /// The literal value, if this is a literal.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            RefExpr::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// The literal as a string slice, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(Value::as_str)
    }
}

fn decode_ref(target: &Value) -> Result<RefExpr, LoadError> {
    match target {
        Value::String(name) if !name.is_empty() => Ok(RefExpr::Ref(LogicalName::new(name))),
        other => Err(LoadError::malformed_reference(format!(
            "Ref expects a logical name, found {}",
            other
        ))),
    }
}

fn decode_get_att(target: &Value) -> Result<RefExpr, LoadError> {
    let malformed = || {
        LoadError::malformed_reference(format!(
            "Fn::GetAtt expects [name, attribute] or \"name.attribute\", found {}",
            target
        ))
    };

    match target {
        // Short form: "Queue.Arn"
        Value::String(path) => {
            let (name, attribute) = match path.split_once('.') {
                Some((name, attribute)) => (name, Some(SmolStr::new(attribute))),
                None => (path.as_str(), None),
            };
            if name.is_empty() || attribute.as_ref().is_some_and(SmolStr::is_empty) {
                return Err(malformed());
            }
            Ok(RefExpr::GetAtt {
                name: LogicalName::new(name),
                attribute,
            })
        }
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(name)] if !name.is_empty() => Ok(RefExpr::GetAtt {
                name: LogicalName::new(name),
                attribute: None,
            }),
            [Value::String(name), Value::String(attribute)]
                if !name.is_empty() && !attribute.is_empty() =>
            {
                Ok(RefExpr::GetAtt {
                    name: LogicalName::new(name),
                    attribute: Some(SmolStr::new(attribute)),
                })
            }
            _ => Err(malformed()),
        },
        _ => Err(malformed()),
    }
}

impl Serialize for RefExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RefExpr::Literal(value) => value.serialize(serializer),
            reference => reference.encode().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RefExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RefExpr::decode(value).map_err(D::Error::custom)
    }
}

impl From<&str> for RefExpr {
    fn from(value: &str) -> Self {
        RefExpr::literal(value)
    }
}

impl From<String> for RefExpr {
    fn from(value: String) -> Self {
        RefExpr::literal(value)
    }
}

impl fmt::Display for RefExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefExpr::Ref(name) => write!(f, "!Ref {}", name),
            RefExpr::GetAtt {
                name,
                attribute: Some(attribute),
            } => write!(f, "!GetAtt {}.{}", name, attribute),
            RefExpr::GetAtt {
                name,
                attribute: None,
            } => write!(f, "!GetAtt {}", name),
            RefExpr::Literal(Value::String(s)) => f.write_str(s),
            RefExpr::Literal(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_decode_ref() {
        let expr = RefExpr::decode(json!({"Ref": "Stage"})).unwrap();
        assert_eq!(expr, RefExpr::reference("Stage"));
        assert!(expr.is_reference());
        assert_eq!(expr.logical_name().map(LogicalName::as_str), Some("Stage"));
    }

    #[rstest]
    #[case(json!({"Fn::GetAtt": ["Jobs", "Arn"]}), Some("Arn"))]
    #[case(json!({"Fn::GetAtt": "Jobs.Arn"}), Some("Arn"))]
    #[case(json!({"Fn::GetAtt": ["Jobs"]}), None)]
    #[case(json!({"Fn::GetAtt": "Jobs"}), None)]
    fn test_decode_get_att_forms(#[case] raw: Value, #[case] attribute: Option<&str>) {
        let expr = RefExpr::decode(raw).unwrap();
        assert_eq!(
            expr,
            RefExpr::GetAtt {
                name: LogicalName::new("Jobs"),
                attribute: attribute.map(SmolStr::new),
            }
        );
    }

    #[rstest]
    #[case(json!("plain"))]
    #[case(json!(42))]
    #[case(json!(true))]
    #[case(json!(null))]
    #[case(json!({"Fn::Join": ["", ["a", "b"]]}))]
    #[case(json!({"Ref": "Stage", "Extra": 1}))]
    fn test_decode_literal(#[case] raw: Value) {
        let expr = RefExpr::decode(raw.clone()).unwrap();
        assert_eq!(expr, RefExpr::Literal(raw));
        assert!(!expr.is_reference());
    }

    #[rstest]
    #[case(json!({"Ref": 1}))]
    #[case(json!({"Ref": ""}))]
    #[case(json!({"Fn::GetAtt": []}))]
    #[case(json!({"Fn::GetAtt": ["A", "B", "C"]}))]
    #[case(json!({"Fn::GetAtt": "A."}))]
    #[case(json!({"Fn::GetAtt": {"A": "B"}}))]
    fn test_decode_malformed(#[case] raw: Value) {
        let err = RefExpr::decode(raw).unwrap_err();
        assert!(matches!(err, LoadError::MalformedReference(_)));
    }

    #[test]
    fn test_encode_matches_template_form() {
        assert_eq!(RefExpr::reference("Stage").encode(), json!({"Ref": "Stage"}));
        assert_eq!(
            RefExpr::get_att("Jobs", "Arn").encode(),
            json!({"Fn::GetAtt": ["Jobs", "Arn"]})
        );
        assert_eq!(RefExpr::literal("x").encode(), json!("x"));
    }

    #[test]
    fn test_serde_through_json() {
        let env: Vec<RefExpr> =
            serde_json::from_str(r#"[{"Ref": "Stage"}, "literal", 7]"#).unwrap();
        assert_eq!(env[0], RefExpr::reference("Stage"));
        assert_eq!(env[1].as_str(), Some("literal"));
        assert_eq!(env[2].as_literal(), Some(&json!(7)));

        let out = serde_json::to_value(&env).unwrap();
        assert_eq!(out, json!([{"Ref": "Stage"}, "literal", 7]));
    }

    #[test]
    fn test_display() {
        assert_eq!(RefExpr::reference("Stage").to_string(), "!Ref Stage");
        assert_eq!(RefExpr::get_att("Jobs", "Arn").to_string(), "!GetAtt Jobs.Arn");
        assert_eq!(RefExpr::literal("dev").to_string(), "dev");
    }
}
