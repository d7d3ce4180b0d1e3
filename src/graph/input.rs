//! The declarative resource graph of a template.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::kind::ResourceKind;
use crate::base::LogicalName;

/// A template parameter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Declared parameter type (`String`, `Number`, ...).
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// The default value. Scalars are normalized to their string form.
    #[serde(
        rename = "Default",
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,
    /// Anything else declared on the parameter (`Description`, `AllowedValues`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Parameter {
    /// Create a string parameter with a default value.
    pub fn with_default(default: impl Into<String>) -> Self {
        Self {
            ty: Some("String".to_string()),
            default: Some(default.into()),
            extra: IndexMap::new(),
        }
    }
}

/// A template resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// The type tag.
    #[serde(rename = "Type")]
    pub kind: ResourceKind,
    /// Type-specific properties.
    #[serde(rename = "Properties", default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Value>,
    /// Anything else declared on the resource (`DependsOn`, `DeletionPolicy`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Resource {
    /// Create a resource of the given kind with no properties.
    pub fn new(kind: impl Into<ResourceKind>) -> Self {
        Self {
            kind: kind.into(),
            properties: IndexMap::new(),
            extra: IndexMap::new(),
        }
    }

    /// Create a supported resource whose declared-name property is set.
    ///
    /// For an unsupported kind no property is set.
    pub fn named(kind: ResourceKind, declared_name: impl Into<String>) -> Self {
        let mut resource = Self::new(kind);
        if let Some(property) = resource.kind.name_property() {
            resource
                .properties
                .insert(property.to_string(), Value::String(declared_name.into()));
        }
        resource
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The declared name (`QueueName`, `TopicName`, ...), if set to a plain string.
    pub fn declared_name(&self) -> Option<&str> {
        let property = self.kind.name_property()?;
        self.properties.get(property)?.as_str()
    }
}

/// Parameters and resources of a template, keyed by logical name.
///
/// This is the `resources` block of a service document. Declaration order
/// is preserved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceGraph {
    #[serde(rename = "Parameters", default, skip_serializing_if = "IndexMap::is_empty")]
    parameters: IndexMap<LogicalName, Parameter>,
    #[serde(rename = "Resources", default, skip_serializing_if = "IndexMap::is_empty")]
    resources: IndexMap<LogicalName, Resource>,
    /// Other template sections (`Outputs`, `Conditions`, ...), kept verbatim.
    #[serde(flatten)]
    extra: IndexMap<String, Value>,
}

impl ResourceGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous one with the same name.
    pub fn insert_parameter(&mut self, name: impl Into<LogicalName>, parameter: Parameter) {
        self.parameters.insert(name.into(), parameter);
    }

    /// Add a resource, replacing any previous one with the same name.
    pub fn insert_resource(&mut self, name: impl Into<LogicalName>, resource: Resource) {
        self.resources.insert(name.into(), resource);
    }

    /// Builder form of [`insert_parameter`](Self::insert_parameter).
    pub fn with_parameter(mut self, name: impl Into<LogicalName>, parameter: Parameter) -> Self {
        self.insert_parameter(name, parameter);
        self
    }

    /// Builder form of [`insert_resource`](Self::insert_resource).
    pub fn with_resource(mut self, name: impl Into<LogicalName>, resource: Resource) -> Self {
        self.insert_resource(name, resource);
        self
    }

    /// Get a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Get a resource by name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    /// Iterate over all parameters in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = (&LogicalName, &Parameter)> + '_ {
        self.parameters.iter()
    }

    /// Iterate over all resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = (&LogicalName, &Resource)> + '_ {
        self.resources.iter()
    }

    /// Get the number of parameters plus resources.
    pub fn len(&self) -> usize {
        self.parameters.len() + self.resources.len()
    }

    /// Check if the graph declares no parameters and no resources.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.resources.is_empty()
    }

    /// Check if there is nothing to serialize, not even other sections.
    pub(crate) fn is_blank(&self) -> bool {
        self.is_empty() && self.extra.is_empty()
    }
}

/// Deserialize an optional scalar (string, number, bool) into its string form.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "parameter default must be a scalar, found {}",
            other
        ))),
    }
}
