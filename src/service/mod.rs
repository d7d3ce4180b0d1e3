//! The service document handed over by the deployment orchestrator.
//!
//! Only the surfaces that can carry references are typed:
//!
//! - `provider.environment`
//! - `functions.<name>.environment`
//! - `functions.<name>.events[*].<kind>.arn`
//! - `resources` (the graph the index is built from)
//!
//! Every other field is kept verbatim in an `extra` map, so a resolved
//! service serializes back to the document it came from with only the
//! reference values replaced.

mod events;
mod source;

pub use events::{ArnSource, EventBinding};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::LocalEndpoint;
use crate::graph::ResourceGraph;
use crate::resolve::{LoadError, RefExpr};

/// Environment variable name to value.
pub type Environment = IndexMap<String, RefExpr>;

/// Key of the `custom` block holding the emulator endpoint.
pub const LOCALSTACK_CUSTOM_KEY: &str = "localstack";

/// The `provider` block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Environment shared by every function.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub environment: Environment,
    /// Other provider settings.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One entry of the `functions` block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Environment of this function only.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub environment: Environment,
    /// Event-source bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventBinding>,
    /// Other function settings (`handler`, `timeout`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Function {
    /// Set an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<RefExpr>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Add an event binding.
    pub fn with_event(mut self, event: EventBinding) -> Self {
        self.events.push(event);
        self
    }
}

/// A deployment description: provider, functions and the resource graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// The `provider` block.
    #[serde(default)]
    pub provider: Provider,
    /// Functions by name, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub functions: IndexMap<String, Function>,
    /// The `resources` block.
    #[serde(default, skip_serializing_if = "ResourceGraph::is_blank")]
    pub resources: ResourceGraph,
    /// The `custom` block.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub custom: IndexMap<String, Value>,
    /// Other top-level settings (`service`, `plugins`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Service {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resource graph.
    pub fn with_resources(mut self, resources: ResourceGraph) -> Self {
        self.resources = resources;
        self
    }

    /// Set a provider-level environment variable.
    pub fn with_provider_env(mut self, key: impl Into<String>, value: impl Into<RefExpr>) -> Self {
        self.provider.environment.insert(key.into(), value.into());
        self
    }

    /// Add a function.
    pub fn with_function(mut self, name: impl Into<String>, function: Function) -> Self {
        self.functions.insert(name.into(), function);
        self
    }

    /// The emulator endpoint declared under `custom.localstack`, or the default.
    pub fn local_endpoint(&self) -> Result<LocalEndpoint, LoadError> {
        match self.custom.get(LOCALSTACK_CUSTOM_KEY) {
            Some(block) => Ok(serde_json::from_value(block.clone())?),
            None => Ok(LocalEndpoint::default()),
        }
    }

    /// Every reference-carrying value with its dotted location.
    ///
    /// Order: provider environment, then each function's environment and
    /// events in declaration order. With `only = Some(name)` the other
    /// functions are left out.
    pub fn reference_sites(&self, only: Option<&str>) -> Vec<(String, &RefExpr)> {
        let mut sites = Vec::new();
        for (key, value) in &self.provider.environment {
            sites.push((format!("provider.environment.{}", key), value));
        }
        for (name, function) in &self.functions {
            if only.is_some_and(|selected| selected != name.as_str()) {
                continue;
            }
            sites.extend(function_sites(name, function));
        }
        sites
    }
}

/// Reference-carrying values of one function with their dotted locations.
fn function_sites<'a>(name: &str, function: &'a Function) -> Vec<(String, &'a RefExpr)> {
    let mut sites = Vec::new();
    for (key, value) in &function.environment {
        sites.push((format!("functions.{}.environment.{}", name, key), value));
    }
    for (i, event) in function.events.iter().enumerate() {
        if let Some(arn) = event.arn() {
            sites.push((format!("functions.{}.events.{}.{}.arn", name, i, event.kind()), arn));
        }
    }
    sites
}
