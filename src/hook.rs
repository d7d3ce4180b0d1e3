//! Activation hook, called by a deployment orchestrator before it
//! launches functions against a local emulator.

use serde::{Deserialize, Serialize};

use crate::base::LocalEndpoint;
use crate::resolve::{LoadError, ResolveError, ResolvedIndex, Substituter};
use crate::service::Service;

/// The only stage on which references are rewritten.
pub const LOCAL_STAGE: &str = "local";

/// Options passed in by the orchestrator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationOptions {
    /// Deployment stage (`--stage`).
    pub stage: Option<String>,
    /// Restrict activation to one function (`--function`).
    pub function: Option<String>,
}

impl ActivationOptions {
    /// Options for the given stage, covering every function.
    pub fn for_stage(stage: impl Into<String>) -> Self {
        Self {
            stage: Some(stage.into()),
            function: None,
        }
    }

    /// Restrict activation to one function.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Check if these options select the local stage.
    pub fn is_local(&self) -> bool {
        self.stage.as_deref() == Some(LOCAL_STAGE)
    }
}

/// Outcome of an activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// The stage is not local; the service was not touched.
    Skipped,
    /// References were rewritten.
    Resolved {
        /// Number of reference values replaced.
        rewritten: usize,
    },
}

/// Rewrites a service's references to local emulator values.
#[derive(Clone, Debug, Default)]
pub struct LocalRefs {
    endpoint: LocalEndpoint,
}

impl LocalRefs {
    /// Create a hook using the default endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hook using the endpoint declared in the service's `custom` block.
    pub fn from_service(service: &Service) -> Result<Self, LoadError> {
        Ok(Self::new().with_endpoint(service.local_endpoint()?))
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: LocalEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// The endpoint values are built against.
    pub fn endpoint(&self) -> &LocalEndpoint {
        &self.endpoint
    }

    /// Rewrite the service for local execution.
    ///
    /// On any error the service is left unchanged.
    pub fn initialize(
        &self,
        options: &ActivationOptions,
        service: &mut Service,
    ) -> Result<Activation, ResolveError> {
        if !options.is_local() {
            tracing::debug!(stage = ?options.stage, "not a local stage, skipping");
            return Ok(Activation::Skipped);
        }

        let index = ResolvedIndex::build(&service.resources, &self.endpoint);
        tracing::info!(
            entries = index.len(),
            function = ?options.function,
            host = %self.endpoint.host,
            "resolving references for local execution"
        );

        let rewritten =
            Substituter::new(&index).resolve_service(service, options.function.as_deref())?;

        tracing::info!(rewritten, "local references resolved");
        Ok(Activation::Resolved { rewritten })
    }
}
