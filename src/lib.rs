//! # localrefs
//!
//! Resolves CloudFormation-style references (`Ref`, `Fn::GetAtt`) in a
//! serverless service configuration to concrete values pointing at a
//! local cloud emulator.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hook     → Activation entry point (stage gate, function selection)
//!   ↓
//! service  → Service document: provider, functions, events, loading
//!   ↓
//! resolve  → Index, reference expressions, substitution, diagnostics
//!   ↓
//! graph    → Parameters and resources of the template
//!   ↓
//! base     → Primitives (LogicalName, LocalEndpoint)
//! ```
//!
//! ## Example
//!
//! ```
//! use localrefs::{ActivationOptions, LocalRefs, Service};
//!
//! let mut service = Service::from_json_str(r#"{
//!     "provider": {"environment": {"QUEUE_URL": {"Ref": "Jobs"}}},
//!     "resources": {"Resources": {
//!         "Jobs": {"Type": "AWS::SQS::Queue", "Properties": {"QueueName": "jobs"}}
//!     }}
//! }"#).unwrap();
//!
//! LocalRefs::new()
//!     .initialize(&ActivationOptions::for_stage("local"), &mut service)
//!     .unwrap();
//!
//! assert_eq!(
//!     service.provider.environment["QUEUE_URL"].as_str(),
//!     Some("http://localhost:4566/000000000000/jobs"),
//! );
//! ```

/// Foundation types: LogicalName, LocalEndpoint
pub mod base;

/// Template parameters and resources
pub mod graph;

/// Resolved index, reference expressions, substitution and diagnostics
pub mod resolve;

/// The service document and its loaders
pub mod service;

/// Activation hook
pub mod hook;

pub use base::{LocalEndpoint, LogicalName};
pub use graph::{Parameter, Resource, ResourceGraph, ResourceKind};
pub use hook::{Activation, ActivationOptions, LOCAL_STAGE, LocalRefs};
pub use resolve::{LoadError, RefExpr, ResolveError, ResolvedIndex, Substituter};
pub use service::{Environment, EventBinding, Function, Service};
