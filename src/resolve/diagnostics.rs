//! Pre-flight diagnostics for unresolved references.
//!
//! The walker stops at the first failure. Before activating local mode an
//! orchestrator can run [`check_service`] to list all of them, each with
//! the dotted path of the value that carries it.

use std::sync::Arc;

use super::expr::RefExpr;
use super::index::ResolvedIndex;
use super::walker::Substituter;
use crate::base::LogicalName;
use crate::graph::ResourceGraph;
use crate::service::Service;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Dotted path of the offending value, e.g. `functions.worker.environment.QUEUE_URL`.
    pub location: Arc<str>,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The logical name involved, if any.
    pub name: Option<LogicalName>,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(location: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Self {
            location: location.into(),
            severity: Severity::Error,
            code: None,
            name: None,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(location: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(location, message)
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the logical name involved.
    pub fn with_name(mut self, name: &LogicalName) -> Self {
        self.name = Some(name.clone());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
pub mod codes {
    /// `Ref` to a name with no local value.
    pub const UNRESOLVED_REFERENCE: &str = "E0001";
    /// `Fn::GetAtt` to a name with no attribute form.
    pub const UNRESOLVED_ATTRIBUTE: &str = "E0002";
    /// Selected function not declared by the service.
    pub const UNKNOWN_FUNCTION: &str = "E0003";

    /// Resource type with no local emulation.
    pub const UNSUPPORTED_RESOURCE: &str = "W0001";
    /// Supported resource without a plain-string name property.
    pub const MISSING_DECLARED_NAME: &str = "W0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during a check.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add an unresolved reference error.
    pub fn unresolved_reference(&mut self, location: &str, name: &LogicalName) {
        self.add(
            Diagnostic::error(location, format!("unresolved reference: Ref '{}'", name))
                .with_code(codes::UNRESOLVED_REFERENCE)
                .with_name(name),
        );
    }

    /// Add an unresolved attribute error.
    pub fn unresolved_attribute(&mut self, location: &str, name: &LogicalName, attribute: Option<&str>) {
        self.add(
            Diagnostic::error(
                location,
                format!(
                    "unresolved attribute: Fn::GetAtt '{}.{}'",
                    name,
                    attribute.unwrap_or("*")
                ),
            )
            .with_code(codes::UNRESOLVED_ATTRIBUTE)
            .with_name(name),
        );
    }

    /// Add an unknown function error.
    pub fn unknown_function(&mut self, name: &str) {
        self.add(
            Diagnostic::error(
                format!("functions.{}", name),
                format!("unknown function: '{}' is not declared in the service", name),
            )
            .with_code(codes::UNKNOWN_FUNCTION),
        );
    }

    /// Add an unsupported resource warning.
    pub fn unsupported_resource(&mut self, name: &LogicalName, type_tag: &str) {
        self.add(
            Diagnostic::warning(
                format!("resources.Resources.{}", name),
                format!("'{}' has type {} which has no local value", name, type_tag),
            )
            .with_code(codes::UNSUPPORTED_RESOURCE)
            .with_name(name),
        );
    }

    /// Add a missing declared-name warning.
    pub fn missing_declared_name(&mut self, name: &LogicalName, property: &str) {
        self.add(
            Diagnostic::warning(
                format!("resources.Resources.{}.Properties.{}", name, property),
                format!("'{}' has no plain-string {}", name, property),
            )
            .with_code(codes::MISSING_DECLARED_NAME)
            .with_name(name),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

// ============================================================================
// REFERENCE CHECKER
// ============================================================================

/// Checks reference sites against an index without rewriting anything.
pub struct ReferenceChecker<'a> {
    walker: Substituter<'a>,
    collector: DiagnosticCollector,
}

impl<'a> ReferenceChecker<'a> {
    /// Create a new checker.
    pub fn new(index: &'a ResolvedIndex) -> Self {
        Self {
            walker: Substituter::new(index),
            collector: DiagnosticCollector::new(),
        }
    }

    /// Check one value.
    pub fn check(&mut self, location: &str, expr: &RefExpr) {
        if self.walker.resolve_value(expr).is_ok() {
            return;
        }
        match expr {
            RefExpr::Ref(name) => self.collector.unresolved_reference(location, name),
            RefExpr::GetAtt { name, attribute } => {
                self.collector
                    .unresolved_attribute(location, name, attribute.as_deref());
            }
            RefExpr::Literal(_) => {}
        }
    }

    /// Get the collected diagnostics.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.collector.diagnostics
    }
}

/// Check every reference site of a service and return one diagnostic per failure.
///
/// With `only = Some(name)` the functions other than `name` are skipped,
/// the same way activation skips them. Naming a function the service does
/// not declare is reported as [`codes::UNKNOWN_FUNCTION`].
pub fn check_service(index: &ResolvedIndex, service: &Service, only: Option<&str>) -> Vec<Diagnostic> {
    let mut checker = ReferenceChecker::new(index);
    if let Some(name) = only {
        if !service.functions.contains_key(name) {
            checker.collector.unknown_function(name);
        }
    }
    for (location, expr) in service.reference_sites(only) {
        checker.check(&location, expr);
    }
    checker.finish()
}

/// Warnings for resources the index will not contain.
pub fn index_warnings(graph: &ResourceGraph) -> Vec<Diagnostic> {
    let mut collector = DiagnosticCollector::new();
    for (name, resource) in graph.resources() {
        match resource.kind.name_property() {
            None => collector.unsupported_resource(name, resource.kind.type_tag()),
            Some(property) if resource.declared_name().is_none() => {
                collector.missing_declared_name(name, property);
            }
            Some(_) => {}
        }
    }
    collector.take()
}
