//! Reference substitution against a [`ResolvedIndex`].
//!
//! Every operation is two-phase: all values of the affected surfaces are
//! resolved into a staging buffer first, and only written back once every
//! one of them succeeded. The first unresolved reference aborts the call
//! and leaves the configuration exactly as it was.

use serde_json::Value;

use super::error::ResolveError;
use super::expr::RefExpr;
use super::index::ResolvedIndex;
use crate::service::{Environment, EventBinding, Function, Service};

/// Resolves reference expressions against an index.
#[derive(Clone, Copy, Debug)]
pub struct Substituter<'a> {
    index: &'a ResolvedIndex,
}

/// Staged replacements for one function.
struct StagedFunction {
    environment: Vec<RefExpr>,
    events: Vec<Option<RefExpr>>,
}

impl<'a> Substituter<'a> {
    /// Create a substituter over an index.
    pub fn new(index: &'a ResolvedIndex) -> Self {
        Self { index }
    }

    /// The index references are resolved against.
    pub fn index(&self) -> &'a ResolvedIndex {
        self.index
    }

    /// Resolve one expression to its concrete value.
    ///
    /// References become string literals; literals come back unchanged.
    pub fn resolve_value(&self, expr: &RefExpr) -> Result<Value, ResolveError> {
        match expr {
            RefExpr::Ref(name) => self
                .index
                .reference(name.as_str())
                .map(|value| Value::String(value.to_string()))
                .ok_or_else(|| ResolveError::unresolved_reference(name)),
            RefExpr::GetAtt { name, attribute } => self
                .index
                .attribute(name.as_str())
                .map(|value| Value::String(value.to_string()))
                .ok_or_else(|| ResolveError::unresolved_attribute(name, attribute.as_ref())),
            RefExpr::Literal(value) => Ok(value.clone()),
        }
    }

    /// Resolve one expression, keeping it as a [`RefExpr`].
    pub fn resolve(&self, expr: &RefExpr) -> Result<RefExpr, ResolveError> {
        self.resolve_value(expr).map(RefExpr::Literal)
    }

    /// Rewrite every value of an environment map in place.
    ///
    /// Keys and their order are unchanged. Returns the number of
    /// references that were replaced.
    pub fn resolve_environment(&self, environment: &mut Environment) -> Result<usize, ResolveError> {
        let staged = self.stage_environment(environment)?;
        Ok(commit_environment(environment, staged))
    }

    /// Rewrite the ARN field of every binding that carries one.
    pub fn resolve_events(&self, events: &mut [EventBinding]) -> Result<usize, ResolveError> {
        let staged = self.stage_events(events)?;
        Ok(commit_events(events, staged))
    }

    /// Rewrite a function's environment and event bindings together.
    pub fn resolve_function(&self, function: &mut Function) -> Result<usize, ResolveError> {
        let staged = self.stage_function(function)?;
        Ok(commit_function(function, staged))
    }

    /// Rewrite the provider environment and the selected functions.
    ///
    /// With `only = Some(name)` just that function is rewritten; naming a
    /// function the service does not declare is an error. Nothing is
    /// written unless every selected surface resolves.
    pub fn resolve_service(
        &self,
        service: &mut Service,
        only: Option<&str>,
    ) -> Result<usize, ResolveError> {
        if let Some(name) = only {
            if !service.functions.contains_key(name) {
                return Err(ResolveError::UnknownFunction(name.to_string()));
            }
        }

        let provider = self.stage_environment(&service.provider.environment)?;
        let mut functions = Vec::with_capacity(service.functions.len());
        for (name, function) in &service.functions {
            if only.is_some_and(|selected| selected != name.as_str()) {
                functions.push(None);
                continue;
            }
            tracing::debug!(function = %name, "resolving function");
            functions.push(Some(self.stage_function(function)?));
        }

        let mut rewritten = commit_environment(&mut service.provider.environment, provider);
        for (function, staged) in service.functions.values_mut().zip(functions) {
            if let Some(staged) = staged {
                rewritten += commit_function(function, staged);
            }
        }
        Ok(rewritten)
    }

    fn stage_environment(&self, environment: &Environment) -> Result<Vec<RefExpr>, ResolveError> {
        environment
            .iter()
            .map(|(key, value)| {
                self.resolve(value).inspect_err(|err| {
                    tracing::debug!(variable = %key, error = %err, "environment value did not resolve");
                })
            })
            .collect()
    }

    fn stage_events(&self, events: &[EventBinding]) -> Result<Vec<Option<RefExpr>>, ResolveError> {
        events
            .iter()
            .map(|event| event.arn().map(|arn| self.resolve(arn)).transpose())
            .collect()
    }

    fn stage_function(&self, function: &Function) -> Result<StagedFunction, ResolveError> {
        Ok(StagedFunction {
            environment: self.stage_environment(&function.environment)?,
            events: self.stage_events(&function.events)?,
        })
    }
}

fn commit_environment(environment: &mut Environment, staged: Vec<RefExpr>) -> usize {
    let mut rewritten = 0;
    for (slot, value) in environment.values_mut().zip(staged) {
        if slot.is_reference() {
            rewritten += 1;
        }
        *slot = value;
    }
    rewritten
}

fn commit_events(events: &mut [EventBinding], staged: Vec<Option<RefExpr>>) -> usize {
    let mut rewritten = 0;
    for (event, value) in events.iter_mut().zip(staged) {
        if let (Some(slot), Some(value)) = (event.arn_mut(), value) {
            if slot.is_reference() {
                rewritten += 1;
            }
            *slot = value;
        }
    }
    rewritten
}

fn commit_function(function: &mut Function, staged: StagedFunction) -> usize {
    commit_environment(&mut function.environment, staged.environment)
        + commit_events(&mut function.events, staged.events)
}
