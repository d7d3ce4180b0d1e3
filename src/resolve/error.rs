//! Error types for loading documents and resolving references.

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::LogicalName;

/// Errors that abort a resolution walk.
///
/// Each variant names the identifier that failed and the kind of
/// expression that referenced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A `Ref` names something that is neither a parameter nor a resolvable resource.
    #[error("unresolved reference: Ref '{name}' has no local value")]
    UnresolvedReference {
        /// The logical name that was referenced.
        name: LogicalName,
    },

    /// An `Fn::GetAtt` names something unknown, or a resource with no attribute form.
    #[error("unresolved attribute: Fn::GetAtt '{name}.{}' has no local value", .attribute.as_deref().unwrap_or("*"))]
    UnresolvedAttribute {
        /// The logical name that was referenced.
        name: LogicalName,
        /// The requested attribute, if the expression named one.
        attribute: Option<SmolStr>,
    },

    /// The function selected for activation is not declared by the service.
    #[error("unknown function: '{0}' is not declared in the service")]
    UnknownFunction(String),
}

impl ResolveError {
    /// Creates an [`UnresolvedReference`](Self::UnresolvedReference).
    pub fn unresolved_reference(name: &LogicalName) -> Self {
        Self::UnresolvedReference { name: name.clone() }
    }

    /// Creates an [`UnresolvedAttribute`](Self::UnresolvedAttribute).
    pub fn unresolved_attribute(name: &LogicalName, attribute: Option<&SmolStr>) -> Self {
        Self::UnresolvedAttribute {
            name: name.clone(),
            attribute: attribute.cloned(),
        }
    }

    /// The logical name the failing expression referenced, if any.
    pub fn logical_name(&self) -> Option<&LogicalName> {
        match self {
            Self::UnresolvedReference { name } | Self::UnresolvedAttribute { name, .. } => {
                Some(name)
            }
            Self::UnknownFunction(_) => None,
        }
    }
}

/// Errors that occur while loading a service document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document is not valid YAML, or does not match the service shape.
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document is not valid JSON, or does not match the service shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A `Ref` or `Fn::GetAtt` expression has the wrong shape.
    #[error("malformed reference: {0}")]
    MalformedReference(String),

    /// The file extension is not one the loader understands.
    #[error("unsupported document format: {}", .path.display())]
    UnsupportedFormat {
        /// Path of the document.
        path: PathBuf,
    },
}

impl LoadError {
    /// Creates a [`MalformedReference`](Self::MalformedReference).
    pub fn malformed_reference(msg: impl Into<String>) -> Self {
        Self::MalformedReference(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_message() {
        let err = ResolveError::unresolved_reference(&LogicalName::new("Missing"));
        assert_eq!(
            err.to_string(),
            "unresolved reference: Ref 'Missing' has no local value"
        );
        assert_eq!(err.logical_name().map(LogicalName::as_str), Some("Missing"));
    }

    #[test]
    fn test_attribute_error_names_attribute() {
        let attr = SmolStr::new("Arn");
        let err = ResolveError::unresolved_attribute(&LogicalName::new("Uploads"), Some(&attr));
        assert_eq!(
            err.to_string(),
            "unresolved attribute: Fn::GetAtt 'Uploads.Arn' has no local value"
        );

        let err = ResolveError::unresolved_attribute(&LogicalName::new("Uploads"), None);
        assert!(err.to_string().contains("'Uploads.*'"));
    }

    #[test]
    fn test_unknown_function_has_no_logical_name() {
        let err = ResolveError::UnknownFunction("worker".into());
        assert!(err.logical_name().is_none());
        assert!(err.to_string().contains("worker"));
    }
}
