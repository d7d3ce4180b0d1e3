//! Reference resolution.
//!
//! [`ResolvedIndex::build`] turns a resource graph into a name → value
//! table. [`Substituter`] rewrites reference expressions found in the
//! service configuration against that table. [`check_service`] reports
//! every failure up front without touching anything.

mod diagnostics;
mod error;
mod expr;
mod index;
mod walker;

pub use diagnostics::{
    Diagnostic, DiagnosticCollector, ReferenceChecker, Severity, check_service, codes,
    index_warnings,
};
pub use error::{LoadError, ResolveError};
pub use expr::{GET_ATT_KEY, REF_KEY, RefExpr};
pub use index::{ARN_ATTRIBUTE, AttributeValue, EntrySource, IndexEntry, ResolvedIndex};
pub use walker::Substituter;
