//! Foundation types for the localrefs toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`LogicalName`] - Keys of parameters and resources in a template
//! - [`LocalEndpoint`] - Address constants of the local emulator
//!
//! This module has NO dependencies on other localrefs modules.

mod endpoint;
mod name;

pub use endpoint::LocalEndpoint;
pub use name::LogicalName;

// Re-export smol_str for convenience
pub use smol_str;
