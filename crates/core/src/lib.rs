//! Core types and traits for the xamlgen generation engine
//!
//! This crate provides the foundational abstractions shared by the
//! generator, the language front doors and the CLI host:
//!
//! - **Configuration**: settings, profiles and mapping rules
//! - **Symbols**: declared types and properties plus the semantic model trait
//! - **Types**: language-agnostic parsing and matching of type references
//! - **Placeholders**: the template token vocabulary
//! - **Output**: the result type handed back to the host
//! - **Error handling**: unified error types

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod output;
pub mod placeholder;
pub mod symbols;
pub mod types;

// Re-export main types for convenience
pub use config::{FormattingConfig, GenerationConfig, Mapping, Profile, Settings};
pub use error::{Error, Result, ResultExt};
pub use output::{AnalyzerOutput, OutputType};
pub use placeholder::Placeholder;
pub use symbols::{
    Accessibility, LayeredModel, PropertySymbol, SemanticModel, SymbolOrigin, TypeIndex,
    TypeKind, TypeSymbol,
};
pub use types::TypeRef;

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Mapping, Profile, Settings};
    pub use crate::error::{Result, ResultExt};
    pub use crate::output::{AnalyzerOutput, OutputType};
    pub use crate::symbols::{PropertySymbol, SemanticModel, TypeSymbol};
}
