//! Property-to-XAML generation engine
//!
//! Given a [`Profile`](xamlgen_core::Profile) and a
//! [`SemanticModel`](xamlgen_core::SemanticModel), the [`Generator`] turns a
//! property, a whole type or a selection of properties into XAML:
//!
//! 1. [`members`] resolves the exposed properties of a type (own, then inherited)
//! 2. [`classifier`] decides whether each is a primitive, collection, enum,
//!    dynamic or user type
//! 3. [`matcher`] picks the first applicable mapping from the profile
//! 4. [`placeholders`] substitutes the template with state from a
//!    per-call [`GenerationContext`]
//! 5. [`assembler`] joins fragments, applies the class grouping and
//!    re-indents via [`formatting`]

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod assembler;
pub mod classifier;
pub mod context;
pub mod formatting;
pub mod matcher;
pub mod members;
pub mod naming;
pub mod options;
pub mod placeholders;

pub use assembler::{selection_name, Generator, NO_PROPERTIES_COMMENT};
pub use classifier::{ClassifiedMember, SubProperties, TypeCategory, TypeClassifier};
pub use context::GenerationContext;
pub use formatting::format_xaml;
pub use matcher::MappingMatcher;
pub use members::{MemberResolver, ResolvedMember};
pub use options::GenerationOptions;
