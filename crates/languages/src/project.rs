//! Project-wide semantic model
//!
//! Collects the declared types of every document in a project, plus types
//! described by metadata for referenced assemblies, so that base types and
//! property types declared elsewhere can be resolved.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};
use xamlgen_core::error::{Error, Result};
use xamlgen_core::symbols::{SemanticModel, SymbolOrigin, TypeIndex, TypeSymbol};
use xamlgen_core::types::TypeRef;

use crate::analyzer::SourceDocument;

/// Types exported by a referenced assembly
#[derive(Debug, Deserialize)]
struct AssemblyMetadata {
    assembly: String,
    #[serde(default)]
    types: Vec<TypeSymbol>,
}

/// Semantic model over source documents and assembly metadata
#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    index: TypeIndex,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every type declared in `document`; returns how many were added
    pub fn add_document(&mut self, document: &SourceDocument) -> Result<usize> {
        let outline = document.outline()?;
        let count = outline.types.len();
        self.add_types(outline.types.into_iter().map(|declared| declared.symbol));
        debug!(language = %document.language(), count, "Added document types");
        Ok(count)
    }

    pub fn add_types(&mut self, types: impl IntoIterator<Item = TypeSymbol>) {
        for ty in types {
            self.index.insert(ty);
        }
    }

    /// Add types from a JSON metadata description of an assembly
    ///
    /// The document is an object with an `assembly` name and a `types` array
    /// of type symbols. Every type is marked as coming from that assembly.
    pub fn add_metadata_json(&mut self, content: &str) -> Result<usize> {
        let metadata: AssemblyMetadata = serde_json::from_str(content)
            .map_err(|e| Error::parse("assembly metadata", e.to_string()))?;

        let count = metadata.types.len();
        let assembly = metadata.assembly;
        self.add_types(metadata.types.into_iter().map(|ty| {
            ty.with_origin(SymbolOrigin::Metadata {
                assembly: assembly.clone(),
            })
        }));
        info!(assembly = %assembly, count, "Loaded assembly metadata");
        Ok(count)
    }

    pub fn load_metadata_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::with_context(format!("reading {}", path.display()), e))?;
        self.add_metadata_json(&content).map_err(|e| match e {
            Error::Parse { message, .. } => Error::parse(path.display().to_string(), message),
            other => other,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeSymbol> {
        self.index.iter()
    }
}

impl SemanticModel for ProjectModel {
    fn resolve(&self, reference: &TypeRef, context: Option<&TypeSymbol>) -> Option<&TypeSymbol> {
        self.index.resolve(reference, context)
    }
}
