//! Type audit: declared `type=` references in the catalog markup against the
//! ids in the metadata catalog.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use doclib_core::{Catalog, CatalogError, extract_type_tokens};
use tracing::info;

use crate::{AuditError, rule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAuditReport {
    /// Every `type=` occurrence in the markup, duplicates included.
    pub index_occurrences: usize,
    pub index_types: BTreeSet<String>,
    /// All metadata ids, sorted, duplicates included.
    pub metadata_listing: Vec<String>,
    pub metadata_ids: BTreeSet<String>,
    pub missing_from_metadata: BTreeSet<String>,
    pub missing_from_index: BTreeSet<String>,
}

impl TypeAuditReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_from_metadata.is_empty() && self.missing_from_index.is_empty()
    }

    /// The text report printed by `doclib audit-types`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeAuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} document types in index:", self.index_occurrences)?;
        for t in &self.index_types {
            writeln!(f, "  - {t}")?;
        }
        writeln!(f, "\n{}\n", rule())?;

        writeln!(
            f,
            "Found {} document types in metadata:",
            self.metadata_listing.len()
        )?;
        for id in &self.metadata_listing {
            writeln!(f, "  - {id}")?;
        }
        writeln!(f, "\n{}\n", rule())?;

        writeln!(f, "DOCUMENTS IN INDEX BUT MISSING FROM METADATA:")?;
        if self.missing_from_metadata.is_empty() {
            writeln!(f, "  OK: All index documents have metadata entries")?;
        }
        for t in &self.missing_from_metadata {
            writeln!(f, "  MISSING: {t}")?;
        }

        writeln!(f, "\nDOCUMENTS IN METADATA BUT MISSING FROM INDEX:")?;
        if self.missing_from_index.is_empty() {
            writeln!(f, "  OK: All metadata documents are in index")?;
        }
        for id in &self.missing_from_index {
            writeln!(f, "  EXTRA: {id}")?;
        }

        writeln!(f, "\nSUMMARY:")?;
        writeln!(f, "  Total in index: {}", self.index_types.len())?;
        writeln!(f, "  Total in metadata: {}", self.metadata_ids.len())?;
        writeln!(
            f,
            "  Missing from metadata: {}",
            self.missing_from_metadata.len()
        )?;
        writeln!(f, "  Missing from index: {}", self.missing_from_index.len())
    }
}

/// Compare the markup's declared types with the catalog ids.
pub fn audit_types(markup: &str, catalog: &Catalog) -> TypeAuditReport {
    let tokens = extract_type_tokens(markup);
    let index_occurrences = tokens.len();
    let index_types: BTreeSet<String> = tokens.into_iter().collect();

    let mut metadata_listing: Vec<String> =
        catalog.documents().iter().map(|d| d.id.clone()).collect();
    metadata_listing.sort();
    let metadata_ids = catalog.ids();

    let missing_from_metadata = index_types.difference(&metadata_ids).cloned().collect();
    let missing_from_index = metadata_ids.difference(&index_types).cloned().collect();

    TypeAuditReport {
        index_occurrences,
        index_types,
        metadata_listing,
        metadata_ids,
        missing_from_metadata,
        missing_from_index,
    }
}

/// Load both inputs from disk and audit them. Either file missing or the
/// catalog failing to parse aborts the audit.
pub fn run_type_audit(
    markup_path: &Path,
    metadata_path: &Path,
) -> Result<TypeAuditReport, AuditError> {
    let markup = std::fs::read_to_string(markup_path).map_err(|source| CatalogError::Read {
        path: markup_path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::load(metadata_path)?;
    let report = audit_types(&markup, &catalog);
    info!(
        missing_from_metadata = report.missing_from_metadata.len(),
        missing_from_index = report.missing_from_index.len(),
        "type audit complete"
    );
    Ok(report)
}
