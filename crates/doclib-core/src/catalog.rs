//! Metadata catalog: the JSON record set describing every known document type.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::CatalogError;

/// One document type as described by the metadata catalog.
///
/// Unknown fields in the source JSON are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    pub id: String,
    pub title: String,
    /// Template filename, e.g. `proof-of-loss.txt`.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub template_based: Option<bool>,
}

impl DocumentType {
    /// The template filename, if this record is generated from a template.
    ///
    /// Requires both `templateBased: true` and a `template` entry.
    pub fn required_template(&self) -> Option<&str> {
        match (self.template_based, self.template.as_deref()) {
            (Some(true), Some(file)) => Some(file),
            _ => None,
        }
    }
}

/// The full metadata catalog, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    documents: Vec<DocumentType>,
}

impl Catalog {
    pub fn new(documents: Vec<DocumentType>) -> Self {
        Self { documents }
    }

    /// Load a catalog from a JSON array on disk.
    ///
    /// A missing file or malformed JSON is an error; there is no partial load.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let documents: Vec<DocumentType> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::new(documents);
        info!(path = %path.display(), count = catalog.len(), "loaded metadata catalog");
        if catalog.is_empty() {
            warn!(path = %path.display(), "metadata catalog has no records");
        }
        for id in catalog.duplicate_ids() {
            warn!(%id, "duplicate document id in metadata catalog");
        }
        Ok(catalog)
    }

    pub fn documents(&self) -> &[DocumentType] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Distinct document ids. Duplicates collapse.
    pub fn ids(&self) -> BTreeSet<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    /// Records that require a template file, in catalog order.
    pub fn template_based(&self) -> impl Iterator<Item = &DocumentType> {
        self.documents
            .iter()
            .filter(|d| d.required_template().is_some())
    }

    /// Ids that appear more than once, sorted.
    pub fn duplicate_ids(&self) -> BTreeSet<String> {
        let mut seen = HashSet::new();
        self.documents
            .iter()
            .filter(|d| !seen.insert(d.id.as_str()))
            .map(|d| d.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn parse(json: &str) -> Catalog {
        Catalog::new(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn camel_case_fields() {
        let catalog = parse(
            r#"[{"id":"poa","title":"Proof of Authority","templateBased":true,"template":"poa.txt"}]"#,
        );
        let doc = &catalog.documents()[0];
        assert_eq!(doc.id, "poa");
        assert_eq!(doc.template_based, Some(true));
        assert_eq!(doc.required_template(), Some("poa.txt"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let catalog = parse(r#"[{"id":"aob","title":"Assignment of Benefits","category":"x"}]"#);
        let doc = &catalog.documents()[0];
        assert!(doc.template.is_none());
        assert!(doc.template_based.is_none());
        assert!(doc.required_template().is_none());
    }

    #[test]
    fn template_without_flag_is_not_template_based() {
        let catalog = parse(
            r#"[
                {"id":"a","title":"A","template":"a.txt"},
                {"id":"b","title":"B","templateBased":false,"template":"b.txt"},
                {"id":"c","title":"C","templateBased":true},
                {"id":"d","title":"D","templateBased":true,"template":"d.txt"}
            ]"#,
        );
        let ids: Vec<&str> = catalog.template_based().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d"]);
    }

    #[test]
    fn duplicate_ids_collapse_and_are_reported() {
        let catalog = parse(
            r#"[
                {"id":"poa","title":"One"},
                {"id":"aob","title":"Two"},
                {"id":"poa","title":"Three"}
            ]"#,
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.ids().len(), 2);
        assert_eq!(
            catalog.duplicate_ids().into_iter().collect::<Vec<_>>(),
            vec!["poa".to_string()]
        );
    }

    #[test]
    fn load_missing_file_errors() {
        let result = Catalog::load(Path::new("/nonexistent/document-metadata.json"));
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }

    #[test]
    fn load_malformed_json_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("document-metadata.json");
        std::fs::write(&path, r#"{"id": "not-an-array"}"#).unwrap();
        let result = Catalog::load(&path);
        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn load_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("document-metadata.json");
        std::fs::write(&path, r#"[{"id":"poa","title":"Proof of Authority"}]"#).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.ids().contains("poa"));
    }

    #[test]
    fn empty_array_loads_as_empty_catalog() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("document-metadata.json");
        std::fs::write(&path, "[]").unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.ids().is_empty());
    }
}
