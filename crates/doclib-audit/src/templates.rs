//! Template audit: template-based catalog records against the files in the
//! template directory.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use doclib_core::Catalog;
use doclib_store::list_templates;
use tracing::info;

use crate::{AuditError, rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStatus {
    Found,
    Missing,
}

impl TemplateStatus {
    pub fn marker(self) -> &'static str {
        match self {
            TemplateStatus::Found => "OK",
            TemplateStatus::Missing => "MISSING",
        }
    }
}

/// Status of one template-based record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCheck {
    pub id: String,
    pub template: String,
    pub status: TemplateStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTemplate {
    pub id: String,
    pub title: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAuditReport {
    pub existing: BTreeSet<String>,
    /// One entry per template-based record, in catalog order.
    pub checks: Vec<TemplateCheck>,
    pub missing: Vec<MissingTemplate>,
}

impl TemplateAuditReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// The text report printed by `doclib audit-templates`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TemplateAuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} existing template files:", self.existing.len())?;
        for file in &self.existing {
            writeln!(f, "  OK: {file}")?;
        }
        writeln!(f, "\n{}\n", rule())?;

        writeln!(f, "Found {} template-based documents:", self.checks.len())?;
        for check in &self.checks {
            writeln!(
                f,
                "  {}: {} -> {}",
                check.status.marker(),
                check.id,
                check.template
            )?;
        }
        writeln!(f, "\n{}\n", rule())?;

        writeln!(f, "MISSING TEMPLATE FILES:")?;
        if self.missing.is_empty() {
            writeln!(f, "  OK: All required template files exist")?;
        }
        for m in &self.missing {
            writeln!(f, "  MISSING: {} ({}) -> {}", m.id, m.title, m.template)?;
        }

        writeln!(f, "\nSUMMARY:")?;
        writeln!(f, "  Template-based documents: {}", self.checks.len())?;
        writeln!(f, "  Missing templates: {}", self.missing.len())?;
        writeln!(f, "  Existing templates: {}", self.existing.len())
    }
}

/// Check every template-based record against the `existing` file names.
pub fn audit_templates(catalog: &Catalog, existing: BTreeSet<String>) -> TemplateAuditReport {
    let mut checks = Vec::new();
    let mut missing = Vec::new();

    for doc in catalog.template_based() {
        let Some(template) = doc.required_template() else {
            continue;
        };
        let status = if existing.contains(template) {
            TemplateStatus::Found
        } else {
            missing.push(MissingTemplate {
                id: doc.id.clone(),
                title: doc.title.clone(),
                template: template.to_string(),
            });
            TemplateStatus::Missing
        };
        checks.push(TemplateCheck {
            id: doc.id.clone(),
            template: template.to_string(),
            status,
        });
    }

    TemplateAuditReport {
        existing,
        checks,
        missing,
    }
}

/// Load the catalog and list the template directory, then audit.
///
/// An absent template directory is not an error; every template-based record
/// is then reported missing.
pub fn run_template_audit(
    metadata_path: &Path,
    template_dir: &Path,
    extension: &str,
) -> Result<TemplateAuditReport, AuditError> {
    let catalog = Catalog::load(metadata_path)?;
    let existing = list_templates(template_dir, extension)?;
    let report = audit_templates(&catalog, existing);
    info!(
        template_based = report.checks.len(),
        missing = report.missing.len(),
        "template audit complete"
    );
    Ok(report)
}
