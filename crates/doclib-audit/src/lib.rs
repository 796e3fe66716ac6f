//! Consistency audits: catalog markup vs. metadata, metadata vs. template files.

mod error;
pub mod templates;
pub mod types;

pub use error::AuditError;
pub use templates::{
    MissingTemplate, TemplateAuditReport, TemplateStatus, audit_templates, run_template_audit,
};
pub use types::{TypeAuditReport, audit_types, run_type_audit};

const RULE_WIDTH: usize = 50;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}
