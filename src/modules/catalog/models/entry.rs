use serde::{Deserialize, Serialize};

use crate::core::{AppError, RecordState, Result};

/// The three flat look-up catalogs. Payment plans carry an extra column
/// and have their own model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    DocumentType,
    ServiceItem,
    PaymentMethod,
}

impl CatalogKind {
    /// Backing table; fixed set, never interpolated from user input
    pub fn table(&self) -> &'static str {
        match self {
            CatalogKind::DocumentType => "document_types",
            CatalogKind::ServiceItem => "service_items",
            CatalogKind::PaymentMethod => "payment_methods",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::DocumentType => "Document type",
            CatalogKind::ServiceItem => "Service",
            CatalogKind::PaymentMethod => "Payment method",
        }
    }
}

/// A row of one of the flat catalogs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub description: String,
    pub state: RecordState,
}

/// Validate a catalog description coming from a form
pub fn validate_description(description: &str) -> Result<()> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Description cannot be empty"));
    }
    if trimmed.len() > 200 {
        return Err(AppError::validation(
            "Description cannot exceed 200 characters",
        ));
    }
    Ok(())
}
