use thiserror::Error;

/// Failures surfaced by incident operations.
///
/// All variants are terminal for the single operation that raised them and
/// guarantee that the store was left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IncidentError {
    #[error("Validation failed: field '{field}' is required")]
    Validation { field: &'static str },

    #[error("Unauthorized: only admins can resolve incidents")]
    Unauthorized,

    #[error("Incident not found: {0}")]
    NotFound(u64),
}
