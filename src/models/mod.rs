//! Domain models for incident tracking.
//!
//! # Core Concepts
//!
//! - [`Incident`]: A reported issue. Created `Open` by a submission and moved to
//!   `Resolved` by an admin. Incidents are never deleted.
//! - [`NewIncident`]: The validated descriptive fields of a submission, built
//!   from untrusted [`FormFields`].

mod incident;

pub use incident::*;
