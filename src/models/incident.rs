use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IncidentError;

/// Raw submission input: field name to string value, as posted by a caller.
pub type FormFields = HashMap<String, String>;

/// A reported issue.
///
/// `id` is assigned by the store at creation and is unique for the lifetime of
/// the process. Descriptive fields are fixed after creation; only `status`
/// (and the `resolved_at` stamp that accompanies it) ever changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    /// Who reported the incident, as given on the form.
    pub reporter: Option<String>,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
    /// Set on the first transition to `Resolved`.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Incident {
    pub fn is_resolved(&self) -> bool {
        self.status == IncidentStatus::Resolved
    }
}

/// The lifecycle status of an incident.
///
/// - `Open`: Reported, awaiting action
/// - `Resolved`: Closed out by an admin
///
/// The only defined transition is `Open` → `Resolved`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
        }
    }

    /// Whether a record in this status may move to `next`.
    pub fn can_transition_to(&self, next: IncidentStatus) -> bool {
        matches!((self, next), (Self::Open, Self::Resolved))
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// Validated input for creating an incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIncident {
    pub title: String,
    pub description: Option<String>,
    pub reporter: Option<String>,
}

impl NewIncident {
    /// Extract submission fields from form input.
    ///
    /// `title` is required and must not be blank. Optional fields are trimmed
    /// and dropped when empty. Unknown fields are ignored.
    pub fn from_form(fields: &FormFields) -> Result<Self, IncidentError> {
        let title =
            non_blank(fields, "title").ok_or(IncidentError::Validation { field: "title" })?;

        Ok(Self {
            title,
            description: non_blank(fields, "description"),
            reporter: non_blank(fields, "reporter"),
        })
    }
}

fn non_blank(fields: &FormFields, name: &str) -> Option<String> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
