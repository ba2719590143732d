use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::models::*;

/// Process-wide, ordered collection of incidents.
///
/// Cloning yields another handle to the same records. Every operation holds the
/// single store lock for its whole read-modify-write, so concurrent appends
/// never share an id and readers never observe a half-applied mutation.
#[derive(Clone, Default)]
pub struct IncidentStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    incidents: Vec<Incident>,
    /// Last id handed out. Ids start at 1 and are never reused.
    last_id: u64,
}

/// Result of a status mutation on an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// The record after the mutation was applied.
    pub incident: Incident,
    pub previous: IncidentStatus,
}

impl StatusChange {
    /// Whether the mutation actually moved the record to a new status.
    pub fn changed(&self) -> bool {
        self.previous != self.incident.status
    }
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.inner.lock().expect("incident store lock poisoned")
    }

    /// Snapshot of all incidents in insertion order.
    pub fn list(&self) -> Vec<Incident> {
        self.state().incidents.clone()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Incident> {
        self.state().incidents.iter().find(|i| i.id == id).cloned()
    }

    /// Append a new `Open` incident, assigning the next id.
    pub fn append(&self, input: NewIncident) -> Incident {
        let mut state = self.state();
        state.last_id += 1;

        let incident = Incident {
            id: state.last_id,
            title: input.title,
            description: input.description,
            reporter: input.reporter,
            status: IncidentStatus::Open,
            created_at: Utc::now(),
            resolved_at: None,
        };
        state.incidents.push(incident.clone());
        incident
    }

    /// Move the identified incident to `status`.
    ///
    /// Returns `None` when no incident has that id; the store is untouched.
    /// Only `Open` → `Resolved` is applied (stamping `resolved_at`); any other
    /// request leaves the record as it was and reports `changed() == false`.
    pub fn mutate_status(&self, id: u64, status: IncidentStatus) -> Option<StatusChange> {
        let mut state = self.state();
        let incident = state.incidents.iter_mut().find(|i| i.id == id)?;

        let previous = incident.status;
        if previous.can_transition_to(status) {
            incident.status = status;
            if status == IncidentStatus::Resolved {
                incident.resolved_at = Some(Utc::now());
            }
        }

        Some(StatusChange {
            incident: incident.clone(),
            previous,
        })
    }

    pub fn len(&self) -> usize {
        self.state().incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
