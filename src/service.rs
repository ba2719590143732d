//! Incident operations: query, submission and admin resolution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{Authorizer, CallerContext, RoleAuthorizer};
use crate::error::IncidentError;
use crate::models::*;
use crate::notify::{NoopNotifier, StaleNotifier, INCIDENT_LIST_VIEW};
use crate::store::IncidentStore;

/// How a resolve request for an unknown id is answered.
///
/// - `Lenient`: succeed without touching the store
/// - `Strict`: fail with [`IncidentError::NotFound`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePolicy {
    #[default]
    Lenient,
    Strict,
}

impl ResolvePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct IncidentService {
    store: IncidentStore,
    authorizer: Arc<dyn Authorizer>,
    notifier: Arc<dyn StaleNotifier>,
    policy: ResolvePolicy,
}

impl IncidentService {
    pub fn new(
        store: IncidentStore,
        authorizer: Arc<dyn Authorizer>,
        notifier: Arc<dyn StaleNotifier>,
    ) -> Self {
        Self {
            store,
            authorizer,
            notifier,
            policy: ResolvePolicy::default(),
        }
    }

    /// Service over a fresh store with role-based authorization and no
    /// presentation layer attached.
    pub fn in_memory() -> Self {
        Self::new(
            IncidentStore::new(),
            Arc::new(RoleAuthorizer),
            Arc::new(NoopNotifier),
        )
    }

    pub fn with_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &IncidentStore {
        &self.store
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    /// All incidents in submission order. Open to every caller.
    pub fn get_incidents(&self) -> Vec<Incident> {
        self.store.list()
    }

    /// Validate form input and record a new `Open` incident.
    ///
    /// Any caller may submit. On a validation failure the store is unchanged.
    pub fn submit_incident(&self, fields: &FormFields) -> Result<Incident, IncidentError> {
        let input = NewIncident::from_form(fields).inspect_err(|e| {
            tracing::warn!("Rejected incident submission: {}", e);
        })?;

        let incident = self.store.append(input);
        tracing::info!("Incident {} submitted: {}", incident.id, incident.title);

        self.notifier.invalidate(INCIDENT_LIST_VIEW);
        Ok(incident)
    }

    /// Mark an incident resolved. Admin only.
    ///
    /// Resolving an already-resolved incident succeeds without change. An
    /// unknown id is answered according to the configured [`ResolvePolicy`].
    /// Every successful call invalidates the incident list view, whether or
    /// not a record changed; denied and failed calls do not.
    pub fn resolve_incident(&self, caller: &CallerContext, id: u64) -> Result<(), IncidentError> {
        if !self.authorizer.is_authorized_admin(caller) {
            tracing::warn!(
                "Denied resolve of incident {} for {} caller",
                id,
                caller.role.as_str()
            );
            return Err(IncidentError::Unauthorized);
        }

        match self.store.mutate_status(id, IncidentStatus::Resolved) {
            Some(change) if change.changed() => tracing::info!("Incident {} resolved", id),
            Some(_) => tracing::debug!("Incident {} already resolved", id),
            None => match self.policy {
                ResolvePolicy::Lenient => {
                    tracing::debug!("Resolve of unknown incident {} ignored", id)
                }
                ResolvePolicy::Strict => return Err(IncidentError::NotFound(id)),
            },
        }

        self.notifier.invalidate(INCIDENT_LIST_VIEW);
        Ok(())
    }
}
