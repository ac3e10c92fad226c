//! Incident repository for Witness.
//!
//! Owns the incident report collection. Unlike the recording repository
//! there is no change subscription: the history screens reload on focus, so
//! `load` is re-entrant. Creation validates input at the boundary; deleting
//! an incident never touches the recording collection.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{WitnessError, WitnessResult};
use crate::models::{generate_record_id, AudioAttachment, Incident};
use crate::store::KeyValueStore;
use crate::validation::validate_date;

/// Storage key holding the serialized incident collection
pub const INCIDENTS_KEY: &str = "incidents";

/// Input to the incident creation flow.
///
/// The optional attachment is folded into the new incident's audio fields
/// as-is; the referenced recording does not have to exist at save time.
#[derive(Debug, Clone, Default)]
pub struct IncidentDraft {
    pub officer_info: String,
    pub location: String,
    pub description: String,
    /// MM/DD/YYYY, validated
    pub date: String,
    /// hh:mm AM/PM display string from the time picker
    pub time: String,
    pub audio: Option<AudioAttachment>,
}

/// Partial update applied by the edit flow
#[derive(Debug, Clone, Default)]
pub struct IncidentUpdate {
    pub officer_info: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Repository owning the incident collection.
pub struct IncidentRepository<S> {
    store: Arc<S>,
    incidents: RwLock<Vec<Incident>>,
}

impl<S: KeyValueStore> IncidentRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            incidents: RwLock::new(Vec::new()),
        }
    }

    /// Load the collection from storage, rehydrating timestamps.
    ///
    /// Fails open to an empty collection on any storage or parse error.
    pub async fn load(&self) {
        let loaded = match self.store.get(INCIDENTS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Incident>>(&raw) {
                Ok(incidents) => incidents,
                Err(err) => {
                    warn!("Load incidents error: {}", err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Load incidents error: {}", err);
                Vec::new()
            }
        };

        let mut incidents = self.incidents.write().await;
        *incidents = loaded;
        debug!(count = incidents.len(), "loaded incidents");
    }

    /// Snapshot of the collection, most recent first
    pub async fn list(&self) -> Vec<Incident> {
        self.incidents.read().await.clone()
    }

    /// Look up a single incident by ID
    pub async fn get(&self, id: &str) -> Option<Incident> {
        self.incidents
            .read()
            .await
            .iter()
            .find(|inc| inc.id == id)
            .cloned()
    }

    /// Validate a draft, unshift the new incident, persist, and return it.
    ///
    /// At least one of officer info, location, or description must be
    /// non-empty, and the date must pass full validation.
    pub async fn create(&self, draft: IncidentDraft) -> WitnessResult<Incident> {
        if draft.officer_info.trim().is_empty()
            && draft.location.trim().is_empty()
            && draft.description.trim().is_empty()
        {
            return Err(WitnessError::validation(
                "incident",
                "Please fill in at least one field.",
            ));
        }
        validate_date(&draft.date)?;

        let incident = Incident {
            id: generate_record_id(),
            officer_info: draft.officer_info,
            location: draft.location,
            description: draft.description,
            audio_id: draft.audio.as_ref().map(|a| a.id.clone()),
            audio_uri: draft.audio.as_ref().map(|a| a.uri.clone()),
            audio_file_name: draft.audio.as_ref().map(|a| a.file_name.clone()),
            date: draft.date,
            time: draft.time,
            created_at: Utc::now(),
            edited_at: None,
        };

        let mut incidents = self.incidents.write().await;
        incidents.insert(0, incident.clone());
        self.persist(&incidents).await?;
        Ok(incident)
    }

    /// Merge an update into the matching incident, touch `edited_at`,
    /// persist, and return the updated entity.
    pub async fn update(&self, id: &str, update: IncidentUpdate) -> WitnessResult<Incident> {
        if let Some(date) = &update.date {
            validate_date(date)?;
        }

        let mut incidents = self.incidents.write().await;
        let incident = incidents
            .iter_mut()
            .find(|inc| inc.id == id)
            .ok_or_else(|| WitnessError::NotFound(format!("incident {}", id)))?;

        if let Some(officer_info) = update.officer_info {
            incident.officer_info = officer_info;
        }
        if let Some(location) = update.location {
            incident.location = location;
        }
        if let Some(description) = update.description {
            incident.description = description;
        }
        if let Some(date) = update.date {
            incident.date = date;
        }
        if let Some(time) = update.time {
            incident.time = time;
        }
        incident.edited_at = Some(Utc::now());

        let updated = incident.clone();
        self.persist(&incidents).await?;
        Ok(updated)
    }

    /// Remove the incident with the given ID and persist.
    ///
    /// Never touches the recording collection.
    pub async fn delete(&self, id: &str) -> WitnessResult<()> {
        let mut incidents = self.incidents.write().await;
        incidents.retain(|inc| inc.id != id);
        self.persist(&incidents).await
    }

    /// Drop every incident in one persisted write
    pub async fn clear(&self) -> WitnessResult<()> {
        let mut incidents = self.incidents.write().await;
        incidents.clear();
        self.persist(&incidents).await
    }

    async fn persist(&self, incidents: &[Incident]) -> WitnessResult<()> {
        let json = serde_json::to_string(incidents)?;
        self.store.set(INCIDENTS_KEY, &json).await.map_err(|err| {
            tracing::error!("Save incidents error: {}", err);
            err
        })
    }
}
