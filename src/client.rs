//! High-level client for Witness.
//!
//! `WitnessClient` is the narrow interface the app screens call into. It
//! owns both repositories, the asset store and the audio session, and hosts
//! the orchestration the repositories deliberately leave to their caller:
//! every recording delete path funnels through the same cross-reference
//! scan, interrupts a session holding the target first, and only removes
//! the on-disk asset when no incident still references the recording.
//!
//! The reference check and the subsequent writes are separate store calls
//! and are not atomic as a pair; for this single-user, on-device data set
//! that is an accepted simplification.

use std::sync::Arc;

use tracing::{info, warn};

use crate::assets::AssetStore;
use crate::audio::{AudioEngine, AudioSession};
use crate::config::Config;
use crate::crossref::{is_recording_referenced, recording_lookup, resolve_audio_display_name};
use crate::error::{WitnessError, WitnessResult};
use crate::export::IncidentExport;
use crate::incidents::{IncidentDraft, IncidentRepository, IncidentUpdate};
use crate::models::{AudioAttachment, Incident, Recording};
use crate::recordings::{RecordingRepository, RecordingUpdate};
use crate::store::{FileStore, KeyValueStore};

/// Outcome of a checked single-recording delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// True when a referencing incident caused the asset to be kept on disk
    pub asset_preserved: bool,
}

/// Outcome of a multi-select delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    /// Entries removed from the collection
    pub removed: usize,
    /// Assets deleted from disk
    pub assets_removed: usize,
    /// Assets kept because an incident still references them
    pub assets_preserved: usize,
}

/// The record-management core behind the app screens.
pub struct WitnessClient<S, A, E> {
    store: Arc<S>,
    recordings: RecordingRepository<S>,
    incidents: IncidentRepository<S>,
    assets: A,
    session: AudioSession<E>,
}

impl<E: AudioEngine> WitnessClient<FileStore, crate::assets::FsAssetStore, E> {
    /// Build a client over the on-device file layout described by `config`
    pub fn with_config(config: &Config, engine: E) -> Self {
        let store = Arc::new(FileStore::new(config.records_directory()));
        Self::new(store, crate::assets::FsAssetStore::new(), engine)
    }
}

impl<S, A, E> WitnessClient<S, A, E>
where
    S: KeyValueStore,
    A: AssetStore,
    E: AudioEngine,
{
    pub fn new(store: Arc<S>, assets: A, engine: E) -> Self {
        Self {
            recordings: RecordingRepository::new(store.clone()),
            incidents: IncidentRepository::new(store.clone()),
            store,
            assets,
            session: AudioSession::new(engine),
        }
    }

    /// Load both collections from storage. Safe to call again on focus.
    pub async fn load(&self) {
        self.recordings.load().await;
        self.incidents.load().await;
    }

    pub fn recordings(&self) -> &RecordingRepository<S> {
        &self.recordings
    }

    pub fn incidents(&self) -> &IncidentRepository<S> {
        &self.incidents
    }

    pub fn session(&self) -> &AudioSession<E> {
        &self.session
    }

    // ---- recorder screen ----

    /// Start a capture session
    pub async fn start_recording(&self) -> WitnessResult<()> {
        self.session.start_recording().await
    }

    /// Stop the capture session and add the finalized recording to the
    /// head of the collection.
    pub async fn stop_recording(&self) -> WitnessResult<Recording> {
        let recording = self.session.stop_recording().await?;
        self.recordings.add(recording.clone()).await?;
        info!(id = %recording.id, duration = recording.duration, "recording saved");
        Ok(recording)
    }

    /// Play a recording, checking the asset is still on disk first
    pub async fn play_recording(&self, id: &str) -> WitnessResult<()> {
        let recording = self
            .recordings
            .get(id)
            .await
            .ok_or_else(|| WitnessError::NotFound(format!("recording {}", id)))?;

        if !self.assets.exists(&recording.uri).await? {
            return Err(WitnessError::AssetMissing(recording.uri));
        }

        self.session.play(id, &recording.uri).await
    }

    /// Stop playback, discarding the position
    pub async fn pause_playback(&self) -> WitnessResult<()> {
        self.session.pause_playback().await
    }

    /// Apply a user-supplied label to a recording
    pub async fn rename_recording(&self, id: &str, name: &str) -> WitnessResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(WitnessError::validation(
                "name",
                "Please enter a name for the recording.",
            ));
        }
        self.recordings
            .update(
                id,
                RecordingUpdate {
                    custom_name: Some(trimmed.to_string()),
                },
            )
            .await
    }

    /// Attachment payload for starting an incident log from a recording
    pub async fn attachment_for(&self, id: &str) -> WitnessResult<AudioAttachment> {
        let recording = self
            .recordings
            .get(id)
            .await
            .ok_or_else(|| WitnessError::NotFound(format!("recording {}", id)))?;
        Ok(AudioAttachment::from_recording(&recording))
    }

    /// Check whether any incident references the recording; the screens
    /// use this to warn before a delete that the asset will be kept.
    pub async fn recording_in_use(&self, id: &str) -> bool {
        is_recording_referenced(id, &self.incidents.list().await)
    }

    /// Delete one recording.
    ///
    /// Interrupts a session holding it, removes the collection entry, and
    /// removes the on-disk asset unless a referencing incident preserves it.
    pub async fn delete_recording(&self, id: &str) -> WitnessResult<DeleteOutcome> {
        let recording = self
            .recordings
            .get(id)
            .await
            .ok_or_else(|| WitnessError::NotFound(format!("recording {}", id)))?;

        self.session.interrupt_for(id).await?;

        let referenced = is_recording_referenced(id, &self.incidents.list().await);
        self.recordings.delete(id).await?;

        if referenced {
            info!(id, "recording deleted; asset kept for referencing incident");
        } else {
            self.assets.remove(&recording.uri).await?;
        }

        Ok(DeleteOutcome {
            asset_preserved: referenced,
        })
    }

    /// Delete a selection of recordings in one persisted write.
    ///
    /// Asset cleanup runs per recording after the collection write; a
    /// failed asset removal is logged and does not abort the rest.
    pub async fn delete_recordings(&self, ids: &[String]) -> WitnessResult<BulkDeleteOutcome> {
        for id in ids {
            self.session.interrupt_for(id).await?;
        }

        let current = self.recordings.list().await;
        let (removed, kept): (Vec<Recording>, Vec<Recording>) = current
            .into_iter()
            .partition(|rec| ids.contains(&rec.id));

        if removed.is_empty() {
            return Ok(BulkDeleteOutcome::default());
        }

        self.recordings.set_all(kept).await?;

        let incidents = self.incidents.list().await;
        let mut outcome = BulkDeleteOutcome {
            removed: removed.len(),
            ..Default::default()
        };
        for recording in &removed {
            if is_recording_referenced(&recording.id, &incidents) {
                outcome.assets_preserved += 1;
            } else if let Err(err) = self.assets.remove(&recording.uri).await {
                warn!(id = %recording.id, "asset cleanup failed: {}", err);
            } else {
                outcome.assets_removed += 1;
            }
        }

        Ok(outcome)
    }

    /// Settings: delete every recording, honoring references per entry
    pub async fn clear_all_recordings(&self) -> WitnessResult<BulkDeleteOutcome> {
        let ids: Vec<String> = self
            .recordings
            .list()
            .await
            .into_iter()
            .map(|rec| rec.id)
            .collect();
        self.delete_recordings(&ids).await
    }

    // ---- incident screens ----

    /// Validate and save a new incident report
    pub async fn log_incident(&self, draft: IncidentDraft) -> WitnessResult<Incident> {
        self.incidents.create(draft).await
    }

    /// Apply an edit to an existing incident
    pub async fn edit_incident(&self, id: &str, update: IncidentUpdate) -> WitnessResult<Incident> {
        self.incidents.update(id, update).await
    }

    /// Delete an incident. Stops its audio if currently playing; never
    /// touches the recording collection.
    pub async fn delete_incident(&self, id: &str) -> WitnessResult<()> {
        if let Some(incident) = self.incidents.get(id).await {
            if incident.has_audio() {
                self.session
                    .interrupt_for(&incident_session_key(&incident))
                    .await?;
            }
        }
        self.incidents.delete(id).await
    }

    /// Play the audio attached to an incident.
    ///
    /// Works from the denormalized URI, so it keeps working after the
    /// referenced recording entry was deleted via the in-use path.
    pub async fn play_incident_audio(&self, id: &str) -> WitnessResult<()> {
        let incident = self
            .incidents
            .get(id)
            .await
            .ok_or_else(|| WitnessError::NotFound(format!("incident {}", id)))?;
        let uri = incident
            .audio_uri
            .clone()
            .ok_or_else(|| WitnessError::NotFound(format!("no audio on incident {}", id)))?;

        if !self.assets.exists(&uri).await? {
            return Err(WitnessError::AssetMissing(uri));
        }

        self.session
            .play(&incident_session_key(&incident), &uri)
            .await
    }

    /// Display label for an incident's attached audio (`None` when the
    /// incident has no audio).
    pub async fn incident_audio_label(&self, id: &str) -> WitnessResult<Option<String>> {
        let incident = self
            .incidents
            .get(id)
            .await
            .ok_or_else(|| WitnessError::NotFound(format!("incident {}", id)))?;
        let recordings = self.recordings.list().await;
        Ok(resolve_audio_display_name(
            &incident,
            &recording_lookup(&recordings),
        ))
    }

    /// Whether the audio attached to an incident is still present on disk.
    ///
    /// The detail screen uses this to decide whether to offer playback.
    pub async fn incident_audio_available(&self, id: &str) -> WitnessResult<bool> {
        let incident = self
            .incidents
            .get(id)
            .await
            .ok_or_else(|| WitnessError::NotFound(format!("incident {}", id)))?;
        match incident.audio_uri {
            Some(uri) => self.assets.exists(&uri).await,
            None => Ok(false),
        }
    }

    /// Flat record for the external PDF/share pipeline
    pub async fn export_incident(&self, id: &str) -> WitnessResult<IncidentExport> {
        let incident = self
            .incidents
            .get(id)
            .await
            .ok_or_else(|| WitnessError::NotFound(format!("incident {}", id)))?;
        let recordings = self.recordings.list().await;
        Ok(IncidentExport::new(
            &incident,
            &recording_lookup(&recordings),
        ))
    }

    // ---- settings ----

    /// Settings: delete every incident
    pub async fn clear_all_incidents(&self) -> WitnessResult<()> {
        self.incidents.clear().await
    }

    /// Settings: wipe every stored collection.
    ///
    /// Audio assets under the audio directory are not swept; like the
    /// shipped app, orphaned files are left for the platform's storage
    /// management.
    pub async fn clear_all_data(&self) -> WitnessResult<()> {
        self.session.pause_playback().await?;
        self.store.clear().await?;
        self.load().await;
        Ok(())
    }
}

/// Session key used when an incident's audio plays: the referenced
/// recording when known, else the incident itself (legacy records carry a
/// URI without an ID).
fn incident_session_key(incident: &Incident) -> String {
    incident
        .audio_id
        .clone()
        .unwrap_or_else(|| incident.id.clone())
}
