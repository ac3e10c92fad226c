//! Cross-reference rules between incidents and recordings.
//!
//! An incident's `audio_id` is a soft reference: the recording it points at
//! may be deleted later. This module centralizes the two rules every caller
//! must agree on: "is this recording still referenced" (consulted by all
//! recording delete paths) and "what audio label does this incident render"
//! (live name, else denormalized snapshot, else a deleted placeholder).

use std::collections::HashMap;

use crate::models::{Incident, Recording};

/// Label rendered when an incident's audio can no longer be resolved at all
pub const DELETED_AUDIO_PLACEHOLDER: &str = "Audio Recording (Deleted)";

/// Check whether any incident references the given recording
pub fn is_recording_referenced(recording_id: &str, incidents: &[Incident]) -> bool {
    incidents
        .iter()
        .any(|inc| inc.audio_id.as_deref() == Some(recording_id))
}

/// All incidents referencing the given recording
pub fn referencing_incidents<'a>(
    recording_id: &str,
    incidents: &'a [Incident],
) -> Vec<&'a Incident> {
    incidents
        .iter()
        .filter(|inc| inc.audio_id.as_deref() == Some(recording_id))
        .collect()
}

/// Build a snapshot lookup from a recording collection
pub fn recording_lookup(recordings: &[Recording]) -> HashMap<&str, &Recording> {
    recordings.iter().map(|rec| (rec.id.as_str(), rec)).collect()
}

/// Resolve the display label for an incident's attached audio.
///
/// Returns the live recording's display name when the reference still
/// resolves, else the incident's denormalized `audio_file_name`, else the
/// literal deleted placeholder. `None` only when the incident carries no
/// audio at all.
pub fn resolve_audio_display_name(
    incident: &Incident,
    recordings: &HashMap<&str, &Recording>,
) -> Option<String> {
    if !incident.has_audio() {
        return None;
    }

    if let Some(live) = incident
        .audio_id
        .as_deref()
        .and_then(|id| recordings.get(id))
    {
        return Some(live.display_name());
    }

    Some(
        incident
            .audio_file_name
            .clone()
            .unwrap_or_else(|| DELETED_AUDIO_PLACEHOLDER.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn recording(id: &str, custom_name: Option<&str>) -> Recording {
        Recording {
            id: id.to_string(),
            uri: format!("file://{}.m4a", id),
            duration: 30,
            date: Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap(),
            custom_name: custom_name.map(str::to_string),
        }
    }

    fn incident_with_audio(audio_id: Option<&str>, file_name: Option<&str>) -> Incident {
        Incident {
            id: "i1".to_string(),
            officer_info: String::new(),
            location: "Exit 24".to_string(),
            description: String::new(),
            audio_id: audio_id.map(str::to_string),
            audio_uri: audio_id.map(|id| format!("file://{}.m4a", id)),
            audio_file_name: file_name.map(str::to_string),
            date: "06/01/2024".to_string(),
            time: "02:30 PM".to_string(),
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    #[test]
    fn test_is_recording_referenced() {
        let incidents = vec![incident_with_audio(Some("r1"), None)];
        assert!(is_recording_referenced("r1", &incidents));
        assert!(!is_recording_referenced("r2", &incidents));
        assert!(!is_recording_referenced("r1", &[]));
    }

    #[test]
    fn test_referencing_incidents() {
        let incidents = vec![
            incident_with_audio(Some("r1"), None),
            incident_with_audio(None, None),
            incident_with_audio(Some("r1"), Some("older name")),
        ];
        assert_eq!(referencing_incidents("r1", &incidents).len(), 2);
        assert!(referencing_incidents("r9", &incidents).is_empty());
    }

    #[test]
    fn test_resolve_prefers_live_recording_name() {
        let recordings = vec![recording("r1", Some("Officer Smith"))];
        let lookup = recording_lookup(&recordings);
        // Snapshot name is stale; the live (renamed) recording wins
        let incident = incident_with_audio(Some("r1"), Some("Stale snapshot"));

        assert_eq!(
            resolve_audio_display_name(&incident, &lookup),
            Some("Officer Smith_06/01/2024_02:30PM".to_string())
        );
    }

    #[test]
    fn test_resolve_falls_back_to_snapshot_when_dangling() {
        let lookup = HashMap::new();
        let incident = incident_with_audio(Some("r1"), Some("Jun 1, 02:30 PM"));
        assert_eq!(
            resolve_audio_display_name(&incident, &lookup),
            Some("Jun 1, 02:30 PM".to_string())
        );
    }

    #[test]
    fn test_resolve_placeholder_when_no_snapshot() {
        let lookup = HashMap::new();
        let incident = incident_with_audio(Some("r1"), None);
        assert_eq!(
            resolve_audio_display_name(&incident, &lookup),
            Some(DELETED_AUDIO_PLACEHOLDER.to_string())
        );
    }

    #[test]
    fn test_resolve_none_without_audio() {
        let lookup = HashMap::new();
        let incident = incident_with_audio(None, None);
        assert_eq!(resolve_audio_display_name(&incident, &lookup), None);
    }
}
