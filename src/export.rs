//! Export records for Witness.
//!
//! The PDF/share pipeline lives outside the core; it receives a flat record
//! with the resolved audio label already baked in and owns all layout
//! decisions from there.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::crossref::resolve_audio_display_name;
use crate::models::{Incident, Recording};

/// Flat incident record handed to the export component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentExport {
    pub officer_info: String,
    pub location: String,
    pub description: String,
    /// Resolved audio label (live, snapshot, or deleted placeholder);
    /// `None` when no audio was attached
    pub audio_file_name: Option<String>,
    pub date: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl IncidentExport {
    /// Build the export record, resolving the audio label against the
    /// current recording collection.
    pub fn new(incident: &Incident, recordings: &HashMap<&str, &Recording>) -> Self {
        Self {
            officer_info: incident.officer_info.clone(),
            location: incident.location.clone(),
            description: incident.description.clone(),
            audio_file_name: resolve_audio_display_name(incident, recordings),
            date: incident.date.clone(),
            time: incident.time.clone(),
            created_at: incident.created_at,
            edited_at: incident.edited_at,
        }
    }
}

/// Suggested file name for a shared report: the location stripped to
/// alphanumerics, spaces collapsed to underscores, suffixed `_Incident.pdf`.
pub fn export_file_name(incident: &Incident) -> String {
    let location = incident.location.trim();
    if location.is_empty() {
        return "Incident_Incident.pdf".to_string();
    }

    let sanitized: String = location
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let name = sanitized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    if name.is_empty() {
        "Incident_Incident.pdf".to_string()
    } else {
        format!("{}_Incident.pdf", name)
    }
}
