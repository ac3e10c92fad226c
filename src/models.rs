//! Data models for Witness.
//!
//! This module defines the core entities: Recording and Incident, plus the
//! pre-attachment payload handed from the recorder screen into incident
//! creation.
//!
//! Entities serialize with camelCase field names because the persisted JSON
//! layout is shared with the app's existing on-device records. Timestamp
//! fields round-trip through RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a new record ID.
///
/// UUID7 hex: time-ordered like the legacy millisecond-timestamp IDs, but
/// collision-safe. IDs stay `String` so legacy records keep deserializing.
pub fn generate_record_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// An audio recording captured on the device.
///
/// `id`, `uri` and `duration` are fixed at record-stop time; only
/// `custom_name` is mutable afterwards, via rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Unique identifier, assigned when the recording session stops
    pub id: String,
    /// Location of the audio asset on local storage
    pub uri: String,
    /// Length in whole seconds, captured at stop time
    pub duration: u32,
    /// When the recording was created
    pub date: DateTime<Utc>,
    /// Optional user-supplied label, set by rename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

impl Recording {
    /// Create a new recording finalized from a stopped capture session
    pub fn new(uri: String, duration: u32) -> Self {
        Self {
            id: generate_record_id(),
            uri,
            duration,
            date: Utc::now(),
            custom_name: None,
        }
    }

    /// Display name shown in lists and attached-audio labels.
    ///
    /// Renamed recordings render as `Name_MM/DD/YYYY_hh:mmAM`; unnamed ones
    /// fall back to a short `Mon D, hh:mm AM` stamp.
    pub fn display_name(&self) -> String {
        match &self.custom_name {
            Some(name) => format!(
                "{}_{}_{}",
                name,
                self.date.format("%m/%d/%Y"),
                self.date.format("%I:%M%p")
            ),
            None => format_short_stamp(&self.date),
        }
    }
}

/// A user-authored incident report, optionally referencing a recording.
///
/// `audio_id` is a soft reference into the recording collection;
/// `audio_uri`/`audio_file_name` are a denormalized snapshot taken at
/// attachment time so the report can still render after the recording is
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    #[serde(default)]
    pub officer_info: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file_name: Option<String>,
    /// User-entered date in MM/DD/YYYY display format
    pub date: String,
    /// User-entered time in hh:mm AM/PM display format
    pub time: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

impl Incident {
    /// Check whether the incident carries any audio attachment data
    pub fn has_audio(&self) -> bool {
        self.audio_id.is_some() || self.audio_uri.is_some() || self.audio_file_name.is_some()
    }

    /// Check whether the incident was edited after creation
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

/// Payload describing an existing recording attached to a new incident.
///
/// Carried from the recorder screen into the incident creation flow; folded
/// into the incident's `audio_id`/`audio_uri`/`audio_file_name` without
/// requiring the recording to still exist at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAttachment {
    pub id: String,
    pub uri: String,
    pub file_name: String,
    pub duration: u32,
}

impl AudioAttachment {
    /// Build the attachment payload for a live recording
    pub fn from_recording(recording: &Recording) -> Self {
        Self {
            id: recording.id.clone(),
            uri: recording.uri.clone(),
            file_name: recording.display_name(),
            duration: recording.duration,
        }
    }
}

/// Format a timestamp as a short `Mon D, hh:mm AM` stamp
pub fn format_short_stamp(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %I:%M %p").to_string()
}

/// Format whole seconds as `m:ss`
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
