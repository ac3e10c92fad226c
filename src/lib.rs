//! WitnessCore - Rust implementation of the Witness incident-documentation
//! application core.
//!
//! This library provides the local record-management core for Witness:
//! - Data models (Recording, Incident, AudioAttachment)
//! - Persistent key-value storage and audio asset storage
//! - Recording and incident repositories
//! - Cross-reference rules between incidents and recordings
//! - Audio session coordination (record/playback state machine)
//! - Input validation for the incident logger
//! - Flat export records for the external PDF/share pipeline
//!
//! This is a pure Rust library designed to sit behind the app's screens;
//! navigation, rendering, and the platform audio engine are external
//! collaborators. All state lives on the device; there is no network.

pub mod assets;
pub mod audio;
pub mod client;
pub mod config;
pub mod crossref;
pub mod error;
pub mod export;
pub mod incidents;
pub mod models;
pub mod recordings;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use assets::{AssetStore, FsAssetStore, MemoryAssetStore};
pub use audio::{AudioEngine, AudioSession, CapturedAudio, SessionState};
pub use client::{BulkDeleteOutcome, DeleteOutcome, WitnessClient};
pub use config::Config;
pub use crossref::{is_recording_referenced, resolve_audio_display_name};
pub use error::{WitnessError, WitnessResult};
pub use export::IncidentExport;
pub use incidents::{IncidentDraft, IncidentRepository, IncidentUpdate};
pub use models::{AudioAttachment, Incident, Recording};
pub use recordings::{RecordingRepository, RecordingUpdate};
pub use store::{FileStore, KeyValueStore, MemoryStore};
