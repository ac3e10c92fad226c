//! Audio session coordination for Witness.
//!
//! One shared record/playback resource exists system-wide. `AudioSession`
//! owns its state machine (`Idle`, `Recording`, `Playing`) and enforces the
//! at-most-one-active-session invariant: starting playback tears down any
//! previous playback first, and delete paths interrupt a session holding
//! the targeted recording before the entry is removed.
//!
//! The platform's capture/playback engine sits behind the `AudioEngine`
//! trait. Engine failures surface as errors and never touch repository
//! state; the only repository write triggered by a session is the `add`
//! performed by the caller with the `Recording` returned from a successful
//! stop.
//!
//! Pausing playback discards the position instead of suspending; resuming
//! restarts from zero. That asymmetry matches the shipped behavior and is
//! kept deliberately.

use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{WitnessError, WitnessResult};
use crate::models::Recording;

/// Audio finalized by a stopped capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    /// Location of the written audio asset
    pub uri: String,
    /// Captured length in whole seconds
    pub duration: u32,
}

/// Trait for platform audio engine implementations.
///
/// The engine handles the actual microphone and speaker plumbing; the
/// session state machine above it stays platform-independent.
pub trait AudioEngine: Send + Sync {
    /// Ask for microphone permission; `false` means the user denied it
    fn request_permission(&self) -> impl Future<Output = WitnessResult<bool>> + Send;

    /// Begin capturing from the microphone
    fn start_capture(&self) -> impl Future<Output = WitnessResult<()>> + Send;

    /// Stop capturing and finalize the written asset
    fn stop_capture(&self) -> impl Future<Output = WitnessResult<CapturedAudio>> + Send;

    /// Begin playing the asset behind `uri`
    fn start_playback(&self, uri: &str) -> impl Future<Output = WitnessResult<()>> + Send;

    /// Stop and unload any active playback
    fn stop_playback(&self) -> impl Future<Output = WitnessResult<()>> + Send;
}

/// Current session state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Playing {
        recording_id: String,
    },
}

/// The single owned audio session.
pub struct AudioSession<E> {
    engine: E,
    state: Mutex<SessionState>,
}

impl<E: AudioEngine> AudioSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: Mutex::new(SessionState::Idle),
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// ID of the recording currently playing, if any
    pub async fn currently_playing(&self) -> Option<String> {
        match &*self.state.lock().await {
            SessionState::Playing { recording_id } => Some(recording_id.clone()),
            _ => None,
        }
    }

    /// Start a capture session.
    ///
    /// Denied microphone permission leaves the session idle and returns
    /// `PermissionDenied`. Starting while already recording is a logged
    /// no-op. Active playback is torn down first.
    pub async fn start_recording(&self) -> WitnessResult<()> {
        let mut state = self.state.lock().await;

        if *state == SessionState::Recording {
            debug!("capture already in progress");
            return Ok(());
        }

        if matches!(*state, SessionState::Playing { .. }) {
            self.engine.stop_playback().await?;
            *state = SessionState::Idle;
        }

        if !self.engine.request_permission().await? {
            return Err(WitnessError::PermissionDenied(
                "Please allow microphone access.".to_string(),
            ));
        }

        self.engine.start_capture().await?;
        *state = SessionState::Recording;
        Ok(())
    }

    /// Stop the capture session and finalize a `Recording` entity.
    ///
    /// The session returns to idle even when the engine fails to finalize,
    /// so a failed stop never wedges the recorder.
    pub async fn stop_recording(&self) -> WitnessResult<Recording> {
        let mut state = self.state.lock().await;

        if *state != SessionState::Recording {
            return Err(WitnessError::engine("no capture in progress"));
        }

        *state = SessionState::Idle;
        let captured = self.engine.stop_capture().await?;
        Ok(Recording::new(captured.uri, captured.duration))
    }

    /// Start playback of a recording, tearing down any active playback
    /// first so at most one session is ever live.
    pub async fn play(&self, recording_id: &str, uri: &str) -> WitnessResult<()> {
        let mut state = self.state.lock().await;

        if *state == SessionState::Recording {
            return Err(WitnessError::engine("capture in progress"));
        }

        if matches!(*state, SessionState::Playing { .. }) {
            self.engine.stop_playback().await?;
            *state = SessionState::Idle;
        }

        self.engine.start_playback(uri).await?;
        *state = SessionState::Playing {
            recording_id: recording_id.to_string(),
        };
        Ok(())
    }

    /// Stop playback and discard the position. No-op when nothing plays.
    pub async fn pause_playback(&self) -> WitnessResult<()> {
        let mut state = self.state.lock().await;
        if matches!(*state, SessionState::Playing { .. }) {
            self.engine.stop_playback().await?;
            *state = SessionState::Idle;
        }
        Ok(())
    }

    /// Mark a naturally finished playback as idle.
    ///
    /// Called by the engine driver when the asset plays to the end; the
    /// engine has already unloaded itself at that point.
    pub async fn playback_finished(&self) {
        let mut state = self.state.lock().await;
        if matches!(*state, SessionState::Playing { .. }) {
            *state = SessionState::Idle;
        }
    }

    /// Tear down the session if it currently holds the given recording.
    ///
    /// Delete paths call this before removing an entry, so a file is never
    /// deleted while still open for playback.
    pub async fn interrupt_for(&self, recording_id: &str) -> WitnessResult<()> {
        let mut state = self.state.lock().await;
        let holds_target = matches!(
            &*state,
            SessionState::Playing { recording_id: active } if active == recording_id
        );
        if holds_target {
            self.engine.stop_playback().await?;
            *state = SessionState::Idle;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Scriptable engine that records the calls made against it.
    #[derive(Default)]
    pub(crate) struct MockEngine {
        pub deny_permission: AtomicBool,
        pub fail_playback: AtomicBool,
        pub next_capture: StdMutex<Option<CapturedAudio>>,
        pub calls: StdMutex<Vec<String>>,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    impl AudioEngine for &MockEngine {
        async fn request_permission(&self) -> WitnessResult<bool> {
            Ok(!self.deny_permission.load(Ordering::SeqCst))
        }

        async fn start_capture(&self) -> WitnessResult<()> {
            self.record("start_capture");
            Ok(())
        }

        async fn stop_capture(&self) -> WitnessResult<CapturedAudio> {
            self.record("stop_capture");
            Ok(self
                .next_capture
                .lock()
                .unwrap()
                .take()
                .unwrap_or(CapturedAudio {
                    uri: "file://captured.m4a".to_string(),
                    duration: 5,
                }))
        }

        async fn start_playback(&self, uri: &str) -> WitnessResult<()> {
            if self.fail_playback.load(Ordering::SeqCst) {
                return Err(WitnessError::engine("Failed to play recording."));
            }
            self.record(format!("play:{}", uri));
            Ok(())
        }

        async fn stop_playback(&self) -> WitnessResult<()> {
            self.record("stop_playback");
            Ok(())
        }
    }
}
