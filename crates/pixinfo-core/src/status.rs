//! The one-line status shown while and after a run.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::StatusConfig;
use crate::pipeline::ProgressSink;
use crate::types::ImageRecord;

/// States of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// Waiting for input; rendered as the configured prompt
    Idle,
    Processing,
    Progress { processed: usize, total: usize },
    Complete { total: usize },
    NoImages,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Idle => Ok(()),
            StatusMessage::Processing => write!(f, "Processing..."),
            StatusMessage::Progress { processed, total } => {
                write!(f, "Processed: {} / {}", processed, total)
            }
            StatusMessage::Complete { total } => write!(f, "Complete! Processed {} images", total),
            StatusMessage::NoImages => write!(f, "No images found"),
        }
    }
}

struct StatusState {
    message: StatusMessage,
    /// Bumped on every change; a pending revert only applies to its own generation
    generation: u64,
}

/// Shared status line. Clones observe the same state.
///
/// Completion and "no images" messages revert to the idle prompt after a
/// fixed delay, unless something newer was shown in the meantime.
#[derive(Clone)]
pub struct StatusLine {
    state: Arc<Mutex<StatusState>>,
    idle_prompt: Arc<str>,
    idle_delay: Duration,
}

impl StatusLine {
    pub fn new(config: &StatusConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(StatusState {
                message: StatusMessage::Idle,
                generation: 0,
            })),
            idle_prompt: config.idle_prompt.as_str().into(),
            idle_delay: Duration::from_millis(config.idle_delay_ms),
        }
    }

    fn lock(state: &Mutex<StatusState>) -> MutexGuard<'_, StatusState> {
        state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn message(&self) -> StatusMessage {
        Self::lock(&self.state).message
    }

    /// Current text, with the idle state rendered as the prompt.
    pub fn text(&self) -> String {
        match self.message() {
            StatusMessage::Idle => self.idle_prompt.to_string(),
            other => other.to_string(),
        }
    }

    /// Show a message, returning its generation.
    pub fn set(&self, message: StatusMessage) -> u64 {
        let mut state = Self::lock(&self.state);
        state.generation += 1;
        state.message = message;
        tracing::trace!("status: {:?}", message);
        state.generation
    }

    /// Show a message, then fall back to idle after the configured delay.
    ///
    /// Outside a tokio runtime the message simply stays.
    pub fn set_then_idle(&self, message: StatusMessage) {
        let generation = self.set(message);
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let state = Arc::clone(&self.state);
        let delay = self.idle_delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = Self::lock(&state);
            if state.generation == generation {
                state.message = StatusMessage::Idle;
            }
        });
    }
}

impl fmt::Debug for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusLine")
            .field("message", &self.message())
            .field("idle_delay", &self.idle_delay)
            .finish()
    }
}

impl ProgressSink for StatusLine {
    fn started(&mut self, _total: usize) {
        self.set(StatusMessage::Processing);
    }

    fn record(&mut self, _record: &ImageRecord, processed: usize, total: usize) {
        self.set(StatusMessage::Progress { processed, total });
    }

    fn completed(&mut self, total: usize) {
        self.set_then_idle(StatusMessage::Complete { total });
    }

    fn no_images(&mut self) {
        self.set_then_idle(StatusMessage::NoImages);
    }
}
