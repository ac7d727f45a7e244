//! Controller lifecycle state

use crate::consts::embed_consts::controller::MAX_RETRIES;

/// Lifecycle phase of the embedded dashboard.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, strum::Display)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

/// Immutable inputs the widget is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    pub instance_url: String,
    pub workspace_id: String,
    pub dashboard_id: String,
    pub access_token: String,
}

/// Everything the display region is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub phase: Phase,
    /// Automatic re-initializations scheduled so far. Never reset.
    pub retry_count: u32,
    pub max_retries: u32,
    /// Description of the most recent initialization failure.
    pub last_error: Option<String>,
    /// A retry timer is scheduled and has not fired yet.
    pub retry_pending: bool,
    /// Generation of the most recently scheduled retry timer.
    pub retry_generation: u64,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            retry_count: 0,
            max_retries: MAX_RETRIES,
            last_error: None,
            retry_pending: false,
            retry_generation: 0,
        }
    }
}

impl ControllerState {
    /// State as it looks while the first initialization is in flight.
    pub fn loading() -> Self {
        Self {
            phase: Phase::Loading,
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn retries_exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }

    /// Whether a retry timer of `generation` is the one currently awaited.
    pub fn expects_retry(&self, generation: u64) -> bool {
        self.phase == Phase::Failed && self.retry_pending && self.retry_generation == generation
    }
}
