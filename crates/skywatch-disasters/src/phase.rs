//! Load-cycle state machine.
//!
//! Ensures only one load runs at a time. `Ready` and `Fallback` hold until
//! the next explicit reload or cache expiry.

/// Phase of the current load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    /// Live or cached events are on display.
    Ready,
    /// The built-in sample events are on display after a fetch failure.
    Fallback,
}

impl LoadPhase {
    /// True if a new load can be started.
    pub fn can_start_load(self) -> bool {
        !matches!(self, LoadPhase::Loading)
    }

    /// True once the cycle has produced a displayable result.
    pub fn is_settled(self) -> bool {
        matches!(self, LoadPhase::Ready | LoadPhase::Fallback)
    }

    /// State after a cache miss starts the dual fetch.
    pub fn on_load_started(self) -> Self {
        LoadPhase::Loading
    }

    /// State after a successful normalize+merge (or a cache hit).
    pub fn on_ready(self) -> Self {
        LoadPhase::Ready
    }

    /// State after an upstream fetch failure.
    pub fn on_fallback(self) -> Self {
        LoadPhase::Fallback
    }
}
