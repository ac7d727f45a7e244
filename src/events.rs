//! Event System
//!
//! Inputs that drive the dashboard controller and the timestamped status lines
//! a watch session prints.

use crate::error_classifier::LogLevel;
use crate::logging;
use chrono::Local;
use std::fmt::Display;

/// Deferred one-shot work a scheduler hands back to the controller.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Timer {
    /// Re-run initialization after a failure. Carries the retry generation
    /// it was scheduled for; only the latest generation is honoured.
    Retry(u64),
    /// Late removal of the loading overlay after a successful initialization.
    LoadingCleanup,
    /// Removal of any leftover loading overlay a while after page start.
    PageReadyCleanup,
}

/// Everything the controller reacts to. Handled strictly one at a time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ControllerEvent {
    Initialize,
    /// User-triggered refresh.
    Refresh,
    /// Host connectivity restored.
    Online,
    /// Host connectivity lost.
    Offline,
    Timer(Timer),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Loading,
    Ready,
    Error,
    Refresh,
    Connectivity,
}

/// A line of console output describing what the display region shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl StatusLine {
    pub fn new(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn should_display(&self) -> bool {
        // Always show region changes and info level lines
        if self.event_type != EventType::Refresh || self.log_level >= LogLevel::Info {
            return true;
        }
        logging::enabled(self.log_level)
    }
}

impl ControllerEvent {
    /// Status line announcing an event that came from outside the controller.
    /// Timers and the initial initialize are not announced.
    pub fn status_line(&self) -> Option<StatusLine> {
        match self {
            ControllerEvent::Refresh => Some(StatusLine::new(
                "Atualizando dashboard".to_string(),
                EventType::Refresh,
                LogLevel::Debug,
            )),
            ControllerEvent::Online => Some(StatusLine::new(
                "Conexão restaurada".to_string(),
                EventType::Connectivity,
                LogLevel::Info,
            )),
            ControllerEvent::Offline => Some(StatusLine::new(
                "Conexão perdida".to_string(),
                EventType::Connectivity,
                LogLevel::Warn,
            )),
            ControllerEvent::Initialize | ControllerEvent::Timer(_) => None,
        }
    }
}

impl Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}
