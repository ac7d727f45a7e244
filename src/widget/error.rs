//! Error handling for the widget module

use thiserror::Error;

/// A failure reported by the dashboard widget SDK.
///
/// Every variant carries a free-text description; that text is what failure
/// classification inspects, so it must not be decorated with prefixes that
/// could contain classification keywords.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// The SDK module could not be acquired.
    #[error("{0}")]
    Load(String),

    /// The widget rejected its construction options.
    #[error("{0}")]
    Construct(String),

    /// The widget's own asynchronous setup failed.
    #[error("{0}")]
    Initialize(String),

    /// A refresh of a ready widget failed.
    #[error("{0}")]
    Refresh(String),
}

impl WidgetError {
    /// The raw failure description.
    pub fn description(&self) -> &str {
        match self {
            WidgetError::Load(msg)
            | WidgetError::Construct(msg)
            | WidgetError::Initialize(msg)
            | WidgetError::Refresh(msg) => msg,
        }
    }

    /// Stage name for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            WidgetError::Load(_) => "load",
            WidgetError::Construct(_) => "construct",
            WidgetError::Initialize(_) => "initialize",
            WidgetError::Refresh(_) => "refresh",
        }
    }
}
