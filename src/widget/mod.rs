//! Dashboard widget SDK seam.
//!
//! The controller only ever talks to the SDK through these two traits, so the
//! live HTTP-backed implementation and test doubles are interchangeable.

use crate::widget::error::WidgetError;

pub mod error;
pub mod published;
pub use published::PublishedDashboardSdk;

#[cfg(test)]
use mockall::automock;

/// Options a widget is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOptions {
    pub instance_url: String,
    pub workspace_id: String,
    pub dashboard_id: String,
    pub token: String,
    /// Identifier of the display region the widget takes over.
    pub container: String,
}

/// A live embedded dashboard instance.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Widget: Send {
    /// Completes the widget's own asynchronous setup.
    async fn initialize(&mut self) -> Result<(), WidgetError>;

    /// Asks the widget to reload its data.
    async fn refresh(&mut self) -> Result<(), WidgetError>;
}

/// Factory side of the SDK.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait WidgetSdk: Send + Sync {
    /// Acquires the SDK module. Called before every construction attempt.
    async fn load(&self) -> Result<(), WidgetError>;

    /// Constructs a widget bound to `options.container`.
    fn create(&self, options: WidgetOptions) -> Result<Box<dyn Widget>, WidgetError>;
}
