//! Declarative description of the display region.

use crate::controller::state::{ControllerState, Phase};
use crate::error_classifier::ErrorClassifier;

pub const LOADING_TEXT: &str = "Carregando Dashboard";
pub const LOADING_SUBTEXT: &str = "Conectando com Databricks Analytics...";
pub const ERROR_ICON: &str = "!";
pub const ERROR_TITLE: &str = "Erro ao Carregar Dashboard";
pub const RETRYING_NOTICE: &str = "Tentando novamente...";

/// What the display region should contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Nothing has been attempted yet.
    Empty,
    Loading {
        text: String,
        subtext: String,
    },
    Error {
        icon: String,
        title: String,
        message: String,
        /// An automatic retry is scheduled.
        retrying: bool,
    },
    /// The widget owns the region; the controller leaves it alone.
    Widget,
}

/// Renders the region for a controller state. Pure.
pub fn render(state: &ControllerState) -> View {
    match state.phase {
        Phase::Uninitialized => View::Empty,
        Phase::Loading => View::Loading {
            text: LOADING_TEXT.to_string(),
            subtext: LOADING_SUBTEXT.to_string(),
        },
        Phase::Ready => View::Widget,
        Phase::Failed => View::Error {
            icon: ERROR_ICON.to_string(),
            title: ERROR_TITLE.to_string(),
            message: ErrorClassifier::new()
                .user_message(state.last_error.as_deref().unwrap_or_default()),
            retrying: state.retry_pending,
        },
    }
}

impl View {
    pub fn is_loading(&self) -> bool {
        matches!(self, View::Loading { .. })
    }

    /// Markup for the region's contents. `Widget` renders nothing since the
    /// widget writes its own markup.
    pub fn to_html(&self) -> String {
        match self {
            View::Empty | View::Widget => String::new(),
            View::Loading { text, subtext } => format!(
                r#"<div class="loading-container" id="loading-state">
    <div class="loading-spinner"></div>
    <div class="loading-text">{}</div>
    <div class="loading-subtext">{}</div>
</div>"#,
                escape_html(text),
                escape_html(subtext)
            ),
            View::Error {
                icon,
                title,
                message,
                retrying,
            } => {
                let notice = if *retrying {
                    format!("<br><br>{}", RETRYING_NOTICE)
                } else {
                    String::new()
                };
                format!(
                    r#"<div class="error-container">
    <div class="error-icon">{}</div>
    <div class="error-title">{}</div>
    <div class="error-message">{}{}</div>
</div>"#,
                    escape_html(icon),
                    escape_html(title),
                    escape_html(message),
                    notice
                )
            }
        }
    }
}

/// Escapes text for use inside HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
