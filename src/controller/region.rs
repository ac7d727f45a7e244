//! Display region the controller renders into.

use crate::controller::view::View;
use crate::error_classifier::LogLevel;
use crate::events::{EventType, StatusLine};

/// The single region the dashboard lives in.
///
/// `show` replaces the contents wholesale. `remove_loading` must be a no-op
/// when no loading overlay is present.
pub trait DisplayRegion {
    fn id(&self) -> &str;

    fn show(&mut self, view: &View);

    /// Removes the loading overlay if present. Returns whether anything was removed.
    fn remove_loading(&mut self) -> bool;
}

/// Region that prints every change as a timestamped status line.
#[derive(Debug)]
pub struct ConsoleRegion {
    id: String,
    current: View,
}

impl ConsoleRegion {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current: View::Empty,
        }
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    fn status_line(view: &View) -> Option<StatusLine> {
        match view {
            View::Empty => None,
            View::Loading { text, subtext } => Some(StatusLine::new(
                format!("{} - {}", text, subtext),
                EventType::Loading,
                LogLevel::Info,
            )),
            View::Error {
                title,
                message,
                retrying,
                ..
            } => {
                let mut msg = format!("{}: {}", title, message);
                if *retrying {
                    msg.push_str(&format!(" ({})", crate::controller::view::RETRYING_NOTICE));
                }
                Some(StatusLine::new(msg, EventType::Error, LogLevel::Error))
            }
            View::Widget => Some(StatusLine::new(
                "Dashboard pronto".to_string(),
                EventType::Ready,
                LogLevel::Info,
            )),
        }
    }
}

impl DisplayRegion for ConsoleRegion {
    fn id(&self) -> &str {
        &self.id
    }

    fn show(&mut self, view: &View) {
        self.current = view.clone();
        if let Some(line) = Self::status_line(view) {
            if line.should_display() {
                println!("{}", line);
            }
        }
    }

    fn remove_loading(&mut self) -> bool {
        if self.current.is_loading() {
            self.current = View::Empty;
            true
        } else {
            false
        }
    }
}

/// In-memory region recording every view it was asked to show.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryRegion {
    pub content: Option<View>,
    pub history: Vec<View>,
    pub loading_removals: usize,
}

#[cfg(test)]
impl DisplayRegion for MemoryRegion {
    fn id(&self) -> &str {
        crate::consts::embed_consts::CONTAINER_ID
    }

    fn show(&mut self, view: &View) {
        self.content = Some(view.clone());
        self.history.push(view.clone());
    }

    fn remove_loading(&mut self) -> bool {
        if self.content.as_ref().is_some_and(View::is_loading) {
            self.content = None;
            self.loading_removals += 1;
            true
        } else {
            false
        }
    }
}
