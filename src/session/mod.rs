pub mod setup;
pub mod watch_mode;

pub use setup::{WatchSession, setup_watch_session};
pub use watch_mode::run_watch_mode;
