use dispatch_core::config::ServerConfig;
use dispatch_core::Dispatch;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatch: Arc<Dispatch>,
    pub poll_timeout: Duration,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            dispatch: Arc::new(Dispatch::new()),
            poll_timeout: config.poll_timeout(),
            static_dir: config.static_dir.clone(),
        }
    }

    /// Override the long-poll window. Tests use this to keep polls short.
    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }
}
