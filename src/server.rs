//! Server-wide shared state.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::directory::RoomDirectory;

/// How often terminated rooms are swept out of the directory. Sweeping is
/// a fallback; `resolve` already replaces dead handles on contact.
const DIRECTORY_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Process-wide state shared by every connection handler: the loaded
/// configuration and the room directory. Rooms themselves are owned by
/// their tasks, not by this struct.
pub struct GameServer {
    config: Config,
    directory: RoomDirectory,
}

impl GameServer {
    pub fn new(config: Config) -> Arc<Self> {
        let directory = RoomDirectory::new(config.server.timings());
        Arc::new(Self { config, directory })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    /// Periodic directory maintenance; runs for the process lifetime.
    pub async fn cleanup_task(self: Arc<Self>) {
        let mut interval = tokio::time::interval(DIRECTORY_SWEEP_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let removed = self.directory.sweep();
            if removed > 0 {
                tracing::info!(removed, remaining = self.directory.len(), "Swept dead rooms");
            }
        }
    }
}
