//! Background purge of expired response cache entries.

use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, info};

use crate::config::CacheSettings;
use crate::services::portfolio::PortfolioService;

/// Upper bound on the time between purge cycles.
const MAX_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Configuration for the cleanup task.
#[derive(Debug, Clone, Copy)]
pub struct CleanupConfig {
    /// How often to purge expired entries
    pub interval: Duration,
}

impl CleanupConfig {
    /// Purge at least once per TTL, and at least every five minutes.
    ///
    /// Returns `None` when caching is disabled.
    pub fn for_cache(settings: &CacheSettings) -> Option<Self> {
        if !settings.is_enabled() {
            return None;
        }
        Some(Self {
            interval: settings.ttl.min(MAX_PURGE_INTERVAL),
        })
    }
}

/// Start the cleanup background task.
///
/// Expired entries are already ignored on read; this keeps entries for
/// usernames that are never requested again from piling up.
pub fn start_cleanup_task(service: PortfolioService, config: CleanupConfig) {
    tokio::spawn(async move {
        info!(
            "Starting cache cleanup (interval: {} seconds)",
            config.interval.as_secs()
        );

        let mut ticker = interval(config.interval);

        loop {
            ticker.tick().await;

            let removed = service.purge_expired().await;
            if removed > 0 {
                info!("Cache cleanup: {} expired entries removed", removed);
            } else {
                debug!("Cache cleanup: nothing to remove");
            }
        }
    });
}
