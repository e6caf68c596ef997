//! Periodic background refresh of the two cache tiers.
//!
//! Request-driven refreshes keep hot data fresh; these timers cover quiet
//! periods so the first request after a lull does not pay the full rebuild
//! cost. Each tick catches and logs failures without terminating the loop
//! or the process.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::cache::{CacheConfig, ProductCache};

/// Spawn the two refresh loops: inventory every inventory TTL, full
/// catalog + inventory every catalog TTL.
pub fn start_background_refresh(cache: &ProductCache, config: CacheConfig) {
    info!(
        catalog_ttl_secs = config.catalog_ttl.as_secs(),
        inventory_ttl_secs = config.inventory_ttl.as_secs(),
        "starting background refresh timers"
    );

    let inventory_cache = cache.clone();
    tokio::spawn(async move {
        let mut ticker = interval_after(config.inventory_ttl);
        loop {
            ticker.tick().await;
            if let Err(e) = inventory_cache.refresh_inventory().await {
                warn!(error = %e, "scheduled inventory refresh failed");
            }
        }
    });

    let catalog_cache = cache.clone();
    tokio::spawn(async move {
        let mut ticker = interval_after(config.catalog_ttl);
        loop {
            ticker.tick().await;
            if let Err(e) = catalog_cache.refresh_catalog().await {
                warn!(error = %e, "scheduled catalog refresh failed");
                continue;
            }
            // The catalog rebuild invalidated the inventory tier; rebuild
            // it right away so reads never block on the next access.
            if let Err(e) = catalog_cache.refresh_inventory().await {
                warn!(error = %e, "scheduled inventory rebuild after catalog refresh failed");
            }
        }
    });
}

/// An interval whose first tick fires after one full period (the caches
/// are populated on first access; an immediate tick would double that
/// work). Zero periods are clamped to one second.
fn interval_after(period: Duration) -> tokio::time::Interval {
    let period = period.max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
