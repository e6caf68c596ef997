//! Two-tier product cache: catalog (slow-changing) and inventory
//! (fast-changing) snapshots with independent TTLs.
//!
//! # Architecture
//!
//! - Each tier holds an immutable [`Snapshot`] behind a `parking_lot`
//!   read-write lock. Refreshes build a complete new snapshot off to the
//!   side and install it with a single pointer swap, so readers always see
//!   either the fully-old or the fully-new view and never await.
//! - Refreshes per tier are serialized by a `tokio::sync::Mutex` held
//!   across the vendor calls. Staleness is re-checked after acquisition,
//!   so concurrent triggers join the winner's work instead of issuing
//!   duplicate vendor fetches, and an older refresh can never land after
//!   (and clobber) a newer one.
//! - Reads follow stale-while-revalidate: a stale inventory snapshot is
//!   served immediately while a background refresh is kicked off
//!   (`try_lock`, skipped when one is already in flight). Reads block only
//!   when no snapshot has ever been built.
//! - Secondary image lookups are memoized in a `moka` cache so repeated
//!   catalog rebuilds do not re-fetch unchanged image objects.

mod deltas;
mod guard;

pub use deltas::{AppliedDelta, DeltaError, DeltaOutcome, InventoryUpdate, RejectedDelta};
pub use guard::{AvailabilityReport, CartLine, LineConflict};

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use parking_lot::RwLock;
use sugar_plum_core::{CatalogItem, CurrencyCode, ImageId, Price, Variation};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::classify;
use crate::vendor::{VendorApi, VendorError, VendorItem};

/// Default TTL for the catalog tier (names, images, variation definitions).
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default TTL for the inventory tier (per-variation counts).
pub const DEFAULT_INVENTORY_TTL: Duration = Duration::from_secs(5 * 60);

/// Staleness tolerances for the two tiers. Changing them only affects how
/// long reads may serve old data, never correctness.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub catalog_ttl: Duration,
    pub inventory_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            catalog_ttl: DEFAULT_CATALOG_TTL,
            inventory_ttl: DEFAULT_INVENTORY_TTL,
        }
    }
}

/// Errors surfaced by cache reads and refreshes.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Vendor call failed and no snapshot exists to fall back on.
    #[error("vendor error: {0}")]
    Vendor(#[from] VendorError),

    /// No snapshot has ever been built.
    #[error("no product data available yet")]
    NoData,
}

/// An immutable point-in-time view of the catalog.
///
/// Catalog-tier snapshots carry `quantity: None` on every variation;
/// inventory-tier snapshots carry `Some` quantities throughout.
#[derive(Debug)]
pub struct Snapshot {
    /// Ordered in-domain items.
    pub items: Vec<CatalogItem>,
    /// When this snapshot was built.
    pub fetched_at: DateTime<Utc>,
}

/// One cache tier: the installed snapshot plus its monotonic timestamp.
struct Tier {
    snapshot: Arc<Snapshot>,
    fetched_at: Instant,
}

/// The product cache. Cheaply cloneable; all state lives behind an `Arc`.
///
/// Snapshots are written exclusively by the refresh functions here and
/// read by everyone else as read-only `Arc`s; no caller can mutate a
/// variation's quantity in place.
#[derive(Clone)]
pub struct ProductCache {
    inner: Arc<ProductCacheInner>,
}

struct ProductCacheInner {
    vendor: Arc<dyn VendorApi>,
    config: CacheConfig,
    catalog: RwLock<Option<Tier>>,
    inventory: RwLock<Option<Tier>>,
    catalog_refresh: tokio::sync::Mutex<()>,
    inventory_refresh: tokio::sync::Mutex<()>,
    image_cache: MokaCache<ImageId, String>,
}

impl ProductCache {
    /// Create an empty cache. Snapshots are populated on first access or
    /// by the background scheduler.
    #[must_use]
    pub fn new(vendor: Arc<dyn VendorApi>, config: CacheConfig) -> Self {
        let image_cache = MokaCache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(24 * 60 * 60))
            .build();

        Self {
            inner: Arc::new(ProductCacheInner {
                vendor,
                config,
                catalog: RwLock::new(None),
                inventory: RwLock::new(None),
                catalog_refresh: tokio::sync::Mutex::new(()),
                inventory_refresh: tokio::sync::Mutex::new(()),
                image_cache,
            }),
        }
    }

    pub(crate) fn vendor(&self) -> &Arc<dyn VendorApi> {
        &self.inner.vendor
    }

    // =========================================================================
    // Snapshot access
    // =========================================================================

    /// The current catalog snapshot, if one has been built.
    #[must_use]
    pub fn catalog_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.catalog.read().as_ref().map(|t| t.snapshot.clone())
    }

    /// The current inventory snapshot, if one has been built.
    #[must_use]
    pub fn inventory_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner
            .inventory
            .read()
            .as_ref()
            .map(|t| t.snapshot.clone())
    }

    fn catalog_is_fresh(&self) -> bool {
        self.inner
            .catalog
            .read()
            .as_ref()
            .is_some_and(|t| t.fetched_at.elapsed() <= self.inner.config.catalog_ttl)
    }

    fn inventory_is_stale(&self) -> bool {
        self.inner
            .inventory
            .read()
            .as_ref()
            .is_none_or(|t| t.fetched_at.elapsed() > self.inner.config.inventory_ttl)
    }

    // =========================================================================
    // Catalog tier
    // =========================================================================

    /// Rebuild the catalog snapshot from the full vendor catalog.
    ///
    /// Pages through the listing until the cursor is exhausted, keeps only
    /// in-domain items, resolves images (individual lookup failures leave
    /// the item without an image), and installs the new snapshot
    /// atomically. The inventory snapshot is invalidated because variation
    /// identity may have changed.
    ///
    /// # Errors
    ///
    /// Returns the vendor error on failure; the prior snapshot (if any)
    /// stays in place.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&self) -> Result<usize, VendorError> {
        let _guard = self.inner.catalog_refresh.lock().await;
        self.refresh_catalog_locked().await
    }

    async fn refresh_catalog_locked(&self) -> Result<usize, VendorError> {
        let mut vendor_items: Vec<VendorItem> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.inner.vendor.list_catalog_page(cursor).await?;
            vendor_items.extend(page.items);
            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(total = vendor_items.len(), "catalog objects fetched");

        let mut items = Vec::new();
        for raw in &vendor_items {
            if !classify::is_in_domain(raw) {
                continue;
            }
            let image_url = self.resolve_image(raw).await;
            items.push(build_catalog_item(raw, image_url));
        }

        let count = items.len();
        let snapshot = Arc::new(Snapshot {
            items,
            fetched_at: Utc::now(),
        });

        *self.inner.catalog.write() = Some(Tier {
            snapshot,
            fetched_at: Instant::now(),
        });
        // Variation identity may have changed; force a full inventory
        // rebuild on next access.
        *self.inner.inventory.write() = None;

        info!(count, "catalog snapshot rebuilt");
        Ok(count)
    }

    /// Make sure the catalog snapshot exists and is within its TTL.
    ///
    /// Empty cache → synchronous refresh (caller blocks). Stale cache →
    /// synchronous refresh, but a failure falls back to the stale
    /// snapshot. No-op when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error only when no snapshot has ever been built and the
    /// vendor call fails.
    pub async fn ensure_catalog_fresh(&self) -> Result<(), CacheError> {
        if self.catalog_is_fresh() {
            return Ok(());
        }

        let _guard = self.inner.catalog_refresh.lock().await;

        // Another caller may have refreshed while we waited.
        if self.catalog_is_fresh() {
            return Ok(());
        }

        match self.refresh_catalog_locked().await {
            Ok(_) => Ok(()),
            Err(e) => {
                if self.catalog_snapshot().is_some() {
                    // Stale-but-available beats empty.
                    warn!(error = %e, "catalog refresh failed, serving stale snapshot");
                    Ok(())
                } else {
                    Err(CacheError::Vendor(e))
                }
            }
        }
    }

    /// Resolve an item's image, preferring the inline URL and falling back
    /// to the memoized secondary lookup. Lookup failures are logged and
    /// never abort a refresh.
    async fn resolve_image(&self, item: &VendorItem) -> Option<String> {
        if let Some(url) = &item.image_url {
            return Some(url.clone());
        }

        let image_id = item.image_ids.first()?;

        if let Some(url) = self.inner.image_cache.get(image_id).await {
            return Some(url);
        }

        match self.inner.vendor.retrieve_image_url(image_id).await {
            Ok(Some(url)) => {
                self.inner
                    .image_cache
                    .insert(image_id.clone(), url.clone())
                    .await;
                Some(url)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    error = %e,
                    item = %item.name,
                    image_id = %image_id,
                    "image lookup failed, continuing without image"
                );
                None
            }
        }
    }

    // =========================================================================
    // Inventory tier
    // =========================================================================

    /// Rebuild the inventory snapshot: every catalog variation mapped to a
    /// quantity from one batched vendor lookup.
    ///
    /// The catalog snapshot is built first when absent (the one place
    /// inventory reaches back into catalog). Count rows are summed per
    /// variation ID; variations missing from the result get quantity 0.
    ///
    /// # Errors
    ///
    /// Returns an error on vendor failure; the prior inventory snapshot
    /// (if any) stays in place.
    #[instrument(skip(self))]
    pub async fn refresh_inventory(&self) -> Result<usize, CacheError> {
        let _guard = self.inner.inventory_refresh.lock().await;
        self.refresh_inventory_locked().await
    }

    async fn refresh_inventory_locked(&self) -> Result<usize, CacheError> {
        if self.catalog_snapshot().is_none() {
            let _guard = self.inner.catalog_refresh.lock().await;
            if self.catalog_snapshot().is_none() {
                self.refresh_catalog_locked().await?;
            }
        }

        let catalog = self.catalog_snapshot().ok_or(CacheError::NoData)?;

        let variation_ids: Vec<_> = catalog
            .items
            .iter()
            .flat_map(|item| item.variations.iter().map(|v| v.id.clone()))
            .collect();

        let counts = if variation_ids.is_empty() {
            Vec::new()
        } else {
            self.inner
                .vendor
                .batch_inventory_counts(&variation_ids)
                .await?
        };

        // A variation may appear in more than one count row; sum them.
        let mut quantity_by_id = HashMap::new();
        for count in counts {
            *quantity_by_id.entry(count.variation_id).or_insert(0i64) += count.quantity;
        }

        let items: Vec<CatalogItem> = catalog
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                for variation in &mut item.variations {
                    let quantity = quantity_by_id
                        .get(&variation.id)
                        .copied()
                        .unwrap_or_default();
                    variation.quantity =
                        Some(u32::try_from(quantity.max(0)).unwrap_or(u32::MAX));
                }
                item
            })
            .collect();

        let count = items.len();
        let snapshot = Arc::new(Snapshot {
            items,
            fetched_at: Utc::now(),
        });

        *self.inner.inventory.write() = Some(Tier {
            snapshot,
            fetched_at: Instant::now(),
        });

        info!(count, "inventory snapshot rebuilt");
        Ok(count)
    }

    /// Make sure some inventory snapshot exists, refreshing synchronously
    /// only when none does. Guarantees every read has a snapshot, possibly
    /// stale.
    ///
    /// # Errors
    ///
    /// Returns an error when the initial build fails.
    pub async fn ensure_inventory_initialized(&self) -> Result<(), CacheError> {
        if self.inventory_snapshot().is_some() {
            return Ok(());
        }

        let _guard = self.inner.inventory_refresh.lock().await;

        if self.inventory_snapshot().is_some() {
            return Ok(());
        }

        self.refresh_inventory_locked().await.map(|_| ())
    }

    // =========================================================================
    // Read path
    // =========================================================================

    /// Serve the current inventory snapshot, stale-while-revalidate.
    ///
    /// Catalog freshness and inventory presence are ensured first (both
    /// cheap no-ops in steady state). A stale inventory snapshot is
    /// returned immediately while a background refresh is kicked off;
    /// reads never wait on a refresh they did not themselves trigger.
    ///
    /// # Errors
    ///
    /// Returns an error only when no snapshot could ever be built.
    pub async fn products(&self) -> Result<Arc<Snapshot>, CacheError> {
        self.ensure_catalog_fresh().await?;
        self.ensure_inventory_initialized().await?;

        let snapshot = self.inventory_snapshot().ok_or(CacheError::NoData)?;

        if self.inventory_is_stale() {
            self.spawn_inventory_refresh();
        }

        Ok(snapshot)
    }

    /// Kick off a background inventory refresh unless one is already in
    /// flight.
    fn spawn_inventory_refresh(&self) {
        let cache = self.clone();
        tokio::spawn(async move {
            let Ok(_guard) = cache.inner.inventory_refresh.try_lock() else {
                // A refresh is already running; its result will serve.
                return;
            };

            if !cache.inventory_is_stale() {
                return;
            }

            if let Err(e) = cache.refresh_inventory_locked().await {
                warn!(error = %e, "background inventory refresh failed");
            }
        });
    }
}

/// Assemble a normalized catalog item from a vendor item. Quantities stay
/// unknown; the inventory tier fills them in.
fn build_catalog_item(raw: &VendorItem, image_url: Option<String>) -> CatalogItem {
    let variation_names: Vec<String> = raw.variations.iter().map(|v| v.name.clone()).collect();

    let variations = raw
        .variations
        .iter()
        .map(|v| {
            let parsed = classify::parse_variation(&v.name);
            Variation {
                id: v.id.clone(),
                name: v.name.clone(),
                size: parsed.size,
                color: parsed.color,
                sku: v.sku.clone(),
                price: Price::from_cents(v.price_cents.max(0), CurrencyCode::USD),
                print_location: v.print_location.clone(),
                quantity: None,
            }
        })
        .collect();

    CatalogItem {
        id: raw.id.clone(),
        name: raw.name.clone(),
        description: raw.description.clone(),
        image_url,
        garment: classify::garment_type(&raw.name),
        audience: classify::audience(&raw.name, &variation_names, &raw.description),
        subcategory: classify::subcategory(&raw.name, &raw.description),
        variations,
    }
}
