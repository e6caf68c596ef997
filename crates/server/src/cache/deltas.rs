//! Inventory delta applier: admin-submitted quantity adjustments (manual
//! counts or barcode scans) forwarded to the vendor.
//!
//! This boundary validates and resolves the batch; it deliberately does
//! NOT refresh the inventory snapshot afterwards. The caller must trigger
//! `refresh_inventory()` explicitly once the vendor accepts the batch, so
//! subsequent reads reflect the change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sugar_plum_core::VariationId;
use thiserror::Error;
use tracing::{info, instrument};

use crate::vendor::{InventoryChange, QuantityChange, VendorError};

use super::{CacheError, ProductCache, Snapshot};

/// One requested adjustment from the admin UI.
///
/// The variation is identified by ID, SKU, or color+size, tried in that
/// order. Exactly one of `delta` / `absolute` must be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryUpdate {
    pub variation_id: Option<VariationId>,
    pub sku: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    /// Signed adjustment relative to the current vendor count.
    pub delta: Option<i64>,
    /// Physical count replacing the current vendor count.
    pub absolute: Option<i64>,
}

impl InventoryUpdate {
    /// Deduplication key. Entries without any identifier have no key and
    /// are rejected individually.
    fn key(&self) -> Option<String> {
        if let Some(id) = &self.variation_id {
            return Some(format!("id:{id}"));
        }
        if let Some(sku) = &self.sku {
            return Some(format!("sku:{}", sku.to_lowercase()));
        }
        if let (Some(color), Some(size)) = (&self.color, &self.size) {
            return Some(format!(
                "cs:{}|{}",
                color.to_lowercase(),
                size.to_lowercase()
            ));
        }
        None
    }

    /// Human-readable identifier echoed back in the outcome.
    fn identifier(&self) -> String {
        if let Some(id) = &self.variation_id {
            return id.to_string();
        }
        if let Some(sku) = &self.sku {
            return sku.clone();
        }
        if let (Some(color), Some(size)) = (&self.color, &self.size) {
            return format!("{color} / {size}");
        }
        "(unidentified)".to_string()
    }
}

/// Errors that reject the whole batch before or during the vendor call.
#[derive(Debug, Error)]
pub enum DeltaError {
    /// The batch contained no updates at all.
    #[error("inventory update batch is empty")]
    EmptyBatch,

    /// The catalog needed for resolution could not be built.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The vendor rejected the adjustment; surfaced verbatim.
    #[error(transparent)]
    Vendor(#[from] VendorError),
}

/// An update that was resolved and forwarded.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedDelta {
    pub identifier: String,
    pub variation_id: VariationId,
    #[serde(flatten)]
    pub change: QuantityChange,
}

/// An update rejected before the vendor call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedDelta {
    pub identifier: String,
    pub reason: String,
}

/// Per-batch result: resolvable entries proceed even when others are
/// rejected (unlike the availability guard's all-or-nothing policy).
#[derive(Debug, Clone, Serialize)]
pub struct DeltaOutcome {
    pub applied: Vec<AppliedDelta>,
    pub rejected: Vec<RejectedDelta>,
}

impl ProductCache {
    /// Validate, deduplicate, resolve, and forward an adjustment batch.
    ///
    /// Duplicated identifiers collapse to the last write. Unresolvable or
    /// malformed entries are reported in `rejected` with a reason and
    /// never reach the vendor; the remaining entries are forwarded as one
    /// idempotent batch.
    ///
    /// # Errors
    ///
    /// `EmptyBatch` for an empty input, resolution-catalog failures, or
    /// the vendor's rejection of the forwarded batch.
    #[instrument(skip(self, updates), fields(batch = updates.len()))]
    pub async fn apply_deltas(
        &self,
        updates: &[InventoryUpdate],
    ) -> Result<DeltaOutcome, DeltaError> {
        if updates.is_empty() {
            return Err(DeltaError::EmptyBatch);
        }

        // Resolution needs variation identity, not quantities; the catalog
        // tier is enough.
        self.ensure_catalog_fresh().await?;
        let snapshot = self.catalog_snapshot().ok_or(CacheError::NoData)?;

        let mut rejected = Vec::new();

        // Dedupe by identifier, last write wins, first-seen order kept.
        let mut order: Vec<String> = Vec::new();
        let mut by_key: HashMap<String, &InventoryUpdate> = HashMap::new();
        for update in updates {
            match update.key() {
                Some(key) => {
                    if !by_key.contains_key(&key) {
                        order.push(key.clone());
                    }
                    by_key.insert(key, update);
                }
                None => rejected.push(RejectedDelta {
                    identifier: update.identifier(),
                    reason: "missing identifier".to_string(),
                }),
            }
        }

        let mut applied = Vec::new();
        let mut changes = Vec::new();

        for key in &order {
            let Some(update) = by_key.get(key) else {
                continue;
            };

            let variation_id = match resolve_update(&snapshot, update) {
                Ok(id) => id,
                Err(reason) => {
                    rejected.push(RejectedDelta {
                        identifier: update.identifier(),
                        reason,
                    });
                    continue;
                }
            };

            let change = match quantity_change(update) {
                Ok(change) => change,
                Err(reason) => {
                    rejected.push(RejectedDelta {
                        identifier: update.identifier(),
                        reason,
                    });
                    continue;
                }
            };

            changes.push(InventoryChange {
                variation_id: variation_id.clone(),
                change,
            });
            applied.push(AppliedDelta {
                identifier: update.identifier(),
                variation_id,
                change,
            });
        }

        if !changes.is_empty() {
            let idempotency_key = uuid::Uuid::new_v4().to_string();
            self.vendor()
                .adjust_inventory(&changes, &idempotency_key)
                .await?;
            info!(
                applied = applied.len(),
                rejected = rejected.len(),
                "inventory adjustments forwarded"
            );
        }

        Ok(DeltaOutcome { applied, rejected })
    }
}

/// Resolve an update to a variation ID: exact ID, then SKU, then
/// color+size, all against the catalog snapshot.
fn resolve_update(snapshot: &Snapshot, update: &InventoryUpdate) -> Result<VariationId, String> {
    if let Some(id) = &update.variation_id {
        return snapshot
            .items
            .iter()
            .find_map(|item| item.variation(id))
            .map(|v| v.id.clone())
            .ok_or_else(|| format!("unknown variation id: {id}"));
    }

    if let Some(sku) = &update.sku {
        return snapshot
            .items
            .iter()
            .flat_map(|item| item.variations.iter())
            .find(|v| v.sku.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(sku)))
            .map(|v| v.id.clone())
            .ok_or_else(|| format!("unknown SKU: {sku}"));
    }

    if let (Some(color), Some(size)) = (&update.color, &update.size) {
        return snapshot
            .items
            .iter()
            .find_map(|item| item.variation_by_color_size(color, size))
            .map(|v| v.id.clone())
            .ok_or_else(|| format!("no variation matches {color} / {size}"));
    }

    Err("missing identifier".to_string())
}

/// Validate the delta-or-absolute quantity on an update.
fn quantity_change(update: &InventoryUpdate) -> Result<QuantityChange, String> {
    match (update.delta, update.absolute) {
        (Some(_), Some(_)) => Err("both delta and absolute quantity given".to_string()),
        (None, None) => Err("no quantity given".to_string()),
        (Some(0), None) => Err("zero delta".to_string()),
        (Some(delta), None) => Ok(QuantityChange::Delta(delta)),
        (None, Some(absolute)) => u32::try_from(absolute)
            .map(QuantityChange::Absolute)
            .map_err(|_| format!("negative quantity: {absolute}")),
    }
}
