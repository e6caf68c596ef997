//! Checkout-time availability guard.
//!
//! The guard is advisory-but-blocking: it prevents confirming an order the
//! freshest obtainable snapshot cannot satisfy, but it reserves nothing.
//! Decrementing stock is the vendor's responsibility once the order is
//! placed there, so two checkouts passing the guard concurrently for the
//! last unit remain possible; closing that window would need a vendor-side
//! reservation primitive.

use serde::{Deserialize, Serialize};
use sugar_plum_core::{ItemId, Variation, VariationId};
use tracing::{info, instrument};

use super::{CacheError, ProductCache, Snapshot};

/// One requested order line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    /// The item the line belongs to.
    pub item_id: ItemId,
    /// Exact variation reference, when the client has one.
    pub variation_id: Option<VariationId>,
    /// Fallback variation reference: color + size within the item.
    pub color: Option<String>,
    pub size: Option<String>,
    /// Requested quantity.
    pub quantity: u32,
}

impl CartLine {
    /// Human-readable reference for conflict messages.
    fn reference(&self) -> String {
        if let Some(id) = &self.variation_id {
            return id.to_string();
        }
        match (&self.color, &self.size) {
            (Some(color), Some(size)) => format!("{} ({color} / {size})", self.item_id),
            _ => self.item_id.to_string(),
        }
    }
}

/// A line the snapshot cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineConflict {
    /// The line's variation reference, echoed back for display.
    pub reference: String,
    pub requested: u32,
    pub available: u32,
}

/// Guard verdict. Rejection is all-or-nothing: one conflicting line
/// rejects the whole order.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub ok: bool,
    pub conflicts: Vec<LineConflict>,
}

impl AvailabilityReport {
    fn accept() -> Self {
        Self {
            ok: true,
            conflicts: Vec::new(),
        }
    }

    fn reject(conflicts: Vec<LineConflict>) -> Self {
        Self {
            ok: false,
            conflicts,
        }
    }
}

impl ProductCache {
    /// Check a requested order against the freshest obtainable counts.
    ///
    /// Forces a synchronous inventory refresh (TTL bypassed): checkout
    /// correctness requires the freshest count, not merely "fresh enough".
    /// Lines that cannot be resolved to a variation count as zero
    /// available (fail closed).
    ///
    /// # Errors
    ///
    /// Returns an error when the refresh fails and no snapshot exists;
    /// an oversell is a normal [`AvailabilityReport`] rejection, never an
    /// error.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn check_availability(
        &self,
        lines: &[CartLine],
    ) -> Result<AvailabilityReport, CacheError> {
        self.ensure_catalog_fresh().await?;
        self.ensure_inventory_initialized().await?;
        self.refresh_inventory().await?;

        let snapshot = self.inventory_snapshot().ok_or(CacheError::NoData)?;

        let mut conflicts = Vec::new();
        for line in lines {
            let available = resolve_line(&snapshot, line)
                .and_then(|v| v.quantity)
                .unwrap_or(0);

            if line.quantity > available || available == 0 {
                conflicts.push(LineConflict {
                    reference: line.reference(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        if conflicts.is_empty() {
            Ok(AvailabilityReport::accept())
        } else {
            info!(conflicts = conflicts.len(), "order rejected by availability guard");
            Ok(AvailabilityReport::reject(conflicts))
        }
    }
}

/// Resolve a line to a variation: exact ID match anywhere in the snapshot,
/// else case-insensitive color+size within the referenced item.
fn resolve_line<'a>(snapshot: &'a Snapshot, line: &CartLine) -> Option<&'a Variation> {
    if let Some(variation_id) = &line.variation_id
        && let Some(variation) = snapshot
            .items
            .iter()
            .find_map(|item| item.variation(variation_id))
    {
        return Some(variation);
    }

    let item = snapshot.items.iter().find(|item| item.id == line.item_id)?;

    match (&line.color, &line.size) {
        (Some(color), Some(size)) => item.variation_by_color_size(color, size),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::{FakeVendor, apparel_item, count};
    use super::super::{CacheConfig, ProductCache};
    use super::*;
    use std::sync::Arc;

    fn line(item_id: &str, variation_id: Option<&str>, quantity: u32) -> CartLine {
        CartLine {
            item_id: ItemId::new(item_id),
            variation_id: variation_id.map(VariationId::new),
            color: None,
            size: None,
            quantity,
        }
    }

    fn guard_cache(available: i64) -> (Arc<FakeVendor>, ProductCache) {
        let vendor = Arc::new(FakeVendor::new(
            vec![apparel_item(
                "I1",
                "Grinch Tee",
                &[("V1", "Black, Large", 2200)],
            )],
            vec![count("V1", available)],
        ));
        let cache = ProductCache::new(vendor.clone(), CacheConfig::default());
        (vendor, cache)
    }

    #[tokio::test]
    async fn test_oversell_rejected_with_per_line_detail() {
        let (_, cache) = guard_cache(2);

        let report = cache
            .check_availability(&[line("I1", Some("V1"), 3)])
            .await
            .unwrap();

        assert!(!report.ok);
        assert_eq!(
            report.conflicts,
            vec![LineConflict {
                reference: "V1".to_string(),
                requested: 3,
                available: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_exact_quantity_accepted() {
        let (_, cache) = guard_cache(2);

        let report = cache
            .check_availability(&[line("I1", Some("V1"), 2)])
            .await
            .unwrap();

        assert!(report.ok);
        assert!(report.conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_one_bad_line_rejects_whole_order() {
        let vendor = Arc::new(FakeVendor::new(
            vec![apparel_item(
                "I1",
                "Grinch Tee",
                &[("V1", "Black, Large", 2200), ("V2", "Black, Small", 2200)],
            )],
            vec![count("V1", 5), count("V2", 1)],
        ));
        let cache = ProductCache::new(vendor, CacheConfig::default());

        let report = cache
            .check_availability(&[line("I1", Some("V1"), 2), line("I1", Some("V2"), 2)])
            .await
            .unwrap();

        // V1 alone would be fine; no partial admission.
        assert!(!report.ok);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].reference, "V2");
    }

    #[tokio::test]
    async fn test_unresolvable_line_fails_closed() {
        let (_, cache) = guard_cache(5);

        let report = cache
            .check_availability(&[line("I1", Some("V-gone"), 1)])
            .await
            .unwrap();

        assert!(!report.ok);
        assert_eq!(report.conflicts[0].available, 0);
    }

    #[tokio::test]
    async fn test_color_size_fallback_resolution() {
        let (_, cache) = guard_cache(4);

        let report = cache
            .check_availability(&[CartLine {
                item_id: ItemId::new("I1"),
                variation_id: None,
                color: Some("black".to_string()),
                size: Some("l".to_string()),
                quantity: 4,
            }])
            .await
            .unwrap();

        assert!(report.ok);
    }

    #[tokio::test]
    async fn test_guard_always_refetches_counts() {
        let (vendor, cache) = guard_cache(2);

        cache
            .check_availability(&[line("I1", Some("V1"), 1)])
            .await
            .unwrap();
        let after_first = vendor.inventory_calls();

        // Counts drop between checks; the guard must see it despite the
        // inventory TTL not having elapsed.
        vendor.set_counts(vec![count("V1", 0)]);
        let report = cache
            .check_availability(&[line("I1", Some("V1"), 1)])
            .await
            .unwrap();

        assert!(vendor.inventory_calls() > after_first);
        assert!(!report.ok);
    }

    #[tokio::test]
    async fn test_zero_availability_rejects_even_zero_quantity_requests() {
        let (_, cache) = guard_cache(0);

        let report = cache
            .check_availability(&[line("I1", Some("V1"), 0)])
            .await
            .unwrap();

        assert!(!report.ok);
        assert_eq!(report.conflicts[0].available, 0);
    }
}
