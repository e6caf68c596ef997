//! Behavioral tests for the two-tier product cache, driven through the
//! same public API the route handlers use.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use sugar_plum_core::{ItemId, VariationId};
use sugar_plum_integration_tests::fake_vendor::{ScriptedVendor, count, tee};
use sugar_plum_server::cache::{CacheConfig, CartLine, ProductCache};

fn config() -> CacheConfig {
    CacheConfig::default()
}

fn one_tee_vendor(available: i64) -> Arc<ScriptedVendor> {
    Arc::new(ScriptedVendor::new(
        vec![tee(
            "I1",
            "Grinch Christmas Tee",
            &[("V1", "Black, Large", 2200)],
        )],
        vec![count("V1", available)],
    ))
}

fn line(variation_id: &str, quantity: u32) -> CartLine {
    CartLine {
        item_id: ItemId::new("I1"),
        variation_id: Some(VariationId::new(variation_id)),
        color: None,
        size: None,
        quantity,
    }
}

// =============================================================================
// Freshness
// =============================================================================

#[tokio::test]
async fn catalog_fetched_once_within_ttl() {
    let vendor = one_tee_vendor(2);
    let cache = ProductCache::new(vendor.clone(), config());

    cache.ensure_catalog_fresh().await.unwrap();
    cache.ensure_catalog_fresh().await.unwrap();
    cache.ensure_catalog_fresh().await.unwrap();

    assert_eq!(vendor.catalog_calls(), 1);
}

#[tokio::test]
async fn concurrent_reads_share_one_initial_build() {
    let vendor = one_tee_vendor(2);
    let cache = ProductCache::new(vendor.clone(), config());

    // Ten concurrent first reads must coalesce into one catalog fetch and
    // one inventory fetch.
    let reads = (0..10).map(|_| {
        let cache = cache.clone();
        tokio::spawn(async move { cache.products().await.map(|s| s.items.len()) })
    });

    for handle in reads {
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }

    assert_eq!(vendor.catalog_calls(), 1);
    assert_eq!(vendor.inventory_calls(), 1);
}

#[tokio::test]
async fn duplicate_count_rows_are_summed() {
    let vendor = Arc::new(ScriptedVendor::new(
        vec![tee("I1", "Tee", &[("V1", "Black, Large", 2000)])],
        vec![count("V1", 3), count("V1", 2)],
    ));
    let cache = ProductCache::new(vendor, config());

    let snapshot = cache.products().await.unwrap();
    assert_eq!(snapshot.items[0].variations[0].quantity, Some(5));
}

#[tokio::test]
async fn reads_survive_vendor_outage_after_first_build() {
    let vendor = one_tee_vendor(2);
    let cache = ProductCache::new(vendor.clone(), config());

    cache.products().await.unwrap();
    vendor.fail_inventory(true);

    // The snapshot is still fresh, so reads keep serving it.
    let snapshot = cache.products().await.unwrap();
    assert_eq!(snapshot.items.len(), 1);
}

// =============================================================================
// Availability guard
// =============================================================================

#[tokio::test]
async fn guard_rejects_oversell_with_detail() {
    let vendor = one_tee_vendor(2);
    let cache = ProductCache::new(vendor, config());

    let report = cache.check_availability(&[line("V1", 3)]).await.unwrap();

    assert!(!report.ok);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].requested, 3);
    assert_eq!(report.conflicts[0].available, 2);
}

#[tokio::test]
async fn guard_accepts_exact_availability() {
    let vendor = one_tee_vendor(2);
    let cache = ProductCache::new(vendor, config());

    let report = cache.check_availability(&[line("V1", 2)]).await.unwrap();
    assert!(report.ok);
}

#[tokio::test]
async fn guard_sees_count_changes_within_ttl() {
    let vendor = one_tee_vendor(5);
    let cache = ProductCache::new(vendor.clone(), config());

    assert!(cache.check_availability(&[line("V1", 5)]).await.unwrap().ok);

    // Stock drains vendor-side; the TTL has not elapsed, but the guard
    // must refetch and see it anyway.
    vendor.set_counts(vec![count("V1", 1)]);
    let report = cache.check_availability(&[line("V1", 5)]).await.unwrap();

    assert!(!report.ok);
    assert_eq!(report.conflicts[0].available, 1);
}

// =============================================================================
// Delta application round trip
// =============================================================================

#[tokio::test]
async fn applied_deltas_reach_vendor_and_refresh_shows_new_counts() {
    let vendor = one_tee_vendor(2);
    let cache = ProductCache::new(vendor.clone(), config());

    let updates = vec![sugar_plum_server::cache::InventoryUpdate {
        variation_id: Some(VariationId::new("V1")),
        delta: Some(3),
        ..Default::default()
    }];

    let outcome = cache.apply_deltas(&updates).await.unwrap();
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(vendor.adjustments().len(), 1);

    // The applier never refreshes; the caller does, and the refresh picks
    // up whatever the vendor now reports.
    vendor.set_counts(vec![count("V1", 5)]);
    cache.refresh_inventory().await.unwrap();

    let snapshot = cache.products().await.unwrap();
    assert_eq!(snapshot.items[0].variations[0].quantity, Some(5));
}
