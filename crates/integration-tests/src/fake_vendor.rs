//! Scripted in-memory vendor for cross-crate behavioral tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use sugar_plum_core::{ImageId, ItemId, VariationId};
use sugar_plum_server::vendor::{
    CatalogPage, InventoryChange, InventoryCount, VendorApi, VendorError, VendorItem,
    VendorVariation,
};

/// A vendor whose catalog and counts are fixed at construction, with call
/// counters for asserting fetch behavior.
pub struct ScriptedVendor {
    items: Vec<VendorItem>,
    counts: Mutex<Vec<InventoryCount>>,
    fail_inventory: AtomicBool,
    catalog_calls: AtomicUsize,
    inventory_calls: AtomicUsize,
    adjustments: Mutex<Vec<Vec<InventoryChange>>>,
}

impl ScriptedVendor {
    #[must_use]
    pub fn new(items: Vec<VendorItem>, counts: Vec<InventoryCount>) -> Self {
        Self {
            items,
            counts: Mutex::new(counts),
            fail_inventory: AtomicBool::new(false),
            catalog_calls: AtomicUsize::new(0),
            inventory_calls: AtomicUsize::new(0),
            adjustments: Mutex::new(Vec::new()),
        }
    }

    pub fn set_counts(&self, counts: Vec<InventoryCount>) {
        *self.counts.lock() = counts;
    }

    pub fn fail_inventory(&self, fail: bool) {
        self.fail_inventory.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn inventory_calls(&self) -> usize {
        self.inventory_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn adjustments(&self) -> Vec<Vec<InventoryChange>> {
        self.adjustments.lock().clone()
    }
}

#[async_trait]
impl VendorApi for ScriptedVendor {
    async fn list_catalog_page(&self, _cursor: Option<String>) -> Result<CatalogPage, VendorError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CatalogPage {
            items: self.items.clone(),
            cursor: None,
        })
    }

    async fn retrieve_image_url(&self, _image_id: &ImageId) -> Result<Option<String>, VendorError> {
        Ok(None)
    }

    async fn batch_inventory_counts(
        &self,
        _variation_ids: &[VariationId],
    ) -> Result<Vec<InventoryCount>, VendorError> {
        self.inventory_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inventory.load(Ordering::SeqCst) {
            return Err(VendorError::Api {
                status: 503,
                message: "inventory service down".to_string(),
            });
        }
        Ok(self.counts.lock().clone())
    }

    async fn adjust_inventory(
        &self,
        changes: &[InventoryChange],
        _idempotency_key: &str,
    ) -> Result<(), VendorError> {
        self.adjustments.lock().push(changes.to_vec());
        Ok(())
    }
}

/// An apparel item with one variation per `(id, name, cents)` entry.
#[must_use]
pub fn tee(item_id: &str, name: &str, variations: &[(&str, &str, i64)]) -> VendorItem {
    VendorItem {
        id: ItemId::new(item_id),
        name: name.to_string(),
        description: String::new(),
        image_url: None,
        image_ids: Vec::new(),
        variations: variations
            .iter()
            .map(|(id, vname, cents)| VendorVariation {
                id: VariationId::new(*id),
                name: (*vname).to_string(),
                sku: None,
                price_cents: *cents,
                print_location: None,
            })
            .collect(),
    }
}

/// One inventory count row.
#[must_use]
pub fn count(variation_id: &str, quantity: i64) -> InventoryCount {
    InventoryCount {
        variation_id: VariationId::new(variation_id),
        quantity,
    }
}
