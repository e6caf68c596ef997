//! In-memory vendor fake for cache tests: scripted catalog pages and
//! count rows, call counters, and switchable failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sugar_plum_core::{ImageId, ItemId, VariationId};

use crate::vendor::{
    CatalogPage, InventoryChange, InventoryCount, VendorApi, VendorError, VendorItem,
    VendorVariation,
};

pub struct FakeVendor {
    items: Vec<VendorItem>,
    counts: Mutex<Vec<InventoryCount>>,
    image_urls: HashMap<ImageId, String>,
    page_size: usize,
    inventory_delay: Duration,
    fail_catalog: AtomicBool,
    fail_inventory: AtomicBool,
    fail_images: AtomicBool,
    fail_adjust: AtomicBool,
    catalog_page_calls: AtomicUsize,
    inventory_calls: AtomicUsize,
    adjustments: Mutex<Vec<(Vec<InventoryChange>, String)>>,
}

impl FakeVendor {
    pub fn new(items: Vec<VendorItem>, counts: Vec<InventoryCount>) -> Self {
        Self {
            items,
            counts: Mutex::new(counts),
            image_urls: HashMap::new(),
            page_size: usize::MAX,
            inventory_delay: Duration::ZERO,
            fail_catalog: AtomicBool::new(false),
            fail_inventory: AtomicBool::new(false),
            fail_images: AtomicBool::new(false),
            fail_adjust: AtomicBool::new(false),
            catalog_page_calls: AtomicUsize::new(0),
            inventory_calls: AtomicUsize::new(0),
            adjustments: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_inventory_delay(mut self, delay: Duration) -> Self {
        self.inventory_delay = delay;
        self
    }

    pub fn with_image(mut self, image_id: &str, url: &str) -> Self {
        self.image_urls
            .insert(ImageId::new(image_id), url.to_string());
        self
    }

    pub fn fail_catalog(&self, fail: bool) {
        self.fail_catalog.store(fail, Ordering::SeqCst);
    }

    pub fn fail_inventory(&self, fail: bool) {
        self.fail_inventory.store(fail, Ordering::SeqCst);
    }

    pub fn fail_images(&self, fail: bool) {
        self.fail_images.store(fail, Ordering::SeqCst);
    }

    pub fn fail_adjust(&self, fail: bool) {
        self.fail_adjust.store(fail, Ordering::SeqCst);
    }

    pub fn set_counts(&self, counts: Vec<InventoryCount>) {
        *self.counts.lock() = counts;
    }

    pub fn catalog_page_calls(&self) -> usize {
        self.catalog_page_calls.load(Ordering::SeqCst)
    }

    pub fn inventory_calls(&self) -> usize {
        self.inventory_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_adjustments(&self) -> Vec<(Vec<InventoryChange>, String)> {
        self.adjustments.lock().clone()
    }

    fn api_error(message: &str) -> VendorError {
        VendorError::Api {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl VendorApi for FakeVendor {
    async fn list_catalog_page(&self, cursor: Option<String>) -> Result<CatalogPage, VendorError> {
        self.catalog_page_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(Self::api_error("catalog unavailable"));
        }

        let start = cursor
            .as_deref()
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0);
        let end = (start + self.page_size.max(1)).min(self.items.len());

        let items = self
            .items
            .get(start..end)
            .map(<[VendorItem]>::to_vec)
            .unwrap_or_default();
        let cursor = (end < self.items.len()).then(|| end.to_string());

        Ok(CatalogPage { items, cursor })
    }

    async fn retrieve_image_url(&self, image_id: &ImageId) -> Result<Option<String>, VendorError> {
        if self.fail_images.load(Ordering::SeqCst) {
            return Err(Self::api_error("image service unavailable"));
        }
        Ok(self.image_urls.get(image_id).cloned())
    }

    async fn batch_inventory_counts(
        &self,
        _variation_ids: &[VariationId],
    ) -> Result<Vec<InventoryCount>, VendorError> {
        if !self.inventory_delay.is_zero() {
            tokio::time::sleep(self.inventory_delay).await;
        }

        self.inventory_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_inventory.load(Ordering::SeqCst) {
            return Err(Self::api_error("inventory unavailable"));
        }

        Ok(self.counts.lock().clone())
    }

    async fn adjust_inventory(
        &self,
        changes: &[InventoryChange],
        idempotency_key: &str,
    ) -> Result<(), VendorError> {
        if self.fail_adjust.load(Ordering::SeqCst) {
            return Err(Self::api_error("adjustment rejected"));
        }

        self.adjustments
            .lock()
            .push((changes.to_vec(), idempotency_key.to_string()));
        Ok(())
    }
}

// =============================================================================
// Item builders
// =============================================================================

pub fn apparel_item(id: &str, name: &str, variations: &[(&str, &str, i64)]) -> VendorItem {
    VendorItem {
        id: ItemId::new(id),
        name: name.to_string(),
        description: String::new(),
        image_url: None,
        image_ids: Vec::new(),
        variations: variations
            .iter()
            .map(|(vid, vname, cents)| VendorVariation {
                id: VariationId::new(*vid),
                name: (*vname).to_string(),
                sku: None,
                price_cents: *cents,
                print_location: None,
            })
            .collect(),
    }
}

pub fn apparel_item_with_sku(
    id: &str,
    name: &str,
    variations: &[(&str, &str, &str, i64)],
) -> VendorItem {
    VendorItem {
        id: ItemId::new(id),
        name: name.to_string(),
        description: String::new(),
        image_url: None,
        image_ids: Vec::new(),
        variations: variations
            .iter()
            .map(|(vid, sku, vname, cents)| VendorVariation {
                id: VariationId::new(*vid),
                name: (*vname).to_string(),
                sku: Some((*sku).to_string()),
                price_cents: *cents,
                print_location: None,
            })
            .collect(),
    }
}

pub fn apparel_item_with_image(
    id: &str,
    name: &str,
    image_id: &str,
    variations: &[(&str, &str, i64)],
) -> VendorItem {
    let mut item = apparel_item(id, name, variations);
    item.image_ids = vec![ImageId::new(image_id)];
    item
}

pub fn mug_item(id: &str) -> VendorItem {
    VendorItem {
        id: ItemId::new(id),
        name: "Coffee Mug".to_string(),
        description: String::new(),
        image_url: None,
        image_ids: Vec::new(),
        variations: vec![VendorVariation {
            id: VariationId::new(format!("{id}-V1")),
            name: "11oz".to_string(),
            sku: None,
            price_cents: 1500,
            print_location: None,
        }],
    }
}

pub fn no_variation_item(id: &str) -> VendorItem {
    VendorItem {
        id: ItemId::new(id),
        name: "Empty Tee".to_string(),
        description: String::new(),
        image_url: None,
        image_ids: Vec::new(),
        variations: Vec::new(),
    }
}

pub fn count(variation_id: &str, quantity: i64) -> InventoryCount {
    InventoryCount {
        variation_id: VariationId::new(variation_id),
        quantity,
    }
}
