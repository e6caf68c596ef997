//! Admin API: product listing with flags, flag edits, barcode counting
//! support, inventory delta application, and manual cache sync.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sugar_plum_core::{
    FlagsUpdate, GarmentType, ItemId, ProductFlags, Subcategory, Variation,
};
use tracing::instrument;

use crate::cache::{DeltaOutcome, InventoryUpdate};
use crate::error::{AppError, Result};
use crate::state::AppState;

// =============================================================================
// Product listing + flags
// =============================================================================

/// One row in the admin product table.
#[derive(Debug, Serialize)]
pub struct AdminProductView {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub garment: GarmentType,
    pub subcategory: Option<Subcategory>,
    pub total_inventory: u32,
    pub flags: ProductFlags,
}

/// `GET /admin/products` - every in-domain item with flags and total
/// inventory, sorted by name. Nothing is hidden here; the admin sees the
/// full snapshot.
#[instrument(skip(state))]
pub async fn list_admin_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminProductView>>> {
    let snapshot = state.cache().products().await?;

    let mut products: Vec<AdminProductView> = snapshot
        .items
        .iter()
        .map(|item| AdminProductView {
            id: item.id.clone(),
            name: item.name.clone(),
            garment: item.garment,
            subcategory: item.subcategory,
            total_inventory: item.total_quantity(),
            flags: state.flags().get(&item.id),
        })
        .collect();

    products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct FlagsEdit {
    pub id: ItemId,
    #[serde(default)]
    pub flags: FlagsUpdate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlagsRequest {
    pub products: Option<Vec<FlagsEdit>>,
}

/// `PUT /admin/products` - merge flag edits. Each edit is applied
/// field-wise on top of the stored flags; items edited for the first time
/// start from defaults.
#[instrument(skip(state, request))]
pub async fn update_product_flags(
    State(state): State<AppState>,
    Json(request): Json<UpdateFlagsRequest>,
) -> Result<Json<Value>> {
    let edits = request
        .products
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("request body must include a products array".to_string())
        })?;

    let updates: Vec<(ItemId, FlagsUpdate)> =
        edits.into_iter().map(|e| (e.id, e.flags)).collect();
    state.flags().merge(&updates)?;

    Ok(Json(json!({ "ok": true, "updated": updates.len() })))
}

// =============================================================================
// Barcode counting
// =============================================================================

/// One product in the barcode/counting view: every variation with its SKU
/// and current quantity, nothing filtered.
#[derive(Debug, Serialize)]
pub struct BarcodeProductView {
    pub id: ItemId,
    pub name: String,
    pub subcategory: Option<Subcategory>,
    pub variations: Vec<Variation>,
}

/// `GET /admin/barcode-products` - counting-oriented projection for the
/// scan UI.
#[instrument(skip(state))]
pub async fn list_barcode_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<BarcodeProductView>>> {
    let snapshot = state.cache().products().await?;

    let mut products: Vec<BarcodeProductView> = snapshot
        .items
        .iter()
        .map(|item| BarcodeProductView {
            id: item.id.clone(),
            name: item.name.clone(),
            subcategory: item.subcategory,
            variations: item.variations.clone(),
        })
        .collect();

    products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(Json(products))
}

// =============================================================================
// Inventory deltas
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ApplyInventoryRequest {
    #[serde(default)]
    pub updates: Vec<InventoryUpdate>,
}

#[derive(Debug, Serialize)]
pub struct ApplyInventoryResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: DeltaOutcome,
}

/// `POST /admin/apply-inventory-count` - forward counted deltas to the
/// vendor, then refresh the inventory snapshot so subsequent reads see
/// the new counts (the applier itself never refreshes).
#[instrument(skip(state, request), fields(updates = request.updates.len()))]
pub async fn apply_inventory_count(
    State(state): State<AppState>,
    Json(request): Json<ApplyInventoryRequest>,
) -> Result<Json<ApplyInventoryResponse>> {
    let outcome = state.cache().apply_deltas(&request.updates).await?;

    if !outcome.applied.is_empty() {
        state.cache().refresh_inventory().await?;
    }

    Ok(Json(ApplyInventoryResponse { ok: true, outcome }))
}

// =============================================================================
// Manual sync
// =============================================================================

/// `POST /admin/sync/catalog` - full synchronous catalog + inventory
/// rebuild (the admin "sync" button).
#[instrument(skip(state))]
pub async fn sync_catalog(State(state): State<AppState>) -> Result<Json<Value>> {
    let items = state.cache().refresh_catalog().await?;
    state.cache().refresh_inventory().await?;
    Ok(Json(json!({ "ok": true, "items": items })))
}

/// `POST /admin/sync/inventory` - synchronous inventory-only rebuild.
#[instrument(skip(state))]
pub async fn sync_inventory(State(state): State<AppState>) -> Result<Json<Value>> {
    let items = state.cache().refresh_inventory().await?;
    Ok(Json(json!({ "ok": true, "items": items })))
}
