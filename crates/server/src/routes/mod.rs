//! Route handlers for the storefront read API and the admin API.

pub mod admin;
pub mod checkout;
pub mod products;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/checkout/validate", post(checkout::validate_checkout))
        .route(
            "/admin/products",
            get(admin::list_admin_products).put(admin::update_product_flags),
        )
        .route("/admin/barcode-products", get(admin::list_barcode_products))
        .route(
            "/admin/apply-inventory-count",
            post(admin::apply_inventory_count),
        )
        .route("/admin/sync/catalog", post(admin::sync_catalog))
        .route("/admin/sync/inventory", post(admin::sync_inventory))
}
