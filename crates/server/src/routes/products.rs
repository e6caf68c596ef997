//! Storefront product listing.
//!
//! A read-only projection over the current inventory snapshot: flags
//! attached, hidden and fully out-of-stock items filtered, sorted
//! pin → featured → new → name. Never a snapshot mutation point.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use sugar_plum_core::{
    Audience, CatalogItem, GarmentType, ItemId, ProductFlags, Subcategory, Variation,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Sales channel the listing is rendered for. Each channel has its own
/// hide flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Online,
    Kiosk,
}

impl Channel {
    fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            None | Some("online") => Ok(Self::Online),
            Some("kiosk") => Ok(Self::Kiosk),
            Some(other) => Err(AppError::BadRequest(format!("unknown channel: {other}"))),
        }
    }

    const fn is_hidden(self, flags: &ProductFlags) -> bool {
        match self {
            Self::Online => flags.hide_online,
            Self::Kiosk => flags.hide_kiosk,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub channel: Option<String>,
}

/// One product in the storefront listing.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub garment: GarmentType,
    pub audience: Vec<Audience>,
    pub subcategory: Option<Subcategory>,
    pub image: Option<String>,
    pub variations: Vec<Variation>,
    pub flags: ProductFlags,
}

/// `GET /products` - storefront listing from the current snapshot.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let channel = Channel::parse(query.channel.as_deref())?;
    let snapshot = state.cache().products().await?;

    let mut products: Vec<ProductView> = snapshot
        .items
        .iter()
        .filter(|item| !item.is_out_of_stock())
        .map(|item| decorate(item, state.flags().get(&item.id)))
        .filter(|view| !channel.is_hidden(&view.flags))
        .collect();

    sort_products(&mut products);

    Ok(Json(products))
}

/// Attach flags to a snapshot item.
fn decorate(item: &CatalogItem, flags: ProductFlags) -> ProductView {
    ProductView {
        id: item.id.clone(),
        name: item.name.clone(),
        description: item.description.clone(),
        garment: item.garment,
        audience: item.audience.clone(),
        subcategory: item.subcategory,
        image: item.image_url.clone(),
        variations: item.variations.clone(),
        flags,
    }
}

/// Storefront sort: pinned first, then featured, then new, then name A-Z.
pub fn sort_products(products: &mut [ProductView]) {
    products.sort_by(|a, b| {
        b.flags
            .pin_to_top
            .cmp(&a.flags.pin_to_top)
            .then(b.flags.is_featured.cmp(&a.flags.is_featured))
            .then(b.flags.is_new.cmp(&a.flags.is_new))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn view(name: &str, flags: ProductFlags) -> ProductView {
        ProductView {
            id: ItemId::new(name),
            name: name.to_string(),
            description: String::new(),
            garment: GarmentType::TShirt,
            audience: Vec::new(),
            subcategory: None,
            image: None,
            variations: Vec::new(),
            flags,
        }
    }

    fn flags(pin: bool, featured: bool, new: bool) -> ProductFlags {
        ProductFlags {
            pin_to_top: pin,
            is_featured: featured,
            is_new: new,
            ..ProductFlags::default()
        }
    }

    #[test]
    fn test_sort_pin_featured_new_then_name() {
        let mut products = vec![
            view("zebra tee", flags(false, false, false)),
            view("apple tee", flags(false, false, false)),
            view("new tee", flags(false, false, true)),
            view("featured tee", flags(false, true, false)),
            view("pinned tee", flags(true, false, false)),
        ];

        sort_products(&mut products);

        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "pinned tee",
                "featured tee",
                "new tee",
                "apple tee",
                "zebra tee"
            ]
        );
    }

    #[test]
    fn test_sort_name_is_case_insensitive() {
        let mut products = vec![
            view("banana Tee", ProductFlags::default()),
            view("Apple Tee", ProductFlags::default()),
        ];

        sort_products(&mut products);
        assert_eq!(products[0].name, "Apple Tee");
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(Channel::parse(None).unwrap(), Channel::Online);
        assert_eq!(Channel::parse(Some("kiosk")).unwrap(), Channel::Kiosk);
        assert!(Channel::parse(Some("mail-order")).is_err());
    }

    #[test]
    fn test_channel_hide_flags_are_independent() {
        let hidden_online = ProductFlags {
            hide_online: true,
            ..ProductFlags::default()
        };
        assert!(Channel::Online.is_hidden(&hidden_online));
        assert!(!Channel::Kiosk.is_hidden(&hidden_online));
    }
}
