//! Catalog domain model: items, variations, and classification enums.
//!
//! A [`CatalogItem`] is one sellable product definition, independent of
//! stock level. Its [`Variation`]s are the purchasable SKU-like units the
//! vendor tracks inventory against. Classification fields (garment type,
//! audience, subcategory) are derived from free-text vendor data by the
//! server's classifier; this crate only defines their shapes.

use serde::{Deserialize, Serialize};

use crate::types::id::{ItemId, VariationId};
use crate::types::price::Price;

// =============================================================================
// Classification Enums
// =============================================================================

/// Garment type derived from an item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GarmentType {
    #[serde(rename = "T-Shirt")]
    #[default]
    TShirt,
    Hoodie,
    Sweatshirt,
    #[serde(rename = "Long Sleeve")]
    LongSleeve,
    Tank,
}

impl GarmentType {
    /// Display label, matching the wire representation.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TShirt => "T-Shirt",
            Self::Hoodie => "Hoodie",
            Self::Sweatshirt => "Sweatshirt",
            Self::LongSleeve => "Long Sleeve",
            Self::Tank => "Tank",
        }
    }
}

impl std::fmt::Display for GarmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Target audience for an item. An item may match several audiences, or
/// none at all (clients may present "no audience" as Men/Unisex; that is
/// a presentation rule, not enforced here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    #[serde(rename = "Men/Unisex")]
    MenUnisex,
    Women,
    Kids,
}

impl Audience {
    /// Display label, matching the wire representation.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MenUnisex => "Men/Unisex",
            Self::Women => "Women",
            Self::Kids => "Kids",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Theme subcategory derived from item name + description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subcategory {
    Christmas,
    Thanksgiving,
    Halloween,
    Valentine,
    Easter,
    Patriotic,
    Faith,
    Animals,
    #[serde(rename = "Hunting & Fishing")]
    HuntingFishing,
    Sports,
    #[serde(rename = "Humor / Trendy")]
    HumorTrendy,
}

impl Subcategory {
    /// Display label, matching the wire representation.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Christmas => "Christmas",
            Self::Thanksgiving => "Thanksgiving",
            Self::Halloween => "Halloween",
            Self::Valentine => "Valentine",
            Self::Easter => "Easter",
            Self::Patriotic => "Patriotic",
            Self::Faith => "Faith",
            Self::Animals => "Animals",
            Self::HuntingFishing => "Hunting & Fishing",
            Self::Sports => "Sports",
            Self::HumorTrendy => "Humor / Trendy",
        }
    }
}

impl std::fmt::Display for Subcategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Variation
// =============================================================================

/// One purchasable unit within a [`CatalogItem`].
///
/// The variation ID is the join key to inventory counts and the checkout
/// line-item reference. `quantity` is `None` until an inventory snapshot
/// has been built; it is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// Vendor variation ID (stable across refreshes).
    pub id: VariationId,
    /// Raw variation name from the vendor (e.g., "Hot Pink, Large").
    pub name: String,
    /// Parsed size in canonical short form ("S"/"M"/"L") or the raw size
    /// token ("Youth X-Small").
    pub size: Option<String>,
    /// Parsed color, free text.
    pub color: Option<String>,
    /// Vendor SKU, when one is assigned (used for barcode counting).
    pub sku: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Optional print-location tag (e.g., "front", "back").
    pub print_location: Option<String>,
    /// Quantity on hand. `None` = unknown (no inventory build yet).
    pub quantity: Option<u32>,
}

impl Variation {
    /// Case-insensitive match on parsed color and size.
    ///
    /// Used as the fallback resolution when a checkout line or inventory
    /// delta does not carry a variation ID.
    #[must_use]
    pub fn matches_color_size(&self, color: &str, size: &str) -> bool {
        let color_matches = self
            .color
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(color));
        let size_matches = self
            .size
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(size));
        color_matches && size_matches
    }
}

// =============================================================================
// CatalogItem
// =============================================================================

/// One sellable product definition, independent of stock level.
///
/// Invariant: the variation list is non-empty. Items with zero variations
/// are excluded during classification and never become a `CatalogItem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Vendor item ID (stable across refreshes).
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Display description (may be empty).
    pub description: String,
    /// Resolved image URL, when the item has one.
    pub image_url: Option<String>,
    /// Derived garment type.
    pub garment: GarmentType,
    /// Derived audiences (may be empty or multi-valued).
    pub audience: Vec<Audience>,
    /// Derived theme subcategory, when one matched.
    pub subcategory: Option<Subcategory>,
    /// Ordered purchasable variations (non-empty).
    pub variations: Vec<Variation>,
}

impl CatalogItem {
    /// Look up a variation by ID.
    #[must_use]
    pub fn variation(&self, id: &VariationId) -> Option<&Variation> {
        self.variations.iter().find(|v| &v.id == id)
    }

    /// Look up a variation by case-insensitive color + size.
    #[must_use]
    pub fn variation_by_color_size(&self, color: &str, size: &str) -> Option<&Variation> {
        self.variations
            .iter()
            .find(|v| v.matches_color_size(color, size))
    }

    /// Total quantity on hand across all variations (unknown counts as 0).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.variations
            .iter()
            .map(|v| v.quantity.unwrap_or(0))
            .sum()
    }

    /// Whether every variation is at zero (or unknown) stock.
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.total_quantity() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::price::CurrencyCode;

    fn variation(id: &str, color: Option<&str>, size: Option<&str>, qty: Option<u32>) -> Variation {
        Variation {
            id: VariationId::new(id),
            name: format!("{} / {}", color.unwrap_or(""), size.unwrap_or("")),
            size: size.map(String::from),
            color: color.map(String::from),
            sku: None,
            price: Price::from_cents(2200, CurrencyCode::USD),
            print_location: None,
            quantity: qty,
        }
    }

    fn item(variations: Vec<Variation>) -> CatalogItem {
        CatalogItem {
            id: ItemId::new("I1"),
            name: "Mama Bear Tee".to_string(),
            description: String::new(),
            image_url: None,
            garment: GarmentType::TShirt,
            audience: vec![Audience::Women],
            subcategory: None,
            variations,
        }
    }

    #[test]
    fn test_garment_type_wire_labels() {
        assert_eq!(
            serde_json::to_string(&GarmentType::LongSleeve).unwrap(),
            "\"Long Sleeve\""
        );
        assert_eq!(
            serde_json::to_string(&GarmentType::TShirt).unwrap(),
            "\"T-Shirt\""
        );
        assert_eq!(GarmentType::Hoodie.to_string(), "Hoodie");
    }

    #[test]
    fn test_subcategory_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Subcategory::HuntingFishing).unwrap(),
            "\"Hunting & Fishing\""
        );
        assert_eq!(
            serde_json::to_string(&Subcategory::HumorTrendy).unwrap(),
            "\"Humor / Trendy\""
        );
    }

    #[test]
    fn test_variation_color_size_match_is_case_insensitive() {
        let v = variation("V1", Some("Hot Pink"), Some("Youth X-Small"), None);
        assert!(v.matches_color_size("hot pink", "YOUTH X-SMALL"));
        assert!(!v.matches_color_size("pink", "Youth X-Small"));
    }

    #[test]
    fn test_variation_lookup_by_id_and_fallback() {
        let item = item(vec![
            variation("V1", Some("Black"), Some("M"), Some(2)),
            variation("V2", Some("Black"), Some("L"), Some(0)),
        ]);

        assert_eq!(
            item.variation(&VariationId::new("V2")).unwrap().size,
            Some("L".to_string())
        );
        assert_eq!(
            item.variation_by_color_size("black", "m").unwrap().id,
            VariationId::new("V1")
        );
        assert!(item.variation_by_color_size("black", "xl").is_none());
    }

    #[test]
    fn test_total_quantity_treats_unknown_as_zero() {
        let item = item(vec![
            variation("V1", Some("Black"), Some("M"), Some(3)),
            variation("V2", Some("Black"), Some("L"), None),
        ]);
        assert_eq!(item.total_quantity(), 3);
        assert!(!item.is_out_of_stock());

        let empty = item_with_zero();
        assert!(empty.is_out_of_stock());
    }

    fn item_with_zero() -> CatalogItem {
        item(vec![variation("V1", Some("Black"), Some("M"), Some(0))])
    }
}
