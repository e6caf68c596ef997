//! Per-item administrative flags.
//!
//! Flags are admin overrides layered on top of the vendor catalog: they
//! control storefront visibility, pinning, and ribbon presentation. They
//! are keyed by item ID and persisted independently of the product cache,
//! so a catalog refresh never loses them.

use serde::{Deserialize, Serialize};

/// Ribbon style shown on a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RibbonType {
    #[default]
    None,
    New,
    Featured,
    Custom,
}

/// Administrative overrides for one catalog item.
///
/// Created on first admin edit, merged (never replaced) on subsequent
/// edits, never auto-expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFlags {
    pub is_new: bool,
    pub is_featured: bool,
    pub pin_to_top: bool,
    pub hide_online: bool,
    pub hide_kiosk: bool,
    pub ribbon_type: RibbonType,
    pub ribbon_custom_text: String,
}

impl ProductFlags {
    /// Apply a partial update, leaving unspecified fields untouched.
    pub fn merge(&mut self, update: &FlagsUpdate) {
        if let Some(v) = update.is_new {
            self.is_new = v;
        }
        if let Some(v) = update.is_featured {
            self.is_featured = v;
        }
        if let Some(v) = update.pin_to_top {
            self.pin_to_top = v;
        }
        if let Some(v) = update.hide_online {
            self.hide_online = v;
        }
        if let Some(v) = update.hide_kiosk {
            self.hide_kiosk = v;
        }
        if let Some(v) = &update.ribbon_type {
            self.ribbon_type = v.clone();
        }
        if let Some(v) = &update.ribbon_custom_text {
            self.ribbon_custom_text = v.clone();
        }
    }
}

/// Partial flags edit from the admin UI. Absent fields are left as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FlagsUpdate {
    pub is_new: Option<bool>,
    pub is_featured: Option<bool>,
    pub pin_to_top: Option<bool>,
    pub hide_online: Option<bool>,
    pub hide_kiosk: Option<bool>,
    pub ribbon_type: Option<RibbonType>,
    pub ribbon_custom_text: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let flags = ProductFlags::default();
        assert!(!flags.is_new);
        assert!(!flags.hide_online);
        assert_eq!(flags.ribbon_type, RibbonType::None);
        assert_eq!(flags.ribbon_custom_text, "");
    }

    #[test]
    fn test_merge_preserves_unspecified_fields() {
        let mut flags = ProductFlags {
            is_featured: true,
            ribbon_type: RibbonType::Featured,
            ..ProductFlags::default()
        };

        flags.merge(&FlagsUpdate {
            pin_to_top: Some(true),
            ..FlagsUpdate::default()
        });

        assert!(flags.pin_to_top);
        assert!(flags.is_featured);
        assert_eq!(flags.ribbon_type, RibbonType::Featured);
    }

    #[test]
    fn test_merge_overrides_specified_fields() {
        let mut flags = ProductFlags {
            is_new: true,
            ..ProductFlags::default()
        };

        flags.merge(&FlagsUpdate {
            is_new: Some(false),
            ribbon_type: Some(RibbonType::Custom),
            ribbon_custom_text: Some("Last chance!".to_string()),
            ..FlagsUpdate::default()
        });

        assert!(!flags.is_new);
        assert_eq!(flags.ribbon_type, RibbonType::Custom);
        assert_eq!(flags.ribbon_custom_text, "Last chance!");
    }

    #[test]
    fn test_flags_wire_format_is_camel_case() {
        let flags = ProductFlags {
            pin_to_top: true,
            ..ProductFlags::default()
        };
        let json = serde_json::to_string(&flags).unwrap();
        assert!(json.contains("\"pinToTop\":true"));
        assert!(json.contains("\"ribbonType\":\"none\""));
    }

    #[test]
    fn test_partial_update_deserializes_with_absent_fields() {
        let update: FlagsUpdate = serde_json::from_str(r#"{"isFeatured":true}"#).unwrap();
        assert_eq!(update.is_featured, Some(true));
        assert_eq!(update.is_new, None);
        assert_eq!(update.ribbon_type, None);
    }
}
