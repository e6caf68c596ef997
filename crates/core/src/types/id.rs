//! Newtype IDs for type-safe entity references.
//!
//! Vendor-assigned identifiers are opaque strings that stay stable across
//! catalog refreshes. Use the `define_id!` macro to create type-safe
//! wrappers that prevent accidentally mixing IDs from different entity
//! types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use sugar_plum_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget_id = WidgetId::new("W1");
/// let gadget_id = GadgetId::new("W1");
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

// Define standard entity IDs
define_id!(ItemId);
define_id!(VariationId);
define_id!(ImageId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = ItemId::new("ABC123");
        assert_eq!(id.as_str(), "ABC123");
        assert_eq!(id.to_string(), "ABC123");
        assert_eq!(id.clone().into_inner(), "ABC123");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = VariationId::new("V42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"V42\"");

        let back: VariationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_hash_equality() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(VariationId::new("V1"), 3u32);
        assert_eq!(map.get(&VariationId::new("V1")), Some(&3));
        assert_eq!(map.get(&VariationId::new("V2")), None);
    }
}
