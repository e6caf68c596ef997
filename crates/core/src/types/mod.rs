//! Core types for Sugar Plum.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod flags;
pub mod id;
pub mod price;

pub use catalog::{Audience, CatalogItem, GarmentType, Subcategory, Variation};
pub use flags::{FlagsUpdate, ProductFlags, RibbonType};
pub use id::*;
pub use price::{CurrencyCode, Price};
