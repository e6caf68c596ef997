//! Sugar Plum Core - Shared types library.
//!
//! This crate provides common types used across all Sugar Plum components:
//! - `server` - Backend binary (storefront read API + admin API)
//! - `integration-tests` - Cross-crate behavioral tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no vendor access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog/variation models, product flags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
