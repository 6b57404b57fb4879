// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Typed attribute engine for a product catalogue.
//!
//! Subcategories declare typed attributes ([`models::AttributeDefinition`]);
//! products supply values that are validated against those definitions
//! ([`logic::validate_product_attributes`]). All validators report failures
//! as a nested [`models::ErrorTree`] keyed by field path.

pub mod app;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod utils;

pub use config::{Config, Limits};
pub use error::CatalogError;
