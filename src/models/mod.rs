// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: catalogue data types shared by the validation logic and the CLI.

pub mod attribute;
pub mod error_tree;
pub mod product;
pub mod subcategory;

pub use attribute::{AttributeDefinition, AttributeKind, AttributeType};
pub use error_tree::ErrorTree;
pub use product::{AttributeValue, Product, ProductAttributeInputs, ProductDraft};
pub use subcategory::Subcategory;
