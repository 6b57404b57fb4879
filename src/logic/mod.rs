// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Validation logic for attribute definitions and product attribute values.

pub mod attribute_set;
pub mod definition;
pub mod product;
pub mod value;

pub use attribute_set::{AttributeSetRequest, apply_attribute_set};
pub use definition::validate_definition;
pub use product::{
    check_attribute_references, create_product, validate_product_attributes,
    validate_product_attributes_with,
};
pub use value::validate_value;
