//! Catalog domain types.

use serde::Serialize;

use coolcat_core::{CategoryId, Price, ProductId, VariantId};

/// A product with its category label and purchasable variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Category label, e.g. "Shirt".
    pub category: Option<String>,
    /// Variants ordered by id. May be empty.
    pub variants: Vec<Variant>,
}

/// One purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub id: VariantId,
    /// Variant label, e.g. a colour.
    pub name: Option<String>,
    pub unit_price: Price,
    pub available_quantity: i64,
    /// Image path relative to the static root.
    pub image: Option<String>,
}

/// A variant joined with its product, as shown in carts and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDetail {
    pub id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub variant_name: Option<String>,
    /// `"<product> - <variant>"`, or just the product name.
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub unit_price: Price,
    pub available_quantity: i64,
    pub image: Option<String>,
}

impl VariantDetail {
    /// Build the display name shown for a variant.
    #[must_use]
    pub fn display_name(product_name: &str, variant_name: Option<&str>) -> String {
        match variant_name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(variant) => format!("{product_name} - {variant}"),
            None => product_name.to_owned(),
        }
    }
}

/// Input for creating or refreshing a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
}

/// Input for creating or refreshing a variant.
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub name: String,
    pub unit_price: Price,
    pub available_quantity: i64,
    pub image: Option<String>,
}
