//! Catalog repository: categories, products and variants.
//!
//! The storefront only reads the catalog; the write methods exist for
//! seeding and operational tooling.

use sqlx::SqlitePool;

use coolcat_core::{CategoryId, Price, ProductId, VariantId};

use super::RepositoryError;
use crate::models::catalog::{NewProduct, NewVariant, Product, Variant, VariantDetail};

/// One product joined with at most one of its variants.
#[derive(sqlx::FromRow)]
struct ProductVariantRow {
    product_id: ProductId,
    product_name: String,
    description: String,
    category: Option<String>,
    variant_id: Option<VariantId>,
    variant_name: Option<String>,
    unit_price: Option<Price>,
    available_quantity: Option<i64>,
    image: Option<String>,
}

/// A variant joined with its product and category.
///
/// Also embedded in cart rows via `#[sqlx(flatten)]`.
#[derive(sqlx::FromRow)]
pub(crate) struct VariantDetailRow {
    variant_id: VariantId,
    product_id: ProductId,
    product_name: String,
    variant_name: Option<String>,
    description: String,
    category: Option<String>,
    unit_price: Price,
    available_quantity: i64,
    image: Option<String>,
}

impl From<VariantDetailRow> for VariantDetail {
    fn from(row: VariantDetailRow) -> Self {
        let name = Self::display_name(&row.product_name, row.variant_name.as_deref());
        Self {
            id: row.variant_id,
            product_id: row.product_id,
            product_name: row.product_name,
            variant_name: row.variant_name,
            name,
            description: row.description,
            category: row.category,
            unit_price: row.unit_price,
            available_quantity: row.available_quantity,
            image: row.image,
        }
    }
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every product with its variants, both ordered by id.
    ///
    /// Products without variants are included with an empty variant list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a variant row is incomplete.
    pub async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductVariantRow>(
            r"
            SELECT p.id AS product_id, p.name AS product_name, p.description,
                   c.label AS category,
                   v.id AS variant_id, v.name AS variant_name,
                   v.unit_price_cents AS unit_price, v.available_quantity, v.image
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN product_variants v ON v.product_id = p.id
            ORDER BY p.id, v.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut products: Vec<Product> = Vec::new();
        for row in rows {
            if products.last().is_none_or(|p| p.id != row.product_id) {
                products.push(Product {
                    id: row.product_id,
                    name: row.product_name,
                    description: row.description,
                    category: row.category,
                    variants: Vec::new(),
                });
            }

            let Some(variant_id) = row.variant_id else {
                continue;
            };
            let (Some(unit_price), Some(available_quantity)) =
                (row.unit_price, row.available_quantity)
            else {
                return Err(RepositoryError::DataCorruption(format!(
                    "variant {variant_id} is missing price or quantity"
                )));
            };

            if let Some(product) = products.last_mut() {
                product.variants.push(Variant {
                    id: variant_id,
                    name: row.variant_name,
                    unit_price,
                    available_quantity,
                    image: row.image,
                });
            }
        }

        Ok(products)
    }

    /// Get one variant with its product details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_variant(
        &self,
        id: VariantId,
    ) -> Result<Option<VariantDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantDetailRow>(
            r"
            SELECT v.id AS variant_id, v.product_id, p.name AS product_name,
                   v.name AS variant_name, p.description, c.label AS category,
                   v.unit_price_cents AS unit_price, v.available_quantity, v.image
            FROM product_variants v
            JOIN products p ON p.id = v.product_id
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE v.id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(VariantDetail::from))
    }

    /// Look up a category by its label.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_by_label(
        &self,
        label: &str,
    ) -> Result<Option<CategoryId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CategoryId>("SELECT id FROM categories WHERE label = ?")
            .bind(label)
            .fetch_optional(self.pool)
            .await?;

        Ok(id)
    }

    /// Insert a product, or refresh the existing product with the same name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert_product(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            r"
            INSERT INTO products (name, description, category_id)
            VALUES (?, ?, ?)
            ON CONFLICT (name) DO UPDATE
            SET description = excluded.description,
                category_id = excluded.category_id
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Insert a variant, or refresh the product's existing variant with the same name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert_variant(
        &self,
        product_id: ProductId,
        variant: &NewVariant,
    ) -> Result<VariantId, RepositoryError> {
        let id = sqlx::query_scalar::<_, VariantId>(
            r"
            INSERT INTO product_variants
                (product_id, name, unit_price_cents, available_quantity, image)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (product_id, name) DO UPDATE
            SET unit_price_cents = excluded.unit_price_cents,
                available_quantity = excluded.available_quantity,
                image = excluded.image
            RETURNING id
            ",
        )
        .bind(product_id)
        .bind(&variant.name)
        .bind(variant.unit_price)
        .bind(variant.available_quantity)
        .bind(&variant.image)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Change a variant's current unit price.
    ///
    /// Placed orders keep the price they captured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn set_unit_price(&self, id: VariantId, price: Price) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE product_variants SET unit_price_cents = ? WHERE id = ?")
            .bind(price)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
