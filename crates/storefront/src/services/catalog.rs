//! Catalog service.
//!
//! Read-only access to products and their variants.

use sqlx::SqlitePool;
use thiserror::Error;

use coolcat_core::VariantId;

use crate::db::RepositoryError;
use crate::db::catalog::CatalogRepository;
use crate::models::catalog::{Product, VariantDetail};

/// Errors that can occur while reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No variant with this ID.
    #[error("variant {0} not found")]
    VariantNotFound(VariantId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service.
pub struct CatalogService<'a> {
    catalog: CatalogRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool),
        }
    }

    /// All products with their variants, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the catalog cannot be read.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.catalog.list_products().await?)
    }

    /// One variant with its product details.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::VariantNotFound` if the variant doesn't exist.
    pub async fn get_variant(&self, id: VariantId) -> Result<VariantDetail, CatalogError> {
        self.catalog
            .get_variant(id)
            .await?
            .ok_or(CatalogError::VariantNotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_empty_catalog() {
        let pool = create_memory_pool().await.unwrap();
        let catalog = CatalogService::new(&pool);

        assert!(catalog.list_products().await.unwrap().is_empty());
        assert!(matches!(
            catalog.get_variant(VariantId::new(1)).await,
            Err(CatalogError::VariantNotFound(id)) if id == VariantId::new(1)
        ));
    }
}
