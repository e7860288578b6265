//! Seed the catalog with the sample tee shirts.
//!
//! Seeding is idempotent: products are matched by name and variants by
//! product and colour, so re-running refreshes prices, stock and images
//! instead of duplicating rows.

use sqlx::SqlitePool;
use tracing::info;

use coolcat_core::Price;
use coolcat_storefront::db::{CatalogRepository, RepositoryError};
use coolcat_storefront::models::{NewProduct, NewVariant};

use super::{CommandError, connect};

/// Category every sample product belongs to.
const CATEGORY: &str = "Shirt";

/// Colours each tee comes in.
const COLOURS: [&str; 4] = ["Black", "White", "Red", "Blue"];

/// Starting stock for every variant.
const AVAILABLE_QUANTITY: i64 = 5;

struct SampleTee {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    /// Image file prefix under `static/product_images/`.
    image_prefix: &'static str,
}

const SAMPLE_TEES: [SampleTee; 3] = [
    SampleTee {
        name: "Cool Cat Poker",
        description: "Because only the coolest cats play poker.",
        price_cents: 2599,
        image_prefix: "poker",
    },
    SampleTee {
        name: "A Cat Named Slickback",
        description: "A doggy bag is 90 bucks, a tee shirt is 30.",
        price_cents: 2999,
        image_prefix: "cns",
    },
    SampleTee {
        name: "Cool Cat Cash",
        description: "Just a baker kneading his dough.",
        price_cents: 2999,
        image_prefix: "money",
    },
];

/// Result of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub products: usize,
    pub variants: usize,
}

/// Seed the sample catalog into the configured database.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be reached or a write fails.
pub async fn catalog() -> Result<(), CommandError> {
    let pool = connect().await?;

    info!("Seeding sample catalog");
    let result = seed_catalog(&pool).await?;

    info!("Seeding complete!");
    info!("  Products upserted: {}", result.products);
    info!("  Variants upserted: {}", result.variants);
    Ok(())
}

async fn seed_catalog(pool: &SqlitePool) -> Result<SeedResult, CommandError> {
    let catalog = CatalogRepository::new(pool);
    let category_id = catalog.category_by_label(CATEGORY).await?;
    if category_id.is_none() {
        tracing::warn!(category = CATEGORY, "Category missing, seeding without one");
    }

    let mut result = SeedResult::default();
    for tee in &SAMPLE_TEES {
        let product_id = catalog
            .upsert_product(&NewProduct {
                name: tee.name.to_string(),
                description: tee.description.to_string(),
                category_id,
            })
            .await?;
        result.products += 1;

        let unit_price = Price::from_cents(tee.price_cents)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        for colour in COLOURS {
            catalog
                .upsert_variant(
                    product_id,
                    &NewVariant {
                        name: colour.to_string(),
                        unit_price,
                        available_quantity: AVAILABLE_QUANTITY,
                        image: Some(format!(
                            "static/product_images/{}_tee_{}.png",
                            tee.image_prefix,
                            colour.to_lowercase()
                        )),
                    },
                )
                .await?;
            result.variants += 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use coolcat_storefront::db::create_memory_pool;

    #[tokio::test]
    async fn test_seed_catalog() {
        let pool = create_memory_pool().await.unwrap();

        let result = seed_catalog(&pool).await.unwrap();
        assert_eq!(
            result,
            SeedResult {
                products: 3,
                variants: 12
            }
        );

        let products = CatalogRepository::new(&pool).list_products().await.unwrap();
        assert_eq!(products.len(), 3);

        let poker = products.iter().find(|p| p.name == "Cool Cat Poker").unwrap();
        assert_eq!(poker.category.as_deref(), Some("Shirt"));
        assert_eq!(poker.variants.len(), 4);
        assert!(
            poker
                .variants
                .iter()
                .all(|v| v.unit_price == Price::from_cents(2599).unwrap())
        );
        assert_eq!(
            poker.variants.first().unwrap().image.as_deref(),
            Some("static/product_images/poker_tee_black.png")
        );
    }

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();

        seed_catalog(&pool).await.unwrap();
        seed_catalog(&pool).await.unwrap();

        let products = CatalogRepository::new(&pool).list_products().await.unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products.iter().map(|p| p.variants.len()).sum::<usize>(), 12);
    }
}
