//! Persistence layer: a stateless injected dependency, never a process-wide
//! singleton. Services receive `&dyn Store`; `PgStore` backs production and
//! `MemStore` backs the test suites.
//!
//! Service-level check-then-act sequences are advisory fast paths only; the
//! unique indexes declared in the migrations are the correctness backstop for
//! concurrent writers.

use async_trait::async_trait;

use crate::domain::{Product, ProductCombination, ProductReview, ProductVariant, ReviewSort};
use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // --- products ---
    async fn insert_product(&self, product: &Product) -> AppResult<()>;
    async fn product_by_id(&self, product_id: &str) -> AppResult<Option<Product>>;
    async fn product_by_slug(&self, slug: &str) -> AppResult<Option<Product>>;
    /// Subset of `ids` with no matching product row, order preserved.
    async fn missing_products(&self, ids: &[String]) -> AppResult<Vec<String>>;
    /// Full-row update keyed by `product_id`; returns affected rows.
    async fn save_product(&self, product: &Product) -> AppResult<u64>;
    /// Deletes the product; variants, reviews, and bundles parented by it go
    /// with it. Bundles merely containing it as a child are left in place.
    async fn delete_product(&self, product_id: &str) -> AppResult<u64>;
    async fn products_by_vendor(&self, vendor_id: &str) -> AppResult<Vec<Product>>;
    async fn products_by_category(&self, category: &str) -> AppResult<Vec<Product>>;
    async fn featured_products(&self, category: Option<&str>) -> AppResult<Vec<Product>>;
    /// Discounted products at or above `min_percent`, highest discount first.
    async fn products_by_min_discount(&self, min_percent: f64, limit: i64)
        -> AppResult<Vec<Product>>;
    async fn top_rated_by_vendor(&self, vendor_id: &str, limit: i64) -> AppResult<Vec<Product>>;
    /// Products priced in `[min, max]` (unbounded above when `max` is None),
    /// cheapest first.
    async fn products_by_price_range(&self, min: f64, max: Option<f64>)
        -> AppResult<Vec<Product>>;

    // --- variants ---
    async fn insert_variant(&self, variant: &ProductVariant) -> AppResult<()>;
    async fn variant_by_id(&self, variant_id: &str) -> AppResult<Option<ProductVariant>>;
    async fn variant_by_slug(&self, slug: &str) -> AppResult<Option<ProductVariant>>;
    async fn variant_slug_exists(&self, slug: &str) -> AppResult<bool>;
    /// Active variants of a product, oldest first.
    async fn active_variants(&self, parent_product_id: &str) -> AppResult<Vec<ProductVariant>>;
    async fn save_variant(&self, variant: &ProductVariant) -> AppResult<u64>;
    async fn delete_variant(&self, variant_id: &str) -> AppResult<u64>;

    // --- combinations ---
    /// Inserts the whole batch or nothing.
    async fn insert_combinations(&self, combinations: &[ProductCombination]) -> AppResult<()>;
    async fn combination_by_id(&self, combination_id: &str)
        -> AppResult<Option<ProductCombination>>;
    async fn combinations_by_parent(
        &self,
        parent_product_id: &str,
    ) -> AppResult<Vec<ProductCombination>>;
    /// Bundles whose child list references `product_id`. O(total bundles).
    async fn combinations_containing(
        &self,
        product_id: &str,
    ) -> AppResult<Vec<ProductCombination>>;
    async fn save_combination(&self, combination: &ProductCombination) -> AppResult<u64>;
    async fn delete_combination(&self, combination_id: &str) -> AppResult<u64>;
    async fn delete_combinations_for_parent(&self, parent_product_id: &str) -> AppResult<u64>;

    // --- reviews ---
    async fn insert_review(&self, review: &ProductReview) -> AppResult<()>;
    async fn review_by_id(&self, review_id: &str) -> AppResult<Option<ProductReview>>;
    async fn review_exists_for(&self, product_id: &str, user_uuid: &str) -> AppResult<bool>;
    async fn reviews_by_product(
        &self,
        product_id: &str,
        sort: ReviewSort,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ProductReview>>;
    async fn count_reviews(&self, product_id: &str) -> AppResult<i64>;
    async fn all_reviews_for_product(&self, product_id: &str) -> AppResult<Vec<ProductReview>>;
    async fn save_review(&self, review: &ProductReview) -> AppResult<u64>;
    async fn missing_reviews(&self, ids: &[String]) -> AppResult<Vec<String>>;
    async fn delete_reviews(&self, ids: &[String]) -> AppResult<u64>;
    async fn delete_reviews_for_product(&self, product_id: &str) -> AppResult<u64>;

    // --- profiles (existence contract only; their CRUD is owned elsewhere) ---
    async fn user_exists(&self, user_uuid: &str) -> AppResult<bool>;
    async fn vendor_exists(&self, vendor_id: &str) -> AppResult<bool>;
}
