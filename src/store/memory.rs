//! In-memory implementation of [`Store`] over locked hash maps.
//!
//! Backs the integration suites and local demos; mirrors the Postgres
//! adapter's ordering and cascade behavior so the services cannot tell the
//! two apart.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Product, ProductCombination, ProductReview, ProductVariant, ReviewSort};
use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    products: HashMap<String, Product>,
    variants: HashMap<String, ProductVariant>,
    combinations: HashMap<String, ProductCombination>,
    reviews: HashMap<String, ProductReview>,
    users: HashSet<String>,
    vendors: HashSet<String>,
}

#[derive(Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so existence checks pass. Profile CRUD is owned by
    /// another service; tests and demos only need the key.
    pub async fn seed_user(&self, user_uuid: &str) {
        self.tables.write().await.users.insert(user_uuid.to_string());
    }

    pub async fn seed_vendor(&self, vendor_id: &str) {
        self.tables
            .write()
            .await
            .vendors
            .insert(vendor_id.to_string());
    }
}

fn newest_first<T, F: Fn(&T) -> chrono::DateTime<chrono::Utc>>(rows: &mut [T], key: F) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl Store for MemStore {
    async fn insert_product(&self, product: &Product) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.products.contains_key(&product.product_id) {
            return Err(AppError::conflict(format!(
                "product {} already exists",
                product.product_id
            )));
        }
        if t.products.values().any(|p| p.slug == product.slug) {
            return Err(AppError::conflict(format!(
                "product slug {} already exists",
                product.slug
            )));
        }
        t.products
            .insert(product.product_id.clone(), product.clone());
        Ok(())
    }

    async fn product_by_id(&self, product_id: &str) -> AppResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(product_id).cloned())
    }

    async fn product_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        Ok(self
            .tables
            .read()
            .await
            .products
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn missing_products(&self, ids: &[String]) -> AppResult<Vec<String>> {
        let t = self.tables.read().await;
        Ok(ids
            .iter()
            .filter(|id| !t.products.contains_key(*id))
            .cloned()
            .collect())
    }

    async fn save_product(&self, product: &Product) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        match t.products.get_mut(&product.product_id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_product(&self, product_id: &str) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        if t.products.remove(product_id).is_none() {
            return Ok(0);
        }
        t.variants.retain(|_, v| v.parent_product_id != product_id);
        t.reviews.retain(|_, r| r.product_id != product_id);
        t.combinations
            .retain(|_, c| c.parent_product_id != product_id);
        Ok(1)
    }

    async fn products_by_vendor(&self, vendor_id: &str) -> AppResult<Vec<Product>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Product> = t
            .products
            .values()
            .filter(|p| p.vendor_id == vendor_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |p| p.created_at);
        Ok(rows)
    }

    async fn products_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Product> = t
            .products
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        newest_first(&mut rows, |p| p.created_at);
        Ok(rows)
    }

    async fn featured_products(&self, category: Option<&str>) -> AppResult<Vec<Product>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Product> = t
            .products
            .values()
            .filter(|p| p.featured && category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        newest_first(&mut rows, |p| p.created_at);
        Ok(rows)
    }

    async fn products_by_min_discount(
        &self,
        min_percent: f64,
        limit: i64,
    ) -> AppResult<Vec<Product>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Product> = t
            .products
            .values()
            .filter(|p| p.discount_percent.is_some_and(|d| d >= min_percent))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.discount_percent
                .unwrap_or(0.0)
                .total_cmp(&a.discount_percent.unwrap_or(0.0))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn top_rated_by_vendor(&self, vendor_id: &str, limit: i64) -> AppResult<Vec<Product>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Product> = t
            .products
            .values()
            .filter(|p| p.vendor_id == vendor_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn products_by_price_range(
        &self,
        min: f64,
        max: Option<f64>,
    ) -> AppResult<Vec<Product>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Product> = t
            .products
            .values()
            .filter(|p| p.price >= min && max.map_or(true, |m| p.price <= m))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(rows)
    }

    async fn insert_variant(&self, variant: &ProductVariant) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.variants.contains_key(&variant.variant_id) {
            return Err(AppError::conflict(format!(
                "variant {} already exists",
                variant.variant_id
            )));
        }
        if t.variants.values().any(|v| v.slug == variant.slug) {
            return Err(AppError::conflict(format!(
                "variant slug {} already exists",
                variant.slug
            )));
        }
        t.variants
            .insert(variant.variant_id.clone(), variant.clone());
        Ok(())
    }

    async fn variant_by_id(&self, variant_id: &str) -> AppResult<Option<ProductVariant>> {
        Ok(self.tables.read().await.variants.get(variant_id).cloned())
    }

    async fn variant_by_slug(&self, slug: &str) -> AppResult<Option<ProductVariant>> {
        Ok(self
            .tables
            .read()
            .await
            .variants
            .values()
            .find(|v| v.slug == slug)
            .cloned())
    }

    async fn variant_slug_exists(&self, slug: &str) -> AppResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .variants
            .values()
            .any(|v| v.slug == slug))
    }

    async fn active_variants(&self, parent_product_id: &str) -> AppResult<Vec<ProductVariant>> {
        let t = self.tables.read().await;
        let mut rows: Vec<ProductVariant> = t
            .variants
            .values()
            .filter(|v| v.parent_product_id == parent_product_id && v.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn save_variant(&self, variant: &ProductVariant) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        match t.variants.get_mut(&variant.variant_id) {
            Some(existing) => {
                *existing = variant.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_variant(&self, variant_id: &str) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        Ok(t.variants.remove(variant_id).map_or(0, |_| 1))
    }

    async fn insert_combinations(&self, combinations: &[ProductCombination]) -> AppResult<()> {
        let mut t = self.tables.write().await;
        // All-or-nothing: check every id before touching the table.
        for c in combinations {
            if t.combinations.contains_key(&c.combination_id) {
                return Err(AppError::conflict(format!(
                    "combination {} already exists",
                    c.combination_id
                )));
            }
        }
        for c in combinations {
            t.combinations.insert(c.combination_id.clone(), c.clone());
        }
        Ok(())
    }

    async fn combination_by_id(
        &self,
        combination_id: &str,
    ) -> AppResult<Option<ProductCombination>> {
        Ok(self
            .tables
            .read()
            .await
            .combinations
            .get(combination_id)
            .cloned())
    }

    async fn combinations_by_parent(
        &self,
        parent_product_id: &str,
    ) -> AppResult<Vec<ProductCombination>> {
        let t = self.tables.read().await;
        let mut rows: Vec<ProductCombination> = t
            .combinations
            .values()
            .filter(|c| c.parent_product_id == parent_product_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |c| c.created_at);
        Ok(rows)
    }

    async fn combinations_containing(
        &self,
        product_id: &str,
    ) -> AppResult<Vec<ProductCombination>> {
        let t = self.tables.read().await;
        let mut rows: Vec<ProductCombination> = t
            .combinations
            .values()
            .filter(|c| c.contains(product_id))
            .cloned()
            .collect();
        newest_first(&mut rows, |c| c.created_at);
        Ok(rows)
    }

    async fn save_combination(&self, combination: &ProductCombination) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        match t.combinations.get_mut(&combination.combination_id) {
            Some(existing) => {
                *existing = combination.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_combination(&self, combination_id: &str) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        Ok(t.combinations.remove(combination_id).map_or(0, |_| 1))
    }

    async fn delete_combinations_for_parent(&self, parent_product_id: &str) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        let before = t.combinations.len();
        t.combinations
            .retain(|_, c| c.parent_product_id != parent_product_id);
        Ok((before - t.combinations.len()) as u64)
    }

    async fn insert_review(&self, review: &ProductReview) -> AppResult<()> {
        let mut t = self.tables.write().await;
        if t.reviews.contains_key(&review.review_id) {
            return Err(AppError::conflict(format!(
                "review {} already exists",
                review.review_id
            )));
        }
        if t.reviews
            .values()
            .any(|r| r.product_id == review.product_id && r.user_uuid == review.user_uuid)
        {
            return Err(AppError::conflict(
                "user has already reviewed this product",
            ));
        }
        t.reviews.insert(review.review_id.clone(), review.clone());
        Ok(())
    }

    async fn review_by_id(&self, review_id: &str) -> AppResult<Option<ProductReview>> {
        Ok(self.tables.read().await.reviews.get(review_id).cloned())
    }

    async fn review_exists_for(&self, product_id: &str, user_uuid: &str) -> AppResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .reviews
            .values()
            .any(|r| r.product_id == product_id && r.user_uuid == user_uuid))
    }

    async fn reviews_by_product(
        &self,
        product_id: &str,
        sort: ReviewSort,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ProductReview>> {
        let t = self.tables.read().await;
        let mut rows: Vec<ProductReview> = t
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        match sort {
            ReviewSort::Newest => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ReviewSort::Oldest => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            ReviewSort::Likes => rows.sort_by(|a, b| b.likes.cmp(&a.likes)),
            ReviewSort::Dislikes => rows.sort_by(|a, b| b.dislikes.cmp(&a.dislikes)),
        }
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_reviews(&self, product_id: &str) -> AppResult<i64> {
        Ok(self
            .tables
            .read()
            .await
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .count() as i64)
    }

    async fn all_reviews_for_product(&self, product_id: &str) -> AppResult<Vec<ProductReview>> {
        let t = self.tables.read().await;
        let mut rows: Vec<ProductReview> = t
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn save_review(&self, review: &ProductReview) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        match t.reviews.get_mut(&review.review_id) {
            Some(existing) => {
                *existing = review.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn missing_reviews(&self, ids: &[String]) -> AppResult<Vec<String>> {
        let t = self.tables.read().await;
        Ok(ids
            .iter()
            .filter(|id| !t.reviews.contains_key(*id))
            .cloned()
            .collect())
    }

    async fn delete_reviews(&self, ids: &[String]) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        let mut deleted = 0;
        for id in ids {
            if t.reviews.remove(id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn delete_reviews_for_product(&self, product_id: &str) -> AppResult<u64> {
        let mut t = self.tables.write().await;
        let before = t.reviews.len();
        t.reviews.retain(|_, r| r.product_id != product_id);
        Ok((before - t.reviews.len()) as u64)
    }

    async fn user_exists(&self, user_uuid: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.users.contains(user_uuid))
    }

    async fn vendor_exists(&self, vendor_id: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.vendors.contains(vendor_id))
    }
}
