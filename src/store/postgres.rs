//! Postgres implementation of [`Store`] over sqlx.
//!
//! Reactor sets live in `TEXT[]` columns and map straight onto `Vec<String>`;
//! replies and bundle child lists live in `JSONB` and are decoded here, at the
//! adapter boundary, so no serialized blob ever reaches a service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::{
    ChildProduct, Product, ProductCombination, ProductReview, ProductVariant, Reply, ReviewSort,
};
use crate::error::AppResult;
use crate::store::Store;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CombinationRow {
    combination_id: String,
    parent_product_id: String,
    combination_name: String,
    description: Option<String>,
    child_products: Json<Vec<ChildProduct>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CombinationRow> for ProductCombination {
    fn from(row: CombinationRow) -> Self {
        Self {
            combination_id: row.combination_id,
            parent_product_id: row.parent_product_id,
            combination_name: row.combination_name,
            description: row.description,
            child_products: row.child_products.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    review_id: String,
    product_id: String,
    user_uuid: String,
    comments: String,
    likes: i32,
    dislikes: i32,
    liked_by: Vec<String>,
    disliked_by: Vec<String>,
    replies: Json<Vec<Reply>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for ProductReview {
    fn from(row: ReviewRow) -> Self {
        Self {
            review_id: row.review_id,
            product_id: row.product_id,
            user_uuid: row.user_uuid,
            comments: row.comments,
            likes: row.likes,
            dislikes: row.dislikes,
            liked_by: row.liked_by,
            disliked_by: row.disliked_by,
            replies: row.replies.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_product(&self, p: &Product) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO products (product_id, slug, title, description, category, about_in_bullets, price, brand, vendor_id, rating, review_count, quantity, discount_percent, discount_price, featured, variant_state, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
        )
        .bind(&p.product_id)
        .bind(&p.slug)
        .bind(&p.title)
        .bind(&p.description)
        .bind(&p.category)
        .bind(&p.about_in_bullets)
        .bind(p.price)
        .bind(&p.brand)
        .bind(&p.vendor_id)
        .bind(p.rating)
        .bind(p.review_count)
        .bind(p.quantity)
        .bind(p.discount_percent)
        .bind(p.discount_price)
        .bind(p.featured)
        .bind(p.variant_state)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn product_by_id(&self, product_id: &str) -> AppResult<Option<Product>> {
        Ok(
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE product_id = $1")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn product_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        Ok(
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn missing_products(&self, ids: &[String]) -> AppResult<Vec<String>> {
        let found: Vec<String> =
            sqlx::query_scalar("SELECT product_id FROM products WHERE product_id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids
            .iter()
            .filter(|id| !found.contains(id))
            .cloned()
            .collect())
    }

    async fn save_product(&self, p: &Product) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE products SET title = $2, description = $3, category = $4, about_in_bullets = $5, price = $6, brand = $7, rating = $8, review_count = $9, quantity = $10, discount_percent = $11, discount_price = $12, featured = $13, variant_state = $14, updated_at = $15 \
             WHERE product_id = $1",
        )
        .bind(&p.product_id)
        .bind(&p.title)
        .bind(&p.description)
        .bind(&p.category)
        .bind(&p.about_in_bullets)
        .bind(p.price)
        .bind(&p.brand)
        .bind(p.rating)
        .bind(p.review_count)
        .bind(p.quantity)
        .bind(p.discount_percent)
        .bind(p.discount_price)
        .bind(p.featured)
        .bind(p.variant_state)
        .bind(p.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_product(&self, product_id: &str) -> AppResult<u64> {
        // Variants, reviews, and parented bundles go via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn products_by_vendor(&self, vendor_id: &str) -> AppResult<Vec<Product>> {
        Ok(sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE vendor_id = $1 ORDER BY created_at DESC",
        )
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn products_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        Ok(sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE category = $1 ORDER BY created_at DESC",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn featured_products(&self, category: Option<&str>) -> AppResult<Vec<Product>> {
        let rows = match category {
            Some(cat) => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products WHERE featured AND category = $1 ORDER BY created_at DESC",
                )
                .bind(cat)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products WHERE featured ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn products_by_min_discount(
        &self,
        min_percent: f64,
        limit: i64,
    ) -> AppResult<Vec<Product>> {
        Ok(sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE discount_percent >= $1 ORDER BY discount_percent DESC LIMIT $2",
        )
        .bind(min_percent)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn top_rated_by_vendor(&self, vendor_id: &str, limit: i64) -> AppResult<Vec<Product>> {
        Ok(sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE vendor_id = $1 ORDER BY rating DESC LIMIT $2",
        )
        .bind(vendor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn products_by_price_range(
        &self,
        min: f64,
        max: Option<f64>,
    ) -> AppResult<Vec<Product>> {
        let rows = match max {
            Some(max) => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products WHERE price >= $1 AND price <= $2 ORDER BY price ASC",
                )
                .bind(min)
                .bind(max)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products WHERE price >= $1 ORDER BY price ASC",
                )
                .bind(min)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn insert_variant(&self, v: &ProductVariant) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO product_variants (variant_id, parent_product_id, slug, variant_name, variant_type, price, quantity, discount_percent, discount_price, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&v.variant_id)
        .bind(&v.parent_product_id)
        .bind(&v.slug)
        .bind(&v.variant_name)
        .bind(&v.variant_type)
        .bind(v.price)
        .bind(v.quantity)
        .bind(v.discount_percent)
        .bind(v.discount_price)
        .bind(v.is_active)
        .bind(v.created_at)
        .bind(v.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn variant_by_id(&self, variant_id: &str) -> AppResult<Option<ProductVariant>> {
        Ok(sqlx::query_as::<_, ProductVariant>(
            "SELECT * FROM product_variants WHERE variant_id = $1",
        )
        .bind(variant_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn variant_by_slug(&self, slug: &str) -> AppResult<Option<ProductVariant>> {
        Ok(
            sqlx::query_as::<_, ProductVariant>("SELECT * FROM product_variants WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn variant_slug_exists(&self, slug: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM product_variants WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn active_variants(&self, parent_product_id: &str) -> AppResult<Vec<ProductVariant>> {
        Ok(sqlx::query_as::<_, ProductVariant>(
            "SELECT * FROM product_variants WHERE parent_product_id = $1 AND is_active ORDER BY created_at ASC",
        )
        .bind(parent_product_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save_variant(&self, v: &ProductVariant) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE product_variants SET variant_name = $2, variant_type = $3, price = $4, quantity = $5, discount_percent = $6, discount_price = $7, is_active = $8, updated_at = $9 \
             WHERE variant_id = $1",
        )
        .bind(&v.variant_id)
        .bind(&v.variant_name)
        .bind(&v.variant_type)
        .bind(v.price)
        .bind(v.quantity)
        .bind(v.discount_percent)
        .bind(v.discount_price)
        .bind(v.is_active)
        .bind(v.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_variant(&self, variant_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM product_variants WHERE variant_id = $1")
            .bind(variant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_combinations(&self, combinations: &[ProductCombination]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        for c in combinations {
            sqlx::query(
                "INSERT INTO product_combinations (combination_id, parent_product_id, combination_name, description, child_products, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&c.combination_id)
            .bind(&c.parent_product_id)
            .bind(&c.combination_name)
            .bind(&c.description)
            .bind(Json(&c.child_products))
            .bind(c.created_at)
            .bind(c.updated_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn combination_by_id(
        &self,
        combination_id: &str,
    ) -> AppResult<Option<ProductCombination>> {
        Ok(sqlx::query_as::<_, CombinationRow>(
            "SELECT * FROM product_combinations WHERE combination_id = $1",
        )
        .bind(combination_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into))
    }

    async fn combinations_by_parent(
        &self,
        parent_product_id: &str,
    ) -> AppResult<Vec<ProductCombination>> {
        let rows = sqlx::query_as::<_, CombinationRow>(
            "SELECT * FROM product_combinations WHERE parent_product_id = $1 ORDER BY created_at DESC",
        )
        .bind(parent_product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn combinations_containing(
        &self,
        product_id: &str,
    ) -> AppResult<Vec<ProductCombination>> {
        // JSONB containment; a GIN index on child_products is the upgrade
        // path if bundle counts ever make this scan hurt.
        let needle = serde_json::json!([{ "product_id": product_id }]);
        let rows = sqlx::query_as::<_, CombinationRow>(
            "SELECT * FROM product_combinations WHERE child_products @> $1 ORDER BY created_at DESC",
        )
        .bind(needle)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_combination(&self, c: &ProductCombination) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE product_combinations SET combination_name = $2, description = $3, child_products = $4, updated_at = $5 \
             WHERE combination_id = $1",
        )
        .bind(&c.combination_id)
        .bind(&c.combination_name)
        .bind(&c.description)
        .bind(Json(&c.child_products))
        .bind(c.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_combination(&self, combination_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM product_combinations WHERE combination_id = $1")
            .bind(combination_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_combinations_for_parent(&self, parent_product_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM product_combinations WHERE parent_product_id = $1")
            .bind(parent_product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_review(&self, r: &ProductReview) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO product_reviews (review_id, product_id, user_uuid, comments, likes, dislikes, liked_by, disliked_by, replies, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&r.review_id)
        .bind(&r.product_id)
        .bind(&r.user_uuid)
        .bind(&r.comments)
        .bind(r.likes)
        .bind(r.dislikes)
        .bind(&r.liked_by)
        .bind(&r.disliked_by)
        .bind(Json(&r.replies))
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn review_by_id(&self, review_id: &str) -> AppResult<Option<ProductReview>> {
        Ok(sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM product_reviews WHERE review_id = $1",
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into))
    }

    async fn review_exists_for(&self, product_id: &str, user_uuid: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM product_reviews WHERE product_id = $1 AND user_uuid = $2)",
        )
        .bind(product_id)
        .bind(user_uuid)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn reviews_by_product(
        &self,
        product_id: &str,
        sort: ReviewSort,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ProductReview>> {
        let order = match sort {
            ReviewSort::Newest => "created_at DESC",
            ReviewSort::Oldest => "created_at ASC",
            ReviewSort::Likes => "likes DESC",
            ReviewSort::Dislikes => "dislikes DESC",
        };
        let sql = format!(
            "SELECT * FROM product_reviews WHERE product_id = $1 ORDER BY {order} LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(product_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_reviews(&self, product_id: &str) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_reviews WHERE product_id = $1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn all_reviews_for_product(&self, product_id: &str) -> AppResult<Vec<ProductReview>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM product_reviews WHERE product_id = $1 ORDER BY created_at ASC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_review(&self, r: &ProductReview) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE product_reviews SET comments = $2, likes = $3, dislikes = $4, liked_by = $5, disliked_by = $6, replies = $7, updated_at = $8 \
             WHERE review_id = $1",
        )
        .bind(&r.review_id)
        .bind(&r.comments)
        .bind(r.likes)
        .bind(r.dislikes)
        .bind(&r.liked_by)
        .bind(&r.disliked_by)
        .bind(Json(&r.replies))
        .bind(r.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn missing_reviews(&self, ids: &[String]) -> AppResult<Vec<String>> {
        let found: Vec<String> =
            sqlx::query_scalar("SELECT review_id FROM product_reviews WHERE review_id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids
            .iter()
            .filter(|id| !found.contains(id))
            .cloned()
            .collect())
    }

    async fn delete_reviews(&self, ids: &[String]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM product_reviews WHERE review_id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_reviews_for_product(&self, product_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM product_reviews WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn user_exists(&self, user_uuid: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user_profiles WHERE user_uuid = $1)")
                .bind(user_uuid)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn vendor_exists(&self, vendor_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM vendor_profiles WHERE vendor_id = $1)",
        )
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
