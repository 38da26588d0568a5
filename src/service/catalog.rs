//! Product composition service: products, their variants, and the slug
//! namespace shared between the two.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{self, Product, ProductPatch, ProductVariant, VariantPatch};
use crate::error::{AppError, AppResult};
use crate::ids;
use crate::service::Numeric;
use crate::store::Store;

/// Queries that rank (discount, rating) return at most this many rows.
const TOP_QUERY_LIMIT: i64 = 4;

#[derive(Debug, Default, Deserialize)]
pub struct CreateProductInput {
    pub product_id: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub about_in_bullets: Option<Vec<String>>,
    pub price: Option<Numeric>,
    pub brand: Option<String>,
    pub vendor_id: Option<String>,
    pub quantity: Option<Numeric>,
    // Optional discount pair passes through unvalidated; cross-checking the
    // two against each other is the caller's responsibility.
    pub discount_percent: Option<Numeric>,
    pub discount_price: Option<Numeric>,
    pub featured: Option<bool>,
    pub variant_state: Option<bool>,
}

fn require(
    value: &Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

pub async fn create_product(store: &dyn Store, input: CreateProductInput) -> AppResult<Product> {
    let mut missing: Vec<&'static str> = Vec::new();
    let product_id = require(&input.product_id, "product_id", &mut missing);
    let slug = require(&input.slug, "slug", &mut missing);
    let title = require(&input.title, "title", &mut missing);
    let description = require(&input.description, "description", &mut missing);
    let category = require(&input.category, "category", &mut missing);
    let brand = require(&input.brand, "brand", &mut missing);
    let vendor_id = require(&input.vendor_id, "vendor_id", &mut missing);
    let about_in_bullets = match &input.about_in_bullets {
        Some(bullets) if !bullets.is_empty() => bullets.clone(),
        _ => {
            missing.push("about_in_bullets");
            vec![]
        }
    };
    if input.price.is_none() {
        missing.push("price");
    }
    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }
    let price = input
        .price
        .as_ref()
        .ok_or_else(|| AppError::validation("missing required fields: price"))?
        .as_f64("price")?;
    let quantity = match &input.quantity {
        Some(q) => q.as_i32("quantity")?,
        None => 0,
    };
    let discount_percent = input
        .discount_percent
        .as_ref()
        .map(|n| n.as_f64("discount_percent"))
        .transpose()?;
    let discount_price = input
        .discount_price
        .as_ref()
        .map(|n| n.as_f64("discount_price"))
        .transpose()?;

    // Normalization can strip a slug down to nothing; an empty slug must
    // never enter the unique namespace.
    let slug = ids::derive_slug(&slug);
    if slug.is_empty() {
        return Err(AppError::validation(
            "slug must contain at least one url-safe character",
        ));
    }

    if !store.vendor_exists(&vendor_id).await? {
        return Err(AppError::not_found(format!("vendor {vendor_id} not found")));
    }

    let now = Utc::now();
    let product = Product {
        product_id,
        slug,
        title,
        description,
        category,
        about_in_bullets,
        price,
        brand,
        vendor_id,
        rating: 0.0,
        review_count: 0,
        quantity,
        discount_percent,
        discount_price,
        featured: input.featured.unwrap_or(false),
        variant_state: input.variant_state.unwrap_or(false),
        created_at: now,
        updated_at: now,
    };
    store
        .insert_product(&product)
        .await
        .map_err(|e| e.or_conflict("product id or slug already in use"))?;
    tracing::info!(product_id = %product.product_id, slug = %product.slug, "product created");
    Ok(product)
}

#[derive(Debug, Deserialize)]
pub struct CreateVariantInput {
    pub parent_product_id: String,
    pub variant_name: String,
    pub variant_type: String,
    pub price: Numeric,
    pub quantity: Numeric,
    pub discount_percent: Option<Numeric>,
    pub is_active: Option<bool>,
}

pub async fn create_variant(
    store: &dyn Store,
    input: CreateVariantInput,
) -> AppResult<ProductVariant> {
    if input.variant_name.trim().is_empty() || input.variant_type.trim().is_empty() {
        return Err(AppError::validation(
            "variant_name and variant_type are required",
        ));
    }
    let price = input.price.as_f64("price")?;
    let quantity = input.quantity.as_i32("quantity")?;
    let discount_percent = input
        .discount_percent
        .as_ref()
        .map(|n| n.as_f64("discount_percent"))
        .transpose()?;

    let mut parent = store
        .product_by_id(&input.parent_product_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("product {} not found", input.parent_product_id))
        })?;

    // Slug lives in a global variant namespace. A collision gets a timestamp
    // suffix rather than an error; allocated slugs are never reused.
    let candidate = ids::derive_slug(&format!("{}-{}", parent.slug, input.variant_name));
    let taken = store.variant_slug_exists(&candidate).await?;
    let slug = ids::ensure_unique(candidate, |_| taken);

    let now = Utc::now();
    let variant = ProductVariant {
        variant_id: ids::new_id("VAR"),
        parent_product_id: parent.product_id.clone(),
        slug,
        variant_name: input.variant_name.trim().to_string(),
        variant_type: input.variant_type.trim().to_string(),
        price,
        quantity,
        discount_percent,
        discount_price: discount_percent.map(|pct| domain::discounted_price(price, pct)),
        is_active: input.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };
    store
        .insert_variant(&variant)
        .await
        .map_err(|e| e.or_conflict("variant id or slug already in use"))?;

    if !parent.variant_state {
        parent.variant_state = true;
        parent.updated_at = now;
        store.save_product(&parent).await?;
    }
    tracing::info!(variant_id = %variant.variant_id, slug = %variant.slug, "variant created");
    Ok(variant)
}

/// What `get_by_slug` resolves to: the product, its active variants, and,
/// when the slug named a variant, which variant was requested.
#[derive(Debug, Serialize)]
pub struct SlugResolution {
    #[serde(flatten)]
    pub product: Product,
    pub has_variants: bool,
    pub variants: Vec<ProductVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<ProductVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_variant_slug: Option<String>,
}

/// Two-phase lookup: the slug is tried as a product slug first, then as a
/// variant slug. Inactive variants are invisible on both paths.
pub async fn get_by_slug(store: &dyn Store, slug: &str) -> AppResult<SlugResolution> {
    if let Some(product) = store.product_by_slug(slug).await? {
        let variants = store.active_variants(&product.product_id).await?;
        return Ok(SlugResolution {
            has_variants: !variants.is_empty(),
            variants,
            selected_variant: None,
            current_variant_slug: None,
            product,
        });
    }
    let variant = store
        .variant_by_slug(slug)
        .await?
        .filter(|v| v.is_active)
        .ok_or_else(|| AppError::not_found(format!("no product or variant with slug {slug}")))?;
    let product = store
        .product_by_id(&variant.parent_product_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("product {} not found", variant.parent_product_id))
        })?;
    let variants = store.active_variants(&product.product_id).await?;
    Ok(SlugResolution {
        has_variants: !variants.is_empty(),
        variants,
        current_variant_slug: Some(variant.slug.clone()),
        selected_variant: Some(variant),
        product,
    })
}

/// Partial update with an existence pre-check, so "no such product" and "no
/// change" stay distinguishable.
pub async fn update_product(
    store: &dyn Store,
    product_id: &str,
    patch: ProductPatch,
) -> AppResult<Product> {
    let mut product = store
        .product_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("product {product_id} not found")))?;
    if patch.is_empty() {
        return Err(AppError::validation("no fields to update"));
    }
    patch.apply_to(&mut product);
    if store.save_product(&product).await? == 0 {
        // Deleted between the pre-check and the write.
        return Err(AppError::not_found(format!("product {product_id} not found")));
    }
    Ok(product)
}

pub async fn update_variant(
    store: &dyn Store,
    variant_id: &str,
    patch: VariantPatch,
) -> AppResult<ProductVariant> {
    let mut variant = store
        .variant_by_id(variant_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("variant {variant_id} not found")))?;
    if patch.is_empty() {
        return Err(AppError::validation("no fields to update"));
    }
    patch.apply_to(&mut variant);
    if store.save_variant(&variant).await? == 0 {
        return Err(AppError::not_found(format!("variant {variant_id} not found")));
    }
    Ok(variant)
}

/// Deletes report the actual affected count; zero rows is a NotFound, never a
/// silent success.
pub async fn delete_product(store: &dyn Store, product_id: &str) -> AppResult<u64> {
    let affected = store.delete_product(product_id).await?;
    if affected == 0 {
        return Err(AppError::not_found(format!("product {product_id} not found")));
    }
    tracing::info!(product_id, "product deleted");
    Ok(affected)
}

pub async fn delete_variant(store: &dyn Store, variant_id: &str) -> AppResult<u64> {
    let affected = store.delete_variant(variant_id).await?;
    if affected == 0 {
        return Err(AppError::not_found(format!("variant {variant_id} not found")));
    }
    Ok(affected)
}

// Query operations. Zero matches is reported as NotFound so callers can tell
// "no data" from a transport failure by status code alone.

fn non_empty(rows: Vec<Product>, what: &str) -> AppResult<Vec<Product>> {
    if rows.is_empty() {
        Err(AppError::not_found(format!("no products found {what}")))
    } else {
        Ok(rows)
    }
}

pub async fn products_by_vendor(store: &dyn Store, vendor_id: &str) -> AppResult<Vec<Product>> {
    non_empty(
        store.products_by_vendor(vendor_id).await?,
        &format!("for vendor {vendor_id}"),
    )
}

pub async fn products_by_category(store: &dyn Store, category: &str) -> AppResult<Vec<Product>> {
    non_empty(
        store.products_by_category(category).await?,
        &format!("in category {category}"),
    )
}

pub async fn featured_products(
    store: &dyn Store,
    category: Option<&str>,
) -> AppResult<Vec<Product>> {
    non_empty(store.featured_products(category).await?, "matching featured")
}

pub async fn products_by_min_discount(
    store: &dyn Store,
    min_percent: f64,
) -> AppResult<Vec<Product>> {
    non_empty(
        store
            .products_by_min_discount(min_percent, TOP_QUERY_LIMIT)
            .await?,
        &format!("with discount >= {min_percent}%"),
    )
}

pub async fn top_rated_by_vendor(store: &dyn Store, vendor_id: &str) -> AppResult<Vec<Product>> {
    non_empty(
        store.top_rated_by_vendor(vendor_id, TOP_QUERY_LIMIT).await?,
        &format!("for vendor {vendor_id}"),
    )
}

pub async fn products_by_price_range(
    store: &dyn Store,
    min: f64,
    max: Option<f64>,
) -> AppResult<Vec<Product>> {
    if let Some(max) = max {
        if max < min {
            return Err(AppError::validation("max price must be >= min price"));
        }
    }
    non_empty(
        store.products_by_price_range(min, max).await?,
        "in price range",
    )
}
