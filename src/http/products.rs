//! Product and variant handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::{Product, ProductPatch, ProductVariant, VariantPatch};
use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::service::catalog::{self, CreateProductInput, CreateVariantInput, SlugResolution};

use super::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = catalog::create_product(state.store.as_ref(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("product created", product)),
    ))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<SlugResolution>>> {
    let resolved = catalog::get_by_slug(state.store.as_ref(), &slug).await?;
    Ok(Json(ApiResponse::success("product fetched", resolved)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = catalog::update_product(state.store.as_ref(), &id, patch).await?;
    Ok(Json(ApiResponse::success("product updated", product)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let affected = catalog::delete_product(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::success("product deleted", affected)))
}

pub async fn by_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = catalog::products_by_vendor(state.store.as_ref(), &vendor_id).await?;
    Ok(Json(ApiResponse::success("products fetched", products)))
}

pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = catalog::products_by_category(state.store.as_ref(), &category).await?;
    Ok(Json(ApiResponse::success("products fetched", products)))
}

#[derive(Debug, Deserialize)]
pub struct FeaturedParams {
    pub category: Option<String>,
}

pub async fn featured(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products =
        catalog::featured_products(state.store.as_ref(), params.category.as_deref()).await?;
    Ok(Json(ApiResponse::success("featured products fetched", products)))
}

#[derive(Debug, Deserialize)]
pub struct DiscountParams {
    pub discount: f64,
}

pub async fn by_min_discount(
    State(state): State<AppState>,
    Query(params): Query<DiscountParams>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = catalog::products_by_min_discount(state.store.as_ref(), params.discount).await?;
    Ok(Json(ApiResponse::success("discounted products fetched", products)))
}

pub async fn top_rated_by_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = catalog::top_rated_by_vendor(state.store.as_ref(), &vendor_id).await?;
    Ok(Json(ApiResponse::success("top rated products fetched", products)))
}

#[derive(Debug, Deserialize)]
pub struct PriceRangeParams {
    pub min: f64,
    pub max: Option<f64>,
}

pub async fn by_price_range(
    State(state): State<AppState>,
    Query(params): Query<PriceRangeParams>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products =
        catalog::products_by_price_range(state.store.as_ref(), params.min, params.max).await?;
    Ok(Json(ApiResponse::success("products fetched", products)))
}

pub async fn create_variant(
    State(state): State<AppState>,
    Json(input): Json<CreateVariantInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductVariant>>)> {
    let variant = catalog::create_variant(state.store.as_ref(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("variant created", variant)),
    ))
}

pub async fn update_variant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<VariantPatch>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let variant = catalog::update_variant(state.store.as_ref(), &id, patch).await?;
    Ok(Json(ApiResponse::success("variant updated", variant)))
}

pub async fn remove_variant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let affected = catalog::delete_variant(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::success("variant deleted", affected)))
}
