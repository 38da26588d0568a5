//! HTTP adaptation layer: routes in, envelopes out. Request parsing and
//! response shaping live here; the rules live in `service`.

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::Store;

mod combinations;
mod products;
mod reviews;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "healthy", "service": "vendora"})) }),
        )
        .route("/product/create-new", post(products::create))
        .route("/product/get-by-slug/:slug", get(products::get_by_slug))
        .route(
            "/product/:id",
            patch(products::update).delete(products::remove),
        )
        .route("/product/vendor/:vendor_id", get(products::by_vendor))
        .route("/product/category/:category", get(products::by_category))
        .route("/product/featured", get(products::featured))
        .route("/product/discounted", get(products::by_min_discount))
        .route(
            "/product/top-rated/:vendor_id",
            get(products::top_rated_by_vendor),
        )
        .route("/product/price-range", get(products::by_price_range))
        .route("/product/variants/create", post(products::create_variant))
        .route(
            "/product/variants/:id",
            patch(products::update_variant).delete(products::remove_variant),
        )
        .route("/product/combinations/create", post(combinations::create))
        .route(
            "/product/combinations/bulk-create",
            post(combinations::bulk_create),
        )
        .route(
            "/product/combinations/:id",
            get(combinations::get_by_id)
                .patch(combinations::update)
                .delete(combinations::remove),
        )
        .route(
            "/product/combinations/parent/:product_id",
            get(combinations::list_by_parent).delete(combinations::remove_all_for_parent),
        )
        .route(
            "/product/combinations/containing/:product_id",
            get(combinations::list_containing),
        )
        .route("/product/reviews/create", post(reviews::create))
        .route(
            "/product/reviews/:id",
            patch(reviews::update_comments).delete(reviews::remove),
        )
        .route("/product/reviews/:id/like", post(reviews::like))
        .route("/product/reviews/:id/dislike", post(reviews::dislike))
        .route(
            "/product/reviews/:id/remove-reaction",
            post(reviews::remove_reaction),
        )
        .route("/product/reviews/:id/replies", post(reviews::add_reply))
        .route(
            "/product/reviews/product/:product_id",
            get(reviews::list_by_product).delete(reviews::remove_all_for_product),
        )
        .route(
            "/product/reviews/product/:product_id/stats",
            get(reviews::stats),
        )
        .route("/product/reviews/bulk-delete", post(reviews::bulk_delete))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
