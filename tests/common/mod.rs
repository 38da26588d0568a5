//! Shared fixtures for the service suites.
#![allow(dead_code)]

use vendora::service::catalog::{self, CreateProductInput, CreateVariantInput};
use vendora::service::Numeric;
use vendora::store::MemStore;

pub const VENDOR: &str = "VND-FIXTURE1";
pub const USER: &str = "user-fixture-1";

pub async fn store() -> MemStore {
    let store = MemStore::new();
    store.seed_vendor(VENDOR).await;
    store.seed_user(USER).await;
    store
}

pub fn product_input(product_id: &str, slug: &str, price: f64) -> CreateProductInput {
    CreateProductInput {
        product_id: Some(product_id.to_string()),
        slug: Some(slug.to_string()),
        title: Some(format!("{slug} title")),
        description: Some("a perfectly ordinary product".to_string()),
        category: Some("gadgets".to_string()),
        about_in_bullets: Some(vec!["does things".to_string()]),
        price: Some(Numeric::Number(price)),
        brand: Some("Acme".to_string()),
        vendor_id: Some(VENDOR.to_string()),
        ..Default::default()
    }
}

pub async fn seed_product(store: &MemStore, product_id: &str, slug: &str, price: f64) {
    catalog::create_product(store, product_input(product_id, slug, price))
        .await
        .expect("seed product");
}

pub fn variant_input(parent: &str, name: &str, price: f64, pct: Option<f64>) -> CreateVariantInput {
    CreateVariantInput {
        parent_product_id: parent.to_string(),
        variant_name: name.to_string(),
        variant_type: "size".to_string(),
        price: Numeric::Number(price),
        quantity: Numeric::Number(5.0),
        discount_percent: pct.map(Numeric::Number),
        is_active: None,
    }
}
