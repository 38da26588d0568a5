//! Product record: a sellable item, optionally decomposed into variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// External-facing id, e.g. `PRD-4K9ZQ2MB`.
    pub product_id: String,
    /// Globally unique URL slug.
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub about_in_bullets: Vec<String>,
    /// Base price. Stock quantity only applies when the product has no variants.
    pub price: f64,
    pub brand: String,
    pub vendor_id: String,
    /// Denormalized average rating; written through partial updates.
    pub rating: f64,
    pub review_count: i32,
    pub quantity: i32,
    pub discount_percent: Option<f64>,
    pub discount_price: Option<f64>,
    pub featured: bool,
    /// Does this product decompose into priced/stocked variants?
    pub variant_state: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial-field update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub about_in_bullets: Option<Vec<String>>,
    pub price: Option<f64>,
    pub brand: Option<String>,
    pub quantity: Option<i32>,
    pub discount_percent: Option<f64>,
    pub discount_price: Option<f64>,
    pub featured: Option<bool>,
    pub variant_state: Option<bool>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.about_in_bullets.is_none()
            && self.price.is_none()
            && self.brand.is_none()
            && self.quantity.is_none()
            && self.discount_percent.is_none()
            && self.discount_price.is_none()
            && self.featured.is_none()
            && self.variant_state.is_none()
            && self.rating.is_none()
            && self.review_count.is_none()
    }

    /// Apply the patch to a loaded record, recomputing `discount_price` when
    /// both `price` and `discount_percent` arrive in the same call.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(v) = &self.title {
            product.title = v.clone();
        }
        if let Some(v) = &self.description {
            product.description = v.clone();
        }
        if let Some(v) = &self.category {
            product.category = v.clone();
        }
        if let Some(v) = &self.about_in_bullets {
            product.about_in_bullets = v.clone();
        }
        if let Some(v) = self.price {
            product.price = v;
        }
        if let Some(v) = &self.brand {
            product.brand = v.clone();
        }
        if let Some(v) = self.quantity {
            product.quantity = v;
        }
        if let Some(v) = self.discount_percent {
            product.discount_percent = Some(v);
        }
        if let Some(v) = self.discount_price {
            product.discount_price = Some(v);
        }
        if let (Some(price), Some(pct)) = (self.price, self.discount_percent) {
            product.discount_price = Some(super::discounted_price(price, pct));
        }
        if let Some(v) = self.featured {
            product.featured = v;
        }
        if let Some(v) = self.variant_state {
            product.variant_state = v;
        }
        if let Some(v) = self.rating {
            product.rating = v;
        }
        if let Some(v) = self.review_count {
            product.review_count = v;
        }
        product.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            product_id: "PRD-TEST0001".into(),
            slug: "sample".into(),
            title: "Sample".into(),
            description: "A sample product".into(),
            category: "misc".into(),
            about_in_bullets: vec!["bullet".into()],
            price: 100.0,
            brand: "Acme".into(),
            vendor_id: "VND-TEST0001".into(),
            rating: 0.0,
            review_count: 0,
            quantity: 0,
            discount_percent: None,
            discount_price: None,
            featured: false,
            variant_state: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn patch_recomputes_discount_when_price_and_percent_change_together() {
        let mut p = sample();
        let patch = ProductPatch {
            price: Some(200.0),
            discount_percent: Some(25.0),
            ..Default::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.discount_price, Some(150.0));
    }

    #[test]
    fn patch_leaves_discount_alone_when_only_price_changes() {
        let mut p = sample();
        let patch = ProductPatch {
            price: Some(80.0),
            ..Default::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.price, 80.0);
        assert_eq!(p.discount_price, None);
    }
}
