//! Product variant: a priced, stocked specialization of exactly one product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub variant_id: String,
    pub parent_product_id: String,
    /// Globally unique across the variant namespace. Derived from the parent
    /// slug plus the normalized variant name; a collision gets a timestamp
    /// suffix, never an error. Once allocated, a slug is never reused.
    pub slug: String,
    pub variant_name: String,
    /// Free-form axis label, e.g. "size" or "color".
    pub variant_type: String,
    pub price: f64,
    pub quantity: i32,
    pub discount_percent: Option<f64>,
    pub discount_price: Option<f64>,
    /// Inactive variants are excluded from every public read.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantPatch {
    pub variant_name: Option<String>,
    pub variant_type: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub discount_percent: Option<f64>,
    pub discount_price: Option<f64>,
    pub is_active: Option<bool>,
}

impl VariantPatch {
    pub fn is_empty(&self) -> bool {
        self.variant_name.is_none()
            && self.variant_type.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.discount_percent.is_none()
            && self.discount_price.is_none()
            && self.is_active.is_none()
    }

    pub fn apply_to(&self, variant: &mut ProductVariant) {
        if let Some(v) = &self.variant_name {
            variant.variant_name = v.clone();
        }
        if let Some(v) = &self.variant_type {
            variant.variant_type = v.clone();
        }
        if let Some(v) = self.price {
            variant.price = v;
        }
        if let Some(v) = self.quantity {
            variant.quantity = v;
        }
        if let Some(v) = self.discount_percent {
            variant.discount_percent = Some(v);
        }
        if let Some(v) = self.discount_price {
            variant.discount_price = Some(v);
        }
        if let (Some(price), Some(pct)) = (self.price, self.discount_percent) {
            variant.discount_price = Some(super::discounted_price(price, pct));
        }
        if let Some(v) = self.is_active {
            variant.is_active = v;
        }
        variant.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_recomputes_discount_with_price_and_percent() {
        let mut v = ProductVariant {
            variant_id: "VAR-TEST0001".into(),
            parent_product_id: "PRD-TEST0001".into(),
            slug: "sample-large".into(),
            variant_name: "Large".into(),
            variant_type: "size".into(),
            price: 120.0,
            quantity: 5,
            discount_percent: Some(10.0),
            discount_price: Some(108.0),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let patch = VariantPatch {
            price: Some(150.0),
            discount_percent: Some(20.0),
            ..Default::default()
        };
        patch.apply_to(&mut v);
        assert_eq!(v.discount_price, Some(120.0));
    }
}
