//! Domain records and the pure invariants that live on them.
//!
//! Everything here is storage-agnostic: the persistence adapter owns how sets
//! and lists are encoded (Postgres arrays/JSONB), these types only ever see
//! structured data.

pub mod combination;
pub mod product;
pub mod profile;
pub mod review;
pub mod variant;

pub use combination::{ChildProduct, ProductCombination};
pub use product::{Product, ProductPatch};
pub use profile::{UserProfile, VendorProfile};
pub use review::{ProductReview, ReactionError, Reply, ReviewSort, ReviewStats};
pub use variant::{ProductVariant, VariantPatch};

/// `price * (1 - pct/100)`, rounded to cents.
pub fn discounted_price(price: f64, discount_percent: f64) -> f64 {
    let raw = price - price * discount_percent / 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_price_derivation() {
        assert_eq!(discounted_price(120.0, 10.0), 108.0);
        assert_eq!(discounted_price(100.0, 0.0), 100.0);
        assert_eq!(discounted_price(19.99, 25.0), 14.99);
    }
}
