//! Product combinations ("bundles"): a parent product grouped with required
//! child products and quantities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCombination {
    pub combination_id: String,
    pub parent_product_id: String,
    pub combination_name: String,
    pub description: Option<String>,
    /// Ordered, non-empty. A product may appear in many bundles, as parent
    /// and as child; the graph is not checked for cycles (bundles are treated
    /// as single-level merchandising groups).
    pub child_products: Vec<ChildProduct>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProduct {
    pub product_id: String,
    pub quantity: i64,
}

/// Shape check for a child list: non-empty, every entry with a non-empty
/// product id and a positive integer quantity. Existence of the referenced
/// products is the service's job.
pub fn validate_children(children: &[ChildProduct]) -> AppResult<()> {
    if children.is_empty() {
        return Err(AppError::validation(
            "child_products must be a non-empty array",
        ));
    }
    for (idx, child) in children.iter().enumerate() {
        if child.product_id.trim().is_empty() {
            return Err(AppError::validation(format!(
                "child_products[{idx}].product_id must be a non-empty string"
            )));
        }
        if child.quantity < 1 {
            return Err(AppError::validation(format!(
                "child_products[{idx}].quantity must be a positive integer"
            )));
        }
    }
    Ok(())
}

impl ProductCombination {
    pub fn contains(&self, product_id: &str) -> bool {
        self.child_products.iter().any(|c| c.product_id == product_id)
    }

    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        self.child_products.iter().map(|c| c.product_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(id: &str, qty: i64) -> ChildProduct {
        ChildProduct {
            product_id: id.into(),
            quantity: qty,
        }
    }

    #[test]
    fn empty_child_list_is_rejected() {
        assert!(validate_children(&[]).is_err());
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        assert!(validate_children(&[child("PRD-A", 0)]).is_err());
        assert!(validate_children(&[child("PRD-A", -3)]).is_err());
        assert!(validate_children(&[child("PRD-A", 1)]).is_ok());
    }

    #[test]
    fn blank_product_id_is_rejected() {
        let err = validate_children(&[child("  ", 2)]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
