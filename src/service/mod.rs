//! Service layer: the business rules between the HTTP surface and the store.
//!
//! Every function takes the store as an explicit `&dyn Store` argument;
//! nothing here holds connection state.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub mod bundles;
pub mod catalog;
pub mod reviews;

/// A numeric field that clients may send as a JSON number or a numeric
/// string. Anything else is rejected, never silently zeroed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn as_f64(&self, field: &str) -> AppResult<f64> {
        match self {
            Numeric::Number(n) => Ok(*n),
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::validation(format!("{field} must be numeric"))),
        }
    }

    pub fn as_i32(&self, field: &str) -> AppResult<i32> {
        let v = self.as_f64(field)?;
        if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
            return Err(AppError::validation(format!("{field} must be an integer")));
        }
        Ok(v as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(Numeric::Number(12.5).as_f64("price").unwrap(), 12.5);
        assert_eq!(Numeric::Text("12.5".into()).as_f64("price").unwrap(), 12.5);
        assert_eq!(Numeric::Text(" 7 ".into()).as_i32("quantity").unwrap(), 7);
    }

    #[test]
    fn numeric_coercion_rejects_garbage() {
        assert!(Numeric::Text("abc".into()).as_f64("price").is_err());
        assert!(Numeric::Number(1.5).as_i32("quantity").is_err());
    }
}
