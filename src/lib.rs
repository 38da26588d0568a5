//! Vendora - self-hosted multi-vendor commerce backend.
//!
//! ## Features
//! - Product catalog with priced/stocked variants
//! - Product combinations ("bundles") of a parent plus required children
//! - Reviews with mutually exclusive like/dislike reactions and replies
//! - Derived review statistics (aggregates, top-liked)
//! - Collision-checked short ids and URL slugs

pub mod domain;
pub mod error;
pub mod http;
pub mod ids;
pub mod response;
pub mod service;
pub mod store;

pub use error::{AppError, AppResult};
