//! Vendor and user profiles. Their CRUD lives elsewhere; the core only needs
//! them for existence checks and foreign keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VendorProfile {
    pub vendor_id: String,
    pub slug: String,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_uuid: String,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
