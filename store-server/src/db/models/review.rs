//! Review Model
//!
//! A review references the delivered order it came from directly, so
//! eligibility is a simple existence/ownership check. Featured reviews
//! double as the storefront's testimonials.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealdb::sql::Datetime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub user: RecordId,
    pub product: RecordId,
    /// The delivered order this review is based on
    pub order: RecordId,
    /// 1..=5
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    /// Featured testimonials are surfaced on the storefront
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub created_at: Option<Datetime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewCreate {
    /// Product id (`product:xyz`)
    pub product_id: String,
    /// Order id (`order:xyz`), must be DELIVERED and owned by the caller
    pub order_id: String,
    pub rating: i64,
    pub comment: Option<String>,
}
