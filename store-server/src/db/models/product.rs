//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealdb::sql::Datetime;

pub type ProductId = RecordId;

/// Catalog product with a live stock counter
///
/// `price` is an integer in the smallest currency unit; formatting for
/// display happens at the presentation boundary only. `stock` is mutated
/// by the order engine at state-transition boundaries and by explicit
/// admin stock edits (authority override), never by anything else.
/// `rating` and `review_count` are derived from the review table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in minor units (e.g. cents)
    pub price: i64,
    /// Units available, never negative
    pub stock: i64,
    /// Ordered list of image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Record link to category
    pub category: RecordId,
    /// Mean of all review ratings for this product
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<Datetime>,
    #[serde(default)]
    pub updated_at: Option<Datetime>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i64,
    pub images: Option<Vec<String>>,
    /// Category id (`category:xyz`)
    pub category: String,
}

/// Partial update; `stock` here is the admin authority override
/// (a direct set, outside the order engine's invariant path).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}
