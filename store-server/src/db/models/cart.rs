//! Cart Models
//!
//! Per-user mutable collection of pending purchases. Not authoritative
//! for stock; stock is only touched by the order engine.

use super::Product;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealdb::sql::Datetime;

/// One (product, quantity) line in a user's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub user: RecordId,
    pub product: RecordId,
    pub quantity: i64,
    #[serde(default)]
    pub updated_at: Option<Datetime>,
}

/// Cart line with the product record fetched (list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemDetail {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub product: Product,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartItemUpsert {
    /// Product id (`product:xyz`)
    pub product_id: String,
    pub quantity: i64,
}
