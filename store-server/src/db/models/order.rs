//! Order Model
//!
//! An order owns its line items as an embedded array: they are created
//! atomically with the order and never change afterwards. Only `state`,
//! `payment_proof`/`bank`, `admin` and `updated_at` mutate once the row
//! exists.

use serde::{Deserialize, Serialize};
use shared::OrderState;
use surrealdb::RecordId;
use surrealdb::sql::Datetime;

/// One line item, fixed at creation
///
/// `name` and `unit_price` are snapshots taken from the product when the
/// order was created, so later catalog edits never change what this
/// order charged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product: RecordId,
    pub name: String,
    /// Minor currency units, snapshot at creation
    pub unit_price: i64,
    pub quantity: i64,
}

impl OrderLine {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity
    }
}

/// Customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub user: RecordId,
    pub address: RecordId,
    /// Handling admin, assigned on the first admin-driven transition
    #[serde(default)]
    pub admin: Option<RecordId>,
    pub state: OrderState,
    /// Bank chosen for the manual transfer
    #[serde(default)]
    pub bank: Option<String>,
    /// URL of the uploaded transfer evidence
    #[serde(default)]
    pub payment_proof: Option<String>,
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub created_at: Option<Datetime>,
    #[serde(default)]
    pub updated_at: Option<Datetime>,
}

impl Order {
    /// Order total from the snapshot prices
    pub fn total(&self) -> i64 {
        self.items.iter().map(OrderLine::line_total).sum()
    }

    /// Whether this order holds a line for the given product
    pub fn contains_product(&self, product: &RecordId) -> bool {
        self.items.iter().any(|line| &line.product == product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(key: &str, unit_price: i64, quantity: i64) -> OrderLine {
        OrderLine {
            product: RecordId::from_table_key("product", key),
            name: key.to_string(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn test_total_uses_price_snapshot() {
        let order = Order {
            id: None,
            user: RecordId::from_table_key("user", "u1"),
            address: RecordId::from_table_key("address", "a1"),
            admin: None,
            state: OrderState::Pending,
            bank: None,
            payment_proof: None,
            items: vec![line("oak_table", 149_900, 1), line("chair", 39_950, 4)],
            created_at: None,
            updated_at: None,
        };
        assert_eq!(order.total(), 149_900 + 4 * 39_950);
        assert!(order.contains_product(&RecordId::from_table_key("product", "chair")));
        assert!(!order.contains_product(&RecordId::from_table_key("product", "sofa")));
    }
}
