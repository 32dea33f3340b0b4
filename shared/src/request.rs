//! Wire request DTOs
//!
//! Explicit request shapes for the order endpoints. Unknown or missing
//! fields are rejected at the boundary rather than defaulted silently.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One requested line of a checkout
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CheckoutItem {
    /// Product record id (`product:xyz`)
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
}

/// POST /api/orders — create an order from explicit items
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CheckoutRequest {
    /// Address record id (`address:xyz`)
    #[validate(length(min = 1))]
    pub address_id: String,
    /// Omitted or empty means "check out my whole cart"
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CheckoutItem>,
}

/// PUT /api/orders/{id}/state — admin-driven transition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SetStateRequest {
    /// Target state, wire enum (`PENDING | PROCESSING | SHIPPED | DELIVERED | CANCELLED`)
    #[validate(length(min = 1))]
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_rejected() {
        let body = r#"{"address_id":"address:a1","items":[],"coupon":"X"}"#;
        assert!(serde_json::from_str::<CheckoutRequest>(body).is_err());
    }

    #[test]
    fn test_missing_items_defaults_to_cart_checkout() {
        let body = r#"{"address_id":"address:a1"}"#;
        let req: CheckoutRequest = serde_json::from_str(body).unwrap();
        assert!(req.items.is_empty());
    }
}
