//! Order state machine
//!
//! The lifecycle of a storefront order and the stock movement each
//! transition implies. The server's order engine executes these rules
//! inside database transactions; clients use the same enum on the wire.
//!
//! ```text
//! PENDING ──> PROCESSING ──> SHIPPED ──> DELIVERED
//!    │             │
//!    └──> CANCELLED <──┘
//! ```
//!
//! Stock is debited when an order enters `PROCESSING` (the order is
//! confirmed for fulfillment) and credited back only when a confirmed
//! order is cancelled. An order cancelled while still `PENDING` never
//! debited stock, so cancelling it must not credit anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted order state (wire-visible enum)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Created, awaiting payment proof
    Pending,
    /// Confirmed for fulfillment, stock debited
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer (terminal)
    Delivered,
    /// Cancelled (terminal)
    Cancelled,
}

/// Stock movement implied by a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    /// Check and decrement stock per order line
    Debit,
    /// Restore stock per order line
    Credit,
    /// State write only
    None,
}

/// Failed to parse a state string from the wire or the database
#[derive(Debug, Error)]
#[error("unknown order state: {0}")]
pub struct OrderStateParseError(pub String);

impl OrderState {
    /// All states, in lifecycle order
    pub const ALL: [OrderState; 5] = [
        OrderState::Pending,
        OrderState::Processing,
        OrderState::Shipped,
        OrderState::Delivered,
        OrderState::Cancelled,
    ];

    /// Wire representation (matches the serde rename)
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Pending => "PENDING",
            OrderState::Processing => "PROCESSING",
            OrderState::Shipped => "SHIPPED",
            OrderState::Delivered => "DELIVERED",
            OrderState::Cancelled => "CANCELLED",
        }
    }

    /// No further transition is defined from a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Delivered | OrderState::Cancelled)
    }

    /// Transition table
    ///
    /// A same-state transition is always permitted and is a no-op
    /// (idempotent re-submission must not double-adjust stock).
    pub fn can_transition_to(&self, next: OrderState) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (OrderState::Pending, OrderState::Processing)
                | (OrderState::Pending, OrderState::Cancelled)
                | (OrderState::Processing, OrderState::Shipped)
                | (OrderState::Processing, OrderState::Cancelled)
                | (OrderState::Shipped, OrderState::Delivered)
        )
    }

    /// Stock movement for a valid transition out of `self` into `next`
    ///
    /// Entering `PROCESSING` from any other state debits stock; leaving
    /// `PROCESSING` into `CANCELLED` credits it back. Everything else,
    /// including same-state no-ops, moves no stock.
    pub fn stock_effect(&self, next: OrderState) -> StockEffect {
        if *self == next {
            return StockEffect::None;
        }
        match (self, next) {
            (_, OrderState::Processing) => StockEffect::Debit,
            (OrderState::Processing, OrderState::Cancelled) => StockEffect::Credit,
            _ => StockEffect::None,
        }
    }
}

impl std::str::FromStr for OrderState {
    type Err = OrderStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderState::Pending),
            "PROCESSING" => Ok(OrderState::Processing),
            "SHIPPED" => Ok(OrderState::Shipped),
            "DELIVERED" => Ok(OrderState::Delivered),
            "CANCELLED" => Ok(OrderState::Cancelled),
            other => Err(OrderStateParseError(other.to_string())),
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_forward_path() {
        assert!(OrderState::Pending.can_transition_to(OrderState::Processing));
        assert!(OrderState::Processing.can_transition_to(OrderState::Shipped));
        assert!(OrderState::Shipped.can_transition_to(OrderState::Delivered));
    }

    #[test]
    fn test_cancellation_reachability() {
        assert!(OrderState::Pending.can_transition_to(OrderState::Cancelled));
        assert!(OrderState::Processing.can_transition_to(OrderState::Cancelled));
        assert!(!OrderState::Shipped.can_transition_to(OrderState::Cancelled));
        assert!(!OrderState::Delivered.can_transition_to(OrderState::Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [OrderState::Delivered, OrderState::Cancelled] {
            assert!(terminal.is_terminal());
            for next in OrderState::ALL {
                if next != terminal {
                    assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
                }
            }
        }
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!OrderState::Pending.can_transition_to(OrderState::Shipped));
        assert!(!OrderState::Pending.can_transition_to(OrderState::Delivered));
        assert!(!OrderState::Processing.can_transition_to(OrderState::Delivered));
        // No going backwards either
        assert!(!OrderState::Shipped.can_transition_to(OrderState::Processing));
        assert!(!OrderState::Processing.can_transition_to(OrderState::Pending));
    }

    #[test]
    fn test_same_state_is_noop() {
        for state in OrderState::ALL {
            assert!(state.can_transition_to(state));
            assert_eq!(state.stock_effect(state), StockEffect::None);
        }
    }

    #[test]
    fn test_stock_effects() {
        assert_eq!(
            OrderState::Pending.stock_effect(OrderState::Processing),
            StockEffect::Debit
        );
        assert_eq!(
            OrderState::Processing.stock_effect(OrderState::Cancelled),
            StockEffect::Credit
        );
        // Cancelling an unconfirmed order never credits stock
        assert_eq!(
            OrderState::Pending.stock_effect(OrderState::Cancelled),
            StockEffect::None
        );
        assert_eq!(
            OrderState::Processing.stock_effect(OrderState::Shipped),
            StockEffect::None
        );
        assert_eq!(
            OrderState::Shipped.stock_effect(OrderState::Delivered),
            StockEffect::None
        );
    }

    #[test]
    fn test_wire_round_trip() {
        for state in OrderState::ALL {
            assert_eq!(OrderState::from_str(state.as_str()).unwrap(), state);
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
        assert!(OrderState::from_str("REFUNDED").is_err());
    }
}
