//! Shared types for the Arbor storefront
//!
//! Wire-level types used by the store server and its clients:
//! order state machine and request DTOs.

pub mod order;
pub mod request;

// Re-exports
pub use order::{OrderState, OrderStateParseError, StockEffect};
pub use serde::{Deserialize, Serialize};
