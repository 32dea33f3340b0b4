//! Order lifecycle engine
//!
//! The one place in the server allowed to mutate `product.stock` (apart
//! from the explicit admin authority override in the catalog API).
//!
//! # Rules
//!
//! - Orders are created in `PENDING`; creation validates stock but debits
//!   nothing.
//! - Entering `PROCESSING` checks and debits stock per line, atomically
//!   with the state write; any under-stocked line aborts the whole
//!   transition.
//! - `PROCESSING` -> `CANCELLED` credits stock back, atomically with the
//!   state write. Cancelling from `PENDING` credits nothing — no stock
//!   was ever debited.
//! - Every transition runs inside one database transaction guarded by
//!   the expected current state, so concurrent writers on the same
//!   order or product serialize and stock never goes negative.

pub mod engine;
pub mod error;

#[cfg(test)]
mod tests;

pub use engine::{OrderEngine, OrderLineRequest};
pub use error::OrderError;
