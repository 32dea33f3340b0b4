//! Engine errors
//!
//! Transaction aborts inside SurrealQL surface as thrown strings; the
//! markers are classified back into typed errors here.

use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::OrderState;
use thiserror::Error;

/// Marker prefixes thrown by the engine's transactional queries
const THROW_ORDER_NOT_FOUND: &str = "order_not_found";
const THROW_PRODUCT_NOT_FOUND: &str = "product_not_found:";
const THROW_INSUFFICIENT_STOCK: &str = "insufficient_stock:";
const THROW_STATE_CONFLICT: &str = "state_conflict";

/// Order engine errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for product {product}")]
    InsufficientStock { product: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: OrderState, to: OrderState },

    #[error("Unknown order state: {0}")]
    UnknownState(String),

    #[error("Order was modified concurrently")]
    StateConflict,

    #[error("Empty order: no items to purchase")]
    EmptyOrder,

    #[error("Invalid quantity for product {product}")]
    InvalidQuantity { product: String },

    #[error("Database error: {0}")]
    Database(String),
}

/// Classify a database error, recovering thrown transaction markers
///
/// The embedded engine reports `THROW` as a generic error string, so
/// the markers are matched back out of the message (same approach the
/// storage layer uses for disk-level failures).
pub(crate) fn classify_db_error(err: surrealdb::Error) -> OrderError {
    let msg = err.to_string();

    if let Some(idx) = msg.find(THROW_INSUFFICIENT_STOCK) {
        let product = marker_argument(&msg[idx + THROW_INSUFFICIENT_STOCK.len()..]);
        return OrderError::InsufficientStock { product };
    }
    if let Some(idx) = msg.find(THROW_PRODUCT_NOT_FOUND) {
        let product = marker_argument(&msg[idx + THROW_PRODUCT_NOT_FOUND.len()..]);
        return OrderError::ProductNotFound(product);
    }
    if msg.contains(THROW_STATE_CONFLICT) {
        return OrderError::StateConflict;
    }
    if msg.contains(THROW_ORDER_NOT_FOUND) {
        return OrderError::OrderNotFound(String::new());
    }

    OrderError::Database(msg)
}

/// The marker argument runs to the end of the thrown string; trim the
/// quote/punctuation the error formatting may append.
fn marker_argument(rest: &str) -> String {
    rest.trim_end_matches(|c: char| !(c.is_alphanumeric() || c == ':' || c == '_' || c == '-'))
        .to_string()
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => OrderError::OrderNotFound(msg),
            other => OrderError::Database(other.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match &err {
            OrderError::OrderNotFound(_)
            | OrderError::AddressNotFound(_)
            | OrderError::ProductNotFound(_) => AppError::not_found(err.to_string()),
            OrderError::InsufficientStock { .. } => AppError::business_rule(err.to_string()),
            OrderError::InvalidTransition { .. } | OrderError::UnknownState(_) => {
                AppError::business_rule(err.to_string())
            }
            OrderError::StateConflict => AppError::conflict(err.to_string()),
            OrderError::EmptyOrder | OrderError::InvalidQuantity { .. } => {
                AppError::validation(err.to_string())
            }
            OrderError::Database(msg) => AppError::database(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thrown(msg: &str) -> surrealdb::Error {
        surrealdb::Error::Db(surrealdb::error::Db::Thrown(msg.to_string()))
    }

    #[test]
    fn test_classify_insufficient_stock() {
        let err = classify_db_error(thrown("insufficient_stock:product:oak_table"));
        match err {
            OrderError::InsufficientStock { product } => {
                assert_eq!(product, "product:oak_table");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_classify_state_conflict() {
        assert!(matches!(
            classify_db_error(thrown("state_conflict")),
            OrderError::StateConflict
        ));
    }

    #[test]
    fn test_classify_unknown_falls_back_to_database() {
        assert!(matches!(
            classify_db_error(thrown("disk io error")),
            OrderError::Database(_)
        ));
    }
}
