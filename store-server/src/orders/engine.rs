//! Order engine
//!
//! Creates orders and drives their state machine, adjusting product
//! stock transactionally at the transition boundaries.

use super::error::{OrderError, classify_db_error};
use crate::db::models::{Order, OrderLine, Product};
use crate::db::repository::record_id;
use shared::{OrderState, StockEffect};
use std::collections::BTreeMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// One requested line of an order
#[derive(Debug, Clone)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

// ── Transactional queries ───────────────────────────────────────────
//
// Each transition is a single BEGIN/COMMIT block. The current state is
// re-read and compared against the expected state inside the
// transaction, so read-check-write is atomic with respect to any other
// writer on the same order or product rows. THROW aborts the whole
// block with a marker that error.rs classifies back into a typed error.

/// State write plus per-line stock check-and-debit (entering PROCESSING)
const TRANSITION_DEBIT: &str = "\
BEGIN TRANSACTION; \
LET $order = (SELECT * FROM ONLY $order_id); \
IF $order IS NONE { THROW 'order_not_found' }; \
IF $order.state != $expected { THROW 'state_conflict' }; \
FOR $line IN $order.items { \
    LET $product = (SELECT * FROM ONLY $line.product); \
    IF $product IS NONE { THROW 'product_not_found:' + <string>$line.product }; \
    IF $product.stock < $line.quantity { THROW 'insufficient_stock:' + <string>$line.product }; \
    UPDATE $line.product SET stock -= $line.quantity, updated_at = time::now(); \
}; \
UPDATE $order_id SET state = $new_state, admin = $admin ?? admin, updated_at = time::now(); \
COMMIT TRANSACTION;";

/// State write plus per-line stock restore (PROCESSING -> CANCELLED)
const TRANSITION_CREDIT: &str = "\
BEGIN TRANSACTION; \
LET $order = (SELECT * FROM ONLY $order_id); \
IF $order IS NONE { THROW 'order_not_found' }; \
IF $order.state != $expected { THROW 'state_conflict' }; \
FOR $line IN $order.items { \
    UPDATE $line.product SET stock += $line.quantity, updated_at = time::now(); \
}; \
UPDATE $order_id SET state = $new_state, admin = $admin ?? admin, updated_at = time::now(); \
COMMIT TRANSACTION;";

/// State write only (no stock movement)
const TRANSITION_PLAIN: &str = "\
BEGIN TRANSACTION; \
LET $order = (SELECT * FROM ONLY $order_id); \
IF $order IS NONE { THROW 'order_not_found' }; \
IF $order.state != $expected { THROW 'state_conflict' }; \
UPDATE $order_id SET state = $new_state, admin = $admin ?? admin, updated_at = time::now(); \
COMMIT TRANSACTION;";

/// Payment-proof confirmation: proof write and PROCESSING debit in one
/// transaction, so a failed debit never leaves a confirmed proof behind
const CONFIRM_WITH_PROOF: &str = "\
BEGIN TRANSACTION; \
LET $order = (SELECT * FROM ONLY $order_id); \
IF $order IS NONE { THROW 'order_not_found' }; \
IF $order.state != $expected { THROW 'state_conflict' }; \
FOR $line IN $order.items { \
    LET $product = (SELECT * FROM ONLY $line.product); \
    IF $product IS NONE { THROW 'product_not_found:' + <string>$line.product }; \
    IF $product.stock < $line.quantity { THROW 'insufficient_stock:' + <string>$line.product }; \
    UPDATE $line.product SET stock -= $line.quantity, updated_at = time::now(); \
}; \
UPDATE $order_id SET state = $new_state, payment_proof = $proof, bank = $bank, \
    updated_at = time::now(); \
COMMIT TRANSACTION;";

/// The order lifecycle engine
#[derive(Clone)]
pub struct OrderEngine {
    db: Surreal<Db>,
}

impl OrderEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Create an order in `PENDING` from explicit items
    ///
    /// Validates that the address exists and belongs to the user, that
    /// every product exists and is active, and that every line is
    /// coverable by current stock. Nothing is debited here; stock moves
    /// when the order enters `PROCESSING`. Line items snapshot the
    /// product name and unit price at this moment.
    pub async fn create_order(
        &self,
        user: &RecordId,
        address_id: &str,
        items: Vec<OrderLineRequest>,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        // Merge duplicate product lines before validation
        let mut wanted: BTreeMap<String, i64> = BTreeMap::new();
        for item in &items {
            if item.quantity < 1 {
                return Err(OrderError::InvalidQuantity {
                    product: item.product_id.clone(),
                });
            }
            *wanted.entry(item.product_id.clone()).or_insert(0) += item.quantity;
        }

        let address: Option<crate::db::models::Address> = self
            .db
            .select(record_id("address", address_id))
            .await
            .map_err(classify_db_error)?;
        let address = address.ok_or_else(|| OrderError::AddressNotFound(address_id.to_string()))?;
        if &address.user != user {
            // Answer exactly like a missing address
            return Err(OrderError::AddressNotFound(address_id.to_string()));
        }

        let mut lines = Vec::with_capacity(wanted.len());
        for (product_id, quantity) in wanted {
            let product: Option<Product> = self
                .db
                .select(record_id("product", &product_id))
                .await
                .map_err(classify_db_error)?;
            let product = match product {
                Some(p) if p.is_active => p,
                _ => return Err(OrderError::ProductNotFound(product_id)),
            };
            if product.stock < quantity {
                return Err(OrderError::InsufficientStock {
                    product: product_id,
                });
            }
            lines.push(OrderLine {
                product: record_id("product", &product_id),
                name: product.name,
                unit_price: product.price,
                quantity,
            });
        }

        let now = surrealdb::sql::Datetime::from(chrono::Utc::now());
        let order = Order {
            id: None,
            user: user.clone(),
            address: address.id.unwrap_or_else(|| record_id("address", address_id)),
            admin: None,
            state: OrderState::Pending,
            bank: None,
            payment_proof: None,
            items: lines,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Order> = self
            .db
            .create("order")
            .content(order)
            .await
            .map_err(classify_db_error)?;
        created.ok_or_else(|| OrderError::Database("Failed to create order".to_string()))
    }

    /// Drive an order to `new_state`
    ///
    /// Same-state submissions are idempotent no-ops. The stock effect of
    /// the transition (debit, credit or none) runs in one transaction
    /// with the state write.
    pub async fn transition(
        &self,
        order_id: &str,
        new_state: OrderState,
        admin: Option<&RecordId>,
    ) -> Result<Order, OrderError> {
        let order_rid = record_id("order", order_id);
        let order: Option<Order> = self
            .db
            .select(order_rid.clone())
            .await
            .map_err(classify_db_error)?;
        let order = order.ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let from = order.state;
        if from == new_state {
            // Repeat submission: no state write, no stock movement
            return Ok(order);
        }
        if !from.can_transition_to(new_state) {
            return Err(OrderError::InvalidTransition {
                from,
                to: new_state,
            });
        }

        let query = match from.stock_effect(new_state) {
            StockEffect::Debit => TRANSITION_DEBIT,
            StockEffect::Credit => TRANSITION_CREDIT,
            StockEffect::None => TRANSITION_PLAIN,
        };

        self.db
            .query(query)
            .bind(("order_id", order_rid.clone()))
            .bind(("expected", from.as_str()))
            .bind(("new_state", new_state.as_str()))
            .bind(("admin", admin.cloned()))
            .await
            .map_err(classify_db_error)?
            .check()
            .map_err(classify_db_error)?;

        tracing::info!(
            target: "orders",
            order = %order_rid,
            from = %from,
            to = %new_state,
            "Order transitioned"
        );

        self.reload(order_rid, order_id).await
    }

    /// Attach a stored payment proof and confirm the order
    ///
    /// The caller has already persisted the proof image; this writes the
    /// proof reference and performs the `PENDING` -> `PROCESSING` debit
    /// in one transaction. On any failure the order keeps its previous
    /// state and carries no proof, and the caller should discard the
    /// stored file.
    pub async fn confirm_with_proof(
        &self,
        user: &RecordId,
        order_id: &str,
        proof_url: String,
        bank: String,
    ) -> Result<Order, OrderError> {
        let order_rid = record_id("order", order_id);
        let order: Option<Order> = self
            .db
            .select(order_rid.clone())
            .await
            .map_err(classify_db_error)?;
        let order = order.ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if &order.user != user {
            // Answer exactly like a missing order
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        }
        if order.state != OrderState::Pending {
            return Err(OrderError::InvalidTransition {
                from: order.state,
                to: OrderState::Processing,
            });
        }

        self.db
            .query(CONFIRM_WITH_PROOF)
            .bind(("order_id", order_rid.clone()))
            .bind(("expected", OrderState::Pending.as_str()))
            .bind(("new_state", OrderState::Processing.as_str()))
            .bind(("proof", proof_url))
            .bind(("bank", bank))
            .await
            .map_err(classify_db_error)?
            .check()
            .map_err(classify_db_error)?;

        tracing::info!(target: "orders", order = %order_rid, "Payment proof attached, order confirmed");

        self.reload(order_rid, order_id).await
    }

    async fn reload(&self, rid: RecordId, order_id: &str) -> Result<Order, OrderError> {
        let order: Option<Order> = self.db.select(rid).await.map_err(classify_db_error)?;
        order.ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }
}
