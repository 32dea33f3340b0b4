//! Cart Repository
//!
//! Per-user cart lines, keyed (user, product). The cart never touches
//! stock; the checkout flow clears it after a successful order creation.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{CartItem, CartItemDetail};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "cart_item";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All cart lines for a user, products fetched
    pub async fn find_for_user(&self, user: &RecordId) -> RepoResult<Vec<CartItemDetail>> {
        let items: Vec<CartItemDetail> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE user = $user ORDER BY updated_at FETCH product")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Raw cart lines (record links only), checkout path
    pub async fn find_lines(&self, user: &RecordId) -> RepoResult<Vec<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE user = $user")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Add quantity to a cart line, creating it if absent
    pub async fn add(
        &self,
        user: &RecordId,
        product_id: &str,
        quantity: i64,
    ) -> RepoResult<CartItem> {
        if quantity < 1 {
            return Err(RepoError::Validation("quantity must be at least 1".into()));
        }
        let product = record_id("product", product_id);
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT cart_item SET user = $user, product = $product, \
                 quantity += $quantity, updated_at = time::now() \
                 WHERE user = $user AND product = $product RETURN AFTER",
            )
            .bind(("user", user.clone()))
            .bind(("product", product))
            .bind(("quantity", quantity))
            .await?;
        let items: Vec<CartItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to upsert cart item".to_string()))
    }

    /// Set the quantity of an existing cart line
    pub async fn set_quantity(
        &self,
        user: &RecordId,
        item_id: &str,
        quantity: i64,
    ) -> RepoResult<CartItem> {
        if quantity < 1 {
            return Err(RepoError::Validation("quantity must be at least 1".into()));
        }
        let thing = record_id(TABLE, item_id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET quantity = $quantity, updated_at = time::now() \
                 WHERE user = $user RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("quantity", quantity))
            .bind(("user", user.clone()))
            .await?;
        let items: Vec<CartItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart item {} not found", item_id)))
    }

    /// Remove one cart line owned by the user
    pub async fn remove(&self, user: &RecordId, item_id: &str) -> RepoResult<()> {
        let thing = record_id(TABLE, item_id);
        let mut result = self
            .base
            .db()
            .query("DELETE $thing WHERE user = $user RETURN BEFORE")
            .bind(("thing", thing))
            .bind(("user", user.clone()))
            .await?;
        let removed: Vec<CartItem> = result.take(0)?;
        if removed.is_empty() {
            return Err(RepoError::NotFound(format!(
                "Cart item {} not found",
                item_id
            )));
        }
        Ok(())
    }

    /// Clear the whole cart (called after a successful checkout)
    pub async fn clear(&self, user: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_item WHERE user = $user")
            .bind(("user", user.clone()))
            .await?;
        Ok(())
    }
}
