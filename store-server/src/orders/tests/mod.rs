use super::*;
use crate::db;
use crate::db::models::{Address, Category, Order, Product, User, UserRole};
use crate::db::repository::record_id;
use shared::OrderState;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

mod test_checkout;
mod test_lifecycle;
mod test_stock;

/// In-memory store with one seeded customer and shipping address
struct TestStore {
    db: Surreal<Db>,
    engine: OrderEngine,
    user: RecordId,
    address_id: String,
}

async fn setup() -> TestStore {
    let db = db::connect_memory().await.unwrap();

    let user: Option<User> = db
        .create(("user", "alice"))
        .content(User {
            id: None,
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            password_hash: Some("unused".to_string()),
            role: UserRole::Customer,
            created_at: None,
        })
        .await
        .unwrap();
    let user = user.unwrap().id.unwrap();

    let address: Option<Address> = db
        .create(("address", "home"))
        .content(Address {
            id: None,
            user: user.clone(),
            recipient: "Alice".to_string(),
            phone: "600000000".to_string(),
            street: "1 Elm Street".to_string(),
            city: "Porto".to_string(),
            province: "Porto".to_string(),
            postal_code: "4000-001".to_string(),
            created_at: None,
        })
        .await
        .unwrap();
    let address_id = address.unwrap().id.unwrap().to_string();

    let category: Option<Category> = db
        .create(("category", "seating"))
        .content(Category {
            id: None,
            name: "Seating".to_string(),
            description: String::new(),
            sort_order: 0,
            is_active: true,
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();
    assert!(category.is_some());

    TestStore {
        engine: OrderEngine::new(db.clone()),
        db,
        user,
        address_id,
    }
}

impl TestStore {
    /// Seed a product with the given price (minor units) and stock
    async fn seed_product(&self, key: &str, price: i64, stock: i64) -> String {
        let product: Option<Product> = self
            .db
            .create(("product", key))
            .content(Product {
                id: None,
                name: key.to_string(),
                description: String::new(),
                price,
                stock,
                images: vec![],
                category: record_id("category", "seating"),
                rating: 0.0,
                review_count: 0,
                is_active: true,
                created_at: None,
                updated_at: None,
            })
            .await
            .unwrap();
        product.unwrap().id.unwrap().to_string()
    }

    async fn stock_of(&self, product_id: &str) -> i64 {
        let product: Option<Product> = self
            .db
            .select(record_id("product", product_id))
            .await
            .unwrap();
        product.unwrap().stock
    }

    /// Create a PENDING order for one product
    async fn pending_order(&self, product_id: &str, quantity: i64) -> Order {
        self.engine
            .create_order(
                &self.user,
                &self.address_id,
                vec![OrderLineRequest {
                    product_id: product_id.to_string(),
                    quantity,
                }],
            )
            .await
            .unwrap()
    }

    /// Create an order and confirm it into PROCESSING via payment proof
    async fn processing_order(&self, product_id: &str, quantity: i64) -> Order {
        let order = self.pending_order(product_id, quantity).await;
        self.engine
            .confirm_with_proof(
                &self.user,
                &order.id.as_ref().unwrap().to_string(),
                "/uploads/proof.jpg".to_string(),
                "Caixa".to_string(),
            )
            .await
            .unwrap()
    }
}

fn order_id(order: &Order) -> String {
    order.id.as_ref().unwrap().to_string()
}
