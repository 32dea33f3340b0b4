//! Order creation: validation, snapshots, round-trip

use super::*;

#[tokio::test]
async fn test_create_order_round_trip() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let chair = store.seed_product("chair", 39_950, 10).await;

    let order = store
        .engine
        .create_order(
            &store.user,
            &store.address_id,
            vec![
                OrderLineRequest {
                    product_id: table.clone(),
                    quantity: 1,
                },
                OrderLineRequest {
                    product_id: chair.clone(),
                    quantity: 4,
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(order.state, OrderState::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total(), 149_900 + 4 * 39_950);

    // Reading the order back returns exactly what was submitted
    let reread: Option<Order> = store.db.select(order.id.clone().unwrap()).await.unwrap();
    let reread = reread.unwrap();
    assert_eq!(reread.items, order.items);
    assert_eq!(reread.state, OrderState::Pending);

    // Creation never debits stock; that happens on PROCESSING entry
    assert_eq!(store.stock_of(&table).await, 5);
    assert_eq!(store.stock_of(&chair).await, 10);
}

#[tokio::test]
async fn test_create_order_snapshots_price() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;

    let order = store.pending_order(&table, 1).await;

    // Admin edits the price afterwards; the order total must not move
    store
        .db
        .query("UPDATE $p SET price = 999")
        .bind(("p", record_id("product", &table)))
        .await
        .unwrap();

    let reread: Option<Order> = store.db.select(order.id.clone().unwrap()).await.unwrap();
    assert_eq!(reread.unwrap().total(), 149_900);
}

#[tokio::test]
async fn test_create_order_merges_duplicate_lines() {
    let store = setup().await;
    let chair = store.seed_product("chair", 39_950, 10).await;

    let order = store
        .engine
        .create_order(
            &store.user,
            &store.address_id,
            vec![
                OrderLineRequest {
                    product_id: chair.clone(),
                    quantity: 2,
                },
                OrderLineRequest {
                    product_id: chair.clone(),
                    quantity: 3,
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 5);
}

#[tokio::test]
async fn test_create_order_rejects_empty_and_bad_quantity() {
    let store = setup().await;
    let chair = store.seed_product("chair", 39_950, 10).await;

    let err = store
        .engine
        .create_order(&store.user, &store.address_id, vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyOrder));

    let err = store
        .engine
        .create_order(
            &store.user,
            &store.address_id,
            vec![OrderLineRequest {
                product_id: chair,
                quantity: 0,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidQuantity { .. }));
}

#[tokio::test]
async fn test_create_order_identifies_understocked_product() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let sofa = store.seed_product("sofa", 299_000, 1).await;

    let err = store
        .engine
        .create_order(
            &store.user,
            &store.address_id,
            vec![
                OrderLineRequest {
                    product_id: table,
                    quantity: 2,
                },
                OrderLineRequest {
                    product_id: sofa.clone(),
                    quantity: 3,
                },
            ],
        )
        .await
        .unwrap_err();

    match err {
        OrderError::InsufficientStock { product } => assert_eq!(product, sofa),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_order_missing_product_and_address() {
    let store = setup().await;

    let err = store
        .engine
        .create_order(
            &store.user,
            &store.address_id,
            vec![OrderLineRequest {
                product_id: "product:ghost".to_string(),
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ProductNotFound(_)));

    let chair = store.seed_product("chair", 39_950, 10).await;
    let err = store
        .engine
        .create_order(
            &store.user,
            "address:nowhere",
            vec![OrderLineRequest {
                product_id: chair,
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AddressNotFound(_)));
}

#[tokio::test]
async fn test_create_order_rejects_foreign_address() {
    let store = setup().await;
    let chair = store.seed_product("chair", 39_950, 10).await;

    let mallory: Option<User> = store
        .db
        .create(("user", "mallory"))
        .content(User {
            id: None,
            email: "mallory@example.com".to_string(),
            name: "Mallory".to_string(),
            password_hash: Some("unused".to_string()),
            role: UserRole::Customer,
            created_at: None,
        })
        .await
        .unwrap();
    let mallory = mallory.unwrap().id.unwrap();

    // Mallory tries to check out against Alice's address; the answer
    // must match a missing address, revealing nothing
    let err = store
        .engine
        .create_order(
            &mallory,
            &store.address_id,
            vec![OrderLineRequest {
                product_id: chair.clone(),
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AddressNotFound(_)));

    let ghost_err = store
        .engine
        .create_order(
            &mallory,
            "address:nowhere",
            vec![OrderLineRequest {
                product_id: chair,
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    let status = |e: OrderError| {
        axum::response::IntoResponse::into_response(crate::utils::AppError::from(e)).status()
    };
    assert_eq!(status(err), status(ghost_err));
}

#[tokio::test]
async fn test_create_order_rejects_inactive_product() {
    let store = setup().await;
    let chair = store.seed_product("chair", 39_950, 10).await;
    store
        .db
        .query("UPDATE $p SET is_active = false")
        .bind(("p", record_id("product", &chair)))
        .await
        .unwrap();

    let err = store
        .engine
        .create_order(
            &store.user,
            &store.address_id,
            vec![OrderLineRequest {
                product_id: chair,
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ProductNotFound(_)));
}
