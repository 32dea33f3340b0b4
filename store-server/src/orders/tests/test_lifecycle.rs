//! State machine enforcement and payment-proof confirmation

use super::*;

#[tokio::test]
async fn test_full_forward_path() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.processing_order(&table, 2).await;
    let id = order_id(&order);

    let order = store
        .engine
        .transition(&id, OrderState::Shipped, None)
        .await
        .unwrap();
    assert_eq!(order.state, OrderState::Shipped);

    let order = store
        .engine
        .transition(&id, OrderState::Delivered, None)
        .await
        .unwrap();
    assert_eq!(order.state, OrderState::Delivered);

    // Only the PROCESSING entry moved stock
    assert_eq!(store.stock_of(&table).await, 3);
}

#[tokio::test]
async fn test_invalid_transitions_rejected() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.pending_order(&table, 1).await;
    let id = order_id(&order);

    // PENDING cannot skip ahead
    for target in [OrderState::Shipped, OrderState::Delivered] {
        let err = store
            .engine
            .transition(&id, target, None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    // Terminal states accept nothing
    store
        .engine
        .transition(&id, OrderState::Cancelled, None)
        .await
        .unwrap();
    for target in [
        OrderState::Pending,
        OrderState::Processing,
        OrderState::Shipped,
        OrderState::Delivered,
    ] {
        let err = store
            .engine
            .transition(&id, target, None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }
}

#[tokio::test]
async fn test_transition_unknown_order() {
    let store = setup().await;
    let err = store
        .engine
        .transition("order:ghost", OrderState::Processing, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_admin_assignment_on_transition() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.processing_order(&table, 1).await;
    assert!(order.admin.is_none());

    let admin = record_id("user", "backoffice");
    let order = store
        .engine
        .transition(&order_id(&order), OrderState::Shipped, Some(&admin))
        .await
        .unwrap();
    assert_eq!(order.admin, Some(admin.clone()));

    // A later transition without an operator keeps the assignment
    let order = store
        .engine
        .transition(&order_id(&order), OrderState::Delivered, None)
        .await
        .unwrap();
    assert_eq!(order.admin, Some(admin));
}

#[tokio::test]
async fn test_confirm_with_proof_sets_proof_and_debits() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.pending_order(&table, 3).await;

    let order = store
        .engine
        .confirm_with_proof(
            &store.user,
            &order_id(&order),
            "/uploads/transfer.jpg".to_string(),
            "Millennium".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(order.state, OrderState::Processing);
    assert_eq!(order.payment_proof.as_deref(), Some("/uploads/transfer.jpg"));
    assert_eq!(order.bank.as_deref(), Some("Millennium"));
    assert_eq!(store.stock_of(&table).await, 2);
}

#[tokio::test]
async fn test_confirm_with_proof_requires_ownership() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.pending_order(&table, 1).await;

    // A stranger asking about someone else's order gets the same answer
    // as asking about an order that does not exist
    let stranger = record_id("user", "stranger");
    let err = store
        .engine
        .confirm_with_proof(
            &stranger,
            &order_id(&order),
            "/uploads/x.jpg".to_string(),
            "Caixa".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));
    assert_eq!(store.stock_of(&table).await, 5);

    let ghost_err = store
        .engine
        .confirm_with_proof(
            &stranger,
            "order:ghost",
            "/uploads/x.jpg".to_string(),
            "Caixa".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(ghost_err, OrderError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_confirm_with_proof_rejected_when_not_pending() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.processing_order(&table, 1).await;

    let err = store
        .engine
        .confirm_with_proof(
            &store.user,
            &order_id(&order),
            "/uploads/second.jpg".to_string(),
            "Caixa".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
    // The first confirmation's debit stands, nothing extra moved
    assert_eq!(store.stock_of(&table).await, 4);
}

#[tokio::test]
async fn test_confirm_with_proof_insufficient_stock_keeps_order_unconfirmed() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.pending_order(&table, 3).await;

    // A concurrent sale drains the stock before the proof arrives
    store
        .db
        .query("UPDATE $p SET stock = 1")
        .bind(("p", record_id("product", &table)))
        .await
        .unwrap();

    let err = store
        .engine
        .confirm_with_proof(
            &store.user,
            &order_id(&order),
            "/uploads/late.jpg".to_string(),
            "Caixa".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InsufficientStock { .. }));

    // Order stays PENDING with no proof recorded
    let reread: Option<Order> = store.db.select(order.id.clone().unwrap()).await.unwrap();
    let reread = reread.unwrap();
    assert_eq!(reread.state, OrderState::Pending);
    assert!(reread.payment_proof.is_none());
    assert_eq!(store.stock_of(&table).await, 1);
}
