//! Stock consistency across transitions

use super::*;

// Stock 5, confirm qty 3 into PROCESSING, stock becomes 2
#[tokio::test]
async fn test_debit_on_processing_entry() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;

    let order = store.processing_order(&table, 3).await;
    assert_eq!(order.state, OrderState::Processing);
    assert_eq!(store.stock_of(&table).await, 2);
}

// Stock 2, qty-3 order cannot enter PROCESSING; nothing changes
#[tokio::test]
async fn test_understocked_transition_aborts_without_writes() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 3).await;
    let order = store.pending_order(&table, 3).await;

    store
        .db
        .query("UPDATE $p SET stock = 2")
        .bind(("p", record_id("product", &table)))
        .await
        .unwrap();

    let err = store
        .engine
        .transition(&order_id(&order), OrderState::Processing, None)
        .await
        .unwrap_err();
    match err {
        OrderError::InsufficientStock { product } => assert_eq!(product, table),
        other => panic!("unexpected: {other:?}"),
    }

    assert_eq!(store.stock_of(&table).await, 2);
    let reread: Option<Order> = store.db.select(order.id.clone().unwrap()).await.unwrap();
    assert_eq!(reread.unwrap().state, OrderState::Pending);
}

// Cancelling a PROCESSING order restores the debited stock
#[tokio::test]
async fn test_cancel_processing_credits_stock() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.processing_order(&table, 3).await;
    assert_eq!(store.stock_of(&table).await, 2);

    let order = store
        .engine
        .transition(&order_id(&order), OrderState::Cancelled, None)
        .await
        .unwrap();
    assert_eq!(order.state, OrderState::Cancelled);
    assert_eq!(store.stock_of(&table).await, 5);
}

// Cancelling a PENDING order credits nothing
#[tokio::test]
async fn test_cancel_pending_credits_nothing() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.pending_order(&table, 3).await;

    let order = store
        .engine
        .transition(&order_id(&order), OrderState::Cancelled, None)
        .await
        .unwrap();
    assert_eq!(order.state, OrderState::Cancelled);
    assert_eq!(store.stock_of(&table).await, 5);
}

// Two orders race for the last unit; exactly one wins
#[tokio::test]
async fn test_concurrent_last_unit_race() {
    let store = setup().await;
    let lamp = store.seed_product("lamp", 9_900, 2).await;

    let first = store.pending_order(&lamp, 1).await;
    let second = store.pending_order(&lamp, 1).await;

    // Drain to the single contested unit
    store
        .db
        .query("UPDATE $p SET stock = 1")
        .bind(("p", record_id("product", &lamp)))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        store
            .engine
            .transition(&order_id(&first), OrderState::Processing, None),
        store
            .engine
            .transition(&order_id(&second), OrderState::Processing, None),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one racer may take the last unit");

    for result in [a, b] {
        if let Err(err) = result {
            assert!(matches!(err, OrderError::InsufficientStock { .. }));
        }
    }
    assert_eq!(store.stock_of(&lamp).await, 0);
}

// Idempotence: repeating a transition must not double-adjust stock
#[tokio::test]
async fn test_same_state_transition_is_noop() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let order = store.processing_order(&table, 2).await;
    assert_eq!(store.stock_of(&table).await, 3);

    let again = store
        .engine
        .transition(&order_id(&order), OrderState::Processing, None)
        .await
        .unwrap();
    assert_eq!(again.state, OrderState::Processing);
    assert_eq!(store.stock_of(&table).await, 3);

    // Same for a repeated cancel: stock is credited exactly once
    store
        .engine
        .transition(&order_id(&order), OrderState::Cancelled, None)
        .await
        .unwrap();
    assert_eq!(store.stock_of(&table).await, 5);
    store
        .engine
        .transition(&order_id(&order), OrderState::Cancelled, None)
        .await
        .unwrap();
    assert_eq!(store.stock_of(&table).await, 5);
}

// Debits and credits net to zero only along the debit -> credit path
#[tokio::test]
async fn test_multi_line_debit_and_credit_net_zero() {
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
    let id = order_id(&order);

    store
        .engine
        .confirm_with_proof(&store.user, &id, "/uploads/p.jpg".into(), "Caixa".into())
        .await
        .unwrap();
    assert_eq!(store.stock_of(&table).await, 4);
    assert_eq!(store.stock_of(&chair).await, 6);

    store
        .engine
        .transition(&id, OrderState::Cancelled, None)
        .await
        .unwrap();
    assert_eq!(store.stock_of(&table).await, 5);
    assert_eq!(store.stock_of(&chair).await, 10);
}

// A multi-line debit with one under-stocked line must leave every line untouched
#[tokio::test]
async fn test_partial_debit_never_survives_abort() {
    let store = setup().await;
    let table = store.seed_product("oak_table", 149_900, 5).await;
    let sofa = store.seed_product("sofa", 299_000, 2).await;

    let order = store
        .engine
        .create_order(
            &store.user,
            &store.address_id,
            vec![
                OrderLineRequest {
                    product_id: table.clone(),
                    quantity: 2,
                },
                OrderLineRequest {
                    product_id: sofa.clone(),
                    quantity: 2,
                },
            ],
        )
        .await
        .unwrap();

    // Sofa sells out between creation and confirmation
    store
        .db
        .query("UPDATE $p SET stock = 1")
        .bind(("p", record_id("product", &sofa)))
        .await
        .unwrap();

    let err = store
        .engine
        .transition(&order_id(&order), OrderState::Processing, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InsufficientStock { .. }));

    // The table line was listed first but its debit must have rolled back
    assert_eq!(store.stock_of(&table).await, 5);
    assert_eq!(store.stock_of(&sofa).await, 1);
}
