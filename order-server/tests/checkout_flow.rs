//! 下单工作流集成测试
//!
//! 使用 ServerState::initialize 完整初始化（临时工作目录 + 真实 SQLite），
//! 覆盖库存预留、整单回滚、并发抢购和取消回补。

use order_server::db::repository::{address, cart, order, product};
use order_server::services::checkout;
use order_server::{AppError, Config, CurrentCustomer, ServerState};
use shared::models::{
    AddressCreate, CheckoutLine, CheckoutRequest, OrderStatus, Product, ProductCreate,
};

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config)
        .await
        .expect("Failed to initialize server state");
    (state, dir)
}

fn customer(id: &str) -> CurrentCustomer {
    CurrentCustomer {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        display_name: format!("Customer {id}"),
    }
}

async fn seed_product(state: &ServerState, slug: &str, stock: i64, discount: f64) -> Product {
    product::create(
        &state.pool,
        ProductCreate {
            slug: slug.to_string(),
            name: format!("Product {slug}"),
            price: discount + 5.0,
            discount_price: discount,
            stock,
        },
    )
    .await
    .expect("Failed to seed product")
}

async fn seed_address(state: &ServerState, customer_id: &str) -> i64 {
    address::create(
        &state.pool,
        AddressCreate {
            customer_id: customer_id.to_string(),
            recipient: "Jo Doe".to_string(),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            postal_code: "12345".to_string(),
            country: "US".to_string(),
        },
    )
    .await
    .expect("Failed to seed address")
    .id
}

fn line(slug: &str, quantity: i64) -> CheckoutLine {
    CheckoutLine {
        slug: slug.to_string(),
        quantity,
    }
}

async fn stock_of(state: &ServerState, product_id: i64) -> i64 {
    product::find_by_id(&state.pool, product_id)
        .await
        .expect("Failed to read product")
        .expect("Product vanished")
        .stock
}

#[tokio::test]
async fn test_checkout_reserves_stock_and_prices_lines() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    let prod = seed_product(&state, "red-hoodie", 5, 19.99).await;
    let address_id = seed_address(&state, &cust.id).await;

    let orders = checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id,
            items: vec![line("red-hoodie", 2)],
        },
    )
    .await
    .expect("Checkout should succeed");

    assert_eq!(orders.len(), 1);
    let o = &orders[0];
    assert_eq!(o.quantity, 2);
    assert!((o.final_price - 39.98).abs() < 1e-9);
    assert_eq!(o.status, OrderStatus::Placed);
    assert_eq!(o.customer_id, "c1");

    assert_eq!(stock_of(&state, prod.id).await, 3);
}

#[tokio::test]
async fn test_checkout_insufficient_stock_rolls_back_previous_lines() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    let prod_a = seed_product(&state, "prod-a", 5, 10.0).await;
    let prod_b = seed_product(&state, "prod-b", 3, 10.0).await;
    let address_id = seed_address(&state, &cust.id).await;

    // A 的预留先成功；B 失败后必须把 A 也回滚
    let err = checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id,
            items: vec![line("prod-a", 2), line("prod-b", 10)],
        },
    )
    .await
    .expect_err("Checkout should fail on prod-b");

    match err {
        AppError::InsufficientStock(slug) => assert_eq!(slug, "prod-b"),
        other => panic!("Expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(stock_of(&state, prod_a.id).await, 5);
    assert_eq!(stock_of(&state, prod_b.id).await, 3);

    let orders = order::find_all_by_customer(&state.pool, &cust.id)
        .await
        .expect("Failed to list orders");
    assert!(orders.is_empty(), "No order row may survive the rollback");
}

#[tokio::test]
async fn test_unknown_product_fails_whole_checkout() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    let prod = seed_product(&state, "prod-a", 5, 10.0).await;
    let address_id = seed_address(&state, &cust.id).await;

    let err = checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id,
            items: vec![line("prod-a", 1), line("ghost", 1)],
        },
    )
    .await
    .expect_err("Unknown slug should fail the call");

    assert!(matches!(err, AppError::ProductNotFound(slug) if slug == "ghost"));
    assert_eq!(stock_of(&state, prod.id).await, 5);
}

#[tokio::test]
async fn test_missing_address_fails_before_any_reservation() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    let prod = seed_product(&state, "prod-a", 5, 10.0).await;

    let err = checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id: 424242,
            items: vec![line("prod-a", 1)],
        },
    )
    .await
    .expect_err("Missing address should fail the call");

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(stock_of(&state, prod.id).await, 5);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    seed_product(&state, "prod-a", 5, 10.0).await;
    let address_id = seed_address(&state, &cust.id).await;

    let err = checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id,
            items: vec![line("prod-a", 0)],
        },
    )
    .await
    .expect_err("Zero quantity must be rejected");

    assert!(matches!(err, AppError::InvalidQuantity(0)));
}

#[tokio::test]
async fn test_concurrent_checkout_for_last_unit() {
    let (state, _dir) = test_state().await;
    let prod = seed_product(&state, "last-one", 1, 10.0).await;

    let cust_a = customer("racer-a");
    let cust_b = customer("racer-b");
    let addr_a = seed_address(&state, &cust_a.id).await;
    let addr_b = seed_address(&state, &cust_b.id).await;

    let pool_a = state.pool.clone();
    let pool_b = state.pool.clone();
    let task_a = tokio::spawn(async move {
        checkout::place_order(
            &pool_a,
            &cust_a,
            CheckoutRequest {
                address_id: addr_a,
                items: vec![line("last-one", 1)],
            },
        )
        .await
    });
    let task_b = tokio::spawn(async move {
        checkout::place_order(
            &pool_b,
            &cust_b,
            CheckoutRequest {
                address_id: addr_b,
                items: vec![line("last-one", 1)],
            },
        )
        .await
    });

    let result_a = task_a.await.expect("task a panicked");
    let result_b = task_b.await.expect("task b panicked");

    let successes = [&result_a, &result_b]
        .iter()
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 1, "Exactly one checkout may win the last unit");

    let loser = if result_a.is_ok() { result_b } else { result_a };
    assert!(matches!(
        loser.expect_err("loser must fail"),
        AppError::InsufficientStock(_)
    ));

    assert_eq!(stock_of(&state, prod.id).await, 0);
}

#[tokio::test]
async fn test_cancel_restores_stock_and_is_terminal() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    let prod = seed_product(&state, "prod-a", 5, 10.0).await;
    let address_id = seed_address(&state, &cust.id).await;

    let orders = checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id,
            items: vec![line("prod-a", 3)],
        },
    )
    .await
    .expect("Checkout should succeed");
    assert_eq!(stock_of(&state, prod.id).await, 2);

    let cancelled = checkout::cancel_order(&state.pool, &cust, orders[0].id)
        .await
        .expect("Cancel should succeed");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&state, prod.id).await, 5);

    // 第二次取消必须被拒绝，库存只回补一次
    let err = checkout::cancel_order(&state.pool, &cust, orders[0].id)
        .await
        .expect_err("Second cancel must fail");
    assert!(matches!(err, AppError::InvalidTransition(_)));
    assert_eq!(stock_of(&state, prod.id).await, 5);
}

#[tokio::test]
async fn test_cancel_is_scoped_to_owner() {
    let (state, _dir) = test_state().await;
    let owner = customer("owner");
    let intruder = customer("intruder");
    seed_product(&state, "prod-a", 5, 10.0).await;
    let address_id = seed_address(&state, &owner.id).await;

    let orders = checkout::place_order(
        &state.pool,
        &owner,
        CheckoutRequest {
            address_id,
            items: vec![line("prod-a", 1)],
        },
    )
    .await
    .expect("Checkout should succeed");

    // 非本人取消：与不存在的订单不可区分
    let err = checkout::cancel_order(&state.pool, &intruder, orders[0].id)
        .await
        .expect_err("Foreign cancel must look like NotFound");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_cart_sourced_checkout_clears_cart() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    let prod = seed_product(&state, "prod-a", 5, 10.0).await;
    let address_id = seed_address(&state, &cust.id).await;

    cart::upsert(&state.pool, &cust.id, prod.id, 2)
        .await
        .expect("Failed to fill cart");

    let orders = checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id,
            items: vec![],
        },
    )
    .await
    .expect("Cart checkout should succeed");

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].quantity, 2);
    assert_eq!(stock_of(&state, prod.id).await, 3);

    let remaining = cart::find_all_by_customer(&state.pool, &cust.id)
        .await
        .expect("Failed to list cart");
    assert!(remaining.is_empty(), "Cart must be cleared on success");
}

#[tokio::test]
async fn test_explicit_items_leave_cart_untouched() {
    let (state, _dir) = test_state().await;
    let cust = customer("c1");
    let prod = seed_product(&state, "prod-a", 9, 10.0).await;
    let address_id = seed_address(&state, &cust.id).await;

    cart::upsert(&state.pool, &cust.id, prod.id, 4)
        .await
        .expect("Failed to fill cart");

    checkout::place_order(
        &state.pool,
        &cust,
        CheckoutRequest {
            address_id,
            items: vec![line("prod-a", 1)],
        },
    )
    .await
    .expect("Checkout should succeed");

    let remaining = cart::find_all_by_customer(&state.pool, &cust.id)
        .await
        .expect("Failed to list cart");
    assert_eq!(remaining.len(), 1, "Explicit checkout bypasses the cart");
    assert_eq!(remaining[0].quantity, 4);
}
