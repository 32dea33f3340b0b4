//! Cart API Handlers
//!
//! 所有接口仅作用于当前登录用户自己的购物车。购物车不校验库存，
//! 库存在结账进入 PROCESSING 时才真正扣减。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CartItem, CartItemDetail, CartItemUpsert};
use crate::db::repository::{CartRepository, ProductRepository};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// GET /api/cart - 当前用户的购物车 (含商品详情)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CartItemDetail>>> {
    let repo = CartRepository::new(state.db.clone());
    let items = repo.find_for_user(&user.record_id()).await?;
    Ok(Json(items))
}

/// POST /api/cart/items - 加入购物车 (已有则累加数量)
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartItemUpsert>,
) -> AppResult<Json<CartItem>> {
    // 下架或不存在的商品不能入车
    let products = ProductRepository::new(state.db.clone());
    let product = products.find_by_id(&payload.product_id).await?;
    match product {
        Some(p) if p.is_active => {}
        _ => {
            return Err(AppError::not_found(format!(
                "Product {} not found",
                payload.product_id
            )));
        }
    }

    let repo = CartRepository::new(state.db.clone());
    let item = repo
        .add(&user.record_id(), &payload.product_id, payload.quantity)
        .await?;
    Ok(Json(item))
}

/// PUT /api/cart/items/:id - 修改数量
pub async fn set_quantity(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SetQuantityRequest>,
) -> AppResult<Json<CartItem>> {
    let repo = CartRepository::new(state.db.clone());
    let item = repo
        .set_quantity(&user.record_id(), &id, payload.quantity)
        .await?;
    Ok(Json(item))
}

/// DELETE /api/cart/items/:id - 移除一行
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CartRepository::new(state.db.clone());
    repo.remove(&user.record_id(), &id).await?;
    Ok(Json(true))
}

/// DELETE /api/cart - 清空购物车
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<bool>> {
    let repo = CartRepository::new(state.db.clone());
    repo.clear(&user.record_id()).await?;
    Ok(Json(true))
}
