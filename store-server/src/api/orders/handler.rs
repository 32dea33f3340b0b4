//! Order API Handlers
//!
//! 结账永远创建 PENDING 订单，不扣库存; 扣减发生在订单进入
//! PROCESSING 的事务里 (客户上传凭证确认，或管理员直接流转)。

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use std::str::FromStr;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::{CartRepository, OrderRepository};
use crate::orders::{OrderError, OrderLineRequest};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, validate_payload};
use shared::OrderState;
use shared::request::{CheckoutRequest, SetStateRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /api/orders - 结账
///
/// `items` 为空表示整车结账 (购物车行转订单行，成功后清空购物车)。
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    validate_payload(&payload)?;
    let user_rid = user.record_id();

    let from_cart = payload.items.is_empty();
    let items: Vec<OrderLineRequest> = if from_cart {
        let cart = CartRepository::new(state.db.clone());
        cart.find_lines(&user_rid)
            .await?
            .into_iter()
            .map(|line| OrderLineRequest {
                product_id: line.product.key().to_string(),
                quantity: line.quantity,
            })
            .collect()
    } else {
        payload
            .items
            .into_iter()
            .map(|item| OrderLineRequest {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect()
    };

    let engine = state.order_engine();
    let order = engine
        .create_order(&user_rid, &payload.address_id, items)
        .await?;

    if from_cart {
        // 订单已落库; 清空失败只记录，不回滚订单
        let cart = CartRepository::new(state.db.clone());
        if let Err(e) = cart.clear(&user_rid).await {
            tracing::warn!(target: "orders", error = %e, "Cart clear after checkout failed");
        }
    }

    Ok(Json(order))
}

/// GET /api/orders - 当前用户的订单
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_for_user(&user.record_id()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/all - 全部订单 (管理员, 分页)
pub async fn list_all(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    user.require_admin()?;
    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all(limit, offset).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 单个订单 (本人或管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    if !user.is_admin() && order.user != user.record_id() {
        // 与订单不存在同样的应答，不泄露他人订单是否存在
        return Err(AppError::not_found(format!("Order {} not found", id)));
    }
    Ok(Json(order))
}

/// PUT /api/orders/:id/state - 状态流转 (管理员)
///
/// 重复提交同一状态是幂等空操作; 非法流转返回 422。
pub async fn set_state(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SetStateRequest>,
) -> AppResult<Json<Order>> {
    user.require_admin()?;
    validate_payload(&payload)?;

    let target = OrderState::from_str(&payload.state)
        .map_err(|_| OrderError::UnknownState(payload.state.clone()))?;

    let engine = state.order_engine();
    let order = engine
        .transition(&id, target, Some(&user.record_id()))
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/payment-proof - 上传转账凭证并确认订单
///
/// multipart 字段: `image` (凭证图片), `bank` (转账银行)。
/// 文件先落盘，确认事务失败时再删掉，磁盘上不会留下
/// 属于未确认订单的凭证。
pub async fn upload_payment_proof(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<Order>> {
    let mut image: Option<Vec<u8>> = None;
    let mut bank: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("image") => image = Some(field.bytes().await?.to_vec()),
            Some("bank") => bank = Some(field.text().await?),
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::validation("Missing 'image' field"))?;
    let bank = bank.ok_or_else(|| AppError::validation("Missing 'bank' field"))?;
    validate_required_text(&bank, "bank", MAX_NAME_LEN)?;

    let stored = state.proofs.store(&image)?;

    let engine = state.order_engine();
    match engine
        .confirm_with_proof(&user.record_id(), &id, stored.url.clone(), bank)
        .await
    {
        Ok(order) => Ok(Json(order)),
        Err(e) => {
            state.proofs.discard(&stored);
            Err(e.into())
        }
    }
}
