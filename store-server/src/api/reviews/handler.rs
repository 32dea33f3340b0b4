//! Review API Handlers
//!
//! 评价资格: 订单属于本人、已 DELIVERED、商品在该订单的行项目里，
//! 且同一 (用户, 商品) 只允许一条评价。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate};
use crate::db::repository::{OrderRepository, ReviewRepository, record_id};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::OrderState;

/// POST /api/reviews - 对已送达订单中的商品发表评价
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }

    let user_rid = user.record_id();
    let product_rid = record_id("product", &payload.product_id);

    let orders = OrderRepository::new(state.db.clone());
    let order = orders
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", payload.order_id)))?;

    if order.user != user_rid {
        // 与订单不存在同样的应答，不泄露他人订单是否存在
        return Err(AppError::not_found(format!(
            "Order {} not found",
            payload.order_id
        )));
    }
    if order.state != OrderState::Delivered {
        return Err(AppError::business_rule(
            "Only delivered orders can be reviewed",
        ));
    }
    if !order.contains_product(&product_rid) {
        return Err(AppError::business_rule(
            "Product is not part of this order",
        ));
    }

    let reviews = ReviewRepository::new(state.db.clone());
    if reviews
        .find_by_user_and_product(&user_rid, &product_rid)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("You already reviewed this product"));
    }

    let order_rid = order
        .id
        .unwrap_or_else(|| record_id("order", &payload.order_id));
    let review = reviews
        .create(Review {
            id: None,
            user: user_rid,
            product: product_rid,
            order: order_rid,
            rating: payload.rating,
            comment: payload.comment.unwrap_or_default(),
            featured: false,
            created_at: None,
        })
        .await?;
    Ok(Json(review))
}

/// DELETE /api/reviews/:id - 删除评价并重算商品评分 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_admin()?;
    let repo = ReviewRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}
