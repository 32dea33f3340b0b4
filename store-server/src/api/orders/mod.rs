//! Order API 模块
//!
//! 结账、查询、状态流转和支付凭证上传。所有写路径都经过
//! [`crate::orders::OrderEngine`]，库存只在那里变动。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::checkout))
        // Admin listing (static segment must come before /{id})
        .route("/all", get(handler::list_all))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/state", put(handler::set_state))
        .route("/{id}/payment-proof", post(handler::upload_payment_proof))
}
