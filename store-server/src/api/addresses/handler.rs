//! Address API Handlers
//!
//! 每次结账记录一条收货地址，不做可编辑的地址簿。

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Address, AddressCreate};
use crate::db::repository::AddressRepository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::AppResult;

/// GET /api/addresses - 当前用户的历史收货地址
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Address>>> {
    let repo = AddressRepository::new(state.db.clone());
    let addresses = repo.find_for_user(&user.record_id()).await?;
    Ok(Json(addresses))
}

/// POST /api/addresses - 为本次结账记录收货地址
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddressCreate>,
) -> AppResult<Json<Address>> {
    validate_required_text(&payload.recipient, "recipient", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.street, "street", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&payload.province, "province", MAX_NAME_LEN)?;
    validate_required_text(&payload.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;

    let repo = AddressRepository::new(state.db.clone());
    let address = repo.create(&user.record_id(), payload).await?;
    Ok(Json(address))
}
