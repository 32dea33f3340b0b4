//! Testimonial API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Review;
use crate::db::repository::ReviewRepository;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureRequest {
    pub featured: bool,
}

/// GET /api/testimonials - 精选评价 (公开)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Review>>> {
    let repo = ReviewRepository::new(state.db.clone());
    let reviews = repo.find_featured().await?;
    Ok(Json(reviews))
}

/// PUT /api/testimonials/:id - 设置/取消精选 (管理员)
pub async fn set_featured(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<FeatureRequest>,
) -> AppResult<Json<Review>> {
    user.require_admin()?;
    let repo = ReviewRepository::new(state.db.clone());
    let review = repo.set_featured(&id, payload.featured).await?;
    Ok(Json(review))
}
