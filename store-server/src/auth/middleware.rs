//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (健康检查等)
/// - `/api/auth/login`, `/api/auth/register`
/// - 店面公共目录: `GET /api/categories*`, `GET /api/products*`,
///   `GET /api/testimonials`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Storefront browsing is public; everything else needs a token
fn is_public_api_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/auth/login" || path == "/api/auth/register" {
        return true;
    }
    method == http::Method::GET
        && (path.starts_with("/api/categories")
            || path.starts_with("/api/products")
            || path == "/api/testimonials")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_public_routes() {
        assert!(is_public_api_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_api_route(&Method::POST, "/api/auth/register"));
        assert!(is_public_api_route(&Method::GET, "/api/products"));
        assert!(is_public_api_route(
            &Method::GET,
            "/api/products/product:oak/reviews"
        ));
        assert!(is_public_api_route(&Method::GET, "/api/categories"));
        assert!(is_public_api_route(&Method::GET, "/api/testimonials"));
    }

    #[test]
    fn test_protected_routes() {
        assert!(!is_public_api_route(&Method::POST, "/api/products"));
        assert!(!is_public_api_route(&Method::GET, "/api/orders"));
        assert!(!is_public_api_route(&Method::GET, "/api/cart"));
        assert!(!is_public_api_route(&Method::PUT, "/api/testimonials"));
    }
}
