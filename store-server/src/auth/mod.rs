//! 认证模块 - JWT + Argon2
//!
//! - [`JwtService`] - 令牌生成与验证
//! - [`CurrentUser`] - 已认证用户 (extractor)
//! - [`require_auth`] - 认证中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};

use crate::db::models::UserRole;
use crate::db::repository::record_id;
use crate::utils::AppError;
use surrealdb::RecordId;

/// Authenticated caller, extracted from a validated JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User id (`user:xyz`)
    pub id: String,
    pub name: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Record id of this user
    pub fn record_id(&self) -> RecordId {
        record_id("user", &self.id)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Guard for back-office endpoints
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin role required"))
        }
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: UserRole = claims.role.parse()?;
        Ok(Self {
            id: claims.sub,
            name: claims.name,
            role,
        })
    }
}
