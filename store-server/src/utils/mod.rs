//! 工具模块
//!
//! - [`error`] - 应用错误和统一响应
//! - [`logger`] - 日志初始化
//! - [`result`] - Result 类型别名
//! - [`validation`] - 请求校验辅助

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
pub use validation::validate_payload;
