use thiserror::Error;

/// Server startup / runtime errors (outside the HTTP request path)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result 类型别名 (启动路径)
pub type Result<T> = std::result::Result<T, ServerError>;
