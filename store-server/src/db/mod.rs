//! Database Module
//!
//! Embedded SurrealDB: RocksDB under the work directory in production,
//! in-memory engine for tests. Schema is defined idempotently at open.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "arbor";
const DATABASE: &str = "store";

/// Schema definitions, idempotent (`IF NOT EXISTS`)
///
/// Tables stay schemaless; only the constraints that must hold at the
/// storage layer are defined here. The stock >= 0 invariant is enforced
/// by the order engine's transactions, not by a field assert, because
/// admin authority overrides also pass through the same field.
const SCHEMA: &str = "\
DEFINE TABLE IF NOT EXISTS user SCHEMALESS; \
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE; \
DEFINE TABLE IF NOT EXISTS category SCHEMALESS; \
DEFINE TABLE IF NOT EXISTS product SCHEMALESS; \
DEFINE TABLE IF NOT EXISTS cart_item SCHEMALESS; \
DEFINE INDEX IF NOT EXISTS cart_user_product ON TABLE cart_item FIELDS user, product UNIQUE; \
DEFINE TABLE IF NOT EXISTS address SCHEMALESS; \
DEFINE TABLE IF NOT EXISTS order SCHEMALESS; \
DEFINE TABLE IF NOT EXISTS review SCHEMALESS;";

/// Open the embedded database under `work_dir` and prepare the schema
pub async fn connect(work_dir: &str) -> Result<Surreal<Db>, AppError> {
    let path = std::path::Path::new(work_dir).join("data");
    let db = Surreal::new::<RocksDb>(path.to_string_lossy().as_ref())
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
    prepare(&db).await?;
    tracing::info!("Database opened at {}", path.display());
    Ok(db)
}

/// Open an in-memory database (tests)
pub async fn connect_memory() -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
    prepare(&db).await?;
    Ok(db)
}

async fn prepare(db: &Surreal<Db>) -> Result<(), AppError> {
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
