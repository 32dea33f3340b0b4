//! Address Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Address, AddressCreate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find address by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Address>> {
        let address: Option<Address> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(address)
    }

    /// Addresses captured for a user, newest first
    pub async fn find_for_user(&self, user: &RecordId) -> RepoResult<Vec<Address>> {
        let addresses: Vec<Address> = self
            .base
            .db()
            .query("SELECT * FROM address WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(addresses)
    }

    /// Capture a new shipping address for this checkout
    pub async fn create(&self, user: &RecordId, data: AddressCreate) -> RepoResult<Address> {
        let address = Address {
            id: None,
            user: user.clone(),
            recipient: data.recipient,
            phone: data.phone,
            street: data.street,
            city: data.city,
            province: data.province,
            postal_code: data.postal_code,
            created_at: Some(surrealdb::sql::Datetime::from(chrono::Utc::now())),
        };

        let created: Option<Address> = self.base.db().create(TABLE).content(address).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }
}
