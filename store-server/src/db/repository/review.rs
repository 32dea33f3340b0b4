//! Review Repository
//!
//! Review inserts and deletes recompute the product's derived rating
//! (arithmetic mean) and review_count in the same transaction, so the
//! product row never disagrees with the review table.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::Review;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "review";

/// Insert + rating recompute, one transaction
const CREATE_WITH_RECOMPUTE: &str = "\
BEGIN TRANSACTION; \
CREATE review CONTENT $review; \
LET $stats = SELECT math::mean(rating) AS rating, count() AS review_count \
    FROM review WHERE product = $product GROUP ALL; \
UPDATE $product SET \
    rating = ($stats[0].rating ?? 0), \
    review_count = ($stats[0].review_count ?? 0), \
    updated_at = time::now(); \
COMMIT TRANSACTION;";

/// Delete + rating recompute, one transaction
const DELETE_WITH_RECOMPUTE: &str = "\
BEGIN TRANSACTION; \
DELETE $thing RETURN BEFORE; \
LET $stats = SELECT math::mean(rating) AS rating, count() AS review_count \
    FROM review WHERE product = $product GROUP ALL; \
UPDATE $product SET \
    rating = ($stats[0].rating ?? 0), \
    review_count = ($stats[0].review_count ?? 0), \
    updated_at = time::now(); \
COMMIT TRANSACTION;";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let review: Option<Review> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(review)
    }

    /// Reviews for a product, newest first
    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<Review>> {
        let product = record_id("product", product_id);
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE product = $product ORDER BY created_at DESC")
            .bind(("product", product))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// One review per (user, product), enforced by lookup before insert
    pub async fn find_by_user_and_product(
        &self,
        user: &RecordId,
        product: &RecordId,
    ) -> RepoResult<Option<Review>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE user = $user AND product = $product LIMIT 1")
            .bind(("user", user.clone()))
            .bind(("product", product.clone()))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// Insert a review and recompute the product rating atomically
    ///
    /// Eligibility (order DELIVERED, owned by the reviewer, product among
    /// the order's lines) is checked by the caller before this runs.
    pub async fn create(&self, mut review: Review) -> RepoResult<Review> {
        if !(1..=5).contains(&review.rating) {
            return Err(RepoError::Validation(
                "rating must be between 1 and 5".into(),
            ));
        }
        review.created_at = Some(surrealdb::sql::Datetime::from(chrono::Utc::now()));
        let product = review.product.clone();

        let mut result = self
            .base
            .db()
            .query(CREATE_WITH_RECOMPUTE)
            .bind(("review", review))
            .bind(("product", product))
            .await?;
        let created: Vec<Review> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Delete a review and recompute the product rating atomically
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let review = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))?;

        self.base
            .db()
            .query(DELETE_WITH_RECOMPUTE)
            .bind(("thing", record_id(TABLE, id)))
            .bind(("product", review.product))
            .await?;
        Ok(())
    }

    /// Featured reviews (storefront testimonials)
    pub async fn find_featured(&self) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE featured = true ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Feature or unfeature a review (admin)
    pub async fn set_featured(&self, id: &str, featured: bool) -> RepoResult<Review> {
        let thing = record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET featured = $featured RETURN AFTER")
            .bind(("thing", thing))
            .bind(("featured", featured))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        reviews
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }
}
