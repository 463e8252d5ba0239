use async_trait::async_trait;
use redude_db::{StoreError, Table};

use super::models::Rating;

/// Storage of ratings.
#[async_trait]
pub trait RatingService: Send + Sync {
    /// Store a new rating under a fresh id. The rating must carry its user
    /// and a stored book.
    async fn save(&self, rating: Rating) -> Result<Rating, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Rating>, StoreError>;

    async fn delete(&self, rating: &Rating) -> Result<(), StoreError>;

    /// Ratings of one book, oldest first.
    async fn list_for_book(&self, google_id: &str) -> Result<Vec<Rating>, StoreError>;
}

/// [`RatingService`] over an in-memory table.
pub struct MemoryRatingService {
    table: Table<Rating>,
}

impl MemoryRatingService {
    pub fn new() -> Self {
        Self {
            table: Table::new("ratings"),
        }
    }
}

impl Default for MemoryRatingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RatingService for MemoryRatingService {
    async fn save(&self, rating: Rating) -> Result<Rating, StoreError> {
        if rating.user.is_none() {
            return Err(StoreError::query("rating has no user"));
        }
        if rating.book.id.is_none() {
            return Err(StoreError::query("rating refers to an unsaved book"));
        }

        Ok(self
            .table
            .insert_with(|id| Rating {
                id: Some(id),
                ..rating
            })
            .await)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Rating>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn delete(&self, rating: &Rating) -> Result<(), StoreError> {
        if let Some(id) = rating.id {
            self.table.remove(id).await;
        }
        Ok(())
    }

    async fn list_for_book(&self, google_id: &str) -> Result<Vec<Rating>, StoreError> {
        Ok(self
            .table
            .filter(|rating| rating.book.google_id == google_id)
            .await)
    }
}
