use async_trait::async_trait;
use redude_db::{StoreError, Table};

use super::models::Book;

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<Book>, StoreError>;

    /// Store `book`, updating the stored copy with the same Google id if one
    /// exists. The returned book always carries its internal id.
    async fn save_or_update(&self, book: Book) -> Result<Book, StoreError>;
}

/// [`BookRepository`] over an in-memory table.
pub struct MemoryBookRepository {
    table: Table<Book>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new("books"),
        }
    }
}

impl Default for MemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.table.find(|book| book.google_id == google_id).await)
    }

    async fn save_or_update(&self, book: Book) -> Result<Book, StoreError> {
        if book.google_id.trim().is_empty() {
            return Err(StoreError::query("book google id must not be empty"));
        }
        let google_id = book.google_id.clone();
        Ok(self
            .table
            .upsert_by(
                |stored| stored.google_id == google_id,
                |id| Book {
                    id: Some(id),
                    ..book
                },
            )
            .await)
    }
}
