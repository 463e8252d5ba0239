use async_trait::async_trait;
use redude_db::{StoreError, Table};

use super::models::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by Google account id.
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user, or refresh the profile of the user with the same
    /// Google account id.
    async fn upsert(&self, profile: NewUser) -> Result<User, StoreError>;
}

/// [`UserRepository`] over an in-memory table.
pub struct MemoryUserRepository {
    table: Table<User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new("users"),
        }
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.table.find(|user| user.google_id == google_id).await)
    }

    async fn upsert(&self, profile: NewUser) -> Result<User, StoreError> {
        let google_id = profile.google_id.clone();
        Ok(self
            .table
            .upsert_by(|user| user.google_id == google_id, |id| profile.into_user(id))
            .await)
    }
}
