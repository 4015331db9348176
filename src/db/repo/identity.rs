use crate::db::DbResult;
use crate::models::types::{Metadata, UserId};
use crate::models::user::User;

#[async_trait::async_trait]
pub trait IdentityRepo: Send + Sync {
    async fn get_by_id(&self, user_id: UserId) -> DbResult<Option<User>>;
    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>>;
    /// Replaces the whole metadata bag and returns the updated user.
    async fn update_metadata(&self, user_id: UserId, metadata: &Metadata) -> DbResult<User>;
}
