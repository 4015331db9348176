use crate::db::DbResult;
use crate::db::error::DbError;
use crate::db::repo::identity::IdentityRepo;
use crate::models::types::{Metadata, UserId};
use crate::models::user::User;
use dashmap::DashMap;

/// Identity store kept in process memory. Used by tests and offline tooling.
#[derive(Default)]
pub struct MemoryIdentityStore {
    users: DashMap<UserId, User>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self { users: DashMap::new() }
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl IdentityRepo for MemoryIdentityStore {
    async fn get_by_id(&self, user_id: UserId) -> DbResult<Option<User>> {
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username() == Some(username))
            .map(|u| u.value().clone()))
    }

    async fn update_metadata(&self, user_id: UserId, metadata: &Metadata) -> DbResult<User> {
        let mut user = self.users.get_mut(&user_id).ok_or(DbError::NotFound)?;
        user.metadata = metadata.clone();
        user.updated_at = chrono::Utc::now();
        Ok(user.value().clone())
    }
}
