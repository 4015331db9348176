use crate::db::error::DbError;
use crate::db::repo::identity::IdentityRepo;
use crate::db::{Db, DbResult, map_row_opt};
use crate::models::types::{Metadata, UserId};
use crate::models::user::User;
use std::sync::Arc;

pub struct IdentityRepository {
    db: Arc<Db>,
}

impl IdentityRepository {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl IdentityRepo for IdentityRepository {
    async fn get_by_id(&self, user_id: UserId) -> DbResult<Option<User>> {
        let client = self.db.get_client().await?;

        let stmt = client.prepare_cached("SELECT * FROM users WHERE id = $1").await?;

        let row_opt = client.query_opt(&stmt, &[&user_id]).await?;
        map_row_opt(row_opt, User::try_from_row, &format!("IdentityRepo::get_by_id id={}", user_id))
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(" SELECT * FROM users WHERE user_metadata ->> 'username' = $1 ")
            .await?;

        let row_opt = client.query_opt(&stmt, &[&username]).await?;
        map_row_opt(
            row_opt,
            User::try_from_row,
            &format!("IdentityRepo::get_by_username username={}", username),
        )
    }

    async fn update_metadata(&self, user_id: UserId, metadata: &Metadata) -> DbResult<User> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
                UPDATE users
                   SET user_metadata = $2, updated_at = NOW()
                 WHERE id = $1
             RETURNING *
                "#,
            )
            .await?;

        let value = serde_json::Value::Object(metadata.clone());
        let row_opt = client.query_opt(&stmt, &[&user_id, &value]).await?;

        map_row_opt(
            row_opt,
            User::try_from_row,
            &format!("IdentityRepo::update_metadata id={}", user_id),
        )?
        .ok_or(DbError::NotFound)
    }
}
