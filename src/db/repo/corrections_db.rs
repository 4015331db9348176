use crate::db::repo::corrections::CorrectionRepo;
use crate::db::{Db, DbResult};
use crate::models::correction::CorrectionAuditRecord;
use crate::models::types::UserId;
use std::sync::Arc;

pub struct CorrectionRepository {
    db: Arc<Db>,
}

impl CorrectionRepository {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl CorrectionRepo for CorrectionRepository {
    async fn insert(&self, record: &CorrectionAuditRecord) -> DbResult<()> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
                INSERT INTO username_corrections (id, user_id, old_username, new_username, detected_pattern, corrected_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .await?;

        client
            .execute(
                &stmt,
                &[
                    &record.id,
                    &record.user_id,
                    &record.old_username,
                    &record.new_username,
                    &record.detected_pattern,
                    &record.corrected_at,
                ],
            )
            .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<CorrectionAuditRecord>> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached("SELECT * FROM username_corrections WHERE user_id = $1 ORDER BY corrected_at DESC")
            .await?;

        let rows = client.query(&stmt, &[&user_id]).await?;
        rows.iter().map(CorrectionAuditRecord::try_from_row).collect()
    }
}
