use crate::db::DbResult;
use crate::models::correction::CorrectionAuditRecord;
use crate::models::types::UserId;

#[async_trait::async_trait]
pub trait CorrectionRepo: Send + Sync {
    async fn insert(&self, record: &CorrectionAuditRecord) -> DbResult<()>;
    /// Newest first.
    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<CorrectionAuditRecord>>;
}
