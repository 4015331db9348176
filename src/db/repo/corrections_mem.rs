use crate::db::DbResult;
use crate::db::repo::corrections::CorrectionRepo;
use crate::models::correction::CorrectionAuditRecord;
use crate::models::types::UserId;
use parking_lot::Mutex;

/// Append-only audit log kept in process memory.
#[derive(Default)]
pub struct MemoryCorrectionLog {
    records: Mutex<Vec<CorrectionAuditRecord>>,
}

impl MemoryCorrectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    pub fn records(&self) -> Vec<CorrectionAuditRecord> {
        self.records.lock().clone()
    }
}

#[async_trait::async_trait]
impl CorrectionRepo for MemoryCorrectionLog {
    async fn insert(&self, record: &CorrectionAuditRecord) -> DbResult<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<CorrectionAuditRecord>> {
        let mut out: Vec<_> = self
            .records
            .lock()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        // stable sort keeps later inserts first among equal timestamps
        out.reverse();
        out.sort_by(|a, b| b.corrected_at.cmp(&a.corrected_at));
        Ok(out)
    }
}
