use crate::db::DbResult;
use crate::db::error::DbError;
use crate::models::types::{CorrectionId, UserId};
use crate::username::MB_TOKEN;
use postgres_types::private::BytesMut;
use postgres_types::{FromSql, IsNull, ToSql, Type};
use serde::{Deserialize, Serialize};
use std::error::Error;
use tokio_postgres::Row;

/// Corruption signature recorded next to a username change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedPattern {
    /// The old username contained `mb`
    MbTransformation,
    Other,
}

impl DetectedPattern {
    /// Classifies the username being replaced.
    pub fn of_old_username(old: &str) -> Self {
        if old.contains(MB_TOKEN) {
            DetectedPattern::MbTransformation
        } else {
            DetectedPattern::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedPattern::MbTransformation => "mb_transformation",
            DetectedPattern::Other => "other",
        }
    }
}

impl std::fmt::Display for DetectedPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for DetectedPattern {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        self.as_str().to_sql(ty, out)
    }

    fn accepts(ty: &Type) -> bool {
        ty == &Type::TEXT
    }

    fn to_sql_checked(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        self.to_sql(ty, out)
    }
}

impl FromSql<'_> for DetectedPattern {
    fn from_sql(ty: &Type, raw: &[u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        let s = String::from_sql(ty, raw)?;
        match s.as_str() {
            "mb_transformation" => Ok(DetectedPattern::MbTransformation),
            "other" => Ok(DetectedPattern::Other),
            _ => Err(format!("Unknown detected pattern: {}", s).into()),
        }
    }

    fn accepts(ty: &Type) -> bool {
        ty == &Type::TEXT
    }
}

/// Audit entry written after an explicit username correction. Rows are
/// append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionAuditRecord {
    pub id: CorrectionId,
    pub user_id: UserId,
    pub old_username: String,
    pub new_username: String,
    pub detected_pattern: DetectedPattern,
    pub corrected_at: chrono::DateTime<chrono::Utc>,
}

impl CorrectionAuditRecord {
    pub fn new(user_id: UserId, old_username: &str, new_username: &str) -> Self {
        Self {
            id: CorrectionId::new(),
            user_id,
            old_username: old_username.to_string(),
            new_username: new_username.to_string(),
            detected_pattern: DetectedPattern::of_old_username(old_username),
            corrected_at: chrono::Utc::now(),
        }
    }

    pub fn try_from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get::<_, CorrectionId>("id")?,
            user_id: row.try_get::<_, UserId>("user_id")?,
            old_username: row.try_get("old_username")?,
            new_username: row.try_get("new_username")?,
            detected_pattern: row
                .try_get::<_, DetectedPattern>("detected_pattern")
                .map_err(|e| DbError::Decode(format!("detected_pattern: {e}")))?,
            corrected_at: row.try_get("corrected_at")?,
        })
    }
}
