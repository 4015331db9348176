use crate::db::DbResult;
use crate::db::error::DbError;
use crate::models::types::{Metadata, UserId};
use crate::username::USERNAME_KEY;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: UserId,
    /// Email address registered to the user
    pub email: String,
    /// Administrators may inspect and correct other users
    pub is_admin: bool,
    /// Free-form metadata, including the username
    #[serde(rename = "user_metadata")]
    pub metadata: Metadata,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn new(email: &str, metadata: Metadata) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: UserId::new(),
            email: email.to_string(),
            is_admin: false,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn try_from_row(row: &Row) -> DbResult<Self> {
        let metadata = match row.try_get::<_, serde_json::Value>("user_metadata")? {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => Metadata::new(),
            other => return Err(DbError::Decode(format!("user_metadata is not an object: {other}"))),
        };

        Ok(Self {
            id: row.try_get::<_, UserId>("id")?,
            email: row.try_get("email")?,
            is_admin: row.try_get("is_admin")?,
            metadata,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Stored username, if the metadata holds one as a string.
    pub fn username(&self) -> Option<&str> {
        self.metadata.get(USERNAME_KEY).and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(v: serde_json::Value) -> Metadata {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn username_from_metadata() {
        let u = User::new("a@club.pt", meta(json!({"username": "joao.barbosa", "name": "João"})));
        assert_eq!(u.username(), Some("joao.barbosa"));
    }

    #[test]
    fn non_string_username_is_ignored() {
        let u = User::new("a@club.pt", meta(json!({"username": 42})));
        assert_eq!(u.username(), None);

        let u = User::new("a@club.pt", Metadata::new());
        assert_eq!(u.username(), None);
    }

    #[test]
    fn serializes_metadata_as_user_metadata() {
        let u = User::new("a@club.pt", meta(json!({"username": "ana"})));
        let v = serde_json::to_value(&u).unwrap();
        assert_eq!(v["user_metadata"]["username"], "ana");
        assert_eq!(v["is_admin"], false);
        assert_eq!(v["id"], u.id.to_string());
    }
}
