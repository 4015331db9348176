use crate::db::repo::{CorrectionRepo, IdentityRepo};
use crate::error::DomainError;
use crate::models::correction::CorrectionAuditRecord;
use crate::models::types::{Metadata, UserId};
use crate::models::user::User;
use crate::services::caller::Caller;
use crate::services::error::{ServiceError, ServiceResult};
use crate::username::{Correction, USERNAME_KEY, UsernameProfile, analyze_username};
use serde_json::Value;
use std::sync::Arc;

pub struct UserService {
    identity: Arc<dyn IdentityRepo>,
    corrections: Arc<dyn CorrectionRepo>,
}

impl UserService {
    pub fn new(identity: Arc<dyn IdentityRepo>, corrections: Arc<dyn CorrectionRepo>) -> Self {
        Self { identity, corrections }
    }

    /// Resolves the acting user. Unknown ids are rejected.
    pub async fn caller(&self, caller_id: UserId) -> ServiceResult<Caller> {
        match self.identity.get_by_id(caller_id).await? {
            Some(user) => Ok(Caller::from(&user)),
            None => Err(ServiceError::UnknownCaller(caller_id)),
        }
    }

    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<User> {
        match self.identity.get_by_id(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                tracing::error!(%user_id, "user not found");
                Err(ServiceError::UserNotFound { user_id })
            }
            Err(source) => {
                tracing::error!(%user_id, error = %source, "user lookup failed");
                Err(ServiceError::UserLookup { user_id, source })
            }
        }
    }

    pub async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(self.identity.get_by_username(username).await?)
    }

    /// Character profile of the username currently stored for a user.
    pub async fn verify_username(&self, user_id: UserId) -> ServiceResult<UsernameProfile> {
        let user = self.get_user(user_id).await?;
        let Some(username) = user.username() else {
            tracing::warn!(%user_id, "user has no username in metadata");
            return Err(no_username());
        };

        Ok(UsernameProfile::of(username))
    }

    /// What the repair heuristic would make of the stored username. Nothing is
    /// written.
    pub async fn suggest_for_user(&self, user_id: UserId) -> ServiceResult<Correction> {
        let user = self.get_user(user_id).await?;
        let Some(username) = user.username() else {
            return Err(no_username());
        };

        Ok(analyze_username(username))
    }

    /// Sets the username to exactly `correct_username`, keeping every other
    /// metadata key. A change of username is recorded in the correction log on
    /// a best-effort basis. An empty previous username counts as no username.
    pub async fn fix_username(&self, user_id: UserId, correct_username: &str) -> ServiceResult<User> {
        tracing::info!(%user_id, new_username = %correct_username, "fixing username");

        let user = self.get_user(user_id).await?;
        let previous = user.username().map(str::to_string);
        tracing::debug!(%user_id, current = ?previous, "current username");

        UsernameProfile::of(correct_username).trace("fix_username");
        advise(correct_username);

        let mut metadata = user.metadata;
        metadata.insert(USERNAME_KEY.to_string(), Value::String(correct_username.to_string()));

        let updated = self.write_metadata(user_id, &metadata).await?;
        tracing::info!(%user_id, "username updated");

        match previous.as_deref() {
            Some(old) if !old.is_empty() && old != correct_username => {
                self.record_correction(user_id, old, correct_username).await;
            }
            _ => {}
        }

        Ok(updated)
    }

    /// Merges `patch` into the stored metadata; keys in `patch` win. A
    /// non-empty `username` in the patch is stored as its string form (see
    /// `username_text`); empty, zero, false and null values pass through
    /// untouched.
    pub async fn update_metadata(&self, user_id: UserId, mut patch: Metadata) -> ServiceResult<User> {
        tracing::info!(%user_id, keys = patch.len(), "updating user metadata");

        if let Some(username) = patch.get(USERNAME_KEY).filter(|v| is_set(v)).map(username_text) {
            UsernameProfile::of(&username).trace("update_metadata");
            advise(&username);
            patch.insert(USERNAME_KEY.to_string(), Value::String(username));
        }

        let user = self.get_user(user_id).await?;
        let mut merged = user.metadata;
        merged.extend(patch);

        let updated = self.write_metadata(user_id, &merged).await?;
        tracing::info!(%user_id, "user metadata updated");
        Ok(updated)
    }

    pub async fn correction_history(&self, user_id: UserId) -> ServiceResult<Vec<CorrectionAuditRecord>> {
        // make sure the user exists so unknown ids do not look like empty histories
        self.get_user(user_id).await?;
        Ok(self.corrections.list_for_user(user_id).await?)
    }

    async fn write_metadata(&self, user_id: UserId, metadata: &Metadata) -> ServiceResult<User> {
        self.identity
            .update_metadata(user_id, metadata)
            .await
            .map_err(|source| {
                tracing::error!(%user_id, error = %source, "metadata update failed");
                ServiceError::MetadataUpdateFailed { user_id, source }
            })
    }

    async fn record_correction(&self, user_id: UserId, old: &str, new: &str) {
        let record = CorrectionAuditRecord::new(user_id, old, new);
        match self.corrections.insert(&record).await {
            Ok(()) => tracing::debug!(
                %user_id,
                old_username = %old,
                new_username = %new,
                pattern = %record.detected_pattern,
                "username correction recorded"
            ),
            Err(e) => tracing::warn!(%user_id, error = %e, "failed to record username correction"),
        }
    }
}

/// Runs the heuristic purely for the log. The result is never stored.
fn advise(username: &str) {
    let suggestion = analyze_username(username);
    if suggestion.changed {
        tracing::info!(
            username = %suggestion.original,
            suggestion = %suggestion.corrected,
            rule = ?suggestion.rule,
            "username matches a known corruption pattern; keeping value as supplied"
        );
    }
}

/// False for null, `false`, zero and the empty string.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form of a metadata value as a browser client would send it:
/// arrays are joined with `,`, objects collapse to `[object Object]`.
fn username_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(username_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn no_username() -> ServiceError {
    DomainError::Validation {
        field: "username",
        message: "user has no username".into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values_are_not_set() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_set(&v), "{v}");
        }
        for v in [json!(true), json!(7), json!("a"), json!([]), json!({})] {
            assert!(is_set(&v), "{v}");
        }
    }

    #[test]
    fn username_text_forms() {
        assert_eq!(username_text(&json!("Ana")), "Ana");
        assert_eq!(username_text(&json!(1234)), "1234");
        assert_eq!(username_text(&json!(2.0)), "2");
        assert_eq!(username_text(&json!(1.5)), "1.5");
        assert_eq!(username_text(&json!(true)), "true");
        assert_eq!(username_text(&json!([1, 2])), "1,2");
        assert_eq!(username_text(&json!(["a", null, [3, 4]])), "a,,3,4");
        assert_eq!(username_text(&json!([])), "");
        assert_eq!(username_text(&json!({"a": 1})), "[object Object]");
    }
}
