//! Action dispatcher for user management requests.
//!
//! Requests arrive as JSON objects tagged by `action`, e.g.
//! `{"action": "fixUsername", "userId": "…", "correctUsername": "joao.barbosa"}`.
//! Every outcome is wrapped in the same envelope: `{"success": true, "data": …}`
//! or `{"error": {"message": "…"}}`.

use crate::error::DomainError;
use crate::models::types::{Metadata, UserId};
use crate::services::{ServiceError, UserService};
use crate::username::analyze_username;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    GetUser {
        user_id: UserId,
    },
    VerifyUsername {
        user_id: UserId,
    },
    /// Heuristic suggestion for a literal username, or for a user's stored one.
    SuggestUsername {
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        user_id: Option<UserId>,
    },
    UpdateUserMetadata {
        user_id: UserId,
        metadata: Metadata,
    },
    FixUsername {
        user_id: UserId,
        correct_username: String,
    },
    CorrectionHistory {
        user_id: UserId,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetUser { .. } => "getUser",
            Action::VerifyUsername { .. } => "verifyUsername",
            Action::SuggestUsername { .. } => "suggestUsername",
            Action::UpdateUserMetadata { .. } => "updateUserMetadata",
            Action::FixUsername { .. } => "fixUsername",
            Action::CorrectionHistory { .. } => "correctionHistory",
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid action: {0}")]
    InvalidAction(serde_json::Error),

    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type ActionResult = Result<Value, ActionError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Success { success: bool, data: Value },
    Failure { error: ErrorBody },
}

impl ActionResponse {
    pub fn success(data: Value) -> Self {
        ActionResponse::Success { success: true, data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ActionResponse::Failure {
            error: ErrorBody {
                message: message.into(),
            },
        }
    }

    pub fn failed(&self) -> bool {
        matches!(self, ActionResponse::Failure { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ActionResponse::Success { data, .. } => Some(data),
            ActionResponse::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ActionResponse::Success { .. } => None,
            ActionResponse::Failure { error } => Some(error.message.as_str()),
        }
    }
}

impl From<ActionResult> for ActionResponse {
    fn from(res: ActionResult) -> Self {
        match res {
            Ok(data) => ActionResponse::success(data),
            Err(e) => ActionResponse::failure(e.to_string()),
        }
    }
}

/// Parses a raw JSON request and runs it.
pub async fn dispatch_json(service: &UserService, caller_id: UserId, raw: &str) -> ActionResponse {
    match serde_json::from_str::<Action>(raw) {
        Ok(action) => dispatch(service, caller_id, action).await,
        Err(e) => {
            tracing::warn!(error = %e, "rejected malformed action");
            ActionResponse::failure(ActionError::InvalidAction(e).to_string())
        }
    }
}

pub async fn dispatch(service: &UserService, caller_id: UserId, action: Action) -> ActionResponse {
    let name = action.name();
    tracing::info!(action = name, %caller_id, "dispatching action");

    let res = run(service, caller_id, action).await;
    if let Err(e) = &res {
        tracing::warn!(action = name, %caller_id, error = %e, "action failed");
    }

    ActionResponse::from(res)
}

async fn run(service: &UserService, caller_id: UserId, action: Action) -> ActionResult {
    let caller = service.caller(caller_id).await?;

    match action {
        Action::GetUser { user_id } => {
            caller.require_admin()?;
            let user = service.get_user(user_id).await?;
            Ok(serde_json::to_value(user)?)
        }
        Action::VerifyUsername { user_id } => {
            caller.require_manage(user_id)?;
            let profile = service.verify_username(user_id).await?;
            Ok(serde_json::to_value(profile)?)
        }
        Action::SuggestUsername { username, user_id } => {
            let correction = match (username, user_id) {
                (Some(username), None) => analyze_username(&username),
                (None, Some(user_id)) => {
                    caller.require_manage(user_id)?;
                    service.suggest_for_user(user_id).await?
                }
                _ => {
                    return Err(ActionError::InvalidArgs(
                        "exactly one of username or userId is required".into(),
                    ));
                }
            };
            Ok(serde_json::to_value(correction)?)
        }
        Action::UpdateUserMetadata { user_id, metadata } => {
            caller.require_manage(user_id)?;
            let user = service.update_metadata(user_id, metadata).await?;
            Ok(serde_json::to_value(user)?)
        }
        Action::FixUsername {
            user_id,
            correct_username,
        } => {
            caller.require_admin()?;
            let user = service.fix_username(user_id, &correct_username).await?;
            Ok(serde_json::to_value(user)?)
        }
        Action::CorrectionHistory { user_id } => {
            caller.require_admin()?;
            let records = service.correction_history(user_id).await?;
            Ok(serde_json::to_value(records)?)
        }
    }
}
