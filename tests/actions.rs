use clubhouse::db::repo::{MemoryCorrectionLog, MemoryIdentityStore};
use clubhouse::models::types::UserId;
use clubhouse::models::user::User;
use clubhouse::{Action, UserService, dispatch, dispatch_json};
use serde_json::json;
use std::sync::Arc;

struct World {
    service: UserService,
    log: Arc<MemoryCorrectionLog>,
    admin: UserId,
    member: UserId,
}

fn world() -> World {
    let identity = Arc::new(MemoryIdentityStore::new());
    let log = Arc::new(MemoryCorrectionLog::new());

    let mut admin = User::new("admin@club.pt", json!({"username": "secretaria"}).as_object().cloned().unwrap());
    admin.is_admin = true;
    let member = User::new("joao@club.pt", json!({"username": "jotambbarbosa"}).as_object().cloned().unwrap());

    let w = World {
        service: UserService::new(identity.clone(), log.clone()),
        log,
        admin: admin.id,
        member: member.id,
    };
    identity.insert(admin);
    identity.insert(member);
    w
}

#[tokio::test]
async fn admin_fixes_username() {
    let w = world();
    let raw = json!({
        "action": "fixUsername",
        "userId": w.member.to_string(),
        "correctUsername": "joao.barbosa",
    })
    .to_string();

    let resp = dispatch_json(&w.service, w.admin, &raw).await;
    assert!(!resp.failed(), "{resp:?}");

    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["user_metadata"]["username"], "joao.barbosa");
    assert_eq!(w.log.records().len(), 1);
}

#[tokio::test]
async fn member_cannot_fix_username() {
    let w = world();
    let resp = dispatch(
        &w.service,
        w.member,
        Action::FixUsername {
            user_id: w.member,
            correct_username: "joao.barbosa".into(),
        },
    )
    .await;

    assert!(resp.failed());
    assert_eq!(resp.message(), Some("permission denied"));
    assert!(w.log.records().is_empty());
}

#[tokio::test]
async fn member_updates_own_metadata_only() {
    let w = world();

    let own = dispatch(
        &w.service,
        w.member,
        Action::UpdateUserMetadata {
            user_id: w.member,
            metadata: json!({"phone": "912000000"}).as_object().cloned().unwrap(),
        },
    )
    .await;
    assert!(!own.failed());
    assert_eq!(own.data().unwrap()["user_metadata"]["phone"], "912000000");

    let other = dispatch(
        &w.service,
        w.member,
        Action::UpdateUserMetadata {
            user_id: w.admin,
            metadata: json!({"phone": "0"}).as_object().cloned().unwrap(),
        },
    )
    .await;
    assert_eq!(other.message(), Some("permission denied"));
}

#[tokio::test]
async fn unknown_user_yields_error_envelope() {
    let w = world();
    let missing = UserId::new();
    let resp = dispatch(&w.service, w.admin, Action::GetUser { user_id: missing }).await;

    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v, json!({"error": {"message": format!("user not found: {missing}")}}));
}

#[tokio::test]
async fn unknown_caller_is_rejected() {
    let w = world();
    let resp = dispatch(&w.service, UserId::new(), Action::GetUser { user_id: w.member }).await;
    assert!(resp.message().unwrap().starts_with("unknown caller"));
}

#[tokio::test]
async fn malformed_request() {
    let w = world();
    let resp = dispatch_json(&w.service, w.admin, r#"{"action": "deleteUser"}"#).await;
    assert!(resp.message().unwrap().starts_with("invalid action"));

    let resp = dispatch_json(&w.service, w.admin, "not json").await;
    assert!(resp.failed());
}

#[tokio::test]
async fn suggest_literal_and_stored() {
    let w = world();

    let resp = dispatch_json(&w.service, w.member, r#"{"action": "suggestUsername", "username": "pedrombsilva"}"#).await;
    let data = resp.data().unwrap();
    assert_eq!(data["corrected"], "pedro.silva");
    assert_eq!(data["rule"], "dot_infix");

    let resp = dispatch(
        &w.service,
        w.member,
        Action::SuggestUsername {
            username: None,
            user_id: Some(w.member),
        },
    )
    .await;
    let data = resp.data().unwrap();
    assert_eq!(data["corrected"], "joao.barbosa");
    assert_eq!(data["rule"], "literal_override");
    assert_eq!(data["changed"], true);

    let resp = dispatch(
        &w.service,
        w.member,
        Action::SuggestUsername {
            username: None,
            user_id: None,
        },
    )
    .await;
    assert!(resp.message().unwrap().starts_with("invalid arguments"));
}

#[tokio::test]
async fn verify_and_history() {
    let w = world();

    let resp = dispatch(&w.service, w.member, Action::VerifyUsername { user_id: w.member }).await;
    let data = resp.data().unwrap();
    assert_eq!(data["username"], "jotambbarbosa");
    assert_eq!(data["has_special_chars"], false);

    dispatch(
        &w.service,
        w.admin,
        Action::FixUsername {
            user_id: w.member,
            correct_username: "joao.barbosa".into(),
        },
    )
    .await;

    let resp = dispatch(&w.service, w.admin, Action::CorrectionHistory { user_id: w.member }).await;
    let data = resp.data().unwrap();
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["detected_pattern"], "mb_transformation");

    let denied = dispatch(&w.service, w.member, Action::CorrectionHistory { user_id: w.member }).await;
    assert!(denied.failed());
}
