use super::*;

use jsonwebtoken::{EncodingKey, Header, encode};

fn temp_store() -> SessionStore {
    SessionStore::new(std::env::temp_dir().join(format!("ponto-session-{}.json", uuid::Uuid::new_v4())))
}

fn signed_token(claims: &serde_json::Value) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(b"server-side-secret")).unwrap()
}

// =============================================================
// SessionStore
// =============================================================

#[test]
fn load_missing_file_is_none() {
    let store = temp_store();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_then_load_then_clear() {
    let store = temp_store();
    let session = Session { token: "abc.def.ghi".to_owned() };

    store.save(&session).unwrap();
    assert_eq!(store.load().unwrap(), Some(session));

    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
    store.clear().unwrap();
}

#[test]
fn load_rejects_garbage() {
    let store = temp_store();
    std::fs::write(store.path(), "not json").unwrap();
    assert!(matches!(store.load(), Err(SessionError::Json(_))));
    store.clear().unwrap();
}

// =============================================================
// Claims
// =============================================================

#[test]
fn claims_decode_without_knowing_the_secret() {
    let token = signed_token(&serde_json::json!({
        "usuario_id": "gestor",
        "empresa_nome": "Padaria Central",
        "empresa_id": "padaria",
        "exp": 1_700_000_000_i64
    }));
    let claims = Session { token }.claims().unwrap();
    assert_eq!(claims.usuario_id, "gestor");
    assert_eq!(claims.empresa_nome, "Padaria Central");
    assert_eq!(claims.empresa_id.as_deref(), Some("padaria"));
    assert!(claims.is_expired_at(1_700_000_000));
    assert!(!claims.is_expired_at(1_699_999_999));
}

#[test]
fn claims_without_exp_never_expire() {
    let token = signed_token(&serde_json::json!({"usuario_id": "gestor"}));
    let claims = Session { token }.claims().unwrap();
    assert!(claims.exp.is_none());
    assert!(!claims.is_expired_at(i64::MAX));
}

#[test]
fn malformed_token_is_an_error() {
    let session = Session { token: "not-a-jwt".to_owned() };
    assert!(matches!(session.claims(), Err(SessionError::Token(_))));
}
