use super::*;

// =============================================================
// user_message
// =============================================================

#[test]
fn timeout_and_connection_messages_are_distinct() {
    let timeout = ApiError::Timeout.user_message("fallback");
    let connection = ApiError::Connection("refused".into()).user_message("fallback");
    assert_eq!(timeout, TIMEOUT_MESSAGE);
    assert_eq!(connection, CONNECTION_MESSAGE);
    assert_ne!(timeout, connection);
}

#[test]
fn server_message_is_shown_verbatim() {
    let err = ApiError::Server { status: 404, message: Some("Funcionário não reconhecido".into()) };
    assert_eq!(err.user_message("fallback"), "Funcionário não reconhecido");
    assert!(err.is_domain_failure());
}

#[test]
fn server_without_message_uses_fallback() {
    let err = ApiError::Server { status: 500, message: None };
    assert_eq!(err.user_message("Failed to load employees"), "Failed to load employees");
    assert!(!err.is_domain_failure());
}

#[test]
fn decode_error_uses_fallback() {
    let err = ApiError::Decode("expected array".into());
    assert_eq!(err.user_message("Failed to load records"), "Failed to load records");
}

// =============================================================
// server_message
// =============================================================

#[test]
fn server_message_prefers_error_then_message_then_mensagem() {
    let body = serde_json::json!({"error": "e", "message": "m", "mensagem": "p"});
    assert_eq!(server_message(&body).as_deref(), Some("e"));

    let body = serde_json::json!({"message": "m", "mensagem": "p"});
    assert_eq!(server_message(&body).as_deref(), Some("m"));

    let body = serde_json::json!({"mensagem": "p"});
    assert_eq!(server_message(&body).as_deref(), Some("p"));
}

#[test]
fn server_message_skips_blank_and_non_string_values() {
    let body = serde_json::json!({"error": "  ", "message": 42, "mensagem": "ok"});
    assert_eq!(server_message(&body).as_deref(), Some("ok"));
    assert_eq!(server_message(&Value::Null), None);
}

#[test]
fn from_response_extracts_message() {
    let err = ApiError::from_response(401, &serde_json::json!({"error": "Credenciais inválidas"}));
    assert!(matches!(err, ApiError::Server { status: 401, message: Some(ref m) } if m == "Credenciais inválidas"));
    assert!(err.to_string().contains("401"));
}
