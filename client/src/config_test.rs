use super::*;

/// # Safety
/// Env mutation is process-global; every test in this file touches the same
/// variables, so they run under one lock.
unsafe fn clear_ponto_env() {
    unsafe {
        std::env::remove_var("PONTO_BASE_URL");
        std::env::remove_var("PONTO_TIMEOUT_SECS");
        std::env::remove_var("PONTO_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("PONTO_DISMISS_SECS");
        std::env::remove_var("PONTO_SESSION_FILE");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_ponto_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.request_timeout, Duration::from_secs(10));
    assert_eq!(cfg.dismiss_after, Duration::from_secs(5));
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_ponto_env();
        std::env::set_var("PONTO_BASE_URL", "https://ponto.example.test/api/");
        std::env::set_var("PONTO_TIMEOUT_SECS", "30");
        std::env::set_var("PONTO_CONNECT_TIMEOUT_SECS", " 2 ");
        std::env::set_var("PONTO_DISMISS_SECS", "0");
        std::env::set_var("PONTO_SESSION_FILE", "/tmp/session.json");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://ponto.example.test/api");
    assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    assert_eq!(cfg.connect_timeout, Duration::from_secs(2));
    assert_eq!(cfg.dismiss_after, Duration::ZERO);
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/session.json"));

    unsafe { clear_ponto_env() };
}

#[test]
fn from_env_rejects_bad_seconds() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_ponto_env();
        std::env::set_var("PONTO_TIMEOUT_SECS", "ten");
    }

    let err = ClientConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("PONTO_TIMEOUT_SECS"));

    unsafe { clear_ponto_env() };
}

#[test]
fn base_url_requires_http_scheme() {
    assert!(normalize_base_url("localhost:5000").is_err());
    assert_eq!(normalize_base_url("http://localhost:5000//").unwrap(), "http://localhost:5000");
}

#[test]
fn with_base_url_overrides_default() {
    let cfg = ClientConfig::default().with_base_url("http://10.0.0.2:5000/").unwrap();
    assert_eq!(cfg.base_url, "http://10.0.0.2:5000");
}
