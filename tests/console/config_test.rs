use serial_test::serial;
use std::env;

use license_admin::config::environment::{DEFAULT_BIND_ADDR, DEFAULT_LOGIN_BURST};
use license_admin::config::Config;
use license_admin::services::i18n::Language;

const VARS: &[&str] = &[
    "SUPABASE_URL",
    "SUPABASE_ANON_KEY",
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_TWO_FACTOR_FUNCTION",
    "ADMIN_BIND_ADDR",
    "ADMIN_STATE_FILE",
    "ADMIN_LANGUAGE",
    "LOGIN_BURST",
];

fn reset_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[serial]
#[test]
fn test_config_requires_supabase_url() {
    reset_env();
    env::set_var("SUPABASE_ANON_KEY", "anon");

    let err = Config::from_env().unwrap_err();
    assert!(err.contains("SUPABASE_URL"));
    reset_env();
}

#[serial]
#[test]
fn test_config_defaults() {
    reset_env();
    env::set_var("SUPABASE_URL", "https://project.supabase.co");
    env::set_var("SUPABASE_ANON_KEY", "anon");

    let config = Config::from_env().unwrap();
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(config.login_burst, DEFAULT_LOGIN_BURST);
    assert_eq!(config.language, Language::En);
    assert_eq!(config.supabase.service_role_key, None);
    assert_eq!(config.supabase.two_factor_function, "verify-2fa");
    reset_env();
}

#[serial]
#[test]
fn test_config_overrides() {
    reset_env();
    env::set_var("SUPABASE_URL", "https://project.supabase.co");
    env::set_var("SUPABASE_ANON_KEY", "anon");
    env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service");
    env::set_var("ADMIN_LANGUAGE", "ar-SA");
    env::set_var("LOGIN_BURST", "9");
    env::set_var("ADMIN_STATE_FILE", "/tmp/console-state.json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.language, Language::Ar);
    assert_eq!(config.login_burst, 9);
    assert_eq!(config.supabase.service_role_key.as_deref(), Some("service"));
    assert_eq!(config.state_file.to_str(), Some("/tmp/console-state.json"));
    reset_env();
}

#[serial]
#[test]
fn test_config_rejects_bad_values() {
    reset_env();
    env::set_var("SUPABASE_URL", "https://project.supabase.co");
    env::set_var("SUPABASE_ANON_KEY", "anon");
    env::set_var("LOGIN_BURST", "lots");
    assert!(Config::from_env().is_err());

    env::remove_var("LOGIN_BURST");
    env::set_var("ADMIN_LANGUAGE", "fr");
    assert!(Config::from_env().is_err());
    reset_env();
}
