use std::env;
use std::path::PathBuf;

use crate::services::backend::SupabaseConfig;
use crate::services::i18n::Language;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4173";
pub const DEFAULT_STATE_FILE: &str = ".license-admin/auth-state.json";
pub const DEFAULT_TWO_FACTOR_FUNCTION: &str = "verify-2fa";
pub const DEFAULT_LOGIN_BURST: u32 = 5;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub bind_addr: String,
    pub state_file: PathBuf,
    pub language: Language,
    pub login_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL must be set".to_string())?;

        let anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| "SUPABASE_ANON_KEY must be set".to_string())?;

        let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if service_role_key.is_none() {
            tracing::warn!("SUPABASE_SERVICE_ROLE_KEY not set; adding and removing identities will fail");
        }

        let two_factor_function = env::var("SUPABASE_TWO_FACTOR_FUNCTION")
            .unwrap_or_else(|_| DEFAULT_TWO_FACTOR_FUNCTION.to_string());

        let bind_addr = env::var("ADMIN_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let state_file = env::var("ADMIN_STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE));

        let language = match env::var("ADMIN_LANGUAGE") {
            Ok(raw) => raw.parse().map_err(|e| format!("ADMIN_LANGUAGE: {}", e))?,
            Err(_) => Language::default(),
        };

        let login_burst = match env::var("LOGIN_BURST") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("LOGIN_BURST must be a number, got {}", raw))?,
            Err(_) => DEFAULT_LOGIN_BURST,
        };

        Ok(Self {
            supabase: SupabaseConfig {
                url,
                anon_key,
                service_role_key,
                two_factor_function,
            },
            bind_addr,
            state_file,
            language,
            login_burst,
        })
    }
}
