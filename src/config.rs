//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
//! La conexión a Postgres se configura aparte (`esg_persistence::DbConfig`).
use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

pub const DEFAULT_CURRENT_USER: &str = "admin@esg.local";
pub const DEFAULT_LOG_FILTER: &str = "info";

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv();
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Identidad con la que se envían y revisan submissions (`ESG_CURRENT_USER`).
    pub current_user: String,
    /// Filtro de `tracing_subscriber::EnvFilter` (`ESG_LOG`).
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        Self::from_values(env::var("ESG_CURRENT_USER").ok(), env::var("ESG_LOG").ok())
    }

    /// Valores vacíos o ausentes caen a los defaults.
    pub fn from_values(current_user: Option<String>, log_filter: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self { current_user: non_empty(current_user).unwrap_or_else(|| DEFAULT_CURRENT_USER.to_string()),
               log_filter: non_empty(log_filter).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()) }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);
