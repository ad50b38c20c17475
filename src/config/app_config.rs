//! config/app_config.rs
//! Configuración global del servicio, leída del entorno (.env incluido).

use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

/// Valores por defecto
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 270;
pub const DEFAULT_CLEANUP_CRON: &str = "0 0 2 * * *";
pub const DEFAULT_FCM_BASE_URL: &str = "https://fcm.googleapis.com";
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub server_workers: Option<usize>,

    // Firebase
    pub firebase_credentials_file: String,
    pub fcm_base_url: String,
    /// Timeouts de las llamadas salientes (FCM y OAuth2), en segundos
    pub http_connect_timeout_secs: u64,
    pub http_timeout_secs: u64,

    // Limpieza de tokens viejos
    pub token_ttl_days: i64,
    pub cleanup_cron: String,

    // Sink de logs en base de datos (opcional)
    pub log_db_url: Option<String>,
    pub log_db_level: log::LevelFilter,
}

impl AppConfig {
    /// Construye la configuración desde variables de entorno.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env`, pero con una función de búsqueda inyectable (tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("Falta la variable de entorno {}", key))
        };

        let token_ttl_days = parse_or(&lookup, "TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)?;
        if token_ttl_days <= 0 {
            return Err(anyhow!("TOKEN_TTL_DAYS debe ser positivo: {}", token_ttl_days));
        }

        let http_timeout_secs = parse_or(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if http_timeout_secs == 0 {
            return Err(anyhow!("HTTP_TIMEOUT_SECS debe ser positivo"));
        }

        Ok(AppConfig {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
            server_workers: lookup("SERVER_WORKERS")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("SERVER_WORKERS inválido")?,
            firebase_credentials_file: required("FIREBASE_CREDENTIALS_FILE")?,
            fcm_base_url: lookup("FCM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FCM_BASE_URL.to_string()),
            http_connect_timeout_secs: parse_or(
                &lookup,
                "HTTP_CONNECT_TIMEOUT_SECS",
                DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
            )?,
            http_timeout_secs,
            token_ttl_days,
            cleanup_cron: lookup("CLEANUP_CRON").unwrap_or_else(|| DEFAULT_CLEANUP_CRON.to_string()),
            log_db_url: lookup("LOG_DB_URL").filter(|v| !v.trim().is_empty()),
            log_db_level: parse_or(&lookup, "LOG_DB_LEVEL", log::LevelFilter::Info)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Valor inválido para {}: '{}' ({})", key, raw, e)),
        None => Ok(default),
    }
}
