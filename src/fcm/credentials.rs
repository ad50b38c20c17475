//! fcm/credentials.rs
//! Credenciales de cuenta de servicio y obtención de access tokens OAuth2
//! (JWT bearer grant firmado con RS256).

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

use super::error::FcmError;

pub const FIREBASE_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Margen antes de la expiración en el que se pide un token nuevo.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Campos usados del JSON de cuenta de servicio de Firebase.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

// La clave privada no debe acabar en los logs
impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccount {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("JSON de credenciales de Firebase inválido")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Firebase credentials file not found: {}",
                path.to_string_lossy()
            )
        })?;
        Self::from_json(&raw)
    }
}

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, FcmError>;
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Pide access tokens a Google con la cuenta de servicio y los cachea.
pub struct ServiceAccountTokenProvider {
    account: ServiceAccount,
    key: EncodingKey,
    http_client: Client,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(account: ServiceAccount, http_client: Client) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .context("private_key de la cuenta de servicio no es una clave RSA PEM válida")?;
        Ok(Self {
            account,
            key,
            http_client,
            cache: Mutex::new(None),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.account.project_id
    }

    fn signed_assertion(&self, now: i64) -> Result<String, FcmError> {
        let claims = Claims {
            iss: &self.account.client_email,
            scope: FIREBASE_MESSAGING_SCOPE,
            aud: &self.account.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.account.private_key_id.clone();

        encode(&header, &claims, &self.key)
            .map_err(|e| FcmError::transport(format!("No se pudo firmar el JWT: {}", e)))
    }

    async fn fetch_token(&self, now: i64) -> Result<CachedToken, FcmError> {
        let assertion = self.signed_assertion(now)?;
        let resp = self
            .http_client
            .post(&self.account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| FcmError::transport(format!("Error pidiendo access token: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FcmError::transport(format!(
                "Error obteniendo access token ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| FcmError::transport(format!("Respuesta de token inválida: {}", e)))?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, FcmError> {
        let now = Utc::now().timestamp();
        if let Some(cached) = self.cache.lock().await.as_ref() {
            if cached.expires_at - REFRESH_MARGIN_SECS > now {
                return Ok(cached.value.clone());
            }
        }

        // El lock no se mantiene durante la petición a Google
        log::debug!("Pidiendo nuevo access token para {}", self.account.client_email);
        let fresh = self.fetch_token(now).await?;
        let value = fresh.value.clone();
        *self.cache.lock().await = Some(fresh);
        Ok(value)
    }
}
