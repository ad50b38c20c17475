//! models/token_model.rs
//! DTO de registro de token y la fila `user_tokens` que lo persiste.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token de registro de FCM asociado a un usuario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    #[serde(default, deserialize_with = "super::null_as_blank")]
    pub token: String,
    #[serde(default, deserialize_with = "super::null_as_blank")]
    pub user_id: String,
}

impl TokenDto {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        TokenDto {
            token: token.into(),
            user_id: user_id.into(),
        }
    }

    /// Devuelve los errores de campo ("token may not be blank", ...).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if self.token.trim().is_empty() {
            errors.push("token may not be blank".to_string());
        }
        if self.user_id.trim().is_empty() {
            errors.push("userId may not be blank".to_string());
        }
        errors
    }
}

/// Fila de la tabla `user_tokens`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserToken {
    pub id: Option<i64>,
    pub token: String,
    pub user_id: String,
    pub time: DateTime<Utc>,
}

impl UserToken {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        UserToken {
            id: None,
            token: token.into(),
            user_id: user_id.into(),
            time: Utc::now(),
        }
    }
}
