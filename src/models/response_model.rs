//! models/response_model.rs
//! Cuerpos de respuesta compartidos por todos los endpoints.

use actix_web::http::StatusCode;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Texto de estado estilo "404 NOT_FOUND".
pub fn status_text(status: StatusCode) -> String {
    let reason = status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
        .replace([' ', '-'], "_");
    format!("{} {}", status.as_u16(), reason)
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub status: String,
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(status: StatusCode, message: &str) -> Self {
        SuccessResponse {
            status: status_text(status),
            timestamp: now(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorBody {
            status: status.into(),
            timestamp: now(),
            message: message.into(),
        }
    }
}
