//! fcm/error.rs
//! Códigos de error de FCM y su extracción de las respuestas HTTP v1.

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

/// Mensaje exacto con el que FCM rechaza un token mal formado.
pub const INVALID_REGISTRATION_TOKEN_MESSAGE: &str =
    "The registration token is not a valid FCM registration token";

const FCM_ERROR_TYPE: &str = "type.googleapis.com/google.firebase.fcm.v1.FcmError";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagingErrorCode {
    InvalidArgument,
    Unregistered,
    SenderIdMismatch,
    QuotaExceeded,
    Unavailable,
    Internal,
    ThirdPartyAuthError,
    Unknown,
}

impl MessagingErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "INVALID_ARGUMENT" => MessagingErrorCode::InvalidArgument,
            "UNREGISTERED" => MessagingErrorCode::Unregistered,
            "SENDER_ID_MISMATCH" => MessagingErrorCode::SenderIdMismatch,
            "QUOTA_EXCEEDED" | "RESOURCE_EXHAUSTED" => MessagingErrorCode::QuotaExceeded,
            "UNAVAILABLE" => MessagingErrorCode::Unavailable,
            "INTERNAL" => MessagingErrorCode::Internal,
            "THIRD_PARTY_AUTH_ERROR" => MessagingErrorCode::ThirdPartyAuthError,
            _ => MessagingErrorCode::Unknown,
        }
    }

    fn from_http_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => MessagingErrorCode::InvalidArgument,
            429 => MessagingErrorCode::QuotaExceeded,
            500 => MessagingErrorCode::Internal,
            503 => MessagingErrorCode::Unavailable,
            _ => MessagingErrorCode::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessagingErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            MessagingErrorCode::Unregistered => "UNREGISTERED",
            MessagingErrorCode::SenderIdMismatch => "SENDER_ID_MISMATCH",
            MessagingErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            MessagingErrorCode::Unavailable => "UNAVAILABLE",
            MessagingErrorCode::Internal => "INTERNAL",
            MessagingErrorCode::ThirdPartyAuthError => "THIRD_PARTY_AUTH_ERROR",
            MessagingErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MessagingErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct FcmError {
    pub code: MessagingErrorCode,
    pub message: String,
}

impl FcmError {
    pub fn new(code: MessagingErrorCode, message: impl Into<String>) -> Self {
        FcmError {
            code,
            message: message.into(),
        }
    }

    /// Error local (red, credenciales, JSON) sin código de FCM.
    pub fn transport(message: impl Into<String>) -> Self {
        FcmError::new(MessagingErrorCode::Unknown, message)
    }

    /// Token que nunca va a funcionar: desregistrado o con formato inválido.
    pub fn is_bad_token(&self) -> bool {
        match self.code {
            MessagingErrorCode::Unregistered => true,
            MessagingErrorCode::InvalidArgument => {
                self.message == INVALID_REGISTRATION_TOKEN_MESSAGE
            }
            _ => false,
        }
    }

    /// Interpreta el cuerpo de error de la API v1.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let Some(err) = parsed.map(|e| e.error) else {
            return FcmError::new(
                MessagingErrorCode::from_http_status(status),
                format!("Unexpected HTTP response with status {}: {}", status, body),
            );
        };

        let detail_code = err
            .details
            .iter()
            .find(|d| d.kind.as_deref() == Some(FCM_ERROR_TYPE))
            .and_then(|d| d.error_code.as_deref())
            .map(MessagingErrorCode::parse);

        let code = detail_code
            .or_else(|| {
                err.status
                    .as_deref()
                    .map(MessagingErrorCode::parse)
                    .filter(|c| *c != MessagingErrorCode::Unknown)
            })
            .unwrap_or_else(|| MessagingErrorCode::from_http_status(status));

        let message = err
            .message
            .unwrap_or_else(|| format!("Unexpected HTTP response with status {}", status));

        FcmError::new(code, message)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "@type")]
    kind: Option<String>,
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}
