//! errors.rs
//! Errores de dominio y su traducción a respuestas HTTP.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::response_model::{status_text, ErrorBody};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Cuerpo inválido o campos vacíos
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    RegisterToken { message: String, status: StatusCode },

    #[error("{message}")]
    SendMessage { message: String, status: StatusCode },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn register_token(message: impl Into<String>, status: StatusCode) -> Self {
        ApiError::RegisterToken {
            message: message.into(),
            status,
        }
    }

    pub fn send_message(message: impl Into<String>, status: StatusCode) -> Self {
        ApiError::SendMessage {
            message: message.into(),
            status,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RegisterToken { status, .. } => *status,
            ApiError::SendMessage { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            ApiError::Internal(e) => {
                log::error!("Error inesperado del servidor: {:?}", e);
                ErrorBody::new("Unexpected error", e.to_string())
            }
            other => ErrorBody::new(status_text(status), other.to_string()),
        };
        HttpResponse::build(status).json(body)
    }
}
