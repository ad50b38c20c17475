//! fcm/mod.rs
//! Cliente de Firebase Cloud Messaging (API HTTP v1).

pub mod client;
pub mod credentials;
pub mod error;

use async_trait::async_trait;
use serde::Serialize;

pub use client::{build_http_client, HttpFcmClient};
pub use credentials::{AccessTokenProvider, ServiceAccount, ServiceAccountTokenProvider};
pub use error::{FcmError, MessagingErrorCode};

/// FCM acepta como máximo 500 tokens por envío multicast.
pub const MAX_MULTICAST_TOKENS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Notification {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }
}

/// Mensaje dirigido a un único token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl Message {
    pub fn to_token(token: impl Into<String>) -> Self {
        Message {
            token: token.into(),
            notification: None,
        }
    }
}

/// Mismo contenido para varios tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastMessage {
    pub tokens: Vec<String>,
    pub notification: Option<Notification>,
}

impl MulticastMessage {
    pub fn new(tokens: Vec<String>, notification: Notification) -> Self {
        MulticastMessage {
            tokens,
            notification: Some(notification),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.tokens
            .iter()
            .map(|token| Message {
                token: token.clone(),
                notification: self.notification.clone(),
            })
            .collect()
    }
}

/// Resultado de un envío individual dentro de un multicast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    result: Result<String, FcmError>,
}

impl SendResponse {
    pub fn success(message_id: impl Into<String>) -> Self {
        SendResponse {
            result: Ok(message_id.into()),
        }
    }

    pub fn failure(error: FcmError) -> Self {
        SendResponse { result: Err(error) }
    }

    pub fn is_successful(&self) -> bool {
        self.result.is_ok()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.result.as_ref().ok().map(String::as_str)
    }

    pub fn error(&self) -> Option<&FcmError> {
        self.result.as_ref().err()
    }
}

impl From<Result<String, FcmError>> for SendResponse {
    fn from(result: Result<String, FcmError>) -> Self {
        SendResponse { result }
    }
}

/// Respuestas en el mismo orden que los tokens del multicast.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchResponse {
    pub responses: Vec<SendResponse>,
}

impl BatchResponse {
    pub fn new(responses: Vec<SendResponse>) -> Self {
        BatchResponse { responses }
    }

    pub fn success_count(&self) -> usize {
        self.responses.iter().filter(|r| r.is_successful()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.responses.len() - self.success_count()
    }
}

#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Envía un mensaje. Con `validate_only` FCM lo valida sin entregarlo.
    /// Devuelve el nombre del mensaje (`projects/*/messages/*`).
    async fn send(&self, message: &Message, validate_only: bool) -> Result<String, FcmError>;

    /// Un envío por token. Solo falla entero si no se pudo intentar ninguno.
    async fn send_each_for_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, FcmError>;
}
