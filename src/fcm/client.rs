//! fcm/client.rs
//! Implementación de `MessagingClient` sobre la API HTTP v1 de FCM.

use anyhow::Context;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{
    AccessTokenProvider, BatchResponse, FcmError, Message, MessagingClient, MulticastMessage,
    SendResponse, MAX_MULTICAST_TOKENS,
};

/// Cliente HTTP compartido por FCM y el intercambio OAuth2, con timeouts.
pub fn build_http_client(connect_timeout: Duration, timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .build()
        .context("No se pudo crear el cliente HTTP")
}

#[derive(Serialize)]
struct SendRequest<'a> {
    validate_only: bool,
    message: &'a Message,
}

#[derive(Deserialize)]
struct SendResult {
    name: String,
}

#[derive(Clone)]
pub struct HttpFcmClient {
    http_client: Client,
    base_url: String,
    project_id: String,
    token_provider: Arc<dyn AccessTokenProvider>,
}

impl HttpFcmClient {
    pub fn new(
        http_client: Client,
        base_url: &str,
        project_id: &str,
        token_provider: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            token_provider,
        }
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        )
    }

    async fn send_with_token(
        &self,
        access_token: &str,
        message: &Message,
        validate_only: bool,
    ) -> Result<String, FcmError> {
        let resp = self
            .http_client
            .post(self.send_url())
            .bearer_auth(access_token)
            .json(&SendRequest {
                validate_only,
                message,
            })
            .send()
            .await
            .map_err(|e| FcmError::transport(format!("Error de red enviando a FCM: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FcmError::transport(format!("Error leyendo respuesta de FCM: {}", e)))?;

        if !status.is_success() {
            return Err(FcmError::from_response(status, &body));
        }

        serde_json::from_str::<SendResult>(&body)
            .map(|r| r.name)
            .map_err(|e| FcmError::transport(format!("Respuesta de FCM inválida: {}", e)))
    }
}

#[async_trait]
impl MessagingClient for HttpFcmClient {
    async fn send(&self, message: &Message, validate_only: bool) -> Result<String, FcmError> {
        let access_token = self.token_provider.access_token().await?;
        self.send_with_token(&access_token, message, validate_only)
            .await
    }

    async fn send_each_for_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, FcmError> {
        let access_token = self.token_provider.access_token().await?;
        let messages = message.messages();

        let mut responses = Vec::with_capacity(messages.len());
        for chunk in messages.chunks(MAX_MULTICAST_TOKENS) {
            let sends = chunk
                .iter()
                .map(|m| self.send_with_token(&access_token, m, false));
            responses.extend(join_all(sends).await.into_iter().map(SendResponse::from));
        }

        Ok(BatchResponse::new(responses))
    }
}
