//! services/send_message_service.rs
//! Envío de notificaciones a todos los dispositivos de un usuario y
//! limpieza de los tokens que FCM rechaza.

use actix_web::http::StatusCode;
use std::sync::Arc;

use crate::{
    errors::ApiError,
    fcm::{BatchResponse, Message, MessagingClient, MulticastMessage, Notification},
    models::{message_model::MessageDto, token_model::TokenDto},
    repository::TokenRepository,
};

#[derive(Clone)]
pub struct SendMessageService {
    repository: Arc<dyn TokenRepository>,
    messaging: Arc<dyn MessagingClient>,
}

impl SendMessageService {
    pub fn new(repository: Arc<dyn TokenRepository>, messaging: Arc<dyn MessagingClient>) -> Self {
        Self {
            repository,
            messaging,
        }
    }

    /// Envía el mensaje a cada token registrado del usuario.
    pub async fn send(&self, message: &MessageDto) -> Result<(), ApiError> {
        let user_id = &message.user_id;
        let tokens = self.repository.find_by_user_id(user_id).await?;
        log::info!("Encontrados {} tokens para userID {}", tokens.len(), user_id);

        if tokens.is_empty() {
            log::info!("Sin tokens para userID {}, devolviendo 404", user_id);
            return Err(ApiError::send_message(
                format!("No user token found for {}", user_id),
                StatusCode::NOT_FOUND,
            ));
        }

        let token_list: Vec<String> = tokens.into_iter().map(|t| t.token).collect();
        let multicast = MulticastMessage::new(
            token_list.clone(),
            Notification::new(&message.message_title, &message.message_text),
        );

        let responses = match self.messaging.send_each_for_multicast(&multicast).await {
            Ok(responses) => responses,
            Err(e) => {
                log::error!("Error enviando mensaje multicast: {}", e);
                return Err(no_messages_sent(user_id));
            }
        };

        let mut bad_tokens = 0;
        if responses.failure_count() > 0 {
            bad_tokens = self.process_bad_tokens(&token_list, &responses).await?;
        }

        if responses.success_count() == 0 {
            if bad_tokens == responses.failure_count() {
                log::info!(
                    "Ningún mensaje enviado para userId {}. Todos los tokens son inválidos o están desregistrados",
                    user_id
                );
                return Err(ApiError::send_message(
                    format!(
                        "No messages sent for userId {}. All stored tokens are not valid or unregistered",
                        user_id
                    ),
                    StatusCode::BAD_REQUEST,
                ));
            }
            return Err(no_messages_sent(user_id));
        }

        for id in responses.responses.iter().filter_map(|r| r.message_id()) {
            log::debug!("Mensaje aceptado por FCM: {}", id);
        }
        log::info!(
            "Mensaje enviado a {} de {} tokens de userId {}",
            responses.success_count(),
            token_list.len(),
            user_id
        );
        Ok(())
    }

    /// Borra los tokens desregistrados o inválidos. Devuelve cuántos borró.
    async fn process_bad_tokens(
        &self,
        token_list: &[String],
        responses: &BatchResponse,
    ) -> Result<usize, ApiError> {
        let mut bad_tokens = 0;
        for (token, response) in token_list.iter().zip(responses.responses.iter()) {
            let Some(error) = response.error() else {
                continue;
            };
            if error.is_bad_token() {
                bad_tokens += 1;
                self.repository.delete_by_token(token).await?;
                log::info!("Token {} desregistrado o inválido. Borrado de la DB.", token);
            } else {
                log::error!("Error inesperado enviando mensaje. Token: {}", token);
                log::error!("Errorcode = {}", error.code);
                log::error!("Message = {}", error.message);
            }
        }
        Ok(bad_tokens)
    }

    /// Valida el token con un envío `validate_only`.
    /// Solo devuelve true si FCM dice explícitamente que el token no sirve.
    pub async fn is_token_invalid(&self, token: &TokenDto) -> bool {
        let message = Message::to_token(&token.token);
        match self.messaging.send(&message, true).await {
            Ok(_) => {
                log::info!("Token {} validado correctamente.", token.token);
                false
            }
            Err(e) => {
                log::info!(
                    "Validación del token {} falló con código {}",
                    token.token,
                    e.code
                );
                e.is_bad_token()
            }
        }
    }
}

fn no_messages_sent(user_id: &str) -> ApiError {
    ApiError::send_message(
        format!(
            "No messages sent for userId {}. See logs for more information",
            user_id
        ),
        StatusCode::GATEWAY_TIMEOUT,
    )
}
