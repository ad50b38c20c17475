//! services/token_service.rs
//! Alta, baja y limpieza periódica de tokens de usuario.

use actix_web::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::{
    errors::ApiError,
    models::token_model::{TokenDto, UserToken},
    repository::TokenRepository,
    services::send_message_service::SendMessageService,
};

#[derive(Clone)]
pub struct TokenService {
    repository: Arc<dyn TokenRepository>,
    send_message_service: SendMessageService,
    token_ttl_days: i64,
}

impl TokenService {
    pub fn new(
        repository: Arc<dyn TokenRepository>,
        send_message_service: SendMessageService,
        token_ttl_days: i64,
    ) -> Self {
        Self {
            repository,
            send_message_service,
            token_ttl_days,
        }
    }

    pub fn map_to_dto(user_token: &UserToken) -> TokenDto {
        TokenDto::new(&user_token.token, &user_token.user_id)
    }

    pub fn map_to_entity(dto: &TokenDto) -> UserToken {
        UserToken::new(&dto.token, &dto.user_id)
    }

    /// Guarda el token si FCM lo acepta y no estaba registrado.
    pub async fn save(&self, dto: &TokenDto) -> Result<(), ApiError> {
        log::info!("Guardar token: {:?}", dto);
        if self.send_message_service.is_token_invalid(dto).await {
            log::info!("Token {:?} inválido, devolviendo 400", dto);
            return Err(ApiError::register_token(
                "Token is not valid",
                StatusCode::BAD_REQUEST,
            ));
        }

        let entity = Self::map_to_entity(dto);
        if self.repository.exists_by_token(&entity.token).await? {
            log::info!("Token {:?} ya existe, devolviendo 409", dto);
            return Err(ApiError::register_token(
                "Token already registered",
                StatusCode::CONFLICT,
            ));
        }

        // Otro registro concurrente pudo insertar el mismo token tras la comprobación
        let Some(saved) = self.repository.save(entity).await? else {
            log::info!("Token {:?} registrado en paralelo, devolviendo 409", dto);
            return Err(ApiError::register_token(
                "Token already registered",
                StatusCode::CONFLICT,
            ));
        };
        log::info!(
            "Token {:?} guardado en DB con id {:?}",
            Self::map_to_dto(&saved),
            saved.id
        );
        Ok(())
    }

    pub async fn delete(&self, dto: &TokenDto) -> Result<(), ApiError> {
        if !self.repository.exists_by_token(&dto.token).await? {
            log::info!("Token {:?} no registrado. Devolviendo 404.", dto);
            return Err(ApiError::register_token(
                "Token not registered",
                StatusCode::NOT_FOUND,
            ));
        }
        self.repository.delete_by_token(&dto.token).await?;
        log::info!("Token {:?} borrado de la DB", dto);
        Ok(())
    }

    pub fn cleanup_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.token_ttl_days)
    }

    /// Borra los tokens registrados hace más de `token_ttl_days`.
    pub async fn cleanup_old_tokens(&self) -> anyhow::Result<u64> {
        let cutoff = self.cleanup_cutoff(Utc::now());
        let deleted = self.repository.delete_by_time_before(cutoff).await?;
        log::info!(
            "Borrados {} tokens con más de {} días",
            deleted,
            self.token_ttl_days
        );
        Ok(deleted)
    }
}
