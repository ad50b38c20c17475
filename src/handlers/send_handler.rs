//! handlers/send_handler.rs
use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    errors::ApiError,
    models::{message_model::MessageDto, response_model::SuccessResponse},
    services::send_message_service::SendMessageService,
};

/// POST /api/pushservice/v1/send
pub async fn send_message_endpoint(
    send_service: web::Data<SendMessageService>,
    body: web::Json<MessageDto>,
) -> Result<HttpResponse, ApiError> {
    let dto = body.into_inner();
    let errors = dto.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors.join(", ")));
    }

    log::info!("Petición de envío recibida: {:?}", dto);
    send_service.send(&dto).await?;
    log::info!("Envío completado: {:?}", dto);

    Ok(HttpResponse::Ok().json(SuccessResponse::new(
        StatusCode::OK,
        "Message sent successfully",
    )))
}
