//! handlers/token_handler.rs
use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    errors::ApiError,
    models::{response_model::SuccessResponse, token_model::TokenDto},
    services::token_service::TokenService,
};

fn validated(dto: web::Json<TokenDto>) -> Result<TokenDto, ApiError> {
    let dto = dto.into_inner();
    let errors = dto.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors.join(", ")));
    }
    Ok(dto)
}

/// POST /api/pushservice/v1/token
pub async fn add_token_endpoint(
    token_service: web::Data<TokenService>,
    body: web::Json<TokenDto>,
) -> Result<HttpResponse, ApiError> {
    let dto = validated(body)?;
    log::info!("Petición de alta de token recibida: {:?}", dto);
    token_service.save(&dto).await?;
    log::info!("Alta de token completada: {:?}", dto);

    Ok(HttpResponse::Created().json(SuccessResponse::new(
        StatusCode::CREATED,
        "Token registered successfully",
    )))
}

/// DELETE /api/pushservice/v1/token
pub async fn delete_token_endpoint(
    token_service: web::Data<TokenService>,
    body: web::Json<TokenDto>,
) -> Result<HttpResponse, ApiError> {
    let dto = validated(body)?;
    log::info!("Petición de baja de token recibida: {:?}", dto);
    token_service.delete(&dto).await?;
    log::info!("Baja de token completada: {:?}", dto);

    Ok(HttpResponse::Ok().json(SuccessResponse::new(
        StatusCode::OK,
        "Token deleted successfully",
    )))
}
