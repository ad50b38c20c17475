//! app.rs
use crate::errors::ApiError;
use crate::handlers::{docs_handler, send_handler, token_handler};
use actix_web::web;

pub fn json_config() -> web::JsonConfig {
    // JSON mal formado -> 400 con el mismo cuerpo de error que el resto
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/api/pushservice/v1")
                .route("/token", web::post().to(token_handler::add_token_endpoint))
                .route("/token", web::delete().to(token_handler::delete_token_endpoint))
                .route("/send", web::post().to(send_handler::send_message_endpoint)),
        )
        .route(
            docs_handler::OPENAPI_PATH,
            web::get().to(docs_handler::openapi_endpoint),
        )
        .route(
            "/swagger-ui",
            web::get().to(docs_handler::swagger_ui_endpoint),
        );
}
