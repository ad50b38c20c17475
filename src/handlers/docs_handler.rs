//! handlers/docs_handler.rs
//! Documento OpenAPI 3 del servicio y una página Swagger UI que lo carga.

use actix_web::HttpResponse;
use serde_json::{json, Value};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

fn json_content(schema: &str) -> Value {
    json!({
        "application/json": {
            "schema": { "$ref": format!("#/components/schemas/{}", schema) }
        }
    })
}

fn response(description: &str, schema: &str) -> Value {
    json!({ "description": description, "content": json_content(schema) })
}

fn error(description: &str) -> Value {
    response(description, "ErrorBody")
}

/// Construye el documento a partir de las rutas registradas en `app::init_app`.
pub fn openapi_document() -> Value {
    let status_body = |status_example: &str, message_example: &str| {
        json!({
            "type": "object",
            "properties": {
                "status": { "type": "string", "example": status_example },
                "timestamp": { "type": "string", "format": "date-time", "example": "2025-06-17T09:48:26.732792" },
                "message": { "type": "string", "example": message_example }
            }
        })
    };

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Push notifications sender",
            "description": "API for registering FCM tokens and sending push notifications",
            "version": env!("CARGO_PKG_VERSION")
        },
        "tags": [
            { "name": "tokens", "description": "Subscribe to push notifications by registering a device token" },
            { "name": "messages", "description": "Send an arbitrary message to a user with a known ID" }
        ],
        "paths": {
            "/api/pushservice/v1/token": {
                "post": {
                    "tags": ["tokens"],
                    "summary": "Register token",
                    "requestBody": { "required": true, "content": json_content("TokenDto") },
                    "responses": {
                        "201": response("Token registered", "SuccessResponse"),
                        "400": error("Invalid request or token rejected by FCM"),
                        "409": error("Token already registered"),
                        "500": error("Unexpected error")
                    }
                },
                "delete": {
                    "tags": ["tokens"],
                    "summary": "Delete token",
                    "description": "Removes a token to stop notifications for that device.",
                    "requestBody": { "required": true, "content": json_content("TokenDto") },
                    "responses": {
                        "200": response("Token deleted", "SuccessResponse"),
                        "400": error("Invalid request"),
                        "404": error("Token not registered"),
                        "500": error("Unexpected error")
                    }
                }
            },
            "/api/pushservice/v1/send": {
                "post": {
                    "tags": ["messages"],
                    "summary": "Send message",
                    "description": "Sends the title and text to every device registered for the user.",
                    "requestBody": { "required": true, "content": json_content("MessageDto") },
                    "responses": {
                        "200": response("Delivered to at least one token", "SuccessResponse"),
                        "400": error("Invalid request or every stored token is invalid"),
                        "404": error("No tokens for the user"),
                        "504": error("FCM failure"),
                        "500": error("Unexpected error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "TokenDto": {
                    "type": "object",
                    "required": ["token", "userId"],
                    "properties": {
                        "token": { "type": "string", "description": "FCM registration token" },
                        "userId": { "type": "string", "description": "User identifier", "example": "124523" }
                    }
                },
                "MessageDto": {
                    "type": "object",
                    "required": ["userId", "messageTitle", "messageText"],
                    "properties": {
                        "userId": { "type": "string", "example": "12345" },
                        "messageTitle": { "type": "string", "example": "IMPORTANT!" },
                        "messageText": { "type": "string", "example": "New sign-in to your account." }
                    }
                },
                "SuccessResponse": status_body("200 OK", "Message sent successfully"),
                "ErrorBody": status_body("404 NOT_FOUND", "No user token found for 12345")
            }
        }
    })
}

/// GET /api-docs/openapi.json
pub async fn openapi_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(openapi_document())
}

/// GET /swagger-ui
pub async fn swagger_ui_endpoint() -> HttpResponse {
    let html = format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <title>Push notifications sender</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "{}", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>"##,
        OPENAPI_PATH
    );
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
