//! tests/handler_tests.rs
//! Pruebas de los endpoints HTTP con `actix_web::test`.

#[cfg(test)]
mod tests {
    use actix_web::http::{header::ContentType, StatusCode};
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::app;
    use crate::fcm::error::INVALID_REGISTRATION_TOKEN_MESSAGE;
    use crate::fcm::MessagingErrorCode;
    use crate::models::response_model::{ErrorBody, SuccessResponse};
    use crate::models::token_model::UserToken;
    use crate::tests::fakes::{fixture, FakeMessagingClient, Fixture};

    macro_rules! service {
        ($f:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($f.token_service.clone()))
                    .app_data(web::Data::new($f.send_service.clone()))
                    .configure(app::init_app),
            )
            .await
        };
    }

    fn empty() -> Fixture {
        fixture(vec![], FakeMessagingClient::default())
    }

    #[actix_rt::test]
    async fn add_token_returns_created() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/token")
            .set_json(json!({ "token": "valid-token", "userId": "1" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: SuccessResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, "201 CREATED");
        assert_eq!(body.message, "Token registered successfully");
        assert_eq!(f.repository.tokens().len(), 1);
    }

    #[actix_rt::test]
    async fn add_duplicate_token_returns_conflict() {
        let f = fixture(
            vec![UserToken::new("valid-token", "1")],
            FakeMessagingClient::default(),
        );
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/token")
            .set_json(json!({ "token": "valid-token", "userId": "1" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "409 CONFLICT");
        assert_eq!(body.message, "Token already registered");
    }

    #[actix_rt::test]
    async fn blank_fields_are_bad_request() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/token")
            .set_json(json!({ "token": " ", "userId": "" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "400 BAD_REQUEST");
        assert_eq!(
            body.message,
            "token may not be blank, userId may not be blank"
        );
        assert!(f.messaging.sent_messages().is_empty());
    }

    #[actix_rt::test]
    async fn null_fields_are_reported_as_blank() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/token")
            .set_json(json!({ "token": "abc", "userId": null }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "400 BAD_REQUEST");
        assert_eq!(body.message, "userId may not be blank");

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/send")
            .set_json(json!({ "userId": "1", "messageTitle": null, "messageText": "x" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.message, "messageTitle may not be blank");
        assert!(f.messaging.sent_messages().is_empty());
    }

    #[actix_rt::test]
    async fn malformed_json_is_bad_request() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/send")
            .insert_header(ContentType::json())
            .set_payload("{\"userId\": ")
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "400 BAD_REQUEST");
    }

    #[actix_rt::test]
    async fn delete_token_returns_ok() {
        let f = fixture(
            vec![UserToken::new("existing-token", "1")],
            FakeMessagingClient::default(),
        );
        let srv = service!(f);

        let req = test::TestRequest::delete()
            .uri("/api/pushservice/v1/token")
            .set_json(json!({ "token": "existing-token", "userId": "1" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: SuccessResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, "200 OK");
        assert_eq!(body.message, "Token deleted successfully");
        assert!(f.repository.tokens().is_empty());
    }

    #[actix_rt::test]
    async fn delete_missing_token_returns_not_found() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::delete()
            .uri("/api/pushservice/v1/token")
            .set_json(json!({ "token": "non-existing-token", "userId": "1" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "404 NOT_FOUND");
        assert_eq!(body.message, "Token not registered");
    }

    #[actix_rt::test]
    async fn send_returns_ok() {
        let f = fixture(
            vec![UserToken::new("testToken123", "testUser123")],
            FakeMessagingClient::default(),
        );
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/send")
            .set_json(json!({
                "userId": "testUser123",
                "messageTitle": "Test Notification",
                "messageText": "This is a test message"
            }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: SuccessResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Message sent successfully");
        assert_eq!(f.messaging.sent_messages().len(), 1);
    }

    #[actix_rt::test]
    async fn send_with_missing_fields_is_bad_request() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/send")
            .set_json(json!({ "userId": "testUser123" }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(
            body.message,
            "messageTitle may not be blank, messageText may not be blank"
        );
    }

    #[actix_rt::test]
    async fn send_to_unknown_user_is_not_found() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/send")
            .set_json(json!({
                "userId": "ghost",
                "messageTitle": "t",
                "messageText": "x"
            }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "404 NOT_FOUND");
        assert_eq!(body.message, "No user token found for ghost");
    }

    #[actix_rt::test]
    async fn send_failure_status_text_matches_code() {
        let f = fixture(
            vec![UserToken::new("testToken123", "testUser123")],
            FakeMessagingClient::default().failing(
                "testToken123",
                MessagingErrorCode::Internal,
                "Internal error encountered.",
            ),
        );
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/send")
            .set_json(json!({
                "userId": "testUser123",
                "messageTitle": "t",
                "messageText": "x"
            }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "504 GATEWAY_TIMEOUT");
    }

    #[actix_rt::test]
    async fn send_to_only_invalid_tokens_is_bad_request() {
        let f = fixture(
            vec![
                UserToken::new("gone-token", "testUser123"),
                UserToken::new("bad-token", "testUser123"),
            ],
            FakeMessagingClient::default()
                .failing(
                    "gone-token",
                    MessagingErrorCode::Unregistered,
                    "Requested entity was not found.",
                )
                .failing(
                    "bad-token",
                    MessagingErrorCode::InvalidArgument,
                    INVALID_REGISTRATION_TOKEN_MESSAGE,
                ),
        );
        let srv = service!(f);

        let req = test::TestRequest::post()
            .uri("/api/pushservice/v1/send")
            .set_json(json!({
                "userId": "testUser123",
                "messageTitle": "t",
                "messageText": "x"
            }))
            .to_request();
        let resp = test::call_service(&srv, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.status, "400 BAD_REQUEST");
        assert!(f.repository.tokens().is_empty());
    }

    #[actix_rt::test]
    async fn openapi_document_lists_all_routes() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request();
        let doc: Value = test::call_and_read_body_json(&srv, req).await;

        assert_eq!(doc["openapi"], "3.0.3");
        let token = &doc["paths"]["/api/pushservice/v1/token"];
        assert!(token["post"]["responses"]["409"].is_object());
        assert!(token["delete"]["responses"]["404"].is_object());
        assert!(doc["paths"]["/api/pushservice/v1/send"]["post"]["responses"]["504"].is_object());
        assert_eq!(
            doc["components"]["schemas"]["TokenDto"]["required"],
            json!(["token", "userId"])
        );
    }

    #[actix_rt::test]
    async fn swagger_ui_points_at_document() {
        let f = empty();
        let srv = service!(f);

        let req = test::TestRequest::get().uri("/swagger-ui").to_request();
        let resp = test::call_service(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/api-docs/openapi.json"));
    }
}
