pub mod conversations;
pub mod error;
pub mod messages;
pub mod state;
pub mod webhook;

use axum::{
    Json, Router,
    routing::{get, post},
};

use nexus_types::api::HealthResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// All HTTP routes. Transport layers (CORS, tracing) are added by the server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook/whatsapp", post(webhook::receive_whatsapp))
        .route("/messages", get(messages::recent_messages))
        .route("/messages/send", post(messages::send_message))
        .route("/conversations", get(conversations::list_conversations))
        .route("/conversations/{contact}/messages", get(conversations::get_history))
        .fallback(not_found)
        .with_state(state)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        message: "Nexus backend running".into(),
    })
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use nexus_db::Database;

    use super::*;

    fn app() -> (Arc<Database>, Router) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        (db.clone(), router(AppState::new(db)))
    }

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_, app) = app();
        let (status, body) = call(&app, get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (_, app) = app();
        let (status, body) = call(&app, get_req("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn webhook_then_agent_reply_forms_a_thread() {
        let (_, app) = app();
        let contact = "+5491100000000";

        let (status, ack) = call(
            &app,
            post_json("/webhook/whatsapp", json!({ "phone": contact, "message": "hola" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack["received"], true);
        assert!(ack["id"].as_i64().unwrap() > 0);

        let (status, sent) = call(
            &app,
            post_json("/messages/send", json!({ "contact": contact, "body": "¿en qué puedo ayudar?" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(sent["sender"], "agent");

        let (status, list) = call(&app, get_req("/conversations")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["contact"], contact);
        assert_eq!(list[0]["total_messages"], 2);
        assert_eq!(list[0]["last_message"], "¿en qué puedo ayudar?");
        assert_eq!(list[0]["tags"], json!([]));

        let (status, history) =
            call(&app, get_req("/conversations/+5491100000000/messages")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history[0]["body"], "hola");
        assert_eq!(history[0]["sender"], "customer");
        assert_eq!(history[1]["sender"], "agent");
    }

    #[tokio::test]
    async fn webhook_missing_fields_is_rejected_without_write() {
        let (db, app) = app();

        for payload in [
            json!({ "phone": "+15550001" }),
            json!({ "message": "hola" }),
            json!({ "phone": "", "message": "hola" }),
            json!({ "phone": "+15550001", "message": "" }),
        ] {
            let (status, body) = call(&app, post_json("/webhook/whatsapp", payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["kind"], "validation");
        }

        assert_eq!(db.count_messages().unwrap(), 0);
    }

    #[tokio::test]
    async fn webhook_rejects_unknown_sender() {
        let (db, app) = app();
        let (status, body) = call(
            &app,
            post_json(
                "/webhook/whatsapp",
                json!({ "phone": "+15550001", "message": "hola", "sender": "bot" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
        assert_eq!(db.count_messages().unwrap(), 0);
    }

    #[tokio::test]
    async fn webhook_accepts_contact_body_aliases_and_extra_fields() {
        let (_, app) = app();
        let (status, _) = call(
            &app,
            post_json(
                "/webhook/whatsapp",
                json!({ "contact": "+15550001", "body": "hi", "pushName": "Ana" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, history) = call(&app, get_req("/conversations/+15550001/messages")).await;
        assert_eq!(history[0]["sender"], "customer");
        assert!(history[0].get("raw").is_none());
    }

    #[tokio::test]
    async fn webhook_accepts_numeric_phone() {
        let (_, app) = app();
        let (status, ack) = call(
            &app,
            post_json("/webhook/whatsapp", json!({ "phone": 5491100000000u64, "message": "hola" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ack["received"], true);

        let (_, list) = call(&app, get_req("/conversations")).await;
        assert_eq!(list[0]["contact"], "5491100000000");
        assert_eq!(list[0]["last_message"], "hola");
    }

    #[tokio::test]
    async fn store_failure_is_a_structured_500() {
        let (db, app) = app();
        call(
            &app,
            post_json("/webhook/whatsapp", json!({ "phone": "+15550001", "message": "hola" })),
        )
        .await;
        db.with_conn_mut(|conn| Ok(conn.execute_batch("DROP TABLE messages;")?))
            .unwrap();

        let requests = [
            post_json("/webhook/whatsapp", json!({ "phone": "+15550001", "message": "again" })),
            post_json("/messages/send", json!({ "contact": "+15550001", "body": "reply" })),
            get_req("/conversations"),
            get_req("/conversations/+15550001/messages"),
            get_req("/messages"),
        ];
        for req in requests {
            let uri = req.uri().to_string();
            let (status, body) = call(&app, req).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(body["status"], "error", "{uri}");
            assert_eq!(body["kind"], "storage", "{uri}");
        }
    }

    #[tokio::test]
    async fn send_cannot_override_sender() {
        let (db, app) = app();
        let (status, _) = call(
            &app,
            post_json(
                "/messages/send",
                json!({ "contact": "+15550001", "body": "hi", "sender": "customer" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(db.count_messages().unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let (_, app) = app();
        let req = Request::builder()
            .method("POST")
            .uri("/webhook/whatsapp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn unknown_contact_history_is_empty() {
        let (_, app) = app();
        let (status, body) = call(&app, get_req("/conversations/+unknown/messages")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn recent_messages_honours_limit() {
        let (_, app) = app();
        for i in 0..3 {
            call(
                &app,
                post_json("/webhook/whatsapp", json!({ "phone": format!("+1{i}"), "message": "x" })),
            )
            .await;
        }

        let (status, body) = call(&app, get_req("/messages?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        let recent = body.as_array().unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["contact"], "+12");

        let (status, _) = call(&app, get_req("/messages?limit=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
