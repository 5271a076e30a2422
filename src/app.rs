use crate::config;
use crate::ports::PushSender;
use crate::state;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

mod push;

pub fn app<S: PushSender>(config: config::AppConfig, sender: S) -> Router {
    let cors = cors_layer(&config.allowed_origins);
    let state = state::AppState { config, sender };
    Router::new()
        .route(
            "/sendPushNotifications",
            post(push::send_push_notifications::<S>),
        )
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Origin allowlist as access control, same shape as the original deployment:
/// only POST and preflight OPTIONS, only the Content-Type header. Requests
/// from other origins get no CORS approval headers.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring invalid allowed origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::push::tests::TestSender;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value as JsonValue, from_slice as json_from_slice, json};
    use tower::ServiceExt;

    fn allowlisted_config() -> config::AppConfig {
        config::AppConfig {
            allowed_origins: vec!["https://runal.netlify.app".to_string()],
            ..Default::default()
        }
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/sendPushNotifications")
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .body(Body::empty())
            .unwrap()
    }

    fn send_request(body: JsonValue) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/sendPushNotifications")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn app__should_return_ok_on_health_endpoint() {
        // Given
        let app = app(config::AppConfig::default(), TestSender::default());

        // When
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert_eq!(body.as_ref(), b"ok");
    }

    #[tokio::test]
    async fn preflight__should_approve_allowlisted_origin() {
        // Given
        let app = app(allowlisted_config(), TestSender::default());

        // When
        let response = app
            .oneshot(preflight("https://runal.netlify.app"))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let allow_origin = response
            .headers()
            .get("access-control-allow-origin")
            .expect("allow-origin header");
        assert_eq!(allow_origin, "https://runal.netlify.app");
    }

    #[tokio::test]
    async fn preflight__should_reject_unknown_origin_without_reaching_dispatcher() {
        // Given
        let sender = TestSender::default();
        let app = app(allowlisted_config(), sender.clone());

        // When
        let response = app
            .oneshot(preflight("https://evil.example"))
            .await
            .expect("request failed");

        // Then: no CORS approval, and the dispatcher was never invoked.
        assert!(
            response
                .headers()
                .get("access-control-allow-origin")
                .is_none()
        );
        assert!(sender.calls().is_empty());
    }

    #[tokio::test]
    async fn send_push_notifications__should_return_result_with_200() {
        // Given
        let sender = TestSender::default();
        let app = app(allowlisted_config(), sender.clone());
        let body = json!({
            "tokens": ["t1", "t2"],
            "title": "Seoul Marathon",
            "body": "Registration opens today!",
            "icon": "Seoul Marathon",
        });

        // When
        let response = app.oneshot(send_request(body)).await.expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: JsonValue = json_from_slice(&body).expect("parse json");
        assert_eq!(payload["success"], true);
        assert_eq!(payload["response"]["success"], 2);

        let calls = sender.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.title, "Seoul Marathon");
        assert_eq!(calls[0].0.icon.as_deref(), Some("Seoul Marathon"));
        assert_eq!(calls[0].1, vec!["t1".to_string(), "t2".to_string()]);
    }

    #[tokio::test]
    async fn send_push_notifications__should_return_500_when_gateway_fails() {
        // Given
        let app = app(allowlisted_config(), TestSender::failing());
        let body = json!({
            "tokens": ["t1"],
            "title": "Seoul Marathon",
            "body": "Registration opens today!",
        });

        // When
        let response = app.oneshot(send_request(body)).await.expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: JsonValue = json_from_slice(&body).expect("parse json");
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "gateway unreachable");
    }

    #[tokio::test]
    async fn send_push_notifications__should_reject_empty_token_list() {
        // Given
        let sender = TestSender::default();
        let app = app(allowlisted_config(), sender.clone());
        let body = json!({
            "tokens": [],
            "title": "Seoul Marathon",
            "body": "Registration opens today!",
        });

        // When
        let response = app.oneshot(send_request(body)).await.expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: JsonValue = json_from_slice(&body).expect("parse json");
        assert_eq!(payload["success"], false);
        assert!(sender.calls().is_empty());
    }
}
