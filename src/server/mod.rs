//! HTTP API for ChatRelay
//!
//! Exposes the model-preference store, the streaming chat relay, and the
//! history binner over a small axum router. The browser client generates an
//! opaque user id and sends it as a plain `uid` field; this layer never
//! reads cookies.
//!
//! Routes:
//!
//! - `POST /api/model/get` -- form-encoded `uid`; responds `{"model": ...}`
//!   or a 400 error body when the user has no recorded preference.
//! - `POST /api/model/set` -- form-encoded `uid` and `model`; responds
//!   `{"success": true}` or a 400 error body for missing fields or a model
//!   outside the supported set.
//! - `POST /api/chat` -- JSON `{uid, messages}`; streams the assistant's
//!   text fragments back as the response body.
//! - `POST /api/history/bin` -- JSON list of history items; responds with
//!   the ordered recency bins.

use crate::config::Config;
use crate::error::Result;
use crate::gateway::{CompletionGateway, Message};
use crate::history::{bin_by_date, HistoryItem, Locale};
use crate::models::ModelId;
use crate::preferences::ModelPreferenceStore;

use axum::body::Body;
use axum::extract::{Form, Json, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use chrono::Utc;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared state for the ChatRelay server
#[derive(Clone)]
pub struct AppState {
    /// Per-user model selections
    pub store: Arc<ModelPreferenceStore>,
    /// Upstream completion gateway
    pub gateway: Arc<dyn CompletionGateway>,
    /// Locale for history bin labels
    pub locale: Locale,
}

/// Form payload for `/api/model/get`
///
/// Fields are optional so missing values produce the standard 400 error
/// body instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct GetModelForm {
    uid: Option<String>,
}

/// Form payload for `/api/model/set`
#[derive(Debug, Deserialize)]
pub struct SetModelForm {
    uid: Option<String>,
    model: Option<String>,
}

/// JSON payload for `/api/chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Opaque user identifier generated by the client
    pub uid: String,
    /// Conversation history, oldest first
    pub messages: Vec<Message>,
}

/// Build the axum router without starting the server
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/model/get", post(handle_get_model))
        .route("/api/model/set", post(handle_set_model))
        .route("/api/chat", post(handle_chat))
        .route("/api/history/bin", post(handle_bin_history))
        .with_state(state)
}

/// Run the server (blocks until shutdown)
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("ChatRelay listening on {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// 400 response with the error body shape the client expects
fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}

/// `POST /api/model/get`
async fn handle_get_model(
    State(state): State<AppState>,
    Form(form): Form<GetModelForm>,
) -> Response {
    let Some(uid) = form.uid else {
        return bad_request("Missing uid");
    };

    match state.store.get(&uid) {
        Ok(model) => axum::Json(json!({ "model": model })).into_response(),
        Err(e) => {
            tracing::debug!("Model lookup failed for uid {}: {}", uid, e);
            bad_request(e.to_string())
        }
    }
}

/// `POST /api/model/set`
async fn handle_set_model(
    State(state): State<AppState>,
    Form(form): Form<SetModelForm>,
) -> Response {
    let (Some(uid), Some(model)) = (form.uid, form.model) else {
        return bad_request("Missing uid or model");
    };

    let model: ModelId = match model.parse() {
        Ok(m) => m,
        Err(e) => return bad_request(e.to_string()),
    };

    match state.store.set(uid, model) {
        Ok(()) => axum::Json(json!({ "success": true })).into_response(),
        Err(e) => {
            tracing::error!("Failed to record model preference: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `POST /api/chat`
///
/// Resolves the caller's selected model and relays the gateway's streamed
/// text fragments as the response body. A uid with no recorded preference
/// is a client error; the request fails rather than falling back to a
/// default model.
async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let model = match state.store.get(&request.uid) {
        Ok(model) => model,
        Err(e) => {
            tracing::debug!("Chat refused for uid {}: {}", request.uid, e);
            return bad_request(e.to_string());
        }
    };

    let stream = match state.gateway.stream_chat(model, &request.messages).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("Gateway request failed: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                axum::Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let body = Body::from_stream(stream.map(|fragment| fragment.map(Bytes::from)));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(body)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build streaming response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

/// `POST /api/history/bin`
///
/// History persistence lives client-side, so the items arrive in the
/// request body and the ordered bins go back in the response.
async fn handle_bin_history(
    State(state): State<AppState>,
    Json(items): Json<Vec<HistoryItem>>,
) -> Response {
    match bin_by_date(items, Utc::now(), state.locale.labels()) {
        Ok(bins) => axum::Json(bins).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockCompletionGateway;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(ModelPreferenceStore::new()),
            gateway: Arc::new(MockCompletionGateway::new()),
            locale: Locale::Japanese,
        }
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let state = test_state();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(form_request("/api/model/set", "uid=u1&model=gpt-4o"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));

        let response = app
            .oneshot(form_request("/api/model/get", "uid=u1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "model": "gpt-4o" }));
    }

    #[tokio::test]
    async fn test_get_unknown_uid_returns_400() {
        let app = router(test_state());

        let response = app
            .oneshot(form_request("/api/model/get", "uid=stranger"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_get_missing_uid_returns_400() {
        let app = router(test_state());

        let response = app
            .oneshot(form_request("/api/model/get", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_set_unknown_model_returns_400() {
        let app = router(test_state());

        let response = app
            .oneshot(form_request("/api/model/set", "uid=u1&model=llama3"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("llama3"));
    }

    #[tokio::test]
    async fn test_set_missing_model_returns_400() {
        let app = router(test_state());

        let response = app
            .oneshot(form_request("/api/model/set", "uid=u1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_selection() {
        let app = router(test_state());

        for model in ["gpt-4o", "grok-2"] {
            let body = format!("uid=u1&model={}", model);
            let response = app
                .clone()
                .oneshot(form_request("/api/model/set", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(form_request("/api/model/get", "uid=u1"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!({ "model": "grok-2" }));
    }

    #[tokio::test]
    async fn test_chat_unknown_uid_returns_400_without_gateway_call() {
        let mut gateway = MockCompletionGateway::new();
        gateway.expect_stream_chat().never();

        let state = AppState {
            store: Arc::new(ModelPreferenceStore::new()),
            gateway: Arc::new(gateway),
            locale: Locale::Japanese,
        };

        let response = router(state)
            .oneshot(json_request(
                "/api/chat",
                json!({ "uid": "stranger", "messages": [] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_streams_gateway_fragments() {
        let mut gateway = MockCompletionGateway::new();
        gateway
            .expect_stream_chat()
            .withf(|model, messages| {
                *model == ModelId::Gpt4o && messages == [Message::user("hi")]
            })
            .returning(|_, _| {
                let fragments: Vec<crate::error::Result<String>> =
                    vec![Ok("Hel".to_string()), Ok("lo".to_string())];
                Ok(Box::pin(futures::stream::iter(fragments)))
            });

        let store = Arc::new(ModelPreferenceStore::new());
        store.set("u1", ModelId::Gpt4o).unwrap();

        let state = AppState {
            store,
            gateway: Arc::new(gateway),
            locale: Locale::Japanese,
        };

        let response = router(state)
            .oneshot(json_request(
                "/api/chat",
                json!({ "uid": "u1", "messages": [{ "role": "user", "content": "hi" }] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Hello");
    }

    #[tokio::test]
    async fn test_chat_gateway_failure_returns_502() {
        let mut gateway = MockCompletionGateway::new();
        gateway.expect_stream_chat().returning(|_, _| {
            Err(crate::error::ChatRelayError::Gateway("boom".to_string()).into())
        });

        let store = Arc::new(ModelPreferenceStore::new());
        store.set("u1", ModelId::Gpt4o).unwrap();

        let state = AppState {
            store,
            gateway: Arc::new(gateway),
            locale: Locale::Japanese,
        };

        let response = router(state)
            .oneshot(json_request(
                "/api/chat",
                json!({ "uid": "u1", "messages": [] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_bin_history_returns_labeled_bins() {
        let app = router(test_state());

        // Both items share today's calendar day, so one bin comes back.
        let now = Utc::now();
        let items = json!([
            { "id": "a", "timestamp": now.to_rfc3339() },
            { "id": "b", "timestamp": now.to_rfc3339() },
        ]);

        let response = app
            .oneshot(json_request("/api/history/bin", items))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bins = body_json(response).await;
        assert_eq!(bins.as_array().unwrap().len(), 1);
        assert_eq!(bins[0]["category"], json!("今日"));
        assert_eq!(bins[0]["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bin_history_malformed_timestamp_returns_400() {
        let app = router(test_state());

        let items = json!([{ "id": "a", "timestamp": "yesterday-ish" }]);
        let response = app
            .oneshot(json_request("/api/history/bin", items))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
