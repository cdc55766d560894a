//! Stylecast v1 REST API.
//!
//! Endpoints:
//! - `GET   /v1/profile`            current style profile
//! - `PATCH /v1/profile`            edit tone and/or voice
//! - `PUT   /v1/primitives/{topic}` replace a topic primitive
//! - `POST  /v1/train`              learn from a piece of writing
//! - `POST  /v1/classify`           keyword topic scores for a message
//! - `POST  /v1/chat`               answer in the learned style
//! - `POST  /v1/rewrite`            restyle a text in the learned voice

use axum::{
    Router,
    extract::{FromRequest, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use stylecast_core::error::{Error, FailureKind, ProfileError};
use stylecast_core::profile::{Primitive, StyleProfile};
use stylecast_profile::classifier::{self, TopicScore};
use stylecast_profile::{StyleService, TrainOutcome, TrainingInput};

/// Shared state for v1 API handlers.
pub struct ApiV1State {
    pub service: StyleService,
}

pub type SharedApiState = Arc<ApiV1State>;

/// Build the v1 API router (mounted under `/v1`).
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/profile", get(get_profile).patch(patch_profile))
        .route("/primitives/{topic}", put(put_primitive))
        .route("/train", post(train_handler))
        .route("/classify", post(classify_handler))
        .route("/chat", post(chat_handler))
        .route("/rewrite", post(rewrite_handler))
        .with_state(state)
}

// ── Errors ────────────────────────────────────────────────────────────────

/// `{"error": {"kind": ..., "message": ...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                kind: kind.into(),
                message: message.into(),
            },
        }
    }
}

/// A failed request on its way to becoming an HTTP response.
pub enum ApiError {
    Service(Error),
    /// The body could not be read as the expected JSON.
    Body(JsonRejection),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Service(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        Self::Service(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::Service(e) => {
                let (status, kind) = match &e {
                    Error::Provider(p) => match p.kind() {
                        FailureKind::Transient => (StatusCode::SERVICE_UNAVAILABLE, "transient"),
                        FailureKind::Auth => (StatusCode::BAD_GATEWAY, "auth"),
                        FailureKind::Api => (StatusCode::BAD_GATEWAY, "api"),
                    },
                    Error::Profile(ProfileError::InvalidInput(_)) => {
                        (StatusCode::BAD_REQUEST, "invalid_input")
                    }
                    Error::Profile(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
                };
                (status, kind, e.to_string())
            }
            Self::Body(rejection) => (rejection.status(), "invalid_input", rejection.body_text()),
        };

        if status.is_server_error() {
            error!(kind, error = %message, "Request failed");
        } else {
            warn!(kind, error = %message, "Request rejected");
        }

        (status, Json(ErrorBody::new(kind, message))).into_response()
    }
}

/// `Json` whose rejections use the tagged error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct ApiJson<T>(T);

type ApiResult<T> = Result<Json<T>, ApiError>;

// ── Request / response types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProfilePatch {
    tone: Option<String>,
    voice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrainRequest {
    content: String,
    #[serde(default = "default_source")]
    source: String,
    weight: Option<f64>,
    edition: Option<String>,
}

fn default_source() -> String {
    "api".into()
}

impl TrainRequest {
    /// Structured fields win; without them the content is scanned for
    /// inline markers.
    fn into_input(self) -> TrainingInput {
        if self.weight.is_none() && self.edition.is_none() {
            return TrainingInput::from_legacy(&self.content, self.source);
        }
        TrainingInput {
            content: self.content,
            source: self.source,
            weight: self.weight,
            edition: self.edition,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassifyResponse {
    topic: String,
    scores: Vec<TopicScoreDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TopicScoreDto {
    topic: String,
    score: u32,
}

impl From<TopicScore> for TopicScoreDto {
    fn from(s: TopicScore) -> Self {
        Self {
            topic: s.topic.to_string(),
            score: s.score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatResponse {
    response: String,
    topic: String,
    demo: bool,
}

#[derive(Debug, Deserialize)]
struct RewriteRequest {
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct RewriteResponse {
    response: String,
    demo: bool,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn get_profile(State(state): State<SharedApiState>) -> Json<StyleProfile> {
    Json(state.service.store().snapshot().await)
}

async fn patch_profile(
    State(state): State<SharedApiState>,
    ApiJson(patch): ApiJson<ProfilePatch>,
) -> ApiResult<StyleProfile> {
    if patch.tone.is_none() && patch.voice.is_none() {
        return Err(ProfileError::InvalidInput("expected 'tone' and/or 'voice'".into()).into());
    }
    let profile = state
        .service
        .store()
        .update(|profile| {
            if let Some(tone) = patch.tone {
                profile.tone = tone;
            }
            if let Some(voice) = patch.voice {
                profile.voice = voice;
            }
            profile.clone()
        })
        .await
        .into_result()?;
    info!("v1/profile edited");
    Ok(Json(profile))
}

async fn put_primitive(
    State(state): State<SharedApiState>,
    Path(topic): Path<String>,
    ApiJson(primitive): ApiJson<Primitive>,
) -> ApiResult<Primitive> {
    state
        .service
        .store()
        .set_primitive(&topic, primitive.clone())
        .await?
        .into_result()?;
    info!(topic = %topic, "v1/primitives updated");
    Ok(Json(primitive))
}

async fn train_handler(
    State(state): State<SharedApiState>,
    ApiJson(payload): ApiJson<TrainRequest>,
) -> ApiResult<TrainOutcome> {
    info!(source = %payload.source, len = payload.content.len(), "v1/train request");
    let outcome = state.service.train(payload.into_input()).await?;
    Ok(Json(outcome))
}

async fn classify_handler(ApiJson(payload): ApiJson<MessageRequest>) -> Json<ClassifyResponse> {
    Json(ClassifyResponse {
        topic: classifier::classify_label(&payload.message).to_string(),
        scores: classifier::scores(&payload.message)
            .into_iter()
            .map(Into::into)
            .collect(),
    })
}

async fn chat_handler(
    State(state): State<SharedApiState>,
    ApiJson(payload): ApiJson<MessageRequest>,
) -> ApiResult<ChatResponse> {
    info!(len = payload.message.len(), "v1/chat request");
    let reply = state.service.respond(&payload.message).await?;
    Ok(Json(ChatResponse {
        response: reply.text,
        topic: reply.topic,
        demo: reply.demo,
    }))
}

async fn rewrite_handler(
    State(state): State<SharedApiState>,
    ApiJson(payload): ApiJson<RewriteRequest>,
) -> ApiResult<RewriteResponse> {
    info!(len = payload.content.len(), "v1/rewrite request");
    let reply = state.service.rewrite(&payload.content).await?;
    Ok(Json(RewriteResponse {
        response: reply.text,
        demo: reply.demo,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    use stylecast_core::error::ProviderError;
    use stylecast_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use stylecast_profile::{ProfileStore, TrainingCorpus};

    /// Mock provider that returns a fixed answer or a fixed failure.
    struct MockProvider {
        reply: Mutex<Option<Result<String, ProviderError>>>,
    }

    impl MockProvider {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(Ok(text.to_string()))),
            })
        }

        fn failing(error: ProviderError) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(Err(error))),
            })
        }
    }

    #[async_trait::async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let reply = self
                .reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok("{}".to_string()))?;
            Ok(ProviderResponse {
                message: stylecast_core::message::Message::assistant(reply),
                usage: None,
                model: "mock-model".into(),
            })
        }
    }

    fn test_api_state(dir: &tempfile::TempDir, provider: Arc<dyn Provider>) -> SharedApiState {
        let store = Arc::new(ProfileStore::new(dir.path().join("style_profile.json")));
        let corpus = TrainingCorpus::new(dir.path().join("training"));
        Arc::new(ApiV1State {
            service: StyleService::new(store, corpus, provider),
        })
    }

    /// State whose profile path is a directory, so every write fails.
    fn unwritable_api_state(dir: &tempfile::TempDir) -> SharedApiState {
        let path = dir.path().join("profile_dir");
        std::fs::create_dir(&path).unwrap();
        let store = Arc::new(ProfileStore::new(path));
        let corpus = TrainingCorpus::new(dir.path().join("training"));
        Arc::new(ApiV1State {
            service: StyleService::new(store, corpus, MockProvider::answering("hi")),
        })
    }

    fn raw_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn get_default_profile() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = v1_router(test_api_state(&dir, MockProvider::answering("hi")));

        let req = Request::builder()
            .uri("/profile")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["tone"], "professional, insightful");
        assert_eq!(json["trainingCount"], 0);
    }

    #[tokio::test]
    async fn patch_profile_edits_tone() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = test_api_state(&dir, MockProvider::answering("hi"));
        let app = v1_router(state.clone());

        let req = json_request("PATCH", "/profile", serde_json::json!({ "tone": "dry" }));
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["tone"], "dry");
        assert_eq!(state.service.store().snapshot().await.tone, "dry");

        let req = json_request("PATCH", "/profile", serde_json::json!({}));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_profile_reports_failed_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = unwritable_api_state(&dir);
        let app = v1_router(state.clone());

        let req = json_request("PATCH", "/profile", serde_json::json!({ "tone": "dry" }));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: ErrorBody = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.error.kind, "storage");
        // Memory stays authoritative
        assert_eq!(state.service.store().snapshot().await.tone, "dry");
    }

    #[tokio::test]
    async fn put_primitive_reports_failed_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = v1_router(unwritable_api_state(&dir));

        let req = json_request(
            "PUT",
            "/primitives/strategy",
            serde_json::json!({ "corePrinciple": "Focus beats breadth" }),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: ErrorBody = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.error.kind, "storage");
    }

    #[tokio::test]
    async fn malformed_json_gets_tagged_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = v1_router(test_api_state(&dir, MockProvider::answering("hi")));

        let req = raw_request("POST", "/chat", "{ not json");
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: ErrorBody = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.error.kind, "invalid_input");

        // Well-formed but missing `message`
        let req = raw_request("POST", "/classify", r#"{"text": "hello"}"#);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json: ErrorBody = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.error.kind, "invalid_input");
        assert!(json.error.message.contains("message"));
    }

    #[tokio::test]
    async fn put_primitive_validates_topic() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = v1_router(test_api_state(&dir, MockProvider::answering("hi")));
        let primitive = serde_json::json!({
            "corePrinciple": "Earn attention",
            "keyFrameworks": ["AIDA"],
            "responsePattern": "Hook, insight, takeaway"
        });

        let req = json_request("PUT", "/primitives/marketing", primitive.clone());
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = json_request("PUT", "/primitives/gardening", primitive);
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["kind"], "invalid_input");
    }

    #[tokio::test]
    async fn train_reads_legacy_markers() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = MockProvider::answering(r#"{"themes": ["Pricing"]}"#);
        let state = test_api_state(&dir, provider);
        let app = v1_router(state.clone());

        let req = json_request(
            "POST",
            "/train",
            serde_json::json!({ "content": "weight: 0.5\nPricing matters.", "source": "blog" }),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["training_count"], 1);
        assert_eq!(json["average_weight"], 0.5);
        assert_eq!(json["demo"], false);
        assert_eq!(json["persisted"], true);

        let profile = state.service.store().snapshot().await;
        assert_eq!(profile.themes, vec!["Pricing"]);
    }

    #[tokio::test]
    async fn classify_returns_scores() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = v1_router(test_api_state(&dir, MockProvider::answering("hi")));

        let req = json_request(
            "POST",
            "/classify",
            serde_json::json!({ "message": "Our leadership team must manage culture change" }),
        );
        let response = app.oneshot(req).await.unwrap();
        let json: ClassifyResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.topic, "leadership");
        assert_eq!(json.scores.len(), classifier::TOPIC_FAMILIES.len());
    }

    #[tokio::test]
    async fn chat_returns_reply_and_topic() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = v1_router(test_api_state(&dir, MockProvider::answering("Styled answer")));

        let req = json_request(
            "POST",
            "/chat",
            serde_json::json!({ "message": "How do I grow revenue?" }),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: ChatResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.response, "Styled answer");
        assert_eq!(json.topic, "business");
        assert!(!json.demo);
    }

    #[tokio::test]
    async fn transient_failure_is_503() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = MockProvider::failing(ProviderError::Timeout("30s".into()));
        let app = v1_router(test_api_state(&dir, provider));

        let req = json_request("POST", "/chat", serde_json::json!({ "message": "Hello" }));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json: ErrorBody = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.error.kind, "transient");
    }

    #[tokio::test]
    async fn auth_failure_is_502() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = MockProvider::failing(ProviderError::AuthenticationFailed("401".into()));
        let app = v1_router(test_api_state(&dir, provider));

        let req = json_request("POST", "/rewrite", serde_json::json!({ "content": "Text." }));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json: ErrorBody = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(json.error.kind, "auth");
    }

    #[tokio::test]
    async fn demo_rewrite_is_flagged() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = Arc::new(stylecast_providers::DemoProvider::new("no API key configured"));
        let app = v1_router(test_api_state(&dir, provider));

        let req = json_request("POST", "/rewrite", serde_json::json!({ "content": "Text." }));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: RewriteResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert!(json.demo);
        assert!(json.response.contains("demo mode"));
    }
}
