//! HTTP contract with the VideoVoyager backend.
//!
//! Three JSON endpoints: `POST /search_videos`, `POST /summarize_video` and
//! `POST /video_chat`. Failures carry `{"error": "..."}` with a non-2xx status.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::constants::constants;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),
  #[error("server returned HTTP {status}")]
  Server { status: u16, message: Option<String> },
  #[error("Empty response from server")]
  EmptyResponse,
  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),
}

impl ApiError {
  /// The server-supplied message when there is one, otherwise `fallback`.
  pub fn user_message(&self, fallback: &str) -> String {
    match self {
      ApiError::Server { message: Some(message), .. } => message.clone(),
      _ => fallback.to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: String,
}

// --- Wire types ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub thumbnail: String,
  #[serde(default)]
  pub description: String,
  pub video_id: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
  query: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizeRequest {
  pub video_url: String,
  pub translate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SummaryResult {
  #[serde(default)]
  pub summary: String,
  #[serde(default)]
  pub key_points: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
  pub video_url: String,
  pub question: String,
  pub translate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatAnswer {
  pub facts: Vec<String>,
  pub summary: String,
  pub timestamps: Vec<String>,
}

/// Bytes of the request body handed to the connection so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
  pub sent: u64,
  pub total: u64,
}

impl UploadProgress {
  pub fn percent(self) -> u16 {
    if self.total == 0 {
      return 100;
    }
    ((self.sent.min(self.total) as f64 * 100.0 / self.total as f64).round()) as u16
  }
}

// --- Backend ---

#[async_trait]
pub trait Backend: Send + Sync {
  async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError>;

  /// Upload progress is reported on `progress` while the request body is sent.
  async fn summarize(
    &self,
    request: &SummarizeRequest,
    progress: mpsc::UnboundedSender<UploadProgress>,
  ) -> Result<SummaryResult, ApiError>;

  async fn chat(&self, request: &ChatRequest) -> Result<ChatAnswer, ApiError>;
}

pub struct HttpBackend {
  http: Client,
  base: String,
}

impl HttpBackend {
  pub fn new(base: impl Into<String>) -> Self {
    Self::with_client(Client::new(), base)
  }

  pub fn with_client(http: Client, base: impl Into<String>) -> Self {
    Self { http, base: base.into().trim_end_matches('/').to_string() }
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base, path)
  }
}

/// Split a serialized payload into chunks, reporting cumulative bytes as each
/// chunk is pulled by the connection.
fn progress_body(payload: Vec<u8>, chunk_size: usize, progress: mpsc::UnboundedSender<UploadProgress>) -> Body {
  let total = payload.len() as u64;
  let chunks: Vec<Vec<u8>> = payload.chunks(chunk_size.max(1)).map(<[u8]>::to_vec).collect();
  let mut sent = 0u64;
  let stream = futures::stream::iter(chunks).map(move |chunk| {
    sent += chunk.len() as u64;
    let _ = progress.send(UploadProgress { sent, total });
    Ok::<_, std::io::Error>(chunk)
  });
  Body::wrap_stream(stream)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
  let status = response.status();
  let body = response.text().await?;
  if !status.is_success() {
    let message = serde_json::from_str::<ErrorBody>(&body).ok().map(|b| b.error).filter(|m| !m.is_empty());
    debug!(status = status.as_u16(), message = ?message, "api: error response");
    return Err(ApiError::Server { status: status.as_u16(), message });
  }
  let body = body.trim();
  if body.is_empty() || body == "null" {
    return Err(ApiError::EmptyResponse);
  }
  Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl Backend for HttpBackend {
  async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
    info!(query, "api: search_videos");
    let response = self.http.post(self.endpoint("search_videos")).json(&SearchRequest { query }).send().await?;
    read_json(response).await
  }

  async fn summarize(
    &self,
    request: &SummarizeRequest,
    progress: mpsc::UnboundedSender<UploadProgress>,
  ) -> Result<SummaryResult, ApiError> {
    info!(video_url = %request.video_url, translate = request.translate, "api: summarize_video");
    let payload = serde_json::to_vec(request)?;
    let len = payload.len();
    let response = self
      .http
      .post(self.endpoint("summarize_video"))
      .header(CONTENT_TYPE, "application/json")
      .header(CONTENT_LENGTH, len)
      .body(progress_body(payload, constants().upload_chunk_bytes, progress))
      .send()
      .await?;
    read_json(response).await
  }

  async fn chat(&self, request: &ChatRequest) -> Result<ChatAnswer, ApiError> {
    info!(video_url = %request.video_url, translate = request.translate, "api: video_chat");
    let response = self.http.post(self.endpoint("video_chat")).json(request).send().await?;
    read_json(response).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{Json, Router, http::StatusCode, routing::post};
  use serde_json::{Value, json};

  async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
  }

  #[test]
  fn upload_progress_percent() {
    assert_eq!(UploadProgress { sent: 0, total: 200 }.percent(), 0);
    assert_eq!(UploadProgress { sent: 101, total: 200 }.percent(), 51);
    assert_eq!(UploadProgress { sent: 200, total: 200 }.percent(), 100);
    assert_eq!(UploadProgress { sent: 0, total: 0 }.percent(), 100);
  }

  #[test]
  fn user_message_prefers_server_text() {
    let err = ApiError::Server { status: 400, message: Some("Invalid YouTube URL format".into()) };
    assert_eq!(err.user_message("Failed to summarize video"), "Invalid YouTube URL format");
    let err = ApiError::Server { status: 500, message: None };
    assert_eq!(err.user_message("Failed to summarize video"), "Failed to summarize video");
    assert_eq!(ApiError::EmptyResponse.user_message("Failed to search videos"), "Failed to search videos");
  }

  #[test]
  fn chat_answer_defaults_missing_fields() {
    let answer: ChatAnswer = serde_json::from_str(r#"{"summary":"short"}"#).unwrap();
    assert_eq!(answer, ChatAnswer { facts: vec![], summary: "short".into(), timestamps: vec![] });
  }

  #[tokio::test]
  async fn search_posts_query_and_decodes_results() {
    let router = Router::new().route(
      "/search_videos",
      post(|Json(body): Json<Value>| async move {
        let query = body["query"].as_str().unwrap_or_default().to_string();
        Json(json!([{
          "title": query,
          "thumbnail": "https://i.ytimg.com/vi/abc123/default.jpg",
          "description": "a video",
          "video_id": "abc123"
        }]))
      }),
    );
    let backend = HttpBackend::new(serve(router).await);
    let results = backend.search("cats").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "cats");
    assert_eq!(results[0].video_id, "abc123");
  }

  #[tokio::test]
  async fn search_error_body_is_surfaced() {
    let router = Router::new().route(
      "/search_videos",
      post(|| async {
        (StatusCode::BAD_REQUEST, Json(json!({"error": "Search query is required", "status": 400})))
      }),
    );
    let backend = HttpBackend::new(serve(router).await);
    let err = backend.search("").await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 400, .. }));
    assert_eq!(err.user_message("Failed to search videos"), "Search query is required");
  }

  #[tokio::test]
  async fn non_json_error_body_uses_fallback() {
    let router = Router::new()
      .route("/video_chat", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }));
    let backend = HttpBackend::new(serve(router).await);
    let request = ChatRequest { video_url: String::new(), question: "why?".into(), translate: false };
    let err = backend.chat(&request).await.unwrap_err();
    assert_eq!(err.user_message("Failed to get an answer"), "Failed to get an answer");
  }

  #[tokio::test]
  async fn null_body_is_empty_response() {
    let router = Router::new().route("/search_videos", post(|| async { Json(Value::Null) }));
    let backend = HttpBackend::new(serve(router).await);
    assert!(matches!(backend.search("cats").await, Err(ApiError::EmptyResponse)));
  }

  #[tokio::test]
  async fn summarize_streams_body_with_progress() {
    let router = Router::new().route(
      "/summarize_video",
      post(|Json(body): Json<Value>| async move {
        Json(json!({
          "summary": format!("{} {}", body["video_url"].as_str().unwrap_or_default(), body["translate"]),
          "key_points": "- one\n- two"
        }))
      }),
    );
    let backend = HttpBackend::new(serve(router).await);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let request = SummarizeRequest { video_url: "https://www.youtube.com/watch?v=abc123".into(), translate: true };
    let result = backend.summarize(&request, tx).await.unwrap();
    assert_eq!(result.summary, "https://www.youtube.com/watch?v=abc123 true");
    assert_eq!(result.key_points, "- one\n- two");

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
      events.push(event);
    }
    assert!(events.len() > 1, "payload larger than one chunk should report several events");
    let last = events.last().unwrap();
    assert_eq!(last.sent, last.total);
    assert_eq!(last.percent(), 100);
    assert!(events.windows(2).all(|w| w[0].sent < w[1].sent));
  }

  #[tokio::test]
  async fn chat_posts_all_fields() {
    let router = Router::new().route(
      "/video_chat",
      post(|Json(body): Json<Value>| async move {
        Json(json!({
          "summary": body["question"],
          "facts": [body["video_url"]],
          "timestamps": [body["translate"].to_string()]
        }))
      }),
    );
    let backend = HttpBackend::new(serve(router).await);
    let request = ChatRequest {
      video_url: "https://www.youtube.com/watch?v=abc123".into(),
      question: "What is it about?".into(),
      translate: false,
    };
    let answer = backend.chat(&request).await.unwrap();
    assert_eq!(answer.summary, "What is it about?");
    assert_eq!(answer.facts, vec!["https://www.youtube.com/watch?v=abc123".to_string()]);
    assert_eq!(answer.timestamps, vec!["false".to_string()]);
  }

  #[tokio::test]
  async fn unreachable_backend_is_network_error() {
    let backend = HttpBackend::new("http://127.0.0.1:1");
    let err = backend.search("cats").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.user_message("Failed to search videos"), "Failed to search videos");
  }
}
