use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{parse_insight, InsightClient, InsightError, InsightResult};
use crate::models::AiInsight;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_INSTRUCTION: &str = "당신은 안산동산교회의 따뜻하고 지혜로운 목회자입니다. \
사용자의 묵상 내용을 분석하여 격려와 통찰이 담긴 묵상 피드백, 진심 어린 짧은 기도문, \
그리고 관련된 성경 구절을 추천하세요. 반드시 한국어로 답변하고 JSON 형식을 유지하세요.";

/// Insight client backed by the Gemini `generateContent` REST API.
#[derive(Debug, Clone)]
pub struct GeminiInsightClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiInsightClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at another API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "meditation": {
                "type": "STRING",
                "description": "성숙하고 따뜻한 어조의 한국어 묵상 피드백"
            },
            "prayer": {
                "type": "STRING",
                "description": "묵상 내용을 갈무리하는 짧은 한국어 기도문"
            },
            "verseSuggestion": {
                "type": "STRING",
                "description": "관련된 성경 구절 (예: 시편 23:1)"
            }
        },
        "required": ["meditation", "prayer", "verseSuggestion"]
    })
}

fn build_request(reflection: &str) -> GenerateRequest {
    let text = |s: String| Part { text: s };

    GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![text(SYSTEM_INSTRUCTION.to_string())],
        },
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![text(format!(
                "사용자의 묵상/기도 내용: \"{}\"\n이 내용을 바탕으로 성숙한 신앙적 통찰을 제공해주세요.",
                reflection
            ))],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

/// Concatenated text of the first candidate.
fn response_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default()
}

#[async_trait]
impl InsightClient for GeminiInsightClient {
    async fn generate(&self, reflection: &str) -> InsightResult<AiInsight> {
        if self.api_key.trim().is_empty() {
            return Err(InsightError::NotConfigured);
        }

        debug!(model = %self.model, "requesting AI insight");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(reflection))
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status(status.as_u16(), body));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::InvalidFormat(e.to_string()))?;

        parse_insight(&response_text(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone)]
    struct MockGemini {
        reply: Arc<Mutex<(StatusCode, Value)>>,
        requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    async fn generate_content(
        State(mock): State<MockGemini>,
        Path(model): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        let key = headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        mock.requests.lock().unwrap().push((model, key, body));
        let (status, reply) = mock.reply.lock().unwrap().clone();
        (status, Json(reply)).into_response()
    }

    async fn spawn_gemini(status: StatusCode, reply: Value) -> (String, MockGemini) {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let mock = MockGemini {
            reply: Arc::new(Mutex::new((status, reply))),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/v1beta/models/{model}", post(generate_content))
            .with_state(mock.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}/v1beta"), mock)
    }

    fn candidate(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
    }

    fn client(base_url: &str) -> GeminiInsightClient {
        GeminiInsightClient::new(reqwest::Client::new(), "test-key", DEFAULT_GEMINI_MODEL)
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_generate_parses_candidate_text() {
        let text = r#"{"meditation": "평안을 누리세요", "prayer": "주님 인도하소서", "verseSuggestion": "시편 23:1"}"#;
        let (base, mock) = spawn_gemini(StatusCode::OK, candidate(text)).await;

        let insight = client(&base).generate("시편 23편을 읽었습니다").await.unwrap();

        assert_eq!(insight.prayer, "주님 인도하소서");
        let requests = mock.requests.lock().unwrap();
        let (model, key, body) = &requests[0];
        assert_eq!(model, "gemini-3-flash-preview:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("시편 23편을 읽었습니다"));
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("목회자"));
    }

    #[tokio::test]
    async fn test_generate_empty_candidate_is_error() {
        let (base, _mock) = spawn_gemini(StatusCode::OK, json!({ "candidates": [] })).await;

        let result = client(&base).generate("본문").await;
        assert!(matches!(result, Err(InsightError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_generate_invalid_json_text_is_error() {
        let (base, _mock) = spawn_gemini(StatusCode::OK, candidate("not json")).await;

        let result = client(&base).generate("본문").await;
        assert!(matches!(result, Err(InsightError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_generate_http_error_status() {
        let (base, _mock) =
            spawn_gemini(StatusCode::FORBIDDEN, json!({ "error": "bad key" })).await;

        let result = client(&base).generate("본문").await;
        assert!(matches!(result, Err(InsightError::Status(403, _))));
    }

    #[tokio::test]
    async fn test_generate_without_key() {
        let client = GeminiInsightClient::new(reqwest::Client::new(), "", DEFAULT_GEMINI_MODEL);
        assert!(matches!(
            client.generate("본문").await,
            Err(InsightError::NotConfigured)
        ));
    }
}
