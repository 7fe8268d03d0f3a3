//! # 외부 텍스트 생성 서비스(Oracle) 클라이언트
//!
//! 시스템 지시문과 사용자 프롬프트를 보내면 생성된 문자열 하나를 돌려받는,
//! 상태 없는 HTTP 호출 한 번을 감쌉니다. 재시도는 여기서 하지 않습니다
//! (`services::suggest`의 `RetryPolicy`가 담당).
//!
//! ## 구성
//! - `SuggestionOracle`: 호출 경계 트레이트. 테스트에서는 가짜 구현으로 교체합니다.
//! - `GeminiOracle`: Gemini `generateContent` API를 `reqwest`로 호출하는 실제 구현
//! - `OracleError`: 시도 1회의 실패 원인 (타임아웃 / 업스트림 에러 / 기타)

use crate::config::OracleConfig;
use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// 시도 1회의 실패 원인
#[derive(Debug, Error)]
pub enum OracleError {
    /// 요청이 설정된 시간 안에 끝나지 않음
    #[error("request timed out")]
    Timeout,

    /// 업스트림이 2xx가 아닌 상태 코드를 반환
    #[error("upstream returned HTTP {0}")]
    Upstream(u16),

    /// 연결 실패, 프록시 오류 등 네트워크 계층 에러
    #[error("transport error: {0}")]
    Transport(String),

    /// 응답은 왔지만 기대한 필드가 없거나 파싱할 수 없음
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl OracleError {
    /// 로그용 대분류. 운영자가 프록시/네트워크 문제인지 API 문제인지 빠르게 구분하기 위함입니다.
    pub fn category(&self) -> &'static str {
        match self {
            OracleError::Timeout => "timeout",
            OracleError::Upstream(_) => "upstream",
            OracleError::Transport(_) | OracleError::Malformed(_) => "unknown",
        }
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OracleError::Timeout
        } else if let Some(status) = e.status() {
            OracleError::Upstream(status.as_u16())
        } else if e.is_decode() {
            OracleError::Malformed(e.to_string())
        } else {
            OracleError::Transport(e.to_string())
        }
    }
}

/// 텍스트 생성 호출 경계
///
/// `Send + Sync`를 요구하는 이유: `Arc<dyn SuggestionOracle>`로 AppState에 담아
/// 여러 요청 핸들러(여러 스레드)에서 동시에 사용하기 때문입니다.
#[async_trait]
pub trait SuggestionOracle: Send + Sync {
    /// 프롬프트를 보내고 생성된 문자열을 받습니다.
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError>;
}

/// Gemini `generateContent` API 클라이언트
pub struct GeminiOracle {
    client: Client,
    api_url: String,
    api_key: String,
}

impl GeminiOracle {
    /// 설정으로부터 클라이언트를 만듭니다.
    ///
    /// API 키가 없으면 `None`을 반환합니다. 프록시 URL이 잘못되었으면 에러입니다.
    pub fn from_config(config: &OracleConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(Proxy::all(proxy_url)?);
        }

        Ok(Some(Self {
            client: builder.build()?,
            api_url: config.api_url.clone(),
            api_key,
        }))
    }
}

#[async_trait]
impl SuggestionOracle for GeminiOracle {
    async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        // 응답을 `generated_content` 문자열 필드 하나짜리 JSON으로 강제합니다.
        let payload = json!({
            "contents": [{ "parts": [{ "text": user_prompt }] }],
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "generated_content": {
                            "type": "STRING",
                            "description": "The requested output, such as a comma-separated list of tags or suggested drama names."
                        }
                    }
                }
            }
        });

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateContentResponse>()
            .await?;

        extract_generated_content(response)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedContent {
    generated_content: Option<String>,
}

/// `candidates[0].content.parts[0].text`를 JSON으로 읽어 `generated_content`를 꺼냅니다.
fn extract_generated_content(response: GenerateContentResponse) -> Result<String, OracleError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| OracleError::Malformed("response carries no candidate text".to_string()))?;

    let parsed: GeneratedContent =
        serde_json::from_str(&text).map_err(|e| OracleError::Malformed(e.to_string()))?;

    parsed
        .generated_content
        .ok_or_else(|| OracleError::Malformed("missing generated_content field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oracle_for(server: &MockServer, timeout: Duration) -> GeminiOracle {
        let config = OracleConfig {
            api_key: Some("test-key".to_string()),
            api_url: format!("{}/v1beta/models/test:generateContent", server.uri()),
            proxy_url: None,
            timeout,
        };
        GeminiOracle::from_config(&config).unwrap().unwrap()
    }

    fn candidate_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
    }

    #[test]
    fn missing_api_key_builds_no_client() {
        let config = OracleConfig {
            api_key: None,
            api_url: "http://localhost".to_string(),
            proxy_url: None,
            timeout: Duration::from_secs(1),
        };
        assert!(GeminiOracle::from_config(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn reads_generated_content_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body(r#"{"generated_content":"Romance, Sageuk"}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let text = oracle_for(&server, Duration::from_secs(5))
            .generate("system", "prompt")
            .await
            .unwrap();
        assert_eq!(text, "Romance, Sageuk");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = oracle_for(&server, Duration::from_secs(5))
            .generate("system", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Upstream(503)));
        assert_eq!(err.category(), "upstream");
    }

    #[tokio::test]
    async fn slow_upstream_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate_body(r#"{"generated_content":"late"}"#))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = oracle_for(&server, Duration::from_millis(100))
            .generate("system", "prompt")
            .await
            .unwrap_err();
        assert_eq!(err.category(), "timeout");
    }

    #[tokio::test]
    async fn text_without_expected_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body(r#"{"other":"x"}"#)),
            )
            .mount(&server)
            .await;

        let err = oracle_for(&server, Duration::from_secs(5))
            .generate("system", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }

    #[test]
    fn empty_candidates_are_malformed() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(
            extract_generated_content(response),
            Err(OracleError::Malformed(_))
        ));
    }

    #[test]
    fn non_json_text_is_malformed() {
        let response: GenerateContentResponse =
            serde_json::from_value(candidate_body("Romance, Sageuk")).unwrap();
        assert!(matches!(
            extract_generated_content(response),
            Err(OracleError::Malformed(_))
        ));
    }
}
