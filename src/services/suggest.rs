//! # AI 추천 서비스
//!
//! 텍스트 생성 호출을 재시도 정책으로 감싸고, 두 가지 용도의 프롬프트를 만듭니다.
//! - 태그 추천: 줄거리 + 현재 태그 목록 → 키워드 3~5개
//! - 검색 연관 추천: 검색어 + 이미 찾은 드라마 이름 → 목록에 없는 드라마 3개
//!
//! 추천은 "있으면 좋은" 기능입니다. 모든 시도가 실패해도 에러를 올려보내지 않고
//! 화면에 그대로 보여줄 수 있는 고정 안내 문구를 반환합니다.

use crate::services::oracle::SuggestionOracle;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// 모든 재시도가 실패했을 때 반환하는 문구
pub const FALLBACK_MESSAGE: &str =
    "AI service call failed. Check the API key and proxy settings and the network connection.";

/// API 키가 설정되지 않았을 때 반환하는 문구 (외부 호출 없음)
pub const MISSING_KEY_MESSAGE: &str = "AI service unavailable: no API key configured";

const TAG_SYSTEM_INSTRUCTION: &str = "You are a professional drama content analyst. \
    Based on the synopsis provided, recommend the 3 to 5 most relevant keywords, \
    chosen from the given list of available tags or newly created from the synopsis. \
    Return the keywords as a single comma-separated string.";

const SEARCH_SYSTEM_INSTRUCTION: &str = "You are a professional drama recommendation engine. \
    Given the user's search term and the results already found, recommend 3 drama titles \
    that are closely related but not already listed. \
    Return the 3 titles as a single comma-separated string.";

/// 재시도 정책
///
/// `attempt`번째(0부터) 시도가 실패하면 `base_delay * 2^attempt`만큼 기다립니다.
/// 마지막 시도 뒤에는 기다리지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// 재시도 사이의 대기. 테스트에서는 실제로 잠들지 않고 기록만 하는 구현으로 바꿉니다.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// `tokio::time::sleep`으로 실제로 기다리는 기본 구현
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// AI 추천 서비스. `AppState`에 담겨 핸들러 간에 공유됩니다.
#[derive(Clone)]
pub struct SuggestionService {
    /// None이면 API 키가 없는 상태
    oracle: Option<Arc<dyn SuggestionOracle>>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl SuggestionService {
    pub fn new(oracle: Option<Arc<dyn SuggestionOracle>>) -> Self {
        Self {
            oracle,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_retry(mut self, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        self.policy = policy;
        self.sleeper = sleeper;
        self
    }

    /// 줄거리와 현재 태그 목록으로 태그를 추천받습니다.
    pub async fn suggest_tags(&self, synopsis: &str, known_tags: &[String]) -> Vec<String> {
        let prompt = format!(
            "The drama synopsis is: \"{synopsis}\". The currently available tags are: [{}]. \
             Generate the 3-5 most relevant tags.",
            known_tags.join(", ")
        );

        split_items(&self.generate(TAG_SYSTEM_INSTRUCTION, &prompt).await)
    }

    /// 검색어와 이미 찾은 드라마 이름으로 연관 드라마를 추천받습니다.
    pub async fn suggest_dramas(&self, query: &str, found_names: &[String]) -> Vec<String> {
        let prompt = format!(
            "The user's search term is: \"{query}\". Related dramas already found: [{}]. \
             Suggest 3 dramas the user may also be interested in.",
            found_names.join(", ")
        );

        split_items(&self.generate(SEARCH_SYSTEM_INSTRUCTION, &prompt).await)
    }

    /// 재시도 정책에 따라 호출하고, 끝내 실패하면 `FALLBACK_MESSAGE`를 반환합니다.
    ///
    /// 이 함수는 실패하지 않습니다.
    pub async fn generate(&self, system_instruction: &str, user_prompt: &str) -> String {
        let Some(oracle) = &self.oracle else {
            tracing::warn!("AI API key is not configured, skipping suggestion call");
            return MISSING_KEY_MESSAGE.to_string();
        };

        let max_attempts = self.policy.max_attempts;
        for attempt in 0..max_attempts {
            match oracle.generate(system_instruction, user_prompt).await {
                Ok(text) => return text,
                Err(err) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        category = err.category(),
                        error = %err,
                        "AI suggestion call failed"
                    );
                }
            }

            if attempt + 1 < max_attempts {
                self.sleeper.sleep(self.policy.delay_after(attempt)).await;
            }
        }

        tracing::error!(max_attempts, "AI suggestion call failed after all retries");
        FALLBACK_MESSAGE.to_string()
    }
}

/// 쉼표로 구분된 문자열을 공백 제거된 항목 목록으로 나눕니다. 빈 항목은 버립니다.
pub fn split_items(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fakes::{RecordingSleeper, ScriptedOracle};
    use super::*;
    use crate::services::oracle::OracleError;

    fn service(oracle: Arc<ScriptedOracle>, sleeper: Arc<RecordingSleeper>) -> SuggestionService {
        SuggestionService::new(Some(oracle as Arc<dyn SuggestionOracle>))
            .with_retry(RetryPolicy::default(), sleeper)
    }

    #[test]
    fn default_policy_backs_off_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(0), Duration::from_secs(1));
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn three_failures_fall_back_after_one_and_two_seconds() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Err(OracleError::Timeout),
            Err(OracleError::Upstream(502)),
            Err(OracleError::Malformed("no text".into())),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let text = service(oracle.clone(), sleeper.clone())
            .generate("system", "prompt")
            .await;

        assert_eq!(text, FALLBACK_MESSAGE);
        assert_eq!(oracle.calls(), 3);
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn recovers_on_a_later_attempt() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            Err(OracleError::Timeout),
            Ok("Romance, Sageuk".into()),
        ]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let tags = service(oracle.clone(), sleeper.clone())
            .suggest_tags("A prince falls in love", &[])
            .await;

        assert_eq!(tags, vec!["Romance", "Sageuk"]);
        assert_eq!(oracle.calls(), 2);
        assert_eq!(*sleeper.delays.lock().unwrap(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn tag_prompt_lists_known_tags() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok("Romance".into())]));
        let sleeper = Arc::new(RecordingSleeper::default());

        service(oracle.clone(), sleeper)
            .suggest_tags("A prince falls in love", &["Romance".into(), "Sageuk".into()])
            .await;

        let prompts = oracle.prompts.lock().unwrap();
        assert!(prompts[0].contains("A prince falls in love"));
        assert!(prompts[0].contains("[Romance, Sageuk]"));
    }

    #[tokio::test]
    async fn search_prompt_lists_found_names() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(" Signal ,, Stranger ".into())]));
        let sleeper = Arc::new(RecordingSleeper::default());

        let dramas = service(oracle.clone(), sleeper)
            .suggest_dramas("crime", &["Tunnel".into()])
            .await;

        assert_eq!(dramas, vec!["Signal", "Stranger"]);
        assert!(oracle.prompts.lock().unwrap()[0].contains("[Tunnel]"));
    }

    #[tokio::test]
    async fn missing_oracle_returns_fixed_message_without_waiting() {
        let sleeper = Arc::new(RecordingSleeper::default());
        let service = SuggestionService::new(None).with_retry(RetryPolicy::default(), sleeper.clone());

        assert_eq!(service.suggest_tags("x", &[]).await, vec![MISSING_KEY_MESSAGE]);
        assert!(sleeper.delays.lock().unwrap().is_empty());
    }

    #[test]
    fn fallback_message_survives_splitting_as_one_item() {
        assert_eq!(split_items(FALLBACK_MESSAGE), vec![FALLBACK_MESSAGE]);
    }
}
