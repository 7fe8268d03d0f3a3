//! # 서비스 계층
//!
//! DB 밖의 외부 협력자와 관련된 로직을 모아둔 모듈입니다.
//! - `oracle`: 외부 텍스트 생성 API 호출 (시도 1회)
//! - `suggest`: 재시도 정책과 프롬프트를 얹은 AI 추천 서비스

pub mod oracle;
pub mod suggest;

pub use oracle::{GeminiOracle, SuggestionOracle};
pub use suggest::SuggestionService;
