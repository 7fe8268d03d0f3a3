//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `ai`: AI 추천 엔드포인트의 요청/응답 본문
//! - `drama`: 드라마(Drama) 관련 구조체
//! - `tag`: 태그 관련 구조체
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Drama`처럼 짧게 접근합니다.

pub mod ai;
pub mod drama;
pub mod tag;

pub use ai::*;
pub use drama::*;
pub use tag::*;
