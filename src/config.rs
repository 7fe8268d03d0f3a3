//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `GEMINI_API_KEY`: 텍스트 생성 API 키 (없으면 AI 추천이 고정 안내 문구를 반환)
//! - `GEMINI_API_URL`: 텍스트 생성 API 엔드포인트
//! - `AI_PROXY_URL`: AI 호출에만 쓰는 프록시 (예: `socks5://127.0.0.1:7897`)
//! - `AI_TIMEOUT_SECS`: AI 호출 1회당 타임아웃(초)

use std::env;
use std::time::Duration;

/// 기본 Gemini `generateContent` 엔드포인트
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 `main`에서 각 구성요소로 나눠 전달합니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/dramas.db?mode=rwc")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 외부 텍스트 생성 서비스 설정
    pub oracle: OracleConfig,
}

/// 외부 텍스트 생성 서비스(Gemini) 호출 설정
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// None이면 AI 호출을 건너뜁니다
    pub api_key: Option<String>,
    pub api_url: String,
    pub proxy_url: Option<String>,
    /// 시도 1회당 타임아웃
    pub timeout: Duration,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            oracle: OracleConfig::from_env(),
        })
    }
}

impl OracleConfig {
    fn from_env() -> Self {
        Self {
            // 빈 문자열도 "키 없음"으로 취급합니다 (.env에 `GEMINI_API_KEY=`만 적힌 경우)
            api_key: non_empty_var("GEMINI_API_KEY"),
            api_url: non_empty_var("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            proxy_url: non_empty_var("AI_PROXY_URL"),
            timeout: Duration::from_secs(
                env::var("AI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// 환경변수를 읽되, 없거나 공백뿐이면 None을 반환합니다.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
