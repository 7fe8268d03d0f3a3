//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//! - `AppJson` 추출기: JSON 본문 파싱 실패도 `AppError`(400)로 응답
//!
//! AI 추천 호출의 실패는 여기에 포함되지 않습니다.
//! 추천은 항상 문자열로 흡수되며 HTTP 에러로 번지지 않습니다 (`services::suggest` 참고).

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 필수 필드 누락 등 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 유일성 제약 위반 (HTTP 400, code = "conflict")
    ///
    /// 모바일 클라이언트는 400만 처리하므로 409 대신 400을 쓰고,
    /// `code` 필드로 일반 검증 실패와 구분합니다.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::BAD_REQUEST, "conflict", msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        // 결과: { "message": "Resource not found",
        //         "error": { "code": "not_found", "message": "Resource not found" } }
        // 모바일 클라이언트는 최상위 `message`를 읽어 사용자에게 보여줍니다.
        let body = Json(json!({
            "message": message,
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// JSON 본문 파싱 실패를 `AppError::BadRequest`로 바꿉니다.
///
/// axum 기본 `Json` 추출기는 타입이 맞지 않는 본문에 422, 문법 오류에 400을
/// 각자의 평문(plain text) 형식으로 돌려줍니다. 클라이언트는 400 + JSON 에러 본문만 처리하므로
/// 여기서 하나로 맞춥니다.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// `axum::Json` 대신 쓰는 요청 본문 추출기
///
/// `#[from_request(via(Json), rejection(AppError))]`:
/// 내부적으로 `Json<T>`로 파싱하고, 실패하면 위의 `From<JsonRejection>`으로 거절 응답을 만듭니다.
/// 핸들러에서는 `AppJson(req): AppJson<DramaRequest>`처럼 `Json`과 똑같이 씁니다.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
