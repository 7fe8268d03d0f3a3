//! # 드라마(Drama) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/dramas?q=검색어` → 드라마 목록 (검색어가 있으면 필터링)
//! - `POST   /api/dramas`          → 새 드라마 생성 (201)
//! - `GET    /api/dramas/{id}`     → 단일 드라마 조회
//! - `PUT    /api/dramas/{id}`     → 드라마 전체 수정 (태그 연결 포함)
//! - `DELETE /api/dramas/{id}`     → 드라마 삭제 (204)
//!
//! ## Axum 핸들러 패턴
//! - `State(state)`: 앱 전역 상태 (DB 풀, AI 추천 서비스)
//! - `Path(id)`: URL 경로 파라미터
//! - `Query(params)`: 쿼리 스트링 (`?q=...`)
//! - `AppJson(body)`: 요청 본문을 구조체로 파싱 (실패하면 400, `error::AppJson` 참고)

use crate::{
    db,
    error::{AppError, AppJson},
    models::*,
    services::SuggestionService,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 풀은 `main`에서 한 번 만들어 여기로 주입하고, 종료 시 `main`이 닫습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// AI 추천 서비스 (내부적으로 Arc로 공유)
    pub suggestions: SuggestionService,
}

#[derive(Debug, Deserialize)]
pub struct ListDramasQuery {
    pub q: Option<String>,
}

/// `GET /dramas` — 드라마 목록을 조회합니다.
///
/// 응답은 배열 그대로입니다: `[{ "id": ..., "tags": [...] }, ...]`
pub async fn list_dramas(
    State(state): State<AppState>,
    Query(params): Query<ListDramasQuery>,
) -> Result<Json<Vec<DramaWithTags>>, AppError> {
    let dramas = db::list_dramas(&state.pool, params.q.as_deref()).await?;
    Ok(Json(dramas))
}

/// `GET /dramas/{id}` — 단일 드라마를 조회합니다.
pub async fn get_drama(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DramaWithTags>, AppError> {
    let drama = db::get_drama(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(drama))
}

/// `POST /dramas` — 새 드라마를 생성합니다.
///
/// 이름이나 줄거리가 비어 있으면 DB에 닿기 전에 400을 반환합니다.
/// 존재하지 않는 태그 이름은 연결하지 않고 건너뜁니다.
pub async fn create_drama(
    State(state): State<AppState>,
    AppJson(req): AppJson<DramaRequest>,
) -> Result<(StatusCode, Json<DramaWithTags>), AppError> {
    let draft = req.validate()?;
    let drama = db::create_drama(&state.pool, &draft).await?;
    Ok((StatusCode::CREATED, Json(drama)))
}

/// `PUT /dramas/{id}` — 드라마를 전체 교체 방식으로 수정합니다.
pub async fn update_drama(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<DramaRequest>,
) -> Result<Json<DramaWithTags>, AppError> {
    let draft = req.validate()?;
    let drama = db::update_drama(&state.pool, &id, &draft)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(drama))
}

/// `DELETE /dramas/{id}` — 드라마를 삭제합니다. 성공 시 `204 No Content`.
pub async fn delete_drama(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = db::delete_drama(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
