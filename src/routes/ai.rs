//! # AI 추천 라우트 핸들러
//!
//! - `POST /api/ai/tag-generation` → `{ "generatedTags": [...] }`
//! - `POST /api/ai/search-suggest` → `{ "suggestedDramas": [...] }`
//!
//! 외부 호출이 실패해도 200으로 응답합니다. 이 경우 목록에는 안내 문구 하나가 들어갑니다.
//! 400은 필수 입력이 빠졌을 때만 반환합니다.

use crate::{
    db,
    error::{AppError, AppJson},
    models::*,
    routes::dramas::AppState,
};
use axum::{extract::State, Json};

/// 줄거리를 보고 태그를 추천합니다.
///
/// ## 처리 흐름
/// 1. 줄거리가 없거나 공백뿐이면 400 (외부 호출 없음)
/// 2. 현재 저장된 태그 이름 목록을 읽어 프롬프트에 함께 넣음
/// 3. `SuggestionService`가 재시도/대체 문구까지 처리한 `Vec<String>`을 그대로 응답
///
/// `suggest_tags`는 `Result`가 아니라 `Vec<String>`을 반환하므로 이 핸들러에서
/// AI 실패가 500으로 바뀌는 경로는 없습니다.
pub async fn generate_tags(
    State(state): State<AppState>,
    AppJson(req): AppJson<TagGenerationRequest>,
) -> Result<Json<TagGenerationResponse>, AppError> {
    let synopsis = req
        .synopsis
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing drama synopsis".to_string()))?;

    // 태그 목록은 프롬프트 보강용입니다. 조회에 실패해도 추천 자체는 진행합니다.
    // `?` 대신 `unwrap_or_else`로 에러를 흡수하고 빈 목록으로 대체합니다.
    let known_tags = db::list_tag_names(&state.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load tag names for suggestion prompt");
            Vec::new()
        });

    let generated_tags = state.suggestions.suggest_tags(&synopsis, &known_tags).await;
    Ok(Json(TagGenerationResponse { generated_tags }))
}

/// 검색어와 현재 검색 결과를 보고 연관 드라마를 추천합니다.
///
/// `searchResults`의 각 항목에서는 `name`만 사용합니다. 클라이언트가 보내는
/// `id`, `tags` 등 나머지 필드는 역직렬화 단계에서 무시됩니다.
pub async fn suggest_search(
    State(state): State<AppState>,
    AppJson(req): AppJson<SearchSuggestRequest>,
) -> Result<Json<SearchSuggestResponse>, AppError> {
    let query = req
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing search query".to_string()))?;

    let found_names: Vec<String> = req
        .search_results
        .into_iter()
        .map(|item| item.name)
        .filter(|name| !name.is_empty())
        .collect();

    let suggested_dramas = state.suggestions.suggest_dramas(&query, &found_names).await;
    Ok(Json(SearchSuggestResponse { suggested_dramas }))
}
