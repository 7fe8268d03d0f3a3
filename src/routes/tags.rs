//! # 태그 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/tags | `list_tags` | 전체 태그 목록 (이름순) |
//! | POST | /api/tags | `create_tag` | 새 태그 생성 |
//! | DELETE | /api/tags/{id} | `delete_tag` | 태그 삭제 |

use crate::{
    db,
    error::{AppError, AppJson},
    models::*,
    routes::dramas::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// 전체 태그 목록을 조회합니다.
///
/// `GET /api/tags` → `[{ "id": 1, "name": "Romance" }, ...]`
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = db::list_tags(&state.pool).await?;
    Ok(Json(tags))
}

/// 새 태그를 생성합니다.
///
/// `POST /api/tags` + `{ "name": "..." }` → `201 Created`
///
/// 이름은 앞뒤 공백을 제거해 저장합니다. 이미 있는 이름이면 400(code: `conflict`).
pub async fn create_tag(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    // 필드가 빠진 경우도 빈 이름과 같은 400으로 처리되도록 빈 문자열로 대체합니다.
    let name = req.name.unwrap_or_default();
    let tag = db::create_tag(&state.pool, &name).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// 태그를 삭제합니다.
///
/// `DELETE /api/tags/{id}` → `204 No Content`
///
/// ID가 정수가 아니면 DB를 조회하지 않고 바로 400을 반환합니다.
/// 이 태그를 쓰던 드라마의 연결 행은 CASCADE로 함께 삭제됩니다.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    // `Path<i64>`로 바로 받으면 axum 기본 거절 응답(평문)이 나가므로,
    // 문자열로 받은 뒤 직접 파싱해 JSON 에러 본문을 유지합니다.
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid tag id".to_string()))?;

    let deleted = db::delete_tag(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
