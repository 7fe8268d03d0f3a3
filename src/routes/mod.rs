//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과, 이들을 묶은 라우터를 정의합니다.
//!
//! 각 하위 모듈:
//! - `ai`: AI 태그 추천 / 검색 연관 추천
//! - `dramas`: 드라마 CRUD 핸들러 (+ `AppState`)
//! - `health`: 서버 상태 확인
//! - `tags`: 태그 CRUD 핸들러

pub mod ai;
pub mod dramas;
pub mod health;
pub mod tags;

pub use ai::*;
pub use dramas::*;
pub use health::*;
pub use tags::*;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// 모든 API는 `/api` 아래에 중첩됩니다. 경로 변수는 axum 0.8 문법(`{id}`)을 씁니다.
/// `main`과 테스트가 같은 라우터를 사용합니다.
pub fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        // 드라마 CRUD
        .route("/dramas", get(list_dramas).post(create_drama))
        .route(
            "/dramas/{id}",
            get(get_drama).put(update_drama).delete(delete_drama),
        )
        // 태그 CRUD
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", delete(delete_tag))
        // AI 추천
        .route("/ai/tag-generation", post(generate_tags))
        .route("/ai/search-suggest", post(suggest_search))
        .route("/health", get(health_check))
        .with_state(state);

    // 모바일/웹 클라이언트가 다른 출처에서 호출하므로 CORS를 모두 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
