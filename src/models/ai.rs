//! AI 추천 엔드포인트의 요청/응답 본문

use serde::{Deserialize, Serialize};

/// `POST /api/ai/tag-generation`
#[derive(Debug, Deserialize)]
pub struct TagGenerationRequest {
    pub synopsis: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagGenerationResponse {
    pub generated_tags: Vec<String>,
}

/// `POST /api/ai/search-suggest`
///
/// `searchResults`에는 클라이언트가 이미 받은 드라마 객체가 그대로 들어옵니다.
/// 이름만 사용하고 나머지 필드는 무시합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestRequest {
    pub query: Option<String>,
    #[serde(default)]
    pub search_results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultItem {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestResponse {
    pub suggested_dramas: Vec<String>,
}
