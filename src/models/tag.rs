//! # 태그 모델 정의
//!
//! 태그는 드라마를 분류하고 검색하기 위한 재사용 가능한 라벨입니다.
//! 드라마와 다대다(N:M) 관계이며, 드라마가 태그를 "소유"하지는 않습니다.

use serde::{Deserialize, Serialize};

/// 태그 엔티티 — DB의 `tags` 테이블 한 행(row)에 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 서버가 발급하는 정수 ID (AUTOINCREMENT)
    pub id: i64,
    /// 태그 이름. 앞뒤 공백이 제거된 상태로 저장되며 유일합니다.
    pub name: String,
}

/// 태그 생성 요청 — `POST /api/tags`의 요청 본문(body)에 해당합니다.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: Option<String>,
}
