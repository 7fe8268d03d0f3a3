//! # 드라마 모델 정의
//!
//! 카탈로그의 핵심 엔티티인 드라마(Drama)와 요청 본문 구조체를 정의합니다.
//!
//! ## 구조체 역할
//! - `Drama`: DB의 `dramas` 테이블 한 행
//! - `DramaWithTags`: 응답용. 드라마 + 연결된 태그 이름 목록
//! - `DramaRequest`: `POST`/`PUT /api/dramas`의 요청 본문 (검증 전)
//! - `DramaDraft`: 검증을 통과한 쓰기용 값
//!
//! 모바일 클라이언트와의 JSON 필드명은 camelCase(`coverUrl`, `createdAt`)입니다.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 드라마 엔티티 — DB의 `dramas` 테이블 한 행(row)에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Drama {
    /// UUIDv7 문자열. 생성 시 서버가 발급하며 이후 바뀌지 않습니다.
    pub id: String,
    pub name: String,
    pub genre: Option<String>,
    pub synopsis: String,
    pub cover_url: Option<String>,
    /// RFC 3339 형식 생성 시각
    pub created_at: String,
}

/// 태그 이름까지 채운 드라마 — 모든 드라마 응답은 이 형태입니다.
///
/// `#[serde(flatten)]`으로 `Drama`의 필드를 같은 JSON 객체 안에 펼칩니다.
/// 결과: `{ "id": ..., "name": ..., ..., "tags": ["로맨스", "사극"] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DramaWithTags {
    #[serde(flatten)]
    pub drama: Drama,
    pub tags: Vec<String>,
}

/// 드라마 생성/수정 요청 본문
///
/// 필수 필드도 `Option`으로 받습니다. 누락 시 Axum의 기본 422 대신
/// 우리가 정한 400 메시지를 돌려주기 위해서입니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DramaRequest {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub synopsis: Option<String>,
    pub cover_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// 검증을 마친 드라마 쓰기 값
///
/// DB 계층은 이 타입만 받으므로, 이름/줄거리가 빈 드라마는 저장될 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DramaDraft {
    pub name: String,
    pub genre: Option<String>,
    pub synopsis: String,
    pub cover_url: Option<String>,
    /// 연결할 태그 이름. 존재하지 않는 이름은 저장 시 건너뜁니다.
    pub tags: Vec<String>,
}

impl DramaRequest {
    /// 요청을 검증하여 `DramaDraft`로 변환합니다.
    ///
    /// - `name`, `synopsis`: 공백을 제거한 뒤 비어 있으면 400
    /// - `genre`, `coverUrl`: 앞뒤 공백을 제거하고, 남는 게 없으면 NULL로 저장
    pub fn validate(self) -> Result<DramaDraft, AppError> {
        let name = trimmed(self.name);
        let synopsis = trimmed(self.synopsis);

        let (Some(name), Some(synopsis)) = (name, synopsis) else {
            return Err(AppError::BadRequest(
                "Drama name and synopsis must not be empty".to_string(),
            ));
        };

        Ok(DramaDraft {
            name,
            genre: trimmed(self.genre),
            synopsis,
            cover_url: trimmed(self.cover_url),
            tags: self.tags.unwrap_or_default(),
        })
    }
}

/// 공백을 제거한 값. 비어 있으면 `None`
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let req = DramaRequest {
            name: Some("   ".into()),
            synopsis: Some("A story".into()),
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn missing_synopsis_is_rejected() {
        let req = DramaRequest {
            name: Some("Signal".into()),
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn empty_optional_fields_become_none() {
        let draft = DramaRequest {
            name: Some(" Signal ".into()),
            genre: Some("".into()),
            synopsis: Some("Cold cases over a walkie-talkie".into()),
            cover_url: Some(" ".into()),
            tags: None,
        }
        .validate()
        .unwrap();

        assert_eq!(draft.name, "Signal");
        assert_eq!(draft.genre, None);
        assert_eq!(draft.cover_url, None);
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn optional_fields_are_trimmed() {
        let draft = DramaRequest {
            name: Some("Signal".into()),
            genre: Some(" Thriller ".into()),
            synopsis: Some("Cold cases over a walkie-talkie".into()),
            cover_url: Some("\thttps://img.example/signal.jpg \n".into()),
            tags: None,
        }
        .validate()
        .unwrap();

        assert_eq!(draft.genre.as_deref(), Some("Thriller"));
        assert_eq!(draft.cover_url.as_deref(), Some("https://img.example/signal.jpg"));
    }

    #[test]
    fn serializes_in_camel_case_with_flattened_tags() {
        let drama = DramaWithTags {
            drama: Drama {
                id: "d1".into(),
                name: "Signal".into(),
                genre: None,
                synopsis: "s".into(),
                cover_url: Some("http://img/1.png".into()),
                created_at: "2024-01-01T00:00:00.000Z".into(),
            },
            tags: vec!["Thriller".into()],
        };

        let value = serde_json::to_value(&drama).unwrap();
        assert_eq!(value["coverUrl"], "http://img/1.png");
        assert_eq!(value["createdAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["tags"][0], "Thriller");
    }
}
