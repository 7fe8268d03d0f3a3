//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 CRUD 및 드라마-태그 관계 조회를 담당하는 SQL 쿼리 함수들입니다.
//!
//! ## 테이블 구조
//! - `tags`: 태그 엔티티 (id, name). `name`에 UNIQUE 제약
//! - `drama_tags`: 드라마와 태그의 다대다(N:M) 관계 테이블
//!
//! 조회 함수 일부는 `SqliteExecutor`에 대해 제네릭입니다.
//! 같은 함수를 풀(`&SqlitePool`)에서도, 트랜잭션(`&mut *tx`) 안에서도 호출할 수 있습니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteExecutor, SqlitePool};

/// 모든 태그를 이름순으로 조회합니다.
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(tags)
}

/// 모든 태그 이름만 조회합니다. AI 태그 추천 프롬프트에 넣을 목록입니다.
///
/// `query_scalar`는 첫 번째 컬럼 하나만 꺼내므로 `Vec<Tag>` 대신 `Vec<String>`을 바로 얻습니다.
pub async fn list_tag_names<'e, E>(executor: E) -> Result<Vec<String>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM tags ORDER BY name")
        .fetch_all(executor)
        .await?;

    Ok(names)
}

/// 이름으로 태그 ID를 찾습니다. 대소문자를 구분합니다.
///
/// 드라마 생성/수정 트랜잭션 안에서 호출되므로 executor 제네릭입니다.
/// `fetch_optional`: 행이 없으면 에러가 아니라 `None`을 돌려줍니다.
pub async fn find_tag_id<'e, E>(executor: E, name: &str) -> Result<Option<i64>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    Ok(id)
}

/// 새 태그를 생성하고 생성된 태그를 반환합니다.
///
/// ## 처리 흐름
/// 1. 이름의 앞뒤 공백을 제거하고, 비어 있으면 `BadRequest`
/// 2. INSERT. UNIQUE 제약 위반이면 `Conflict`
/// 3. `last_insert_rowid()`로 발급된 ID를 받아 반환
///
/// ## UNIQUE 위반 감지
/// sqlx는 DB별 에러를 `sqlx::Error::Database(Box<dyn DatabaseError>)`로 감쌉니다.
/// `is_unique_violation()`으로 SQLite 에러 코드를 직접 비교하지 않고도 중복 이름을 구분할 수 있습니다.
/// 그 밖의 DB 에러는 그대로 `AppError::Database`로 넘겨 500이 됩니다.
pub async fn create_tag(pool: &SqlitePool, name: &str) -> Result<Tag, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Tag name must not be empty".to_string()));
    }

    let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Tag already exists".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Tag {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// ID로 태그를 삭제합니다.
///
/// `drama_tags.tag_id`에 `ON DELETE CASCADE`가 걸려 있으므로,
/// 이 태그를 참조하던 드라마 연결 행도 함께 삭제됩니다.
///
/// ## 반환값
/// - `true`: 삭제 성공
/// - `false`: 해당 ID의 태그가 없음
pub async fn delete_tag(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 특정 드라마에 연결된 태그 이름을 이름순으로 조회합니다.
///
/// ```sql
/// tags ←── drama_tags ──→ dramas
/// ```
pub async fn get_drama_tag_names<'e, E>(
    executor: E,
    drama_id: &str,
) -> Result<Vec<String>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT t.name
        FROM tags t
        JOIN drama_tags dt ON dt.tag_id = t.id
        WHERE dt.drama_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(drama_id)
    .fetch_all(executor)
    .await?;

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_trims_name() {
        let pool = test_pool().await;

        let tag = create_tag(&pool, " Drama ").await.unwrap();
        assert_eq!(tag.name, "Drama");
        assert_eq!(find_tag_id(&pool, "Drama").await.unwrap(), Some(tag.id));
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let pool = test_pool().await;

        create_tag(&pool, " Drama ").await.unwrap();
        let err = create_tag(&pool, "Drama").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(list_tags(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let pool = test_pool().await;

        create_tag(&pool, "drama").await.unwrap();
        create_tag(&pool, "Drama").await.unwrap();
        assert_eq!(list_tag_names(&pool).await.unwrap(), vec!["Drama", "drama"]);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let pool = test_pool().await;

        let err = create_tag(&pool, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn list_is_ordered_by_name() {
        let pool = test_pool().await;

        for name in ["Thriller", "Comedy", "Romance"] {
            create_tag(&pool, name).await.unwrap();
        }

        let names: Vec<_> = list_tags(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Comedy", "Romance", "Thriller"]);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = test_pool().await;

        let tag = create_tag(&pool, "Comedy").await.unwrap();
        assert!(delete_tag(&pool, tag.id).await.unwrap());
        assert!(!delete_tag(&pool, tag.id).await.unwrap());
    }
}
