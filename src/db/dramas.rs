//! # 드라마 데이터베이스 쿼리 모듈
//!
//! `dramas` 테이블과 `drama_tags` 관계 테이블에 대한 CRUD 쿼리 함수들입니다.
//!
//! 생성/수정은 하나의 트랜잭션 안에서 드라마 행과 태그 연결 전체를 함께 씁니다.
//! 트랜잭션 도중 에러가 나면 `?`로 함수를 빠져나가면서 `Transaction`이 drop되고,
//! sqlx가 자동으로 ROLLBACK 한 뒤 연결을 풀에 돌려줍니다.

use crate::db::tags::{find_tag_id, get_drama_tag_names};
use crate::error::AppError;
use crate::models::*;
use chrono::{SecondsFormat, Utc};
use sqlx::{SqliteConnection, SqlitePool};

/// 드라마 목록을 조회합니다. 검색어가 있으면 필터링합니다.
///
/// - 검색어 없음: 전체 드라마를 생성일 내림차순으로
/// - 검색어 있음: 이름, 장르, 연결된 태그 이름 중 하나라도 검색어를 포함하는 드라마
///
/// ## 왜 SQL `LIKE`로 거르지 않나요?
/// SQLite의 `LIKE`(와 `LOWER()`)는 ASCII 알파벳만 대소문자를 무시합니다.
/// "Élite"를 "élite"로, "Ужасы"를 "ужасы"로 찾으려면 유니코드 소문자 변환이 필요하므로,
/// 목록을 생성일 순으로 읽어 태그까지 채운 뒤 Rust의 `str::to_lowercase`로 비교합니다.
///
/// 드라마 한 건은 한 번만 검사되므로, 여러 태그가 동시에 맞아도 결과에 중복이 생기지 않습니다
/// (SQL JOIN에서 `DISTINCT`가 하던 역할).
/// 검색어 안의 `%`, `_` 같은 문자도 특별한 의미 없이 글자 그대로 비교됩니다.
pub async fn list_dramas(
    pool: &SqlitePool,
    query: Option<&str>,
) -> Result<Vec<DramaWithTags>, AppError> {
    // 공백뿐인 검색어는 "검색어 없음"으로 취급합니다.
    let term = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    // created_at이 같은 밀리초에 겹치면 UUIDv7 id(생성 순서대로 증가)로 순서를 정합니다.
    let dramas = sqlx::query_as::<_, Drama>(
        r#"
        SELECT id, name, genre, synopsis, cover_url, created_at
        FROM dramas
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(dramas.len());
    for drama in dramas {
        let tags = get_drama_tag_names(pool, &drama.id).await?;
        let entry = DramaWithTags { drama, tags };

        // if let Some(..) = &term: 검색어가 있을 때만 걸러냅니다.
        if let Some(term) = &term {
            if !matches_term(&entry, term) {
                continue;
            }
        }
        result.push(entry);
    }

    Ok(result)
}

/// ID로 드라마 하나를 태그와 함께 조회합니다.
pub async fn get_drama(pool: &SqlitePool, id: &str) -> Result<Option<DramaWithTags>, AppError> {
    let Some(drama) = fetch_drama(pool, id).await? else {
        return Ok(None);
    };

    let tags = get_drama_tag_names(pool, id).await?;
    Ok(Some(DramaWithTags { drama, tags }))
}

/// 새 드라마를 생성합니다.
///
/// ## 처리 흐름 (하나의 트랜잭션)
/// 1. UUIDv7 ID와 생성 시각을 만들고 `dramas`에 INSERT
/// 2. 요청된 태그 이름마다 태그 ID를 찾아 `drama_tags`에 INSERT
///    (존재하지 않는 태그는 만들지 않고 경고 로그만 남김)
/// 3. COMMIT
///
/// ## `&mut *tx`는 무엇인가요?
/// `Transaction<'_, Sqlite>`는 내부 연결에 대한 `DerefMut`를 구현합니다.
/// `*tx`로 역참조하면 `SqliteConnection`이 되고, `&mut *tx`는 "이 트랜잭션의 연결을 잠시 빌려준다"는 뜻입니다.
/// `&mut SqliteConnection`은 `SqliteExecutor`이므로 `.execute()`, `.fetch_all()` 등에 그대로 넘길 수 있고,
/// 빌림이 끝나면 `tx`를 다시 쓸 수 있습니다. (`tx` 자체를 넘기면 소유권이 이동해 COMMIT을 할 수 없습니다.)
pub async fn create_drama(pool: &SqlitePool, draft: &DramaDraft) -> Result<DramaWithTags, AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO dramas (id, name, genre, synopsis, cover_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&draft.name)
    .bind(&draft.genre)
    .bind(&draft.synopsis)
    .bind(&draft.cover_url)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    link_tags(&mut tx, &id, &draft.tags).await?;
    let tags = get_drama_tag_names(&mut *tx, &id).await?;

    tx.commit().await?;

    tracing::debug!(drama_id = %id, tags = tags.len(), "drama created");

    Ok(DramaWithTags {
        drama: Drama {
            id,
            name: draft.name.clone(),
            genre: draft.genre.clone(),
            synopsis: draft.synopsis.clone(),
            cover_url: draft.cover_url.clone(),
            created_at,
        },
        tags,
    })
}

/// 드라마를 전체 교체 방식으로 수정합니다.
///
/// 스칼라 필드 UPDATE, 기존 태그 연결 전부 삭제, 새 태그 연결 INSERT를
/// 하나의 트랜잭션으로 처리합니다.
///
/// ## 반환값
/// - `Ok(Some(..))`: 수정 성공
/// - `Ok(None)`: 해당 ID의 드라마가 없음 (트랜잭션은 롤백)
///
/// ## 실패 시
/// 태그 연결 INSERT가 실패하면 `?`가 에러를 돌려주며 함수를 빠져나갑니다.
/// 이때 COMMIT되지 않은 `tx`가 drop되면서 ROLLBACK되므로,
/// 앞서 실행한 UPDATE와 기존 연결 DELETE도 모두 없던 일이 됩니다.
/// 즉 수정은 "전부 반영"되거나 "전혀 반영되지 않음" 둘 중 하나입니다.
pub async fn update_drama(
    pool: &SqlitePool,
    id: &str,
    draft: &DramaDraft,
) -> Result<Option<DramaWithTags>, AppError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE dramas SET name = ?, genre = ?, synopsis = ?, cover_url = ? WHERE id = ?",
    )
    .bind(&draft.name)
    .bind(&draft.genre)
    .bind(&draft.synopsis)
    .bind(&draft.cover_url)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    // 영향받은 행이 0개 = 해당 ID가 없음. drop에 맡겨도 되지만 명시적으로 롤백합니다.
    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    sqlx::query("DELETE FROM drama_tags WHERE drama_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    link_tags(&mut tx, id, &draft.tags).await?;

    let drama = fetch_drama(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("drama {id} vanished during update")))?;
    let tags = get_drama_tag_names(&mut *tx, id).await?;

    tx.commit().await?;

    Ok(Some(DramaWithTags { drama, tags }))
}

/// ID로 드라마를 삭제합니다.
///
/// `drama_tags.drama_id`의 `ON DELETE CASCADE`로 연결 행도 함께 삭제됩니다.
pub async fn delete_drama(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM dramas WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 드라마 행 하나를 조회합니다. 태그는 채우지 않습니다.
///
/// `E: SqliteExecutor<'e>` 제네릭 덕분에 `get_drama`에서는 `&SqlitePool`을,
/// `update_drama`에서는 `&mut *tx`를 넘겨 같은 함수를 재사용합니다.
/// 트랜잭션 안에서 조회하면 아직 COMMIT되지 않은 변경 내용이 보입니다.
async fn fetch_drama<'e, E>(executor: E, id: &str) -> Result<Option<Drama>, AppError>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let drama = sqlx::query_as::<_, Drama>(
        "SELECT id, name, genre, synopsis, cover_url, created_at FROM dramas WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(drama)
}

/// 태그 이름 목록을 ID로 풀어 드라마에 연결합니다.
///
/// 태그 조회도 같은 트랜잭션 연결에서 수행합니다.
/// 같은 이름이 여러 번 와도 `INSERT OR IGNORE`로 한 행만 남습니다.
///
/// ## 왜 `&mut SqliteConnection`을 받나요?
/// 반복문 안에서 연결을 여러 번 써야 하기 때문입니다.
/// 제네릭 `E: SqliteExecutor`는 한 번 넘기면 소비되지만,
/// `&mut SqliteConnection`은 `&mut *conn`으로 매번 다시 빌려(reborrow) 넘길 수 있습니다.
/// 호출하는 쪽에서는 `&mut tx`를 넘기면 deref coercion으로 연결 참조가 됩니다.
async fn link_tags(
    conn: &mut SqliteConnection,
    drama_id: &str,
    tag_names: &[String],
) -> Result<(), AppError> {
    for name in tag_names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        match find_tag_id(&mut *conn, name).await? {
            Some(tag_id) => {
                sqlx::query("INSERT OR IGNORE INTO drama_tags (drama_id, tag_id) VALUES (?, ?)")
                    .bind(drama_id)
                    .bind(tag_id)
                    .execute(&mut *conn)
                    .await?;
            }
            None => {
                tracing::warn!(drama_id, tag = name, "tag does not exist, skipping association");
            }
        }
    }

    Ok(())
}

/// 이름, 장르, 태그 이름 중 하나라도 검색어를 포함하는지 검사합니다.
///
/// `term`은 이미 소문자로 바뀐 상태여야 합니다. 비교 대상도 유니코드 규칙으로 소문자화하므로
/// ASCII가 아닌 글자(É, Ж 등)도 대소문자 없이 매칭됩니다.
fn matches_term(entry: &DramaWithTags, term: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(term);

    contains(&entry.drama.name)
        || entry.drama.genre.as_deref().is_some_and(|genre| contains(genre))
        || entry.tags.iter().any(|tag| contains(tag))
}
