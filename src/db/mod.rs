//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `dramas`: 드라마 CRUD 및 검색 쿼리 (생성/수정은 트랜잭션)
//! - `tags`: 태그 CRUD 및 드라마-태그 관계 조회 쿼리

pub mod dramas;
pub mod tags;

pub use dramas::*;
pub use tags::*;

use sqlx::migrate::Migrator;

/// `./migrations` 폴더의 SQL 파일들을 컴파일 타임에 포함시킨 마이그레이터
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 테스트용 인메모리 SQLite 풀을 만들고 마이그레이션을 적용합니다.
///
/// 인메모리 DB는 연결마다 따로 생기므로 연결을 1개로 고정하고,
/// 유휴 연결이 닫혀 DB가 사라지지 않도록 타임아웃을 끕니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");

    MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}
