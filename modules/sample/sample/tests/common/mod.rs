#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use axum::Router;
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use sample::infra::storage::entity::{ActiveModel, Entity};
use sample::{SampleConfig, SampleModule};
use sea_orm::{ActiveValue, ConnectOptions, Database, DatabaseConnection, EntityTrait};
use uuid::Uuid;

pub const SAMPLE_JSON_0: &str = r#"{"ID":"00000000-0000-0000-0000-000000000000","Name":"test-japanese","Birthday":"1994-09-14T00:00:00+09:00","IsJapanese":true}"#;
pub const SAMPLE_JSON_3: &str = r#"{"ID":"00000000-0000-0000-0000-000000000003","Name":"test-foreiner","Birthday":"1994-11-08T00:00:00+09:00","IsJapanese":false}"#;
pub const SAMPLE_JSON_4: &str = r#"{"ID":"00000000-0000-0000-0000-000000000004","Name":"test-ninja","Birthday":"1994-12-12T00:00:00+09:00","IsJapanese":true}"#;

pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

pub fn config() -> SampleConfig {
    SampleConfig {
        utc_offset: Some("+09:00".to_owned()),
        ..SampleConfig::default()
    }
}

/// Fresh in-memory SQLite database. A single pooled connection keeps the
/// database alive for the whole test.
pub async fn connect() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opts).await.expect("connect to sqlite")
}

fn row(n: u128, name: &str, birthday: (i32, u32, u32), japanese: bool, deleted: bool) -> ActiveModel {
    let created = Utc.with_ymd_and_hms(2003, 6, 14, 0, 0, 0).unwrap();
    let updated = Utc.with_ymd_and_hms(2004, 6, 14, 0, 0, 0).unwrap();
    ActiveModel {
        id: ActiveValue::Set(Uuid::from_u128(n)),
        name: ActiveValue::Set(name.to_owned()),
        birthday: ActiveValue::Set(NaiveDate::from_ymd_opt(birthday.0, birthday.1, birthday.2).unwrap()),
        is_japanese: ActiveValue::Set(japanese),
        created_at: ActiveValue::Set(created),
        updated_at: ActiveValue::Set(updated),
        is_deleted: ActiveValue::Set(deleted),
        deleted_at: ActiveValue::Set(deleted.then_some(updated)),
    }
}

/// Five rows sharing one `created_at`; ids 1 and 2 are soft-deleted.
pub async fn seed(db: &DatabaseConnection) {
    let rows = [
        row(0, "test-japanese", (1994, 9, 14), true, false),
        row(1, "test-deleted-japanese", (1994, 10, 12), true, true),
        row(2, "test-deleted-foreiner", (1994, 11, 8), false, true),
        row(3, "test-foreiner", (1994, 11, 8), false, false),
        row(4, "test-ninja", (1994, 12, 12), true, false),
    ];
    Entity::insert_many(rows)
        .exec_without_returning(db)
        .await
        .expect("seed fixture");
}

/// Router over a migrated and seeded database, plus a handle to that database.
pub async fn seeded_app() -> (Router, DatabaseConnection) {
    let db = connect().await;
    let module = SampleModule::with_database(db.clone(), &config(), true)
        .await
        .expect("build module");
    seed(&db).await;
    (module.router(), db)
}
