//! SeaORM-backed implementation of the sample repository port.
//!
//! Soft-deleted rows stay in the table. Every read path starts from
//! [`visible`], which is the only place the `is_deleted = false` predicate
//! is written.

use anyhow::Context;
use chrono::{FixedOffset, Utc};
use sample_sdk::{Sample, UpdateQuery};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::repo::{SampleMatches, SampleRepository};

use super::entity::{ActiveModel as SampleAM, Column, Entity as SampleEntity};
use super::mapper::date_from_birthday;

pub struct SeaOrmSampleRepository {
    db: DatabaseConnection,
    zone: FixedOffset,
}

impl SeaOrmSampleRepository {
    /// `zone` is the offset at which stored dates are turned back into
    /// local-midnight birthdays.
    #[must_use]
    pub fn new(db: DatabaseConnection, zone: FixedOffset) -> Self {
        Self { db, zone }
    }
}

/// Rows that have not been soft-deleted.
fn visible() -> Select<SampleEntity> {
    SampleEntity::find().filter(Column::IsDeleted.eq(false))
}

/// Largest page bound SQL drivers bind as a signed 64-bit integer.
const MAX_SQL_BOUND: u64 = i64::MAX.unsigned_abs();

/// `pattern` with the LIKE metacharacters `%`, `_` and `\` backslash-escaped.
fn like_escape(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Literal substring match on `name`.
fn name_contains(pattern: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", like_escape(pattern))).escape('\\')
}

fn set_if_supplied<V>(value: Option<V>) -> ActiveValue<V>
where
    V: Into<sea_orm::Value>,
{
    value.map_or(ActiveValue::NotSet, ActiveValue::Set)
}

#[async_trait::async_trait]
impl SampleRepository for SeaOrmSampleRepository {
    #[instrument(
        name = "sample.repo.find_by_id",
        skip(self),
        fields(db.operation = "SELECT", sample.id = %id)
    )]
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Sample>> {
        let found = visible()
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await
            .context("find_by_id query failed")?;

        found.map(|m| m.into_sample(self.zone)).transpose()
    }

    #[instrument(
        name = "sample.repo.find_by_name_like",
        skip(self),
        fields(db.operation = "SELECT")
    )]
    async fn find_by_name_like(
        &self,
        pattern: &str,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<SampleMatches> {
        let matching = visible().filter(Expr::col(Column::Name).like(name_contains(pattern)));

        let total = matching
            .clone()
            .count(&self.db)
            .await
            .context("count query failed")?;

        let rows = matching
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            // Bound as i64 by the drivers; larger values select the same rows
            .offset(offset.min(MAX_SQL_BOUND))
            .limit(limit.min(MAX_SQL_BOUND))
            .all(&self.db)
            .await
            .context("find_by_name_like query failed")?;
        debug!(total, returned = rows.len(), "Matched samples");

        let samples = rows
            .into_iter()
            .map(|m| m.into_sample(self.zone))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(SampleMatches {
            total: i64::try_from(total).context("match count overflows i64")?,
            samples,
        })
    }

    #[instrument(
        name = "sample.repo.insert",
        skip(self, sample),
        fields(db.operation = "INSERT", sample.id = %sample.id)
    )]
    async fn insert(&self, sample: Sample) -> anyhow::Result<()> {
        let now = Utc::now();
        let m = SampleAM {
            id: ActiveValue::Set(sample.id),
            name: ActiveValue::Set(sample.name),
            birthday: ActiveValue::Set(date_from_birthday(&sample.birthday)),
            is_japanese: ActiveValue::Set(sample.is_japanese),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            is_deleted: ActiveValue::Set(false),
            deleted_at: ActiveValue::Set(None),
        };

        SampleEntity::insert(m)
            .exec_without_returning(&self.db)
            .await
            .context("insert failed")?;

        Ok(())
    }

    #[instrument(
        name = "sample.repo.update",
        skip(self, update),
        fields(db.operation = "UPDATE", sample.id = %update.id)
    )]
    async fn update(&self, update: UpdateQuery) -> anyhow::Result<()> {
        let m = SampleAM {
            id: ActiveValue::NotSet,
            name: set_if_supplied(update.name.into_option()),
            birthday: set_if_supplied(
                update.birthday.into_option().as_ref().map(date_from_birthday),
            ),
            is_japanese: set_if_supplied(update.is_japanese.into_option()),
            created_at: ActiveValue::NotSet,
            updated_at: ActiveValue::Set(Utc::now()),
            is_deleted: ActiveValue::NotSet,
            deleted_at: ActiveValue::NotSet,
        };

        let res = SampleEntity::update_many()
            .set(m)
            .filter(Column::Id.eq(update.id))
            .exec(&self.db)
            .await
            .context("update failed")?;
        debug!(rows_affected = res.rows_affected, "Updated sample");

        Ok(())
    }

    #[instrument(
        name = "sample.repo.delete_by_id",
        skip(self),
        fields(db.operation = "UPDATE", sample.id = %id)
    )]
    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()> {
        let now = Utc::now();
        // Rows already deleted keep their original deleted_at.
        let res = SampleEntity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .context("soft delete failed")?;
        debug!(rows_affected = res.rows_affected, "Soft-deleted sample");

        Ok(())
    }
}
