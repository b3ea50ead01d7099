//! PostgreSQL-backed `SkillCatalogue` implementation using Diesel.

use async_trait::async_trait;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{Page, SkillCatalogue, SkillCatalogueError, SkillSearch};
use crate::domain::{AuditAction, AuditEvent, NewSkill, SKILLS_ENTITY, Skill, SkillId};

use super::audit::append_event;
use super::error_mapping::{
    WriteViolation, detect_write_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewSkillRow, SkillRow};
use super::pool::{DbPool, PoolError};
use super::schema::skills;

/// Diesel-backed implementation of the skill catalogue port.
#[derive(Clone)]
pub struct DieselSkillCatalogue {
    pool: DbPool,
}

impl DieselSkillCatalogue {
    /// Create a new catalogue with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SkillCatalogueError {
    map_basic_pool_error(error, SkillCatalogueError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SkillCatalogueError {
    map_basic_diesel_error(
        error,
        SkillCatalogueError::query,
        SkillCatalogueError::connection,
    )
}

/// Convert a database row into a validated domain skill.
fn row_to_skill(row: SkillRow) -> Result<Skill, SkillCatalogueError> {
    let SkillRow {
        id,
        name,
        slug,
        category,
        is_active,
        created_at,
    } = row;
    Skill::from_parts(SkillId::new(id), name, slug, category, is_active, created_at)
        .map_err(|err| SkillCatalogueError::query(err.to_string()))
}

#[async_trait]
impl SkillCatalogue for DieselSkillCatalogue {
    async fn create(&self, skill: &NewSkill) -> Result<Skill, SkillCatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewSkillRow {
            name: skill.name(),
            slug: skill.slug(),
            category: skill.category(),
        };

        let inserted: Result<SkillRow, diesel::result::Error> = conn
            .transaction(|conn| {
                async move {
                    let inserted: SkillRow = diesel::insert_into(skills::table)
                        .values(&new_row)
                        .returning(SkillRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let event = AuditEvent::new(None, SKILLS_ENTITY, AuditAction::Create)
                        .for_entity_id(inserted.id);
                    append_event(conn, &event).await?;
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await;

        let inserted = inserted.map_err(|error| {
            if let Some(WriteViolation::Unique { .. }) = detect_write_violation(&error) {
                SkillCatalogueError::duplicate_slug(skill.slug())
            } else {
                map_diesel_error(error)
            }
        })?;

        row_to_skill(inserted)
    }

    async fn find_by_id(&self, skill_id: SkillId) -> Result<Option<Skill>, SkillCatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = skills::table
            .filter(skills::id.eq(skill_id.get()))
            .select(SkillRow::as_select())
            .first::<SkillRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_skill).transpose()
    }

    async fn search(
        &self,
        search: &SkillSearch,
        page: Page,
    ) -> Result<Vec<Skill>, SkillCatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = skills::table.select(SkillRow::as_select()).into_boxed();

        if let Some(term) = search.query.as_deref() {
            let pattern = format!("%{}%", term.replace('%', "\\%").replace('_', "\\_"));
            query = query.filter(
                skills::name
                    .ilike(pattern.clone())
                    .or(skills::slug.ilike(pattern.clone()))
                    .or(skills::category.ilike(pattern).assume_not_null()),
            );
        }
        if search.only_active {
            query = query.filter(skills::is_active.eq(true));
        }

        let rows: Vec<SkillRow> = query
            .order(skills::name.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_skill).collect()
    }

    async fn exists(&self, skill_id: SkillId) -> Result<bool, SkillCatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        select(exists(skills::table.filter(skills::id.eq(skill_id.get()))))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
