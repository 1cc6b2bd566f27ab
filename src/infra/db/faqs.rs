use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CreateFaqParams, FaqsRepo, FaqsWriteRepo, RepoError, UpdateFaqParams},
    domain::entities::{FaqRecord, Translations},
};

use super::{PostgresRepositories, map_sqlx_error};

const FAQ_COLUMNS: &str = "id, question, answer, translations, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct FaqRow {
    id: Uuid,
    question: String,
    answer: String,
    translations: Json<Translations>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FaqRow> for FaqRecord {
    fn from(row: FaqRow) -> Self {
        Self {
            id: row.id,
            question: row.question,
            answer: row.answer,
            translations: row.translations.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FaqsRepo for PostgresRepositories {
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, RepoError> {
        let sql = format!("SELECT {FAQ_COLUMNS} FROM faqs ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, FaqRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FaqRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FaqRecord>, RepoError> {
        let sql = format!("SELECT {FAQ_COLUMNS} FROM faqs WHERE id = $1");
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(FaqRecord::from))
    }
}

#[async_trait]
impl FaqsWriteRepo for PostgresRepositories {
    async fn create_faq(&self, params: CreateFaqParams) -> Result<FaqRecord, RepoError> {
        let sql = format!(
            "INSERT INTO faqs (question, answer, translations) \
             VALUES ($1, $2, $3) \
             RETURNING {FAQ_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(params.question)
            .bind(params.answer)
            .bind(Json(params.translations))
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_faq(&self, params: UpdateFaqParams) -> Result<FaqRecord, RepoError> {
        let sql = format!(
            "UPDATE faqs \
             SET question = $2, answer = $3, translations = $4, updated_at = now() \
             WHERE id = $1 \
             RETURNING {FAQ_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(params.id)
            .bind(params.question)
            .bind(params.answer)
            .bind(Json(params.translations))
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(FaqRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_faq(&self, id: Uuid) -> Result<FaqRecord, RepoError> {
        let sql = format!("DELETE FROM faqs WHERE id = $1 RETURNING {FAQ_COLUMNS}");
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(FaqRecord::from).ok_or(RepoError::NotFound)
    }
}
