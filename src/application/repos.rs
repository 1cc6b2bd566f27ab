//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{FaqRecord, Translations};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateFaqParams {
    pub question: String,
    pub answer: String,
    pub translations: Translations,
}

#[derive(Debug, Clone)]
pub struct UpdateFaqParams {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub translations: Translations,
}

#[async_trait]
pub trait FaqsRepo: Send + Sync {
    /// Every stored FAQ, oldest first.
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FaqRecord>, RepoError>;
}

#[async_trait]
pub trait FaqsWriteRepo: Send + Sync {
    async fn create_faq(&self, params: CreateFaqParams) -> Result<FaqRecord, RepoError>;

    /// Replace the text and translations of an existing FAQ.
    ///
    /// Returns [`RepoError::NotFound`] when no row has the given id.
    async fn update_faq(&self, params: UpdateFaqParams) -> Result<FaqRecord, RepoError>;

    /// Delete a FAQ and return the removed record.
    ///
    /// Returns [`RepoError::NotFound`] when no row has the given id.
    async fn delete_faq(&self, id: Uuid) -> Result<FaqRecord, RepoError>;
}
