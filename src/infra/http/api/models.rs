pub use polyfaq_api_types::{
    ApiErrorBody, ApiErrorMessage, DeleteResponse, FaqCreateRequest, FaqResponse,
    FaqUpdateRequest, FaqView, FieldErrorView, HealthResponse, LanguageQuery, TranslatedTextView,
};

use crate::domain::entities::{FaqProjection, FaqRecord};

impl From<FaqProjection> for FaqView {
    fn from(projection: FaqProjection) -> Self {
        Self {
            id: projection.id,
            question: projection.question,
            answer: projection.answer,
        }
    }
}

impl From<FaqRecord> for FaqResponse {
    fn from(record: FaqRecord) -> Self {
        let translations = record
            .translations
            .iter()
            .map(|(language, text)| {
                (
                    language.as_str().to_string(),
                    TranslatedTextView {
                        question: text.question.clone(),
                        answer: text.answer.clone(),
                    },
                )
            })
            .collect();

        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
            translations,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
