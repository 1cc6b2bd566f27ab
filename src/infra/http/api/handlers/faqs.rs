//! FAQ handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::language::LanguageCode;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

pub async fn list_faqs(
    State(state): State<ApiState>,
    query: Result<Query<LanguageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let language = LanguageCode::resolve(query.lang.as_deref());
    let faqs = state.faqs.list_faqs(language).await?;

    Ok(Json(
        faqs.into_iter().map(FaqView::from).collect::<Vec<_>>(),
    ))
}

pub async fn get_faq(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    query: Result<Query<LanguageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let language = LanguageCode::resolve(query.lang.as_deref());
    let faq = state.faqs.get_faq(&id, language).await?;

    Ok(Json(FaqView::from(faq)))
}

pub async fn create_faq(
    State(state): State<ApiState>,
    payload: Result<Json<FaqCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let record = state
        .faqs
        .create_faq(
            payload.question.as_deref().unwrap_or_default(),
            payload.answer.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(FaqResponse::from(record))))
}

pub async fn update_faq(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<FaqUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let record = state
        .faqs
        .update_faq(&id, payload.question.as_deref(), payload.answer.as_deref())
        .await?;

    Ok(Json(FaqResponse::from(record)))
}

pub async fn delete_faq(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.faqs.delete_faq(&id).await?;

    Ok(Json(DeleteResponse {
        message: "FAQ deleted successfully".to_string(),
    }))
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}
