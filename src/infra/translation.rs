//! Translation backends.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::application::translation::{TranslationError, Translator};
use crate::config::TranslationSettings;
use crate::domain::entities::{FaqText, TranslatedText};
use crate::domain::language::LanguageCode;
use crate::infra::error::InfraError;

/// Client for the Google Cloud Translation v2 REST API.
///
/// Question and answer travel in one request as a two-element `q` array.
#[derive(Clone, Debug)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
    api_key: String,
    source: LanguageCode,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: [&'a str; 2],
    target: &'static str,
    source: &'static str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<TranslationEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationEntry {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GoogleTranslator {
    pub fn new(settings: &TranslationSettings) -> Result<Self, InfraError> {
        let api_key = settings.api_key.clone().ok_or_else(|| {
            InfraError::configuration("translation.api_key is required for the google provider")
        })?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::configuration(format!("translation client: {err}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key,
            source: settings.source_language,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("polyfaq/", env!("CARGO_PKG_VERSION"))
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &FaqText,
        target: LanguageCode,
    ) -> Result<TranslatedText, TranslationError> {
        let body = TranslateRequest {
            q: [text.question(), text.answer()],
            target: target.as_str(),
            source: self.source.as_str(),
            format: "text",
        };

        let response = self
            .client
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .map_err(|err| TranslationError::Request(err.without_url().to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|err| TranslationError::Request(err.without_url().to_string()))?;

        if !status.is_success() {
            return Err(TranslationError::Status {
                status: status.as_u16(),
                message: error_message(&payload),
            });
        }

        parse_response(&payload)
    }
}

fn error_message(payload: &str) -> String {
    serde_json::from_str::<ErrorResponse>(payload)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| payload.chars().take(200).collect())
}

fn parse_response(payload: &str) -> Result<TranslatedText, TranslationError> {
    let response: TranslateResponse = serde_json::from_str(payload)
        .map_err(|err| TranslationError::Malformed(err.to_string()))?;

    let mut entries = response.data.translations.into_iter();
    match (entries.next(), entries.next()) {
        (Some(question), Some(answer)) => Ok(TranslatedText::new(
            question.translated_text,
            answer.translated_text,
        )),
        _ => Err(TranslationError::Malformed(
            "expected two translated strings".to_string(),
        )),
    }
}

/// Translator used when no provider is configured: every language receives
/// the source text unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(
        &self,
        text: &FaqText,
        _target: LanguageCode,
    ) -> Result<TranslatedText, TranslationError> {
        Ok(TranslatedText::from_source(text))
    }
}
