//! Translation fan-out for FAQ text.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::{FaqText, TranslatedText, Translations};
use crate::domain::language::LanguageCode;

const METRIC_TRANSLATION_FALLBACK_TOTAL: &str = "polyfaq_translation_fallback_total";

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Request(String),
    #[error("translation backend returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("translation response malformed: {0}")]
    Malformed(String),
}

/// A backend that renders FAQ text into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate question and answer together into `target`.
    async fn translate(
        &self,
        text: &FaqText,
        target: LanguageCode,
    ) -> Result<TranslatedText, TranslationError>;
}

/// Issues one translation per target language concurrently and never fails:
/// a language whose translation errors keeps the source text.
#[derive(Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub async fn translate_all(&self, text: &FaqText) -> Translations {
        let requests = LanguageCode::TRANSLATED.iter().map(|&language| async move {
            let translated = match self.translator.translate(text, language).await {
                Ok(translated) => normalise(translated, text),
                Err(err) => {
                    counter!(METRIC_TRANSLATION_FALLBACK_TOTAL, "lang" => language.as_str())
                        .increment(1);
                    warn!(
                        target = "polyfaq::translation",
                        lang = language.as_str(),
                        error = %err,
                        "translation failed, keeping source text"
                    );
                    TranslatedText::from_source(text)
                }
            };
            (language, translated)
        });

        let translations: Translations = join_all(requests).await.into_iter().collect();
        debug!(
            target = "polyfaq::translation",
            languages = translations.len(),
            "translations assembled"
        );
        translations
    }
}

/// Trim backend output and fill empty fields from the source text.
fn normalise(translated: TranslatedText, source: &FaqText) -> TranslatedText {
    let question = match translated.question.trim() {
        "" => source.question(),
        trimmed => trimmed,
    };
    let answer = match translated.answer.trim() {
        "" => source.answer(),
        trimmed => trimmed,
    };
    TranslatedText::new(question, answer)
}
