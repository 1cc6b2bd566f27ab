//! FAQ entities mirrored from persistent storage.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::{DomainError, FieldViolation, ValidationErrors};
use super::language::LanguageCode;

pub const MIN_TEXT_CHARS: usize = 5;
pub const MAX_TEXT_CHARS: usize = 1000;

/// Store-assigned identifier of a FAQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaqId(Uuid);

impl FaqId {
    /// Parse a client-supplied identifier.
    ///
    /// A malformed value is an [`DomainError::InvalidIdentifier`], which callers
    /// must keep distinct from a well-formed identifier that matches nothing.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| DomainError::invalid_identifier(raw))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for FaqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqField {
    Question,
    Answer,
}

impl FaqField {
    pub fn key(self) -> &'static str {
        match self {
            FaqField::Question => "question",
            FaqField::Answer => "answer",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FaqField::Question => "Question",
            FaqField::Answer => "Answer",
        }
    }

    /// Trim and check one field, returning the normalised text.
    pub fn validate(self, raw: &str) -> Result<String, FieldViolation> {
        let trimmed = raw.trim();
        let chars = trimmed.chars().count();
        if chars == 0 {
            return Err(FieldViolation::new(
                self.key(),
                format!("{} is required", self.label()),
            ));
        }
        if chars < MIN_TEXT_CHARS {
            return Err(FieldViolation::new(
                self.key(),
                format!(
                    "{} must be at least {MIN_TEXT_CHARS} characters long",
                    self.label()
                ),
            ));
        }
        if chars > MAX_TEXT_CHARS {
            return Err(FieldViolation::new(
                self.key(),
                format!(
                    "{} must be at most {MAX_TEXT_CHARS} characters long",
                    self.label()
                ),
            ));
        }
        Ok(trimmed.to_string())
    }
}

/// A validated question/answer pair in the default language.
///
/// Construction is the only place FAQ text rules are enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqText {
    question: String,
    answer: String,
}

impl FaqText {
    pub fn new(question: &str, answer: &str) -> Result<Self, DomainError> {
        let mut errors = ValidationErrors::default();
        let question = FaqField::Question
            .validate(question)
            .map_err(|violation| errors.push(violation))
            .ok();
        let answer = FaqField::Answer
            .validate(answer)
            .map_err(|violation| errors.push(violation))
            .ok();

        match (question, answer) {
            (Some(question), Some(answer)) => Ok(Self { question, answer }),
            _ => Err(DomainError::Validation(errors)),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Question and answer rendered in one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub question: String,
    pub answer: String,
}

impl TranslatedText {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// The untranslated pair, used when a backend call fails.
    pub fn from_source(text: &FaqText) -> Self {
        Self::new(text.question(), text.answer())
    }
}

/// Borrowed question/answer pair in a single language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedText<'a> {
    pub question: &'a str,
    pub answer: &'a str,
}

/// Per-language translations of a FAQ.
///
/// Keys are translation targets only; the default language is never stored
/// here because its view is always the record's base text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<LanguageCode, TranslatedText>);

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a translation. Entries for the default language are ignored.
    pub fn insert(&mut self, language: LanguageCode, text: TranslatedText) {
        if !language.is_default() {
            self.0.insert(language, text);
        }
    }

    pub fn get(&self, language: LanguageCode) -> Option<&TranslatedText> {
        self.0.get(&language)
    }

    /// Text for `language`, falling back to `base` for the default language and
    /// for any language without an entry.
    pub fn text_for<'a>(
        &'a self,
        language: LanguageCode,
        base: LocalizedText<'a>,
    ) -> LocalizedText<'a> {
        if language.is_default() {
            return base;
        }
        match self.0.get(&language) {
            Some(text) => LocalizedText {
                question: &text.question,
                answer: &text.answer,
            },
            None => base,
        }
    }

    /// True when every translation target has an entry.
    pub fn is_complete(&self) -> bool {
        LanguageCode::TRANSLATED
            .iter()
            .all(|language| self.0.contains_key(language))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LanguageCode, &TranslatedText)> {
        self.0.iter().map(|(language, text)| (*language, text))
    }
}

impl FromIterator<(LanguageCode, TranslatedText)> for Translations {
    fn from_iter<I: IntoIterator<Item = (LanguageCode, TranslatedText)>>(iter: I) -> Self {
        let mut translations = Translations::new();
        for (language, text) in iter {
            translations.insert(language, text);
        }
        translations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaqRecord {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub translations: Translations,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl FaqRecord {
    pub fn base_text(&self) -> LocalizedText<'_> {
        LocalizedText {
            question: &self.question,
            answer: &self.answer,
        }
    }

    /// Derive the view of this record in `language` without touching the record.
    pub fn project(&self, language: LanguageCode) -> FaqProjection {
        let text = self.translations.text_for(language, self.base_text());
        FaqProjection {
            id: self.id,
            question: text.question.to_string(),
            answer: text.answer.to_string(),
        }
    }
}

/// A FAQ as seen in a single language. This is also the cached list element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqProjection {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}
