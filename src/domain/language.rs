//! Languages served by the FAQ catalogue.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A language code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("language `{code}` is not supported")]
pub struct UnsupportedLanguage {
    pub code: String,
}

/// Language codes understood by the service.
///
/// `En` is the source language: FAQs are authored in it and its view is always
/// the base `question`/`answer` of a record. Every other variant is a
/// translation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Hi,
    Bn,
    Es,
    Fr,
    De,
    Zh,
    Ar,
}

impl LanguageCode {
    pub const DEFAULT: LanguageCode = LanguageCode::En;

    /// Translation targets, in the order they are requested from the backend.
    pub const TRANSLATED: [LanguageCode; 7] = [
        LanguageCode::Hi,
        LanguageCode::Bn,
        LanguageCode::Es,
        LanguageCode::Fr,
        LanguageCode::De,
        LanguageCode::Zh,
        LanguageCode::Ar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Hi => "hi",
            LanguageCode::Bn => "bn",
            LanguageCode::Es => "es",
            LanguageCode::Fr => "fr",
            LanguageCode::De => "de",
            LanguageCode::Zh => "zh",
            LanguageCode::Ar => "ar",
        }
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }

    /// The default language followed by every translation target.
    pub fn all() -> impl Iterator<Item = LanguageCode> {
        std::iter::once(Self::DEFAULT).chain(Self::TRANSLATED)
    }

    /// Resolve a `lang` query parameter.
    ///
    /// Absent, blank and unsupported codes resolve to the default language so
    /// that every read maps onto one of the cache keys a write invalidates.
    pub fn resolve(raw: Option<&str>) -> LanguageCode {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => value.parse().unwrap_or(Self::DEFAULT),
            None => Self::DEFAULT,
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = UnsupportedLanguage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        LanguageCode::all()
            .find(|code| code.as_str() == normalized)
            .ok_or(UnsupportedLanguage { code: normalized })
    }
}
