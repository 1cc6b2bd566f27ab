//! Cache key definitions.

use std::fmt;

use crate::domain::language::LanguageCode;

const FAQ_LIST_PREFIX: &str = "faqs:";

/// Key of the cached FAQ list for one language: `faqs:<code>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaqListKey(pub LanguageCode);

impl FaqListKey {
    /// Every FAQ list key a mutation must invalidate: the default language
    /// followed by each translation target.
    ///
    /// The set is fixed; keys that were never written are deleted as no-ops.
    pub fn all() -> impl Iterator<Item = FaqListKey> {
        LanguageCode::all().map(FaqListKey)
    }
}

impl fmt::Display for FaqListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{FAQ_LIST_PREFIX}{}", self.0.as_str())
    }
}
