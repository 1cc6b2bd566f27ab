//! FAQ service: read-through list cache, translation on write and
//! invalidation of every language list on mutation.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::repos::{
    CreateFaqParams, FaqsRepo, FaqsWriteRepo, RepoError, UpdateFaqParams,
};
use crate::application::translation::TranslationService;
use crate::cache::{CacheStore, FaqListKey};
use crate::domain::entities::{FaqId, FaqProjection, FaqRecord, FaqText};
use crate::domain::error::DomainError;
use crate::domain::language::LanguageCode;

const METRIC_CACHE_HIT_TOTAL: &str = "polyfaq_cache_hit_total";
const METRIC_CACHE_MISS_TOTAL: &str = "polyfaq_cache_miss_total";
const METRIC_CACHE_ERROR_TOTAL: &str = "polyfaq_cache_error_total";

#[derive(Debug, Error)]
pub enum FaqError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("FAQ not found")]
    NotFound,
    #[error("a FAQ with the same question already exists")]
    Duplicate,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for FaqError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => FaqError::NotFound,
            RepoError::Duplicate { .. } => FaqError::Duplicate,
            other => FaqError::Repo(other),
        }
    }
}

#[derive(Clone)]
pub struct FaqService {
    reader: Arc<dyn FaqsRepo>,
    writer: Arc<dyn FaqsWriteRepo>,
    cache: Arc<dyn CacheStore>,
    translation: TranslationService,
    ttl: Duration,
}

impl FaqService {
    pub fn new(
        reader: Arc<dyn FaqsRepo>,
        writer: Arc<dyn FaqsWriteRepo>,
        cache: Arc<dyn CacheStore>,
        translation: TranslationService,
        ttl: Duration,
    ) -> Self {
        Self {
            reader,
            writer,
            cache,
            translation,
            ttl,
        }
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend_name()
    }

    /// All FAQs projected into `language`, served from the cache when possible.
    pub async fn list_faqs(&self, language: LanguageCode) -> Result<Vec<FaqProjection>, FaqError> {
        let key = FaqListKey(language).to_string();

        if let Some(cached) = self.read_cached(&key).await {
            return Ok(cached);
        }

        let records = self.reader.list_faqs().await?;
        let projected: Vec<FaqProjection> = records
            .iter()
            .map(|record| record.project(language))
            .collect();

        self.store_cached(&key, &projected).await;
        Ok(projected)
    }

    /// A single FAQ in `language`. Never touches the cache.
    pub async fn get_faq(
        &self,
        raw_id: &str,
        language: LanguageCode,
    ) -> Result<FaqProjection, FaqError> {
        let id = FaqId::parse(raw_id)?;
        let record = self
            .reader
            .find_by_id(id.as_uuid())
            .await?
            .ok_or(FaqError::NotFound)?;
        Ok(record.project(language))
    }

    pub async fn create_faq(&self, question: &str, answer: &str) -> Result<FaqRecord, FaqError> {
        let text = FaqText::new(question, answer)?;
        let translations = self.translation.translate_all(&text).await;

        let record = self
            .writer
            .create_faq(CreateFaqParams {
                question: text.question().to_string(),
                answer: text.answer().to_string(),
                translations,
            })
            .await?;

        self.invalidate_all().await;
        info!(target = "polyfaq::faqs", id = %record.id, "FAQ created");
        Ok(record)
    }

    /// Apply the provided fields. Translations are regenerated only when the
    /// resulting text differs from what is stored.
    pub async fn update_faq(
        &self,
        raw_id: &str,
        question: Option<&str>,
        answer: Option<&str>,
    ) -> Result<FaqRecord, FaqError> {
        let id = FaqId::parse(raw_id)?;
        if question.is_none() && answer.is_none() {
            return Err(DomainError::validation(
                "body",
                "At least one of question or answer must be provided",
            )
            .into());
        }

        let existing = self
            .reader
            .find_by_id(id.as_uuid())
            .await?
            .ok_or(FaqError::NotFound)?;

        let text = FaqText::new(
            question.unwrap_or(&existing.question),
            answer.unwrap_or(&existing.answer),
        )?;
        let changed = text.question() != existing.question || text.answer() != existing.answer;
        let translations = if changed {
            self.translation.translate_all(&text).await
        } else {
            existing.translations.clone()
        };

        let record = self
            .writer
            .update_faq(UpdateFaqParams {
                id: id.as_uuid(),
                question: text.question().to_string(),
                answer: text.answer().to_string(),
                translations,
            })
            .await?;

        self.invalidate_all().await;
        info!(
            target = "polyfaq::faqs",
            id = %record.id,
            retranslated = changed,
            "FAQ updated"
        );
        Ok(record)
    }

    /// Delete a FAQ and return the removed record.
    pub async fn delete_faq(&self, raw_id: &str) -> Result<FaqRecord, FaqError> {
        let id = FaqId::parse(raw_id)?;
        let record = self.writer.delete_faq(id.as_uuid()).await?;

        self.invalidate_all().await;
        info!(target = "polyfaq::faqs", id = %record.id, "FAQ deleted");
        Ok(record)
    }

    /// Delete every FAQ list key concurrently. Failures are logged and
    /// otherwise ignored; stale entries then live until their expiry.
    pub async fn invalidate_all(&self) {
        let deletions = FaqListKey::all().map(|key| async move {
            let key = key.to_string();
            if let Err(err) = self.cache.delete(&key).await {
                counter!(METRIC_CACHE_ERROR_TOTAL, "op" => "delete").increment(1);
                warn!(
                    target = "polyfaq::cache",
                    key = %key,
                    error = %err,
                    "cache invalidation failed"
                );
            }
        });
        join_all(deletions).await;
    }

    async fn read_cached(&self, key: &str) -> Option<Vec<FaqProjection>> {
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
                debug!(target = "polyfaq::cache", key, "cache miss");
                return None;
            }
            Err(err) => {
                counter!(METRIC_CACHE_ERROR_TOTAL, "op" => "get").increment(1);
                counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
                warn!(
                    target = "polyfaq::cache",
                    key,
                    error = %err,
                    "cache read failed, treating as miss"
                );
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(list) => {
                counter!(METRIC_CACHE_HIT_TOTAL).increment(1);
                debug!(target = "polyfaq::cache", key, "cache hit");
                Some(list)
            }
            Err(err) => {
                counter!(METRIC_CACHE_ERROR_TOTAL, "op" => "decode").increment(1);
                counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
                warn!(
                    target = "polyfaq::cache",
                    key,
                    error = %err,
                    "cached payload unreadable, treating as miss"
                );
                None
            }
        }
    }

    async fn store_cached(&self, key: &str, list: &[FaqProjection]) {
        let payload = match serde_json::to_string(list) {
            Ok(payload) => payload,
            Err(err) => {
                counter!(METRIC_CACHE_ERROR_TOTAL, "op" => "encode").increment(1);
                warn!(target = "polyfaq::cache", key, error = %err, "cache encode failed");
                return;
            }
        };
        if let Err(err) = self.cache.set_with_expiry(key, payload, self.ttl).await {
            counter!(METRIC_CACHE_ERROR_TOTAL, "op" => "set").increment(1);
            warn!(target = "polyfaq::cache", key, error = %err, "cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::application::translation::{TranslationError, Translator};
    use crate::cache::{CacheConfig, CacheError, MemoryStore};
    use crate::domain::entities::{TranslatedText, Translations};

    #[derive(Default)]
    struct InMemoryFaqs {
        records: Mutex<Vec<FaqRecord>>,
        list_calls: AtomicUsize,
    }

    impl InMemoryFaqs {
        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FaqsRepo for InMemoryFaqs {
        async fn list_faqs(&self) -> Result<Vec<FaqRecord>, RepoError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.lock().unwrap().clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<FaqRecord>, RepoError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|record| record.id == id)
                .cloned())
        }
    }

    #[async_trait]
    impl FaqsWriteRepo for InMemoryFaqs {
        async fn create_faq(&self, params: CreateFaqParams) -> Result<FaqRecord, RepoError> {
            let mut records = self.records.lock().unwrap();
            if records.iter().any(|record| record.question == params.question) {
                return Err(RepoError::Duplicate {
                    constraint: "faqs_question_key".into(),
                });
            }
            let now = OffsetDateTime::now_utc();
            let record = FaqRecord {
                id: Uuid::new_v4(),
                question: params.question,
                answer: params.answer,
                translations: params.translations,
                created_at: now,
                updated_at: now,
            };
            records.push(record.clone());
            Ok(record)
        }

        async fn update_faq(&self, params: UpdateFaqParams) -> Result<FaqRecord, RepoError> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|record| record.id == params.id)
                .ok_or(RepoError::NotFound)?;
            record.question = params.question;
            record.answer = params.answer;
            record.translations = params.translations;
            record.updated_at = OffsetDateTime::now_utc();
            Ok(record.clone())
        }

        async fn delete_faq(&self, id: Uuid) -> Result<FaqRecord, RepoError> {
            let mut records = self.records.lock().unwrap();
            let index = records
                .iter()
                .position(|record| record.id == id)
                .ok_or(RepoError::NotFound)?;
            Ok(records.remove(index))
        }
    }

    /// Memory store that records deleted keys and can be switched to fail.
    struct RecordingCache {
        inner: MemoryStore,
        deleted: Mutex<Vec<String>>,
        failing: bool,
    }

    impl RecordingCache {
        fn new(failing: bool) -> Arc<Self> {
            Arc::new(Self {
                inner: MemoryStore::new(&CacheConfig::default()),
                deleted: Mutex::new(Vec::new()),
                failing,
            })
        }

        fn deleted(&self) -> Vec<String> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CacheStore for RecordingCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            if self.failing {
                return Err(CacheError::Unavailable("connection refused".into()));
            }
            self.inner.get(key).await
        }

        async fn set_with_expiry(
            &self,
            key: &str,
            value: String,
            ttl: Duration,
        ) -> Result<(), CacheError> {
            if self.failing {
                return Err(CacheError::Unavailable("connection refused".into()));
            }
            self.inner.set_with_expiry(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.deleted.lock().unwrap().push(key.to_string());
            if self.failing {
                return Err(CacheError::Unavailable("connection refused".into()));
            }
            self.inner.delete(key).await
        }

        fn backend_name(&self) -> &'static str {
            "recording"
        }
    }

    struct TaggingTranslator {
        failing: Vec<LanguageCode>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn translate(
            &self,
            text: &FaqText,
            target: LanguageCode,
        ) -> Result<TranslatedText, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&target) {
                return Err(TranslationError::Status {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok(TranslatedText::new(
                format!("{target}: {}", text.question()),
                format!("{target}: {}", text.answer()),
            ))
        }
    }

    struct Fixture {
        service: FaqService,
        repo: Arc<InMemoryFaqs>,
        cache: Arc<RecordingCache>,
        translator: Arc<TaggingTranslator>,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with(false, &[])
        }

        fn with(cache_failing: bool, failing_languages: &[LanguageCode]) -> Self {
            let repo = Arc::new(InMemoryFaqs::default());
            let cache = RecordingCache::new(cache_failing);
            let translator = Arc::new(TaggingTranslator {
                failing: failing_languages.to_vec(),
                calls: AtomicUsize::new(0),
            });
            let service = FaqService::new(
                repo.clone(),
                repo.clone(),
                cache.clone(),
                TranslationService::new(translator.clone()),
                Duration::from_secs(3600),
            );
            Self {
                service,
                repo,
                cache,
                translator,
            }
        }

        fn translator_calls(&self) -> usize {
            self.translator.calls.load(Ordering::SeqCst)
        }
    }

    fn all_keys() -> Vec<String> {
        FaqListKey::all().map(|key| key.to_string()).collect()
    }

    #[tokio::test]
    async fn create_translates_into_every_language_and_persists() {
        let fx = Fixture::new();

        let record = fx
            .service
            .create_faq("  What is Rust? ", "A systems language.")
            .await
            .unwrap();

        assert_eq!(record.question, "What is Rust?");
        assert!(record.translations.is_complete());
        assert_eq!(
            record.translations.get(LanguageCode::Hi).unwrap().question,
            "hi: What is Rust?"
        );
        assert_eq!(fx.translator_calls(), LanguageCode::TRANSLATED.len());
        assert_eq!(fx.cache.deleted(), all_keys());
    }

    #[tokio::test]
    async fn create_with_short_question_is_rejected_before_translation() {
        let fx = Fixture::new();

        let err = fx.service.create_faq("Why", "Because it is.").await.unwrap_err();

        match err {
            FaqError::Domain(DomainError::Validation(errors)) => {
                assert_eq!(errors.violations()[0].field, "question");
                assert!(errors.violations()[0].message.contains("at least 5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fx.translator_calls(), 0);
        assert!(fx.cache.deleted().is_empty());
    }

    #[tokio::test]
    async fn create_keeps_source_text_for_failed_language() {
        let fx = Fixture::with(false, &[LanguageCode::Bn]);

        let record = fx
            .service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let bengali = record.translations.get(LanguageCode::Bn).unwrap();
        assert_eq!(bengali.question, "What is Rust?");
        assert_eq!(bengali.answer, "A systems language.");
        assert!(record.translations.is_complete());
    }

    #[tokio::test]
    async fn duplicate_question_is_reported() {
        let fx = Fixture::new();
        fx.service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let err = fx
            .service
            .create_faq("What is Rust?", "Something else.")
            .await
            .unwrap_err();
        assert!(matches!(err, FaqError::Duplicate));
    }

    #[tokio::test]
    async fn list_reads_through_and_then_serves_from_cache() {
        let fx = Fixture::new();
        fx.service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let first = fx.service.list_faqs(LanguageCode::Es).await.unwrap();
        let second = fx.service.list_faqs(LanguageCode::Es).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].question, "es: What is Rust?");
        assert_eq!(fx.repo.list_calls(), 1);
    }

    #[tokio::test]
    async fn default_language_list_ignores_translations() {
        let fx = Fixture::new();
        fx.service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let list = fx.service.list_faqs(LanguageCode::En).await.unwrap();
        assert_eq!(list[0].question, "What is Rust?");
        assert_eq!(list[0].answer, "A systems language.");
    }

    #[tokio::test]
    async fn writes_make_the_next_list_reflect_the_change() {
        let fx = Fixture::new();
        let record = fx
            .service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();
        assert_eq!(fx.service.list_faqs(LanguageCode::Fr).await.unwrap().len(), 1);

        fx.service
            .update_faq(
                &record.id.to_string(),
                Some("What is Rust exactly?"),
                None,
            )
            .await
            .unwrap();
        let after_update = fx.service.list_faqs(LanguageCode::Fr).await.unwrap();
        assert_eq!(after_update[0].question, "fr: What is Rust exactly?");

        fx.service.delete_faq(&record.id.to_string()).await.unwrap();
        assert!(fx.service.list_faqs(LanguageCode::Fr).await.unwrap().is_empty());
        assert_eq!(fx.repo.list_calls(), 3);
    }

    #[tokio::test]
    async fn record_without_translation_falls_back_to_base_text() {
        let fx = Fixture::new();
        let now = OffsetDateTime::now_utc();
        let mut translations = Translations::new();
        translations.insert(LanguageCode::De, TranslatedText::new("Was ist Rust?", "Eine Sprache."));
        fx.repo.records.lock().unwrap().push(FaqRecord {
            id: Uuid::new_v4(),
            question: "What is Rust?".into(),
            answer: "A systems language.".into(),
            translations,
            created_at: now,
            updated_at: now,
        });

        let german = fx.service.list_faqs(LanguageCode::De).await.unwrap();
        let arabic = fx.service.list_faqs(LanguageCode::Ar).await.unwrap();

        assert_eq!(german[0].question, "Was ist Rust?");
        assert_eq!(arabic[0].question, "What is Rust?");
    }

    #[tokio::test]
    async fn get_distinguishes_invalid_and_absent_ids() {
        let fx = Fixture::new();

        let invalid = fx
            .service
            .get_faq("not-a-uuid", LanguageCode::En)
            .await
            .unwrap_err();
        assert!(matches!(
            invalid,
            FaqError::Domain(DomainError::InvalidIdentifier { .. })
        ));

        let absent = fx
            .service
            .get_faq(&Uuid::new_v4().to_string(), LanguageCode::En)
            .await
            .unwrap_err();
        assert!(matches!(absent, FaqError::NotFound));
    }

    #[tokio::test]
    async fn get_projects_into_requested_language_without_caching() {
        let fx = Fixture::new();
        let record = fx
            .service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let view = fx
            .service
            .get_faq(&record.id.to_string(), LanguageCode::Zh)
            .await
            .unwrap();

        assert_eq!(view.question, "zh: What is Rust?");
        assert!(fx.cache.inner.is_empty());
    }

    #[tokio::test]
    async fn update_with_only_question_keeps_answer_and_retranslates() {
        let fx = Fixture::new();
        let record = fx
            .service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let updated = fx
            .service
            .update_faq(&record.id.to_string(), Some("Why use Rust?"), None)
            .await
            .unwrap();

        assert_eq!(updated.question, "Why use Rust?");
        assert_eq!(updated.answer, "A systems language.");
        assert_eq!(
            updated.translations.get(LanguageCode::Es).unwrap().question,
            "es: Why use Rust?"
        );
        assert_eq!(fx.translator_calls(), 2 * LanguageCode::TRANSLATED.len());
    }

    #[tokio::test]
    async fn update_with_unchanged_text_skips_translation_but_invalidates() {
        let fx = Fixture::new();
        let record = fx
            .service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();
        let deletes_after_create = fx.cache.deleted().len();

        let updated = fx
            .service
            .update_faq(&record.id.to_string(), Some(" What is Rust? "), None)
            .await
            .unwrap();

        assert_eq!(updated.translations, record.translations);
        assert_eq!(fx.translator_calls(), LanguageCode::TRANSLATED.len());
        assert_eq!(
            fx.cache.deleted().len(),
            deletes_after_create + all_keys().len()
        );
    }

    #[tokio::test]
    async fn update_without_fields_is_a_validation_error() {
        let fx = Fixture::new();
        let err = fx
            .service
            .update_faq(&Uuid::new_v4().to_string(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, FaqError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_and_delete_of_absent_faq_are_not_found() {
        let fx = Fixture::new();
        let id = Uuid::new_v4().to_string();

        let update = fx
            .service
            .update_faq(&id, Some("What is Rust?"), None)
            .await
            .unwrap_err();
        let delete = fx.service.delete_faq(&id).await.unwrap_err();

        assert!(matches!(update, FaqError::NotFound));
        assert!(matches!(delete, FaqError::NotFound));
        assert!(fx.cache.deleted().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_reject_malformed_ids() {
        let fx = Fixture::new();

        let update = fx
            .service
            .update_faq("not-a-uuid", Some("What is Rust?"), None)
            .await
            .unwrap_err();
        let delete = fx.service.delete_faq("not-a-uuid").await.unwrap_err();

        assert!(matches!(
            update,
            FaqError::Domain(DomainError::InvalidIdentifier { ref value }) if value == "not-a-uuid"
        ));
        assert!(matches!(
            delete,
            FaqError::Domain(DomainError::InvalidIdentifier { .. })
        ));
        assert!(fx.cache.deleted().is_empty());
        assert_eq!(fx.translator_calls(), 0);
    }

    /// Cache whose deletes only complete once every list key is being deleted.
    struct RendezvousCache {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait]
    impl CacheStore for RendezvousCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Ok(None)
        }

        async fn set_with_expiry(
            &self,
            _key: &str,
            _value: String,
            _ttl: Duration,
        ) -> Result<(), CacheError> {
            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            self.barrier.wait().await;
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "rendezvous"
        }
    }

    #[tokio::test]
    async fn invalidation_deletes_keys_concurrently() {
        let repo = Arc::new(InMemoryFaqs::default());
        let cache = Arc::new(RendezvousCache {
            barrier: tokio::sync::Barrier::new(all_keys().len()),
        });
        let service = FaqService::new(
            repo.clone(),
            repo,
            cache,
            TranslationService::new(Arc::new(TaggingTranslator {
                failing: Vec::new(),
                calls: AtomicUsize::new(0),
            })),
            Duration::from_secs(3600),
        );

        tokio::time::timeout(Duration::from_secs(5), service.invalidate_all())
            .await
            .expect("deletes for every key should be in flight together");
    }

    #[tokio::test]
    async fn delete_invalidates_every_language() {
        let fx = Fixture::new();
        let record = fx
            .service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();

        let removed = fx.service.delete_faq(&record.id.to_string()).await.unwrap();

        assert_eq!(removed.id, record.id);
        let deleted = fx.cache.deleted();
        assert_eq!(deleted[deleted.len() - all_keys().len()..], all_keys()[..]);
    }

    #[tokio::test]
    async fn cache_outage_is_invisible_to_callers() {
        let fx = Fixture::with(true, &[]);

        fx.service
            .create_faq("What is Rust?", "A systems language.")
            .await
            .unwrap();
        let first = fx.service.list_faqs(LanguageCode::Hi).await.unwrap();
        let second = fx.service.list_faqs(LanguageCode::Hi).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fx.repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn unreadable_cached_payload_is_a_miss() {
        let fx = Fixture::new();
        fx.cache
            .set_with_expiry("faqs:en", "{not json".into(), Duration::from_secs(60))
            .await
            .unwrap();

        let list = fx.service.list_faqs(LanguageCode::En).await.unwrap();

        assert!(list.is_empty());
        assert_eq!(fx.repo.list_calls(), 1);
        assert_eq!(fx.cache.inner.get("faqs:en").await.unwrap().as_deref(), Some("[]"));
    }
}
