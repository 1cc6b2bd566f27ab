//! Shared fakes for the HTTP and metrics tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use polyfaq::application::faqs::FaqService;
use polyfaq::application::repos::{
    CreateFaqParams, FaqsRepo, FaqsWriteRepo, RepoError, UpdateFaqParams,
};
use polyfaq::application::translation::{TranslationError, TranslationService, Translator};
use polyfaq::cache::{CacheConfig, CacheStore, MemoryStore};
use polyfaq::domain::entities::{FaqRecord, FaqText, TranslatedText};
use polyfaq::domain::language::LanguageCode;
use polyfaq::infra::connection::{ConnectionMonitor, ConnectionState};
use polyfaq::infra::http::{self, ApiState, HealthState};

/// Document store backed by a vector, with a switch to simulate timeouts.
#[derive(Default)]
pub struct InMemoryFaqs {
    records: Mutex<Vec<FaqRecord>>,
    list_calls: AtomicUsize,
    timing_out: std::sync::atomic::AtomicBool,
}

impl InMemoryFaqs {
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn set_timing_out(&self, value: bool) {
        self.timing_out.store(value, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.timing_out.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        Ok(())
    }
}

#[async_trait]
impl FaqsRepo for InMemoryFaqs {
    async fn list_faqs(&self) -> Result<Vec<FaqRecord>, RepoError> {
        self.check()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FaqRecord>, RepoError> {
        self.check()?;
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
        self.check()?;
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
        self.check()?;
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
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let index = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(RepoError::NotFound)?;
        Ok(records.remove(index))
    }
}

/// Prefixes every field with the target language code; fails for `failing`.
pub struct PrefixTranslator {
    pub failing: Vec<LanguageCode>,
}

#[async_trait]
impl Translator for PrefixTranslator {
    async fn translate(
        &self,
        text: &FaqText,
        target: LanguageCode,
    ) -> Result<TranslatedText, TranslationError> {
        if self.failing.contains(&target) {
            return Err(TranslationError::Request("connection reset".into()));
        }
        Ok(TranslatedText::new(
            format!("[{target}] {}", text.question()),
            format!("[{target}] {}", text.answer()),
        ))
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryFaqs>,
}

pub struct TestAppBuilder {
    database: ConnectionState,
    cache: Option<ConnectionState>,
    failing_languages: Vec<LanguageCode>,
    store: Option<Arc<dyn CacheStore>>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            database: ConnectionState::Connected,
            cache: Some(ConnectionState::Connected),
            failing_languages: Vec::new(),
            store: None,
        }
    }
}

impl TestAppBuilder {
    pub fn database(mut self, state: ConnectionState) -> Self {
        self.database = state;
        self
    }

    pub fn cache(mut self, state: Option<ConnectionState>) -> Self {
        self.cache = state;
        self
    }

    pub fn failing_languages(mut self, languages: &[LanguageCode]) -> Self {
        self.failing_languages = languages.to_vec();
        self
    }

    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> TestApp {
        let repo = Arc::new(InMemoryFaqs::default());
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new(&CacheConfig::default())));
        let translator = Arc::new(PrefixTranslator {
            failing: self.failing_languages,
        });
        let service = FaqService::new(
            repo.clone(),
            repo.clone(),
            store,
            TranslationService::new(translator),
            Duration::from_secs(3600),
        );
        let state = ApiState {
            faqs: Arc::new(service),
            health: HealthState {
                database: ConnectionMonitor::fixed("database", self.database),
                cache: self
                    .cache
                    .map(|state| ConnectionMonitor::fixed("cache", state)),
            },
        };
        TestApp {
            router: http::build_router(state),
            repo,
        }
    }
}

impl TestApp {
    pub fn new() -> Self {
        TestAppBuilder::default().build()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Create a FAQ through the API and return its id.
    pub async fn create(&self, question: &str, answer: &str) -> Uuid {
        let response = self
            .send(
                Method::POST,
                "/faqs",
                Some(serde_json::json!({ "question": question, "answer": answer })),
            )
            .await;
        assert_eq!(response.status(), 201, "create should succeed");
        let body = body_json(response).await;
        body["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("created id")
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
