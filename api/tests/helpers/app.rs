use api::{app, state::AppState};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::{Feedback, Submission, Verdict};
use db::{PersistenceError, RecordId, SqlStore, SubmissionRecord, SubmissionStore};
use marker::{Grader, MarkerError, Rubric};
use serde_json::Value;
use services::{DEFAULT_SESSION_TTL, GradingPipeline};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Grader double: marks every answer correct unless told to fail on a question.
#[derive(Default)]
pub struct FakeGrader {
    pub calls: AtomicUsize,
    pub fail_on: Mutex<Option<u8>>,
}

impl FakeGrader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Grader for FakeGrader {
    async fn grade(
        &self,
        submission: &Submission,
        rubric: &Rubric,
    ) -> Result<Vec<Feedback>, MarkerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fail_on = *self.fail_on.lock().unwrap();

        let mut feedback = Vec::new();
        for entry in rubric.entries() {
            if Some(entry.question_number) == fail_on {
                return Err(MarkerError::MalformedResponse {
                    question: entry.question_number,
                    reason: "model reply was not a JSON object".into(),
                });
            }
            let answered = submission.answer(entry.question_number).unwrap_or_default();
            feedback.push(Feedback::new(
                entry.question_number,
                Verdict::Correct,
                format!("'{answered}' 잘 설명했습니다."),
            ));
        }
        Ok(feedback)
    }
}

/// Wraps the SQL store so tests can count saves and force failures.
pub struct CountingStore {
    pub inner: SqlStore,
    pub saves: AtomicUsize,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl SubmissionStore for CountingStore {
    async fn save(&self, record: &SubmissionRecord) -> Result<RecordId, PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(PersistenceError::Rejected {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        self.inner.save(record).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub grader: Arc<FakeGrader>,
    pub store: Arc<CountingStore>,
}

pub async fn make_test_app() -> TestApp {
    make_test_app_with_session_ttl(DEFAULT_SESSION_TTL).await
}

pub async fn make_test_app_with_session_ttl(ttl: Duration) -> TestApp {
    let grader = Arc::new(FakeGrader::default());
    let store = Arc::new(CountingStore {
        inner: SqlStore::new(db::test_utils::setup_test_db().await),
        saves: AtomicUsize::new(0),
        fail: Mutex::new(false),
    });
    let pipeline = GradingPipeline::new(
        grader.clone(),
        store.clone(),
        Arc::new(Rubric::builtin()),
    );

    TestApp {
        router: app(AppState::with_session_ttl(pipeline, ttl)),
        grader,
        store,
    }
}

/// A browser stand-in: remembers the session cookie between requests.
pub struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    pub fn new(app: &TestApp) -> Self {
        Self {
            router: app.router.clone(),
            cookie: None,
        }
    }

    pub fn with_cookie(app: &TestApp, cookie: &str) -> Self {
        Self {
            router: app.router.clone(),
            cookie: Some(cookie.to_string()),
        }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        if let Some(set) = response.headers().get(header::SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
