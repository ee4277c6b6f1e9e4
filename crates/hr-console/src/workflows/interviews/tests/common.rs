use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::interviews::domain::{
    CandidateRef, InterviewDraft, InterviewId, InterviewPanel, InterviewScores, InterviewType,
    Note, ScoreEntry, ScoreSheet, Synthesis,
};
use crate::workflows::interviews::repository::{
    replace_if_current, InterviewRecord, InterviewRepository, NotificationError,
    NotificationPublisher, RepositoryError, ReviewNotice,
};
use crate::workflows::interviews::rubric::{Rubric, RubricCategory};
use crate::workflows::interviews::{interview_router, InterviewService};

pub(super) fn note(value: i64) -> Note {
    Note::new(value).expect("note within scale")
}

/// Give every criterion of `category` the same note.
pub(super) fn uniform_sheet(rubric: &Rubric, category: RubricCategory, value: i64) -> ScoreSheet {
    rubric
        .criteria(category)
        .iter()
        .map(|criterion| (criterion.key.clone(), ScoreEntry::new(note(value))))
        .collect()
}

pub(super) fn uniform_scores(technical: i64, behavioral: i64, fit: i64) -> InterviewScores {
    let rubric = Rubric::standard();
    InterviewScores {
        technical: uniform_sheet(&rubric, RubricCategory::Technical, technical),
        behavioral: uniform_sheet(&rubric, RubricCategory::Behavioral, behavioral),
        fit: uniform_sheet(&rubric, RubricCategory::Fit, fit),
    }
}

pub(super) fn draft() -> InterviewDraft {
    InterviewDraft {
        candidate: CandidateRef {
            name: "Salma Bennani".to_string(),
            employee_id: Some("SAL-0042".to_string()),
        },
        target_role: "Ingénieure études de prix".to_string(),
        interview_date: NaiveDate::from_ymd_opt(2025, 10, 6).expect("valid date"),
        interview_type: InterviewType::Technical,
        panel: InterviewPanel {
            principal_evaluator: "Youssef Alaoui".to_string(),
            technical_expert: Some("Nadia Tazi".to_string()),
            hr_lead: None,
        },
        scores: InterviewScores::default(),
        synthesis: Synthesis::default(),
    }
}

pub(super) fn scored_draft() -> InterviewDraft {
    let mut draft = draft();
    draft.scores = uniform_scores(4, 3, 5);
    draft
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<InterviewId, InterviewRecord>>>,
}

impl InterviewRepository for MemoryRepository {
    fn insert(&self, record: InterviewRecord) -> Result<InterviewRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: InterviewRecord) -> Result<InterviewRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        replace_if_current(guard.get_mut(&record.id), record)
    }

    fn fetch(&self, id: &InterviewId) -> Result<Option<InterviewRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<InterviewRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<ReviewNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn templates(&self) -> Vec<String> {
        self.notices
            .lock()
            .expect("lock")
            .iter()
            .map(|notice| notice.template.clone())
            .collect()
    }

    pub(super) fn notices(&self) -> Vec<ReviewNotice> {
        self.notices.lock().expect("lock").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notice: ReviewNotice) -> Result<(), NotificationError> {
        self.notices.lock().expect("lock").push(notice);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl InterviewRepository for UnavailableRepository {
    fn insert(&self, _record: InterviewRecord) -> Result<InterviewRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: InterviewRecord) -> Result<InterviewRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &InterviewId) -> Result<Option<InterviewRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<InterviewRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingNotifier;

impl NotificationPublisher for FailingNotifier {
    fn publish(&self, _notice: ReviewNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay down".to_string()))
    }
}

pub(super) fn build_service() -> (
    InterviewService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = InterviewService::new(repository.clone(), notifier.clone(), Rubric::standard());
    (service, repository, notifier)
}

pub(super) fn router_with_service(
    service: InterviewService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    interview_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
