use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{
    InterviewDraft, InterviewId, InterviewScores, InterviewStatus, InvalidRating,
    RejectionRequest, ScoreEntry, Synthesis, ValidationRequest,
};
use super::filter::ListFilter;
use super::repository::{
    InterviewRecord, InterviewRepository, NotificationError, NotificationPublisher,
    RepositoryError, ReviewNotice, ReviewOutcome,
};
use super::rubric::{Rubric, RubricCategory};
use super::scoring::{ScoreAggregator, ScoreSummary};
use super::views::{ExportSheet, InterviewDetailView, InterviewListEntry};

/// Service composing the repository, notification hook, and score aggregator.
pub struct InterviewService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    aggregator: Arc<ScoreAggregator>,
}

static INTERVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

const UPDATE_ATTEMPTS: u32 = 3;

fn next_interview_id() -> InterviewId {
    let id = INTERVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InterviewId(format!("int-{id:06}"))
}

fn require(field: &str, value: &str) -> Result<(), InterviewServiceError> {
    if value.trim().is_empty() {
        Err(InterviewServiceError::InvalidInput(format!(
            "{field} must not be blank"
        )))
    } else {
        Ok(())
    }
}

fn ensure_editable(record: &InterviewRecord) -> Result<(), InterviewServiceError> {
    if record.status.is_locked() {
        return Err(InterviewServiceError::Locked {
            id: record.id.clone(),
            status: record.status.code(),
        });
    }
    Ok(())
}

fn ensure_reviewable(
    record: &InterviewRecord,
    action: &'static str,
) -> Result<(), InterviewServiceError> {
    if record.status != InterviewStatus::Complete {
        return Err(InterviewServiceError::InvalidTransition {
            id: record.id.clone(),
            action,
            status: record.status.code(),
        });
    }
    Ok(())
}

impl<R, N> InterviewService<R, N>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, rubric: Rubric) -> Self {
        Self {
            repository,
            notifier,
            aggregator: Arc::new(ScoreAggregator::new(rubric)),
        }
    }

    pub fn rubric(&self) -> &Rubric {
        self.aggregator.rubric()
    }

    pub fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    /// Open a new interview record.
    pub fn create(&self, draft: InterviewDraft) -> Result<InterviewRecord, InterviewServiceError> {
        require("candidate name", &draft.candidate.name)?;
        require("target role", &draft.target_role)?;
        require("principal evaluator", &draft.panel.principal_evaluator)?;
        self.check_keys(&draft.scores)?;

        let now = Utc::now();
        let mut record = InterviewRecord {
            id: next_interview_id(),
            candidate: draft.candidate,
            target_role: draft.target_role,
            interview_date: draft.interview_date,
            interview_type: draft.interview_type,
            panel: draft.panel,
            status: InterviewStatus::InProgress,
            scores: draft.scores,
            synthesis: draft.synthesis,
            review: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        };
        let completed = self.refresh_status(&mut record);

        let stored = self.repository.insert(record)?;
        info!(interview = %stored.id, status = stored.status.code(), "interview created");

        if completed {
            self.notify_pending_validation(&stored)?;
        }
        Ok(stored)
    }

    /// Record or replace the score of one criterion.
    pub fn record_score(
        &self,
        id: &InterviewId,
        category: RubricCategory,
        key: &str,
        entry: ScoreEntry,
    ) -> Result<InterviewRecord, InterviewServiceError> {
        if self.rubric().criterion(category, key).is_none() {
            return Err(InterviewServiceError::UnknownCriterion {
                category,
                key: key.to_string(),
            });
        }

        let note = entry.note.value();
        let (record, completed) = self.modify(id, |record| {
            ensure_editable(record)?;
            record
                .scores
                .sheet_mut(category)
                .insert(key.to_string(), entry.clone());
            record.updated_at = Utc::now();
            Ok(self.refresh_status(record))
        })?;
        debug!(interview = %record.id, %category, key, note, "score recorded");

        if completed {
            self.notify_pending_validation(&record)?;
        }
        Ok(record)
    }

    /// Replace the evaluator's synthesis.
    pub fn update_synthesis(
        &self,
        id: &InterviewId,
        synthesis: Synthesis,
    ) -> Result<InterviewRecord, InterviewServiceError> {
        let (record, ()) = self.modify(id, |record| {
            ensure_editable(record)?;
            record.synthesis = synthesis.clone();
            record.updated_at = Utc::now();
            Ok(())
        })?;
        Ok(record)
    }

    /// Confirm a complete interview. Scores become immutable afterwards.
    ///
    /// The decision is stored before the notice is published: a notification failure is
    /// reported to the caller while the interview stays validated.
    pub fn validate(
        &self,
        id: &InterviewId,
        request: ValidationRequest,
    ) -> Result<InterviewRecord, InterviewServiceError> {
        require("reviewer", &request.reviewer)?;
        let (record, ()) = self.modify(id, |record| {
            ensure_reviewable(record, "validate")?;
            let now = Utc::now();
            record.status = InterviewStatus::Validated;
            record.review = Some(ReviewOutcome::Validated {
                reviewer: request.reviewer.clone(),
                comment: request.comment.clone(),
                at: now,
            });
            record.updated_at = now;
            Ok(())
        })?;
        info!(interview = %record.id, "interview validated");

        let summary = self.aggregator.summarize(&record.scores);
        let mut details = BTreeMap::new();
        details.insert("reviewer".to_string(), request.reviewer);
        details.insert("total_score".to_string(), summary.total_score.to_string());
        details.insert(
            "appreciation".to_string(),
            summary.appreciation_label.to_string(),
        );
        self.notifier.publish(ReviewNotice {
            template: "interview_validated".to_string(),
            interview_id: record.id.clone(),
            details,
        })?;

        Ok(record)
    }

    /// Refuse a complete interview with a mandatory reason.
    ///
    /// Like [`Self::validate`], the decision is stored before the notice is published.
    pub fn reject(
        &self,
        id: &InterviewId,
        request: RejectionRequest,
    ) -> Result<InterviewRecord, InterviewServiceError> {
        require("reviewer", &request.reviewer)?;
        require("rejection reason", &request.reason)?;
        let (record, ()) = self.modify(id, |record| {
            ensure_reviewable(record, "reject")?;
            let now = Utc::now();
            record.status = InterviewStatus::Rejected;
            record.review = Some(ReviewOutcome::Rejected {
                reviewer: request.reviewer.clone(),
                reason: request.reason.clone(),
                at: now,
            });
            record.updated_at = now;
            Ok(())
        })?;
        info!(interview = %record.id, "interview rejected");

        let mut details = BTreeMap::new();
        details.insert("reviewer".to_string(), request.reviewer);
        details.insert("reason".to_string(), request.reason);
        self.notifier.publish(ReviewNotice {
            template: "interview_rejected".to_string(),
            interview_id: record.id.clone(),
            details,
        })?;

        Ok(record)
    }

    pub fn get(&self, id: &InterviewId) -> Result<InterviewRecord, InterviewServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| InterviewServiceError::NotFound(id.clone()))
    }

    pub fn list(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<InterviewListEntry>, InterviewServiceError> {
        let today = Utc::now().date_naive();
        let mut entries: Vec<InterviewListEntry> = self
            .repository
            .all()?
            .iter()
            .filter(|record| filter.matches(record, today))
            .map(|record| record.list_entry(&self.aggregator))
            .collect();
        filter.sort(&mut entries);
        Ok(entries)
    }

    pub fn detail(&self, id: &InterviewId) -> Result<InterviewDetailView, InterviewServiceError> {
        let record = self.get(id)?;
        Ok(record.detail_view(&self.aggregator))
    }

    pub fn export(&self, id: &InterviewId) -> Result<ExportSheet, InterviewServiceError> {
        self.detail(id).map(ExportSheet::new)
    }

    /// Live running total for a score sheet that has not been saved yet.
    pub fn preview(&self, scores: &InterviewScores) -> ScoreSummary {
        self.aggregator.summarize(scores)
    }

    pub fn summarize(&self, record: &InterviewRecord) -> ScoreSummary {
        self.aggregator.summarize(&record.scores)
    }

    fn check_keys(&self, scores: &InterviewScores) -> Result<(), InterviewServiceError> {
        for category in RubricCategory::ordered() {
            if let Some(key) = self
                .aggregator
                .unknown_keys(category, scores.sheet(category))
                .first()
            {
                return Err(InterviewServiceError::UnknownCriterion {
                    category,
                    key: (*key).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns true when the record has just become complete.
    fn refresh_status(&self, record: &mut InterviewRecord) -> bool {
        let scored = self.aggregator.is_fully_scored(&record.scores);
        let before = record.status;
        record.status = if scored {
            InterviewStatus::Complete
        } else {
            InterviewStatus::InProgress
        };
        before != InterviewStatus::Complete && record.status == InterviewStatus::Complete
    }

    /// Fetch, change and store a record as one step. A concurrent writer makes the update
    /// conflict; the change is then re-applied to the fresh record, which re-runs the
    /// lifecycle checks inside `apply`.
    fn modify<T, F>(
        &self,
        id: &InterviewId,
        mut apply: F,
    ) -> Result<(InterviewRecord, T), InterviewServiceError>
    where
        F: FnMut(&mut InterviewRecord) -> Result<T, InterviewServiceError>,
    {
        let mut attempt = 1;
        loop {
            let mut record = self.get(id)?;
            let outcome = apply(&mut record)?;
            match self.repository.update(record) {
                Ok(stored) => return Ok((stored, outcome)),
                Err(RepositoryError::Conflict) if attempt < UPDATE_ATTEMPTS => {
                    debug!(interview = %id, attempt, "concurrent update, retrying");
                    attempt += 1;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    fn notify_pending_validation(
        &self,
        record: &InterviewRecord,
    ) -> Result<(), InterviewServiceError> {
        let summary = self.aggregator.summarize(&record.scores);
        let mut details = BTreeMap::new();
        details.insert("candidate".to_string(), record.candidate.name.clone());
        details.insert("target_role".to_string(), record.target_role.clone());
        details.insert("percentage".to_string(), summary.percentage.to_string());
        self.notifier.publish(ReviewNotice {
            template: "interview_pending_validation".to_string(),
            interview_id: record.id.clone(),
            details,
        })?;
        Ok(())
    }
}

/// Error raised by the interview service.
#[derive(Debug, thiserror::Error)]
pub enum InterviewServiceError {
    #[error("invalid interview: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Rating(#[from] InvalidRating),
    #[error("criterion '{key}' is not part of the {category} rubric")]
    UnknownCriterion {
        category: RubricCategory,
        key: String,
    },
    #[error("interview {0} not found")]
    NotFound(InterviewId),
    #[error("interview {id} is {status} and can no longer be edited")]
    Locked { id: InterviewId, status: &'static str },
    #[error("cannot {action} interview {id} while it is {status}")]
    InvalidTransition {
        id: InterviewId,
        action: &'static str,
        status: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
