use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    CandidateRef, InterviewId, InterviewPanel, InterviewScores, InterviewStatus, InterviewType,
    Synthesis,
};

/// Stored interview. Scores are kept raw; totals and tiers are derived on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: InterviewId,
    pub candidate: CandidateRef,
    pub target_role: String,
    pub interview_date: NaiveDate,
    pub interview_type: InterviewType,
    pub panel: InterviewPanel,
    pub status: InterviewStatus,
    pub scores: InterviewScores,
    pub synthesis: Synthesis,
    pub review: Option<ReviewOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by the repository on every successful update.
    #[serde(default)]
    pub revision: u64,
}

/// Trail left by the reviewer who closed the interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReviewOutcome {
    Validated {
        reviewer: String,
        comment: Option<String>,
        at: DateTime<Utc>,
    },
    Rejected {
        reviewer: String,
        reason: String,
        at: DateTime<Utc>,
    },
}

/// Storage abstraction so the service can run against memory or a database.
///
/// `update` is a compare-and-swap: it succeeds only while the stored revision still equals
/// `record.revision`, stores the record with the next revision and returns it. A stale
/// record yields [`RepositoryError::Conflict`].
pub trait InterviewRepository: Send + Sync {
    fn insert(&self, record: InterviewRecord) -> Result<InterviewRecord, RepositoryError>;
    fn update(&self, record: InterviewRecord) -> Result<InterviewRecord, RepositoryError>;
    fn fetch(&self, id: &InterviewId) -> Result<Option<InterviewRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<InterviewRecord>, RepositoryError>;
}

/// `update` semantics for adapters holding records in memory: replace `stored` with `record`
/// when the revisions match, bumping the revision.
pub fn replace_if_current(
    stored: Option<&mut InterviewRecord>,
    mut record: InterviewRecord,
) -> Result<InterviewRecord, RepositoryError> {
    let stored = stored.ok_or(RepositoryError::NotFound)?;
    if stored.revision != record.revision {
        return Err(RepositoryError::Conflict);
    }
    record.revision += 1;
    *stored = record.clone();
    Ok(record)
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists or was changed concurrently")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook used to tell reviewers and HR about lifecycle changes.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: ReviewNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewNotice {
    pub template: String,
    pub interview_id: InterviewId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
