//! Interview evaluation: rubric, score aggregation, record lifecycle, and views.

pub mod domain;
pub mod filter;
pub mod repository;
pub mod router;
pub mod rubric;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateRef, InterviewDraft, InterviewId, InterviewPanel, InterviewScores, InterviewStatus,
    InterviewType, InvalidRating, Note, Recommendation, RejectionRequest, ScoreEntry, ScoreSheet,
    Synthesis, ValidationRequest,
};
pub use filter::{ListFilter, SortKey};
pub use repository::{
    replace_if_current, InterviewRecord, InterviewRepository, NotificationError,
    NotificationPublisher, RepositoryError, ReviewNotice, ReviewOutcome,
};
pub use router::interview_router;
pub use rubric::{
    Criterion, Rubric, RubricCategory, RubricError, RubricView, MAX_CRITERION_WEIGHT,
    MAX_TOTAL_WEIGHT, STANDARD_MAX_TOTAL,
};
pub use scoring::{
    appreciation_tier, category_score, percentage, total_score, Appreciation, ColorTag, Points,
    ScoreAggregator, ScoreSummary,
};
pub use service::{InterviewService, InterviewServiceError};
pub use views::{ExportSheet, InterviewDetailView, InterviewListEntry, PLACEHOLDER};
