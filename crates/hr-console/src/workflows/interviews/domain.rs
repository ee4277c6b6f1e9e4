use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rubric::RubricCategory;

/// Identifier wrapper for interview records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InterviewId(pub String);

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rating given to a single criterion, guaranteed to sit within `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Note(u8);

impl Note {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, InvalidRating> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidRating(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Note {
    type Error = InvalidRating;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Note> for u8 {
    fn from(note: Note) -> Self {
        note.0
    }
}

/// Raised when a note falls outside the rubric's rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid rating {0}: notes must be between 0 and 5")]
pub struct InvalidRating(pub i64);

/// Evaluator input for one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub note: Note,
    #[serde(default)]
    pub observations: String,
}

impl ScoreEntry {
    pub fn new(note: Note) -> Self {
        Self {
            note,
            observations: String::new(),
        }
    }

    pub fn with_observations(note: Note, observations: impl Into<String>) -> Self {
        Self {
            note,
            observations: observations.into(),
        }
    }
}

/// Per-category mapping from criterion key to score entry.
pub type ScoreSheet = BTreeMap<String, ScoreEntry>;

/// The three score sheets attached to an interview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewScores {
    #[serde(default)]
    pub technical: ScoreSheet,
    #[serde(default)]
    pub behavioral: ScoreSheet,
    #[serde(default)]
    pub fit: ScoreSheet,
}

impl InterviewScores {
    pub fn sheet(&self, category: RubricCategory) -> &ScoreSheet {
        match category {
            RubricCategory::Technical => &self.technical,
            RubricCategory::Behavioral => &self.behavioral,
            RubricCategory::Fit => &self.fit,
        }
    }

    pub fn sheet_mut(&mut self, category: RubricCategory) -> &mut ScoreSheet {
        match category {
            RubricCategory::Technical => &mut self.technical,
            RubricCategory::Behavioral => &mut self.behavioral,
            RubricCategory::Fit => &mut self.fit,
        }
    }
}

/// Person being interviewed, optionally linked to an existing employee file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRef {
    pub name: String,
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Interviewers attending the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewPanel {
    pub principal_evaluator: String,
    #[serde(default)]
    pub technical_expert: Option<String>,
    #[serde(default)]
    pub hr_lead: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    First,
    Technical,
    Final,
}

impl InterviewType {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewType::First => "Premier entretien",
            InterviewType::Technical => "Entretien technique",
            InterviewType::Final => "Entretien final",
        }
    }
}

/// Lifecycle stage of an interview record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Complete,
    Validated,
    Rejected,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewStatus::InProgress => "En cours",
            InterviewStatus::Complete => "Complété",
            InterviewStatus::Validated => "Validé",
            InterviewStatus::Rejected => "Rejeté",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Complete => "complete",
            InterviewStatus::Validated => "validated",
            InterviewStatus::Rejected => "rejected",
        }
    }

    /// Validated and rejected records no longer accept score or synthesis edits.
    pub const fn is_locked(self) -> bool {
        matches!(self, InterviewStatus::Validated | InterviewStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StronglyRecommended,
    Recommended,
    Reserved,
    NotRecommended,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::StronglyRecommended => "Fortement recommandé",
            Recommendation::Recommended => "Recommandé",
            Recommendation::Reserved => "Avec réserve",
            Recommendation::NotRecommended => "Non recommandé",
        }
    }
}

/// Evaluator conclusions written after the scoring grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synthesis {
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub concerns: Option<String>,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
}

/// Payload used to open a new interview record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDraft {
    pub candidate: CandidateRef,
    pub target_role: String,
    pub interview_date: NaiveDate,
    pub interview_type: InterviewType,
    pub panel: InterviewPanel,
    #[serde(default)]
    pub scores: InterviewScores,
    #[serde(default)]
    pub synthesis: Synthesis,
}

/// Reviewer confirmation of a completed interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub reviewer: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Reviewer refusal of a completed interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRequest {
    pub reviewer: String,
    pub reason: String,
}
