use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{InterviewStatus, InterviewType};
use super::repository::InterviewRecord;
use super::views::InterviewListEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recent interview first.
    #[default]
    Date,
    /// Highest total first.
    Score,
    Candidate,
}

/// Search, filter, and sort options of the interview list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<InterviewStatus>,
    #[serde(default, rename = "type")]
    pub interview_type: Option<InterviewType>,
    /// Keeps interviews held within this many days of the listing date, inclusive.
    #[serde(default)]
    pub recent_days: Option<u32>,
    #[serde(default)]
    pub sort: Option<SortKey>,
}

impl ListFilter {
    pub fn matches(&self, record: &InterviewRecord, today: NaiveDate) -> bool {
        if let Some(cutoff) = self.cutoff(today) {
            if record.interview_date < cutoff {
                return false;
            }
        }

        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        if let Some(interview_type) = self.interview_type {
            if record.interview_type != interview_type {
                return false;
            }
        }

        match self.needle() {
            Some(needle) => [
                record.candidate.name.as_str(),
                record.target_role.as_str(),
                record.panel.principal_evaluator.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle)),
            None => true,
        }
    }

    pub fn sort(&self, entries: &mut [InterviewListEntry]) {
        match self.sort.unwrap_or_default() {
            SortKey::Date => entries.sort_by(|a, b| {
                b.interview_date
                    .cmp(&a.interview_date)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            SortKey::Score => entries.sort_by(|a, b| {
                b.total_score
                    .cmp(&a.total_score)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            SortKey::Candidate => entries.sort_by(|a, b| {
                a.candidate
                    .to_lowercase()
                    .cmp(&b.candidate.to_lowercase())
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
    }

    /// Earliest interview date kept by `recent_days`; none when unset or before the calendar start.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.recent_days
            .and_then(|days| today.checked_sub_days(Days::new(u64::from(days))))
    }

    fn needle(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }
}
