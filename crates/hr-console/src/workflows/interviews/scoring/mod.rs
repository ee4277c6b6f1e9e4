//! Interview score aggregation.
//!
//! Every surface (live preview, detail page, list rows, printable export) goes through
//! [`ScoreAggregator::summarize`], so identical score sheets always produce identical
//! totals and tiers. Scores are kept in hundredths of a point: a contribution of
//! `note * weight / 5` is always a multiple of 0.2, which makes the two-decimal rounding
//! exact instead of depending on floating point behavior.

mod tier;

pub use tier::{appreciation_tier, Appreciation, ColorTag};

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Serialize, Serializer};

use super::domain::{InterviewScores, ScoreSheet};
use super::rubric::{Criterion, Rubric, RubricCategory};

/// Score expressed in hundredths of a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(u32);

impl Points {
    pub const ZERO: Points = Points(0);

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub const fn whole(points: u32) -> Self {
        Self(points * 100)
    }

    pub const fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Self {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Weighted contribution of a single note: `note * weight / 5`.
///
/// Saturates for weights beyond what a validated [`Rubric`] accepts.
pub fn contribution(note: u8, weight: u32) -> Points {
    // note/5 * weight in hundredths is note * weight * 20
    let hundredths = u64::from(note) * u64::from(weight) * 20;
    Points(u32::try_from(hundredths).unwrap_or(u32::MAX))
}

/// Sum of contributions over the rubric's criteria. Missing entries count as zero and
/// keys absent from the rubric are ignored.
pub fn category_score(criteria: &[Criterion], scores: &ScoreSheet) -> Points {
    criteria
        .iter()
        .filter_map(|criterion| {
            scores
                .get(&criterion.key)
                .map(|entry| contribution(entry.note.value(), criterion.weight))
        })
        .sum()
}

pub fn total_score(technical: Points, behavioral: Points, fit: Points) -> Points {
    technical + behavioral + fit
}

/// `round(total / max_total * 100)` with halves rounded up, clamped to `0..=100`.
pub fn percentage(total: Points, max_total: u32) -> u8 {
    if max_total == 0 {
        return 0;
    }

    // total / max * 100 == hundredths / max
    let hundredths = u64::from(total.hundredths());
    let max = u64::from(max_total);
    let rounded = (2 * hundredths + max) / (2 * max);
    rounded.min(100) as u8
}

/// Output contract consumed by the list, detail, and export views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub technical_score: Points,
    pub behavioral_score: Points,
    pub fit_score: Points,
    pub total_score: Points,
    pub percentage: u8,
    pub appreciation: Appreciation,
    pub appreciation_label: &'static str,
    pub color_tag: ColorTag,
    pub technical_max: u32,
    pub behavioral_max: u32,
    pub fit_max: u32,
    pub max_total: u32,
}

impl ScoreSummary {
    pub fn category_score(&self, category: RubricCategory) -> Points {
        match category {
            RubricCategory::Technical => self.technical_score,
            RubricCategory::Behavioral => self.behavioral_score,
            RubricCategory::Fit => self.fit_score,
        }
    }

    pub fn category_max(&self, category: RubricCategory) -> u32 {
        match category {
            RubricCategory::Technical => self.technical_max,
            RubricCategory::Behavioral => self.behavioral_max,
            RubricCategory::Fit => self.fit_max,
        }
    }
}

/// Stateless aggregator binding the score formulas to a rubric.
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    rubric: Rubric,
}

impl ScoreAggregator {
    pub fn new(rubric: Rubric) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn category_score(&self, category: RubricCategory, scores: &InterviewScores) -> Points {
        category_score(self.rubric.criteria(category), scores.sheet(category))
    }

    pub fn summarize(&self, scores: &InterviewScores) -> ScoreSummary {
        let technical_score = self.category_score(RubricCategory::Technical, scores);
        let behavioral_score = self.category_score(RubricCategory::Behavioral, scores);
        let fit_score = self.category_score(RubricCategory::Fit, scores);
        let total = total_score(technical_score, behavioral_score, fit_score);
        let max_total = self.rubric.max_total();
        let percentage = percentage(total, max_total);
        let appreciation = appreciation_tier(percentage);

        ScoreSummary {
            technical_score,
            behavioral_score,
            fit_score,
            total_score: total,
            percentage,
            appreciation,
            appreciation_label: appreciation.label(),
            color_tag: appreciation.color(),
            technical_max: self.rubric.category_max(RubricCategory::Technical),
            behavioral_max: self.rubric.category_max(RubricCategory::Behavioral),
            fit_max: self.rubric.category_max(RubricCategory::Fit),
            max_total,
        }
    }

    /// True once every rubric criterion carries a note.
    pub fn is_fully_scored(&self, scores: &InterviewScores) -> bool {
        RubricCategory::ordered().into_iter().all(|category| {
            let sheet = scores.sheet(category);
            self.rubric
                .criteria(category)
                .iter()
                .all(|criterion| sheet.contains_key(&criterion.key))
        })
    }

    /// Keys present in a score sheet that the rubric does not define.
    pub fn unknown_keys<'a>(
        &self,
        category: RubricCategory,
        sheet: &'a ScoreSheet,
    ) -> Vec<&'a str> {
        sheet
            .keys()
            .filter(|key| self.rubric.criterion(category, key).is_none())
            .map(String::as_str)
            .collect()
    }
}
