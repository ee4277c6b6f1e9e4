use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{InterviewId, InterviewStatus, InterviewType};
use super::repository::{InterviewRecord, ReviewOutcome};
use super::rubric::RubricCategory;
use super::scoring::{contribution, Points, ScoreAggregator, ScoreSummary};

/// Shown wherever an optional field has no value.
pub const PLACEHOLDER: &str = "---";

fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// One row of the interview list screen.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewListEntry {
    pub id: InterviewId,
    pub candidate: String,
    pub target_role: String,
    pub interview_date: NaiveDate,
    pub interview_type: InterviewType,
    pub interview_type_label: &'static str,
    pub status: InterviewStatus,
    pub status_label: &'static str,
    pub principal_evaluator: String,
    pub total_score: Points,
    pub percentage: u8,
    pub appreciation_label: &'static str,
    pub color_tag: &'static str,
    pub recommendation_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub principal_evaluator: String,
    pub technical_expert: String,
    pub hr_lead: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CriterionRow {
    pub key: String,
    pub title: String,
    pub weight: u32,
    pub note: Option<u8>,
    pub contribution: String,
    pub observations: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySection {
    pub category: RubricCategory,
    pub label: &'static str,
    pub score: Points,
    pub max_score: u32,
    pub rows: Vec<CriterionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub outcome: &'static str,
    pub reviewer: String,
    pub note: String,
    pub at: String,
}

/// Detail page payload; the export sheet is rendered from the same structure.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewDetailView {
    pub id: InterviewId,
    pub candidate: String,
    pub employee_id: String,
    pub target_role: String,
    pub interview_date: NaiveDate,
    pub interview_type_label: &'static str,
    pub status: InterviewStatus,
    pub status_label: &'static str,
    pub panel: PanelView,
    pub sections: Vec<CategorySection>,
    pub summary: ScoreSummary,
    pub strengths: String,
    pub concerns: String,
    pub recommendation_label: String,
    pub review: Option<ReviewView>,
}

impl InterviewRecord {
    pub fn list_entry(&self, aggregator: &ScoreAggregator) -> InterviewListEntry {
        let summary = aggregator.summarize(&self.scores);
        InterviewListEntry {
            id: self.id.clone(),
            candidate: self.candidate.name.clone(),
            target_role: self.target_role.clone(),
            interview_date: self.interview_date,
            interview_type: self.interview_type,
            interview_type_label: self.interview_type.label(),
            status: self.status,
            status_label: self.status.label(),
            principal_evaluator: self.panel.principal_evaluator.clone(),
            total_score: summary.total_score,
            percentage: summary.percentage,
            appreciation_label: summary.appreciation_label,
            color_tag: summary.color_tag.as_str(),
            recommendation_label: or_placeholder(
                self.synthesis.recommendation.map(|value| value.label()),
            ),
        }
    }

    pub fn detail_view(&self, aggregator: &ScoreAggregator) -> InterviewDetailView {
        let summary = aggregator.summarize(&self.scores);
        let rubric = aggregator.rubric();

        let sections = RubricCategory::ordered()
            .into_iter()
            .map(|category| {
                let sheet = self.scores.sheet(category);
                let rows = rubric
                    .criteria(category)
                    .iter()
                    .map(|criterion| {
                        let entry = sheet.get(&criterion.key);
                        let note = entry.map(|entry| entry.note.value());
                        CriterionRow {
                            key: criterion.key.clone(),
                            title: criterion.title.clone(),
                            weight: criterion.weight,
                            note,
                            contribution: contribution(note.unwrap_or(0), criterion.weight)
                                .to_string(),
                            observations: or_placeholder(
                                entry.map(|entry| entry.observations.as_str()),
                            ),
                        }
                    })
                    .collect();

                CategorySection {
                    category,
                    label: category.label(),
                    score: summary.category_score(category),
                    max_score: summary.category_max(category),
                    rows,
                }
            })
            .collect();

        let review = self.review.as_ref().map(|review| match review {
            ReviewOutcome::Validated {
                reviewer,
                comment,
                at,
            } => ReviewView {
                outcome: "validated",
                reviewer: reviewer.clone(),
                note: or_placeholder(comment.as_deref()),
                at: at.format("%d/%m/%Y %H:%M").to_string(),
            },
            ReviewOutcome::Rejected {
                reviewer,
                reason,
                at,
            } => ReviewView {
                outcome: "rejected",
                reviewer: reviewer.clone(),
                note: or_placeholder(Some(reason.as_str())),
                at: at.format("%d/%m/%Y %H:%M").to_string(),
            },
        });

        InterviewDetailView {
            id: self.id.clone(),
            candidate: self.candidate.name.clone(),
            employee_id: or_placeholder(self.candidate.employee_id.as_deref()),
            target_role: self.target_role.clone(),
            interview_date: self.interview_date,
            interview_type_label: self.interview_type.label(),
            status: self.status,
            status_label: self.status.label(),
            panel: PanelView {
                principal_evaluator: self.panel.principal_evaluator.clone(),
                technical_expert: or_placeholder(self.panel.technical_expert.as_deref()),
                hr_lead: or_placeholder(self.panel.hr_lead.as_deref()),
            },
            sections,
            summary,
            strengths: or_placeholder(self.synthesis.strengths.as_deref()),
            concerns: or_placeholder(self.synthesis.concerns.as_deref()),
            recommendation_label: or_placeholder(
                self.synthesis.recommendation.map(|value| value.label()),
            ),
            review,
        }
    }
}

/// Printable evaluation sheet.
#[derive(Debug, Clone)]
pub struct ExportSheet {
    detail: InterviewDetailView,
}

impl ExportSheet {
    pub fn new(detail: InterviewDetailView) -> Self {
        Self { detail }
    }

    pub fn detail(&self) -> &InterviewDetailView {
        &self.detail
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExportSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = &self.detail;

        writeln!(f, "FICHE D'ÉVALUATION D'ENTRETIEN")?;
        writeln!(f, "Référence: {}", detail.id)?;
        writeln!(f, "Candidat: {} ({})", detail.candidate, detail.employee_id)?;
        writeln!(f, "Poste visé: {}", detail.target_role)?;
        writeln!(
            f,
            "Date: {} | {} | Statut: {}",
            detail.interview_date.format("%d/%m/%Y"),
            detail.interview_type_label,
            detail.status_label
        )?;
        writeln!(f, "Évaluateur principal: {}", detail.panel.principal_evaluator)?;
        writeln!(f, "Expert technique: {}", detail.panel.technical_expert)?;
        writeln!(f, "Responsable RH: {}", detail.panel.hr_lead)?;

        for section in &detail.sections {
            writeln!(
                f,
                "\n{} ({} / {})",
                section.label, section.score, section.max_score
            )?;
            for row in &section.rows {
                write!(f, "- {} (poids {}): ", row.title, row.weight)?;
                match row.note {
                    Some(note) => write!(f, "{note}/5")?,
                    None => f.write_str(PLACEHOLDER)?,
                }
                writeln!(f, " -> {} | {}", row.contribution, row.observations)?;
            }
        }

        let summary = &detail.summary;
        writeln!(
            f,
            "\nScore total: {} / {} ({}%)",
            summary.total_score, summary.max_total, summary.percentage
        )?;
        writeln!(
            f,
            "Appréciation: {} [{}]",
            summary.appreciation_label,
            summary.color_tag.as_str()
        )?;
        writeln!(f, "\nPoints forts: {}", detail.strengths)?;
        writeln!(f, "Points de vigilance: {}", detail.concerns)?;
        writeln!(f, "Recommandation: {}", detail.recommendation_label)?;

        if let Some(review) = &detail.review {
            writeln!(
                f,
                "\nDécision: {} par {} le {} ({})",
                review.outcome, review.reviewer, review.at, review.note
            )?;
        }
        Ok(())
    }
}
