use crate::infra::{InMemoryInterviewRepository, LoggingNotifier};
use chrono::Local;
use clap::Args;
use hr_console::config::AppConfig;
use hr_console::error::AppError;
use hr_console::workflows::interviews::{
    CandidateRef, InterviewDraft, InterviewPanel, InterviewScores, InterviewService,
    InterviewServiceError, InterviewType, Note, Recommendation, Rubric, RubricCategory,
    ScoreAggregator, ScoreEntry, ScoreSummary, Synthesis, ValidationRequest,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct RubricArgs {
    /// CSV rubric (category,key,title,weight). Defaults to HR_RUBRIC_PATH or the standard grid.
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON score sheet with `technical`, `behavioral`, and `fit` maps
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// CSV rubric overriding the configured one
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

fn resolve_rubric(path: Option<&Path>) -> Result<Rubric, AppError> {
    match path {
        Some(path) => Ok(Rubric::from_path(path)?),
        None => Ok(AppConfig::load()?.rubric.load()?),
    }
}

pub(crate) fn run_rubric_show(args: RubricArgs) -> Result<(), AppError> {
    let rubric = resolve_rubric(args.rubric.as_deref())?;

    println!("Grille d'évaluation ({} critères)", rubric.criterion_count());
    for category in RubricCategory::ordered() {
        println!(
            "\n{} (max {})",
            category.label(),
            rubric.category_max(category)
        );
        for criterion in rubric.criteria(category) {
            println!(
                "  - {:<28} poids {}  {}",
                criterion.key, criterion.weight, criterion.title
            );
        }
    }
    println!("\nScore maximal: {}", rubric.max_total());
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let rubric = resolve_rubric(args.rubric.as_deref())?;
    let raw = std::fs::read_to_string(&args.input)?;
    let scores: InterviewScores = serde_json::from_str(&raw)?;

    let aggregator = ScoreAggregator::new(rubric);
    reject_unknown_keys(&aggregator, &scores)?;
    let summary = aggregator.summarize(&scores);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_summary(&summary);
        if !aggregator.is_fully_scored(&scores) {
            println!("(grille incomplète: les critères sans note comptent 0)");
        }
    }
    Ok(())
}

fn reject_unknown_keys(
    aggregator: &ScoreAggregator,
    scores: &InterviewScores,
) -> Result<(), InterviewServiceError> {
    for category in RubricCategory::ordered() {
        if let Some(key) = aggregator
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

fn render_summary(summary: &ScoreSummary) {
    for category in RubricCategory::ordered() {
        println!(
            "{}: {} / {}",
            category.label(),
            summary.category_score(category),
            summary.category_max(category)
        );
    }
    println!(
        "Score total: {} / {} ({}%)",
        summary.total_score, summary.max_total, summary.percentage
    );
    println!(
        "Appréciation: {} [{}]",
        summary.appreciation_label,
        summary.color_tag.as_str()
    );
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let repository = Arc::new(InMemoryInterviewRepository::default());
    let notifier = Arc::new(LoggingNotifier::recording());
    let service = InterviewService::new(repository, notifier.clone(), Rubric::standard());

    println!("Interview evaluation demo");
    let record = service.create(InterviewDraft {
        candidate: CandidateRef {
            name: "Meryem Chraibi".to_string(),
            employee_id: None,
        },
        target_role: "Ingénieure études de prix".to_string(),
        interview_date: Local::now().date_naive(),
        interview_type: InterviewType::Technical,
        panel: InterviewPanel {
            principal_evaluator: "Youssef Alaoui".to_string(),
            technical_expert: Some("Nadia Tazi".to_string()),
            hr_lead: Some("Sanaa Benjelloun".to_string()),
        },
        scores: InterviewScores::default(),
        synthesis: Synthesis::default(),
    })?;
    println!("- created {} ({})", record.id, record.status.label());

    let notes: [(RubricCategory, i64); 3] = [
        (RubricCategory::Technical, 4),
        (RubricCategory::Behavioral, 3),
        (RubricCategory::Fit, 5),
    ];
    let rubric = service.rubric().clone();
    let mut latest = record;
    for (category, value) in notes {
        for criterion in rubric.criteria(category) {
            let note = Note::new(value).map_err(InterviewServiceError::from)?;
            latest = service.record_score(
                &latest.id,
                category,
                &criterion.key,
                ScoreEntry::new(note),
            )?;
        }
        let summary = service.summarize(&latest);
        println!(
            "- scored {}: {} / {} | running total {} ({}%)",
            category.label(),
            summary.category_score(category),
            summary.category_max(category),
            summary.total_score,
            summary.percentage
        );
    }
    println!("- status now {}", latest.status.label());

    service.update_synthesis(
        &latest.id,
        Synthesis {
            strengths: Some("Bonne maîtrise des métrés et des bordereaux".to_string()),
            concerns: Some("Peu d'expérience en encadrement".to_string()),
            recommendation: Some(Recommendation::Recommended),
        },
    )?;
    let validated = service.validate(
        &latest.id,
        ValidationRequest {
            reviewer: "Direction Générale".to_string(),
            comment: Some("Intégration prévue le mois prochain".to_string()),
        },
    )?;
    println!("- {} by Direction Générale", validated.status.label());

    println!("\nNotifications:");
    for notice in notifier.notices() {
        println!("  - {} for {}", notice.template, notice.interview_id);
    }

    println!();
    print!("{}", service.export(&validated.id)?.render());
    Ok(())
}
