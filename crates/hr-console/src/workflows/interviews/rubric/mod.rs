//! Rubric configuration shared by every scoring surface.
//!
//! Category maxima are never declared on their own: they are the sum of the criterion
//! weights, so a rubric change moves the maxima with it. Deployments that need to pin the
//! historical 20/12/8 split can check it with [`Rubric::expect_maxima`].

mod parser;

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum total of the standard rubric.
pub const STANDARD_MAX_TOTAL: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricCategory {
    Technical,
    Behavioral,
    Fit,
}

impl RubricCategory {
    pub const fn ordered() -> [RubricCategory; 3] {
        [
            RubricCategory::Technical,
            RubricCategory::Behavioral,
            RubricCategory::Fit,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            RubricCategory::Technical => "Compétences techniques",
            RubricCategory::Behavioral => "Compétences comportementales",
            RubricCategory::Fit => "Adéquation au poste",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            RubricCategory::Technical => "technical",
            RubricCategory::Behavioral => "behavioral",
            RubricCategory::Fit => "fit",
        }
    }

    /// Parse a category code, accepting the aliases used by older exports.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "technical" | "technique" | "techniques" => Some(RubricCategory::Technical),
            "behavioral" | "behavioural" | "comportemental" | "comportementaux" => {
                Some(RubricCategory::Behavioral)
            }
            "fit" | "fit_to_role" | "adequation" => Some(RubricCategory::Fit),
            _ => None,
        }
    }
}

impl std::fmt::Display for RubricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Named evaluation criterion and its weight within its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub key: String,
    pub title: String,
    pub weight: u32,
}

impl Criterion {
    pub fn new(key: impl Into<String>, title: impl Into<String>, weight: u32) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            weight,
        }
    }
}

/// Largest weight a single criterion may carry.
pub const MAX_CRITERION_WEIGHT: u32 = 100;
/// Largest sum of weights over the three categories.
pub const MAX_TOTAL_WEIGHT: u32 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    #[error("rubric category {0} has no criteria")]
    EmptyCategory(RubricCategory),
    #[error("criterion '{key}' in {category} must have a weight of at least 1")]
    ZeroWeight { category: RubricCategory, key: String },
    #[error("criterion '{key}' in {category} has weight {weight}, above the limit of {}", MAX_CRITERION_WEIGHT)]
    WeightTooLarge {
        category: RubricCategory,
        key: String,
        weight: u32,
    },
    #[error("rubric weights add up to {0}, above the limit of {}", MAX_TOTAL_WEIGHT)]
    TotalWeightTooLarge(u64),
    #[error("criterion '{key}' appears more than once in {category}")]
    DuplicateKey { category: RubricCategory, key: String },
    #[error("a criterion in {0} has a blank key")]
    BlankKey(RubricCategory),
    #[error("unknown rubric category '{0}'")]
    UnknownCategory(String),
    #[error("{category} maximum is {derived} but {declared} was expected")]
    MaximumMismatch {
        category: RubricCategory,
        declared: u32,
        derived: u32,
    },
    #[error("failed to read rubric file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rubric csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Validated rubric: three non-empty categories of uniquely keyed criteria with bounded weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rubric {
    technical: Vec<Criterion>,
    behavioral: Vec<Criterion>,
    fit: Vec<Criterion>,
}

impl Rubric {
    pub fn new(
        technical: Vec<Criterion>,
        behavioral: Vec<Criterion>,
        fit: Vec<Criterion>,
    ) -> Result<Self, RubricError> {
        let rubric = Self {
            technical,
            behavioral,
            fit,
        };

        let mut total_weight: u64 = 0;
        for category in RubricCategory::ordered() {
            let criteria = rubric.criteria(category);
            if criteria.is_empty() {
                return Err(RubricError::EmptyCategory(category));
            }

            let mut seen = HashSet::new();
            for criterion in criteria {
                if criterion.key.trim().is_empty() {
                    return Err(RubricError::BlankKey(category));
                }
                if criterion.weight == 0 {
                    return Err(RubricError::ZeroWeight {
                        category,
                        key: criterion.key.clone(),
                    });
                }
                if criterion.weight > MAX_CRITERION_WEIGHT {
                    return Err(RubricError::WeightTooLarge {
                        category,
                        key: criterion.key.clone(),
                        weight: criterion.weight,
                    });
                }
                total_weight += u64::from(criterion.weight);
                if !seen.insert(criterion.key.as_str()) {
                    return Err(RubricError::DuplicateKey {
                        category,
                        key: criterion.key.clone(),
                    });
                }
            }
        }

        if total_weight > u64::from(MAX_TOTAL_WEIGHT) {
            return Err(RubricError::TotalWeightTooLarge(total_weight));
        }

        Ok(rubric)
    }

    /// The grid used for every interview unless a deployment overrides it.
    pub fn standard() -> Self {
        Self {
            technical: vec![
                Criterion::new("formation_certifications", "Formation et Certifications", 3),
                Criterion::new("maitrise_logiciels", "Maîtrise des Logiciels Métier", 4),
                Criterion::new("expertise_technique", "Expertise Technique", 4),
                Criterion::new("connaissance_marche", "Connaissance Marché Public", 3),
                Criterion::new("gestion_projets", "Gestion de Projets", 3),
                Criterion::new("innovation_veille", "Innovation et Veille Technique", 3),
            ],
            behavioral: vec![
                Criterion::new("communication_redaction", "Communication et Rédaction", 3),
                Criterion::new("travail_equipe", "Travail en Équipe", 2),
                Criterion::new("rigueur_precision", "Rigueur et Précision", 3),
                Criterion::new("gestion_stress", "Gestion du Stress", 2),
                Criterion::new("autonomie_initiative", "Autonomie et Initiative", 2),
            ],
            fit: vec![
                Criterion::new("motivation_engagement", "Motivation et Engagement", 2),
                Criterion::new("disponibilite_mobilite", "Disponibilité et Mobilité", 2),
                Criterion::new("potentiel_evolution", "Potentiel Évolution", 2),
                Criterion::new("connaissance_entreprise", "Connaissance de l'Entreprise", 2),
            ],
        }
    }

    /// Load a rubric from a CSV export with `category,key,title,weight` columns.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, RubricError> {
        let rows = parser::parse_rows(reader)?;
        let mut technical = Vec::new();
        let mut behavioral = Vec::new();
        let mut fit = Vec::new();

        for row in rows {
            let category = RubricCategory::parse(&row.category)
                .ok_or_else(|| RubricError::UnknownCategory(row.category.clone()))?;
            let criterion = Criterion::new(row.key, row.title, row.weight);
            match category {
                RubricCategory::Technical => technical.push(criterion),
                RubricCategory::Behavioral => behavioral.push(criterion),
                RubricCategory::Fit => fit.push(criterion),
            }
        }

        Self::new(technical, behavioral, fit)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RubricError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn criteria(&self, category: RubricCategory) -> &[Criterion] {
        match category {
            RubricCategory::Technical => &self.technical,
            RubricCategory::Behavioral => &self.behavioral,
            RubricCategory::Fit => &self.fit,
        }
    }

    pub fn criterion(&self, category: RubricCategory, key: &str) -> Option<&Criterion> {
        self.criteria(category)
            .iter()
            .find(|criterion| criterion.key == key)
    }

    pub fn category_max(&self, category: RubricCategory) -> u32 {
        self.criteria(category)
            .iter()
            .map(|criterion| criterion.weight)
            .sum()
    }

    pub fn max_total(&self) -> u32 {
        RubricCategory::ordered()
            .into_iter()
            .map(|category| self.category_max(category))
            .sum()
    }

    pub fn criterion_count(&self) -> usize {
        RubricCategory::ordered()
            .into_iter()
            .map(|category| self.criteria(category).len())
            .sum()
    }

    /// Check the derived maxima against the values a deployment expects.
    pub fn expect_maxima(&self, technical: u32, behavioral: u32, fit: u32) -> Result<(), RubricError> {
        let declared = [
            (RubricCategory::Technical, technical),
            (RubricCategory::Behavioral, behavioral),
            (RubricCategory::Fit, fit),
        ];

        for (category, declared) in declared {
            let derived = self.category_max(category);
            if derived != declared {
                return Err(RubricError::MaximumMismatch {
                    category,
                    declared,
                    derived,
                });
            }
        }

        Ok(())
    }

    pub fn view(&self) -> RubricView {
        let categories = RubricCategory::ordered()
            .into_iter()
            .map(|category| RubricCategoryView {
                category,
                label: category.label(),
                max_score: self.category_max(category),
                criteria: self.criteria(category).to_vec(),
            })
            .collect();

        RubricView {
            categories,
            max_total: self.max_total(),
        }
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rubric payload enriched with derived maxima for display.
#[derive(Debug, Clone, Serialize)]
pub struct RubricView {
    pub categories: Vec<RubricCategoryView>,
    pub max_total: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RubricCategoryView {
    pub category: RubricCategory,
    pub label: &'static str,
    pub max_score: u32,
    pub criteria: Vec<Criterion>,
}
