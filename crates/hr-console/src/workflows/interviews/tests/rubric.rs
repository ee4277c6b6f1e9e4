use crate::workflows::interviews::domain::Note;
use crate::workflows::interviews::rubric::{
    Criterion, Rubric, RubricCategory, RubricError, MAX_CRITERION_WEIGHT,
};
use crate::workflows::interviews::scoring::{contribution, Points};

const CSV_RUBRIC: &str = "\
category,key,title,weight
technical,chiffrage,Chiffrage,5
technical,logiciels,Logiciels métier,5
comportemental,communication,Communication,4
adequation,motivation,Motivation,2
";

#[test]
fn standard_rubric_matches_published_maxima() {
    let rubric = Rubric::standard();

    assert_eq!(rubric.category_max(RubricCategory::Technical), 20);
    assert_eq!(rubric.category_max(RubricCategory::Behavioral), 12);
    assert_eq!(rubric.category_max(RubricCategory::Fit), 8);
    assert_eq!(rubric.max_total(), 40);
    assert_eq!(rubric.criterion_count(), 15);
    rubric.expect_maxima(20, 12, 8).expect("standard maxima");
}

#[test]
fn standard_rubric_passes_validation() {
    let standard = Rubric::standard();
    let rebuilt = Rubric::new(
        standard.criteria(RubricCategory::Technical).to_vec(),
        standard.criteria(RubricCategory::Behavioral).to_vec(),
        standard.criteria(RubricCategory::Fit).to_vec(),
    )
    .expect("standard rubric is valid");

    assert_eq!(rebuilt, standard);
}

#[test]
fn csv_rubric_derives_its_own_maxima() {
    let rubric = Rubric::from_csv_reader(CSV_RUBRIC.as_bytes()).expect("rubric loads");

    assert_eq!(rubric.category_max(RubricCategory::Technical), 10);
    assert_eq!(rubric.category_max(RubricCategory::Behavioral), 4);
    assert_eq!(rubric.max_total(), 16);
    assert!(rubric.criterion(RubricCategory::Fit, "motivation").is_some());

    match rubric.expect_maxima(20, 12, 8) {
        Err(RubricError::MaximumMismatch {
            category,
            declared,
            derived,
        }) => {
            assert_eq!(category, RubricCategory::Technical);
            assert_eq!(declared, 20);
            assert_eq!(derived, 10);
        }
        other => panic!("expected maximum mismatch, got {other:?}"),
    }
}

#[test]
fn csv_rubric_rejects_unknown_categories() {
    let csv = "category,key,title,weight\nlanguages,arabe,Arabe,2\n";

    match Rubric::from_csv_reader(csv.as_bytes()) {
        Err(RubricError::UnknownCategory(raw)) => assert_eq!(raw, "languages"),
        other => panic!("expected unknown category, got {other:?}"),
    }
}

#[test]
fn rubric_requires_every_category() {
    let csv = "category,key,title,weight\ntechnical,chiffrage,Chiffrage,5\nfit,motivation,Motivation,2\n";

    assert!(matches!(
        Rubric::from_csv_reader(csv.as_bytes()),
        Err(RubricError::EmptyCategory(RubricCategory::Behavioral))
    ));
}

#[test]
fn rubric_rejects_duplicates_blank_keys_and_zero_weights() {
    let fit = vec![Criterion::new("motivation", "Motivation", 2)];
    let behavioral = vec![Criterion::new("communication", "Communication", 3)];

    let duplicate = Rubric::new(
        vec![
            Criterion::new("chiffrage", "Chiffrage", 3),
            Criterion::new("chiffrage", "Chiffrage bis", 2),
        ],
        behavioral.clone(),
        fit.clone(),
    );
    assert!(matches!(duplicate, Err(RubricError::DuplicateKey { .. })));

    let zero = Rubric::new(
        vec![Criterion::new("chiffrage", "Chiffrage", 0)],
        behavioral.clone(),
        fit.clone(),
    );
    assert!(matches!(zero, Err(RubricError::ZeroWeight { .. })));

    let blank = Rubric::new(vec![Criterion::new("  ", "Sans clé", 2)], behavioral, fit);
    assert!(matches!(
        blank,
        Err(RubricError::BlankKey(RubricCategory::Technical))
    ));
}

#[test]
fn csv_rubric_rejects_oversized_weights() {
    let csv = "category,key,title,weight\n\
technical,t,T,50000000\n\
behavioral,b,B,2\n\
fit,f,F,2\n";

    match Rubric::from_csv_reader(csv.as_bytes()) {
        Err(RubricError::WeightTooLarge {
            category,
            key,
            weight,
        }) => {
            assert_eq!(category, RubricCategory::Technical);
            assert_eq!(key, "t");
            assert_eq!(weight, 50_000_000);
        }
        other => panic!("expected weight too large, got {other:?}"),
    }
}

#[test]
fn rubric_caps_the_summed_weight() {
    let technical: Vec<Criterion> = (0..101)
        .map(|index| Criterion::new(format!("c{index}"), "Critère", MAX_CRITERION_WEIGHT))
        .collect();

    let result = Rubric::new(
        technical,
        vec![Criterion::new("communication", "Communication", 3)],
        vec![Criterion::new("motivation", "Motivation", 2)],
    );

    assert!(matches!(result, Err(RubricError::TotalWeightTooLarge(10_105))));
}

#[test]
fn heaviest_accepted_rubric_scores_without_overflow() {
    let technical: Vec<Criterion> = (0..98)
        .map(|index| Criterion::new(format!("c{index}"), "Critère", MAX_CRITERION_WEIGHT))
        .collect();
    let rubric = Rubric::new(
        technical,
        vec![Criterion::new("communication", "Communication", MAX_CRITERION_WEIGHT)],
        vec![Criterion::new("motivation", "Motivation", MAX_CRITERION_WEIGHT)],
    )
    .expect("rubric at the weight limit");

    assert_eq!(rubric.max_total(), 10_000);
    assert_eq!(contribution(5, MAX_CRITERION_WEIGHT), Points::whole(100));
    assert_eq!(contribution(5, u32::MAX), Points::from_hundredths(u32::MAX));
}

#[test]
fn category_aliases_are_accepted() {
    assert_eq!(RubricCategory::parse(" Fit_To_Role "), Some(RubricCategory::Fit));
    assert_eq!(
        RubricCategory::parse("comportementaux"),
        Some(RubricCategory::Behavioral)
    );
    assert_eq!(RubricCategory::parse("technique"), Some(RubricCategory::Technical));
    assert_eq!(RubricCategory::parse("other"), None);
}

#[test]
fn rubric_view_reports_maxima() {
    let view = Rubric::standard().view();

    assert_eq!(view.max_total, 40);
    let maxima: Vec<u32> = view.categories.iter().map(|c| c.max_score).collect();
    assert_eq!(maxima, vec![20, 12, 8]);
}

#[test]
fn notes_outside_the_scale_are_rejected() {
    assert!(Note::new(-1).is_err());
    assert!(Note::new(6).is_err());
    assert_eq!(Note::new(5).map(Note::value), Ok(5));

    let parsed: Result<Note, _> = serde_json::from_str("7");
    assert!(parsed.is_err());
    let parsed: Note = serde_json::from_str("3").expect("valid note");
    assert_eq!(parsed.value(), 3);
}
