// Classifier - Highlight decisions and dosage-form buckets
use crate::domain::drug::FormCategory;
use crate::domain::price::PricePoint;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Brand names that make a drug a highlight candidate
pub const HIGHLIGHT_KEYWORDS: [&str; 32] = [
    "Asmanex",
    "Advair",
    "Symbicort",
    "Humalog",
    "Humalin",
    "Novalog",
    "Cialis",
    "Victoza",
    "Diclegis",
    "Focalin",
    "Latisse",
    "Kloxxado",
    "Maxidex",
    "Lamictal",
    "Levemir",
    "Lantus",
    "Lastacaft",
    "Klor",
    "Procrit",
    "Nascobal",
    "Pred",
    "Narcan",
    "Novolog",
    "Novolin",
    "Olopatadine",
    "Pradaxa",
    "Pataday",
    "Prozac",
    "Protonix",
    "Pylera",
    "Vigamox",
    "Valtrex",
];

const BASELINE_YEAR: i32 = 2023;
const COMPARISON_YEAR: i32 = 2024;
/// Year-over-year drop (as a fraction) a candidate must exceed
const HIGHLIGHT_DROP_THRESHOLD: f64 = -0.5;

pub fn matches_highlight_keyword(name: &str) -> bool {
    let lower = name.to_lowercase();
    HIGHLIGHT_KEYWORDS.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        lower.starts_with(&keyword) || lower.contains(&keyword)
    })
}

fn year_mean(points: &[PricePoint], year: i32) -> Option<f64> {
    let prices: Vec<f64> = points
        .iter()
        .filter(|p| p.date().year() == year)
        .map(|p| p.price())
        .collect();
    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// A keyword match is necessary but not sufficient: the 2024 mean must also
/// sit more than 50% below the 2023 mean.
pub fn is_highlighted(name: &str, points: &[PricePoint]) -> bool {
    if !matches_highlight_keyword(name) {
        return false;
    }

    let (Some(baseline), Some(comparison)) = (
        year_mean(points, BASELINE_YEAR),
        year_mean(points, COMPARISON_YEAR),
    ) else {
        return false;
    };

    if baseline <= 0.0 {
        return false;
    }
    (comparison - baseline) / baseline < HIGHLIGHT_DROP_THRESHOLD
}

/// Bucket a free-text dosage form. Rules are checked in priority order and the
/// first match wins.
pub fn categorize_dosage_form(form: &str) -> FormCategory {
    if form.is_empty() || form == "Unknown" {
        return FormCategory::Other;
    }

    let lower = form.to_lowercase();
    let has = |term: &str| lower.contains(term);
    let release_modified = has("delayed") || has("extended");

    if has("capsule") && release_modified {
        return FormCategory::ExtendedReleaseCapsule;
    }
    if has("tablet") && release_modified {
        return FormCategory::ExtendedReleaseTablet;
    }
    if form == "Oral Capsule" {
        return FormCategory::OralCapsule;
    }
    if form == "Oral Tablet" {
        return FormCategory::OralTablet;
    }
    if has("inject") || has("syringe") || has("cartridge") {
        return FormCategory::Injection;
    }
    if has("inhal") {
        return FormCategory::Inhalation;
    }

    let included = ["topical", "cream", "paste", "gel"].iter().any(|t| has(*t));
    let excluded = ["oral", "nasal", "rectal", "vaginal"].iter().any(|t| has(*t));
    if included && !excluded {
        return FormCategory::Topical;
    }

    FormCategory::Other
}

pub fn count_by_form_category<'a, I>(forms: I) -> BTreeMap<FormCategory, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for form in forms {
        *counts.entry(categorize_dosage_form(form)).or_insert(0) += 1;
    }
    counts
}
