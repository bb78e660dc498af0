// Sampler - Bounded display set with every highlighted drug kept
use crate::domain::drug::DrugSummary;

pub const DEFAULT_SAMPLE_SIZE: usize = 300;

/// Reduce `drugs` to roughly `target` entries.
///
/// Highlighted drugs are always kept, even past `target`. The remaining budget
/// is filled by taking evenly spaced entries from the rest, ordered by latest
/// price.
pub fn sample_drugs(drugs: Vec<DrugSummary>, target: usize) -> Vec<DrugSummary> {
    if drugs.len() <= target {
        return drugs;
    }

    let (mut sampled, mut rest): (Vec<DrugSummary>, Vec<DrugSummary>) =
        drugs.into_iter().partition(|d| d.is_highlighted());

    let remaining = target.saturating_sub(sampled.len());
    if remaining == 0 || rest.is_empty() {
        return sampled;
    }

    rest.sort_by(|a, b| a.latest_price().total_cmp(&b.latest_price()));

    let stride = (rest.len() / remaining).max(1);
    for drug in rest.into_iter().step_by(stride) {
        if sampled.len() >= target {
            break;
        }
        sampled.push(drug);
    }

    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn drug(id: usize, price: f64, highlighted: bool) -> DrugSummary {
        let point = PricePoint::new(
            "00001".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            price,
            format!("Drug {}", id),
            id.to_string(),
            false,
        );
        DrugSummary::new(id.to_string(), format!("Drug {}", id), vec![point], highlighted).unwrap()
    }

    fn collection(size: usize, highlighted: usize) -> Vec<DrugSummary> {
        (0..size)
            .map(|i| drug(i, ((i * 37) % 101) as f64 + 1.0, i < highlighted))
            .collect()
    }

    #[test]
    fn test_small_collection_is_identity() {
        let drugs = collection(10, 2);
        assert_eq!(sample_drugs(drugs.clone(), 300), drugs);
        assert_eq!(sample_drugs(drugs.clone(), 10), drugs);
    }

    #[test]
    fn test_sample_keeps_highlighted_and_bounds() {
        let drugs = collection(310, 5);

        let sampled = sample_drugs(drugs, 300);
        assert!(sampled.len() <= 300);
        let highlighted = sampled.iter().filter(|d| d.is_highlighted()).count();
        assert_eq!(highlighted, 5);

        let ids: HashSet<&str> = sampled.iter().map(|d| d.drug_id()).collect();
        assert_eq!(ids.len(), sampled.len());
    }

    #[test]
    fn test_highlighted_exceeding_target_are_kept() {
        let drugs = collection(20, 15);

        let sampled = sample_drugs(drugs, 10);
        assert_eq!(sampled.len(), 15);
        assert!(sampled.iter().all(|d| d.is_highlighted()));
    }

    #[test]
    fn test_stride_spreads_across_prices() {
        let drugs: Vec<DrugSummary> = (0..100).map(|i| drug(i, i as f64 + 1.0, false)).collect();

        let sampled = sample_drugs(drugs, 10);
        assert_eq!(sampled.len(), 10);
        let prices: Vec<f64> = sampled.iter().map(|d| d.latest_price()).collect();
        assert_eq!(prices[0], 1.0);
        assert_eq!(prices[1], 11.0);
        assert_eq!(prices[9], 91.0);
    }

    #[test]
    fn test_budget_larger_than_rest_does_not_stall() {
        // 3 highlighted + 4 others, target 6: 3 slots for 4 drugs, stride 1
        let drugs = collection(7, 3);

        let sampled = sample_drugs(drugs, 6);
        assert_eq!(sampled.len(), 6);
    }
}
