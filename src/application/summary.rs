// Summary reducer - Index-wide tallies of price increases and decreases
use crate::application::normalizer::parse_price_date;
use crate::domain::drug::{DrugIndex, TrendDirection};
use crate::domain::price::RawPriceRecord;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangeSummary {
    pub increased: usize,
    pub decreased: usize,
    pub stayed_same: usize,
    pub total: usize,
    pub increased_pct: String,
    pub decreased_pct: String,
    pub stayed_same_pct: String,
    pub increased_dollars: f64,
    pub decreased_dollars: f64,
    pub stayed_same_dollars: f64,
    pub total_dollars: f64,
    pub increased_dollars_pct: String,
    pub decreased_dollars_pct: String,
    pub stayed_same_dollars_pct: String,
}

/// Earliest and latest observed prices. Ties keep the first one seen.
fn first_and_last(prices: &RawPriceRecord) -> Option<(f64, f64)> {
    let mut earliest: Option<(NaiveDate, f64)> = None;
    let mut latest: Option<(NaiveDate, f64)> = None;

    for (_, date_str, price) in prices.iter() {
        let Some(date) = parse_price_date(date_str) else {
            continue;
        };
        if earliest.is_none_or(|(d, _)| date < d) {
            earliest = Some((date, price));
        }
        if latest.is_none_or(|(d, _)| date > d) {
            latest = Some((date, price));
        }
    }

    Some((earliest?.1, latest?.1))
}

fn share(part: f64, whole: f64) -> String {
    if whole == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", part / whole * 100.0)
}

pub fn summarize_index(index: &DrugIndex) -> PriceChangeSummary {
    let mut counts = [0usize; 3];
    let mut dollars = [0f64; 3];

    for (rxcui, entry) in index.iter() {
        let Some(prices) = entry.prices.as_ref() else {
            continue;
        };
        let Some((first, last)) = first_and_last(prices) else {
            tracing::debug!("No parseable prices for {}", rxcui);
            continue;
        };

        let bucket = match TrendDirection::from_prices(first, last) {
            TrendDirection::Increased => 0,
            TrendDirection::Decreased => 1,
            TrendDirection::Stable => 2,
        };
        counts[bucket] += 1;
        dollars[bucket] += (last - first).abs();
    }

    let total = counts.iter().sum::<usize>();
    let total_dollars = dollars.iter().sum::<f64>();
    let total_f = total as f64;

    PriceChangeSummary {
        increased: counts[0],
        decreased: counts[1],
        stayed_same: counts[2],
        total,
        increased_pct: share(counts[0] as f64, total_f),
        decreased_pct: share(counts[1] as f64, total_f),
        stayed_same_pct: share(counts[2] as f64, total_f),
        increased_dollars: dollars[0],
        decreased_dollars: dollars[1],
        stayed_same_dollars: dollars[2],
        total_dollars,
        increased_dollars_pct: share(dollars[0], total_dollars),
        decreased_dollars_pct: share(dollars[1], total_dollars),
        stayed_same_dollars_pct: share(dollars[2], total_dollars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drug::IndexEntry;
    use std::collections::BTreeMap;

    fn entry(prices: &[(&str, &str, f64)]) -> IndexEntry {
        IndexEntry {
            name: "Test".to_string(),
            is_brand: false,
            mate_rxcui: None,
            mate_name: None,
            ingredient_name: None,
            manufacturer_name: None,
            prices: Some(RawPriceRecord::from_entries(
                prices
                    .iter()
                    .map(|(c, d, p)| (c.to_string(), d.to_string(), Some(*p))),
            )),
        }
    }

    fn index(entries: Vec<(&str, IndexEntry)>) -> DrugIndex {
        DrugIndex::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn pct(value: &str) -> f64 {
        value.parse().unwrap()
    }

    #[test]
    fn test_rise_and_fall() {
        let idx = index(vec![
            ("a", entry(&[("1", "01/01/2020", 10.0), ("1", "01/01/2024", 11.0)])),
            ("b", entry(&[("1", "01/01/2020", 10.0), ("2", "06/01/2024", 4.0)])),
        ]);

        let summary = summarize_index(&idx);
        assert_eq!(summary.increased, 1);
        assert_eq!(summary.decreased, 1);
        assert_eq!(summary.stayed_same, 0);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.increased_pct, "50.00");
        assert!((summary.increased_dollars - 1.0).abs() < 1e-9);
        assert!((summary.decreased_dollars - 6.0).abs() < 1e-9);

        let count_sum =
            pct(&summary.increased_pct) + pct(&summary.decreased_pct) + pct(&summary.stayed_same_pct);
        assert!((count_sum - 100.0).abs() <= 0.01);
        let dollar_sum = pct(&summary.increased_dollars_pct)
            + pct(&summary.decreased_dollars_pct)
            + pct(&summary.stayed_same_dollars_pct);
        assert!((dollar_sum - 100.0).abs() <= 0.01);
    }

    #[test]
    fn test_scans_every_product_code() {
        // The latest date lives in the second product code
        let idx = index(vec![(
            "a",
            entry(&[
                ("1", "01/01/2020", 10.0),
                ("1", "01/01/2022", 30.0),
                ("2", "01/01/2024", 10.05),
            ]),
        )]);

        let summary = summarize_index(&idx);
        assert_eq!(summary.stayed_same, 1);
        assert_eq!(summary.increased, 0);
    }

    #[test]
    fn test_date_ties_keep_first_code_in_document() {
        // "b" is listed first and is flat; "a" would read as a rise
        let json = r#"{"1": {"name": "X", "prices": {
            "b": {"01/01/2020": 10, "01/01/2024": 10},
            "a": {"01/01/2020": 5, "01/01/2024": 20}
        }}}"#;
        let idx = crate::infrastructure::wire::parse_drug_index(json.as_bytes()).unwrap();

        let summary = summarize_index(&idx);
        assert_eq!(summary.stayed_same, 1);
        assert_eq!(summary.increased, 0);
    }

    #[test]
    fn test_entries_without_prices_are_excluded() {
        let mut no_prices = entry(&[]);
        no_prices.prices = None;
        let idx = index(vec![
            ("a", no_prices),
            ("b", entry(&[("1", "garbage", 5.0)])),
        ]);

        let summary = summarize_index(&idx);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.increased_pct, "0.00");
        assert_eq!(summary.stayed_same_dollars_pct, "0.00");
    }

    #[test]
    fn test_zero_dollar_movement_shares() {
        let idx = index(vec![(
            "a",
            entry(&[("1", "01/01/2020", 10.0), ("1", "01/01/2024", 10.0)]),
        )]);

        let summary = summarize_index(&idx);
        assert_eq!(summary.stayed_same_pct, "100.00");
        assert_eq!(summary.total_dollars, 0.0);
        assert_eq!(summary.stayed_same_dollars_pct, "0.00");
    }
}
