// Aggregator - Per-date averages across product codes
use crate::domain::price::{AggregatedPoint, PriceComparison, PricePoint};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Average every price that shares a calendar day.
///
/// Output has one entry per distinct date, ascending.
pub fn average_prices(points: &[PricePoint]) -> Vec<AggregatedPoint> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for point in points {
        by_date.entry(point.date()).or_default().push(point.price());
    }

    by_date
        .into_iter()
        .map(|(date, prices)| AggregatedPoint {
            date,
            average_price: prices.iter().sum::<f64>() / prices.len() as f64,
            sample_count: prices.len(),
        })
        .collect()
}

/// Join brand and generic averages on the dates both series cover
pub fn compare_brand_generic(
    brand: &[AggregatedPoint],
    generic: &[AggregatedPoint],
) -> Vec<PriceComparison> {
    let generic_by_date: BTreeMap<NaiveDate, f64> = generic
        .iter()
        .map(|p| (p.date, p.average_price))
        .collect();

    brand
        .iter()
        .filter_map(|b| {
            let generic_price = *generic_by_date.get(&b.date)?;
            let savings = b.average_price - generic_price;
            let savings_percent = if b.average_price > 0.0 {
                savings / b.average_price * 100.0
            } else {
                0.0
            };
            Some(PriceComparison {
                date: b.date,
                brand_price: b.average_price,
                generic_price,
                savings,
                savings_percent,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::normalizer::normalize_record;
    use crate::infrastructure::wire::parse_drug_document;

    fn point(code: &str, month: u32, day: u32, price: f64) -> PricePoint {
        PricePoint::new(
            code.to_string(),
            NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
            price,
            "Test".to_string(),
            "1".to_string(),
            false,
        )
    }

    fn aggregated(day: u32, price: f64) -> AggregatedPoint {
        AggregatedPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            average_price: price,
            sample_count: 1,
        }
    }

    #[test]
    fn test_average_per_date() {
        let points = vec![
            point("a", 1, 1, 10.0),
            point("b", 1, 1, 20.0),
            point("a", 2, 1, 7.0),
        ];

        let averages = average_prices(&points);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].average_price, 15.0);
        assert_eq!(averages[0].sample_count, 2);
        assert_eq!(averages[1].average_price, 7.0);
        assert_eq!(averages[1].sample_count, 1);
    }

    #[test]
    fn test_average_output_is_sorted() {
        let points = vec![point("a", 5, 1, 1.0), point("a", 1, 1, 2.0), point("a", 3, 1, 3.0)];

        let averages = average_prices(&points);
        let dates: Vec<_> = averages.iter().map(|a| a.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_average_empty() {
        assert!(average_prices(&[]).is_empty());
    }

    #[test]
    fn test_normalize_then_average_is_repeatable() {
        let json = r#"{
            "RxCUI": "617310",
            "Name": "atorvastatin 20 MG Oral Tablet",
            "prices": {
                "c": {"01/01/2024": 0.3, "2024-02-01": 0.7},
                "a": {"01/01/2024": 0.1},
                "b": {"2024-01-01": 0.2, "bad": 1.0}
            }
        }"#;

        let run = || {
            let record = parse_drug_document(json.as_bytes()).unwrap();
            let points = normalize_record(&record.prices, &record.metadata);
            serde_json::to_string(&average_prices(&points)).unwrap()
        };

        let first = run();
        assert_eq!(first, run());
        assert!(first.contains(r#""sampleCount":3"#));
    }

    #[test]
    fn test_compare_joins_shared_dates() {
        let brand = vec![aggregated(1, 200.0), aggregated(2, 210.0), aggregated(3, 220.0)];
        let generic = vec![aggregated(2, 21.0), aggregated(3, 22.0), aggregated(4, 23.0)];

        let comparison = compare_brand_generic(&brand, &generic);
        assert_eq!(comparison.len(), 2);
        assert_eq!(comparison[0].brand_price, 210.0);
        assert_eq!(comparison[0].generic_price, 21.0);
        assert_eq!(comparison[0].savings, 189.0);
        assert!((comparison[0].savings_percent - 90.0).abs() < 1e-9);
    }
}
