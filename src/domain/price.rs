// Price domain models
use chrono::NaiveDate;
use serde::Serialize;

/// Prices for one drug as `(product_code, date_string, price)` triples, in the
/// order they appeared in the source document.
///
/// Only positive, finite prices make it in; anything else is dropped at
/// construction rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceRecord {
    entries: Vec<(String, String, f64)>,
}

impl RawPriceRecord {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String, Option<f64>)>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|(product_code, date, price)| match price {
                Some(p) if p.is_finite() && p > 0.0 => Some((product_code, date, p)),
                _ => None,
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(product_code, date_string, price)` triples in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.entries
            .iter()
            .map(|(code, date, price)| (code.as_str(), date.as_str(), *price))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    product_code: String,
    date: NaiveDate,
    price: f64,
    drug_name: String,
    drug_id: String,
    is_brand: bool,
}

impl PricePoint {
    pub fn new(
        product_code: String,
        date: NaiveDate,
        price: f64,
        drug_name: String,
        drug_id: String,
        is_brand: bool,
    ) -> Self {
        Self {
            product_code,
            date,
            price,
            drug_name,
            drug_id,
            is_brand,
        }
    }

    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn drug_id(&self) -> &str {
        &self.drug_id
    }

    pub fn is_brand(&self) -> bool {
        self.is_brand
    }

    /// Same point with the price multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            price: self.price * factor,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPoint {
    pub date: NaiveDate,
    pub average_price: f64,
    pub sample_count: usize,
}

/// Brand and generic averages on a shared date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
    pub date: NaiveDate,
    pub brand_price: f64,
    pub generic_price: f64,
    pub savings: f64,
    pub savings_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_drops_non_positive_prices() {
        let record = RawPriceRecord::from_entries(vec![
            ("111".to_string(), "01/01/2024".to_string(), Some(1.5)),
            ("111".to_string(), "02/01/2024".to_string(), Some(0.0)),
            ("111".to_string(), "03/01/2024".to_string(), Some(-2.0)),
            ("222".to_string(), "01/01/2024".to_string(), None),
            ("222".to_string(), "02/01/2024".to_string(), Some(f64::NAN)),
        ]);

        let triples: Vec<_> = record.iter().collect();
        assert_eq!(triples, vec![("111", "01/01/2024", 1.5)]);
    }

    #[test]
    fn test_raw_record_keeps_entry_order() {
        let record = RawPriceRecord::from_entries(vec![
            ("222".to_string(), "02/01/2024".to_string(), Some(2.0)),
            ("111".to_string(), "01/01/2024".to_string(), Some(1.0)),
            ("222".to_string(), "01/01/2024".to_string(), Some(3.0)),
        ]);

        let codes: Vec<_> = record.iter().map(|(code, date, _)| (code, date)).collect();
        assert_eq!(
            codes,
            vec![
                ("222", "02/01/2024"),
                ("111", "01/01/2024"),
                ("222", "01/01/2024"),
            ]
        );
    }

    #[test]
    fn test_raw_record_empty() {
        let record = RawPriceRecord::from_entries(vec![(
            "111".to_string(),
            "01/01/2024".to_string(),
            None,
        )]);
        assert!(record.is_empty());
        assert!(RawPriceRecord::default().is_empty());
    }

    #[test]
    fn test_scaled_keeps_metadata() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let point = PricePoint::new(
            "111".to_string(),
            date,
            0.5,
            "Lipitor".to_string(),
            "617310".to_string(),
            true,
        );
        let monthly = point.scaled(30.0);

        assert_eq!(monthly.price(), 15.0);
        assert_eq!(monthly.date(), date);
        assert_eq!(monthly.product_code(), "111");
        assert_eq!(point.price(), 0.5);
    }
}
