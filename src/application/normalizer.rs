// Record normalizer - Flattens nested price records into sorted price points
use crate::domain::drug::DrugMetadata;
use crate::domain::price::{PricePoint, RawPriceRecord};
use chrono::NaiveDate;

/// Parse a source date in either `MM/DD/YYYY` or `YYYY-MM-DD` form.
///
/// Anything else, including impossible calendar dates, yields `None`.
pub fn parse_price_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();

    if trimmed.contains('/') {
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() != 3 {
            return None;
        }
        let month: u32 = parts[0].trim().parse().ok()?;
        let day: u32 = parts[1].trim().parse().ok()?;
        let year: i32 = parts[2].trim().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    // ISO dates sometimes carry a time component; only the day matters
    let day_part = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Flatten a raw record into price points sorted ascending by date.
///
/// Triples with unparseable dates are skipped. The sort is stable, so points
/// sharing a date keep the record's iteration order.
pub fn normalize_record(record: &RawPriceRecord, metadata: &DrugMetadata) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = record
        .iter()
        .filter_map(|(product_code, date_str, price)| {
            let date = parse_price_date(date_str)?;
            Some(PricePoint::new(
                product_code.to_string(),
                date,
                price,
                metadata.name.clone(),
                metadata.rxcui.clone(),
                metadata.is_brand,
            ))
        })
        .collect();

    points.sort_by_key(|p| p.date());
    points
}
