// Inflation projector - Actual vs inflation-adjusted price movement
use crate::domain::price::PricePoint;
use chrono::Datelike;
use serde::Serialize;

pub const DEFAULT_INFLATION_RATE: f64 = 0.03;
const DAYS_PER_YEAR: f64 = 365.25;
const PLACEHOLDER_OLD_YEAR: i32 = 2018;
const PLACEHOLDER_NEW_YEAR: i32 = 2025;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationProjection {
    pub old_price: f64,
    pub new_price: f64,
    pub old_year: i32,
    pub new_year: i32,
    pub actual_dollar_change: f64,
    pub actual_percent_change: f64,
    pub inflation_adjusted_price: f64,
    pub inflation_percent_change: f64,
    pub difference_vs_inflation_dollars: f64,
    pub difference_vs_inflation_percent: f64,
}

impl InflationProjection {
    /// Zeroed result with 2018/2025 as the reference years. Returned whenever
    /// there is nothing meaningful to project.
    pub fn placeholder() -> Self {
        Self {
            old_price: 0.0,
            new_price: 0.0,
            old_year: PLACEHOLDER_OLD_YEAR,
            new_year: PLACEHOLDER_NEW_YEAR,
            actual_dollar_change: 0.0,
            actual_percent_change: 0.0,
            inflation_adjusted_price: 0.0,
            inflation_percent_change: 0.0,
            difference_vs_inflation_dollars: 0.0,
            difference_vs_inflation_percent: 0.0,
        }
    }
}

/// Round half-up to `places` decimals
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5).floor() / factor
}

fn cents(value: f64) -> f64 {
    round_to(value, 2)
}

fn tenths(value: f64) -> f64 {
    round_to(value, 1)
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        (to - from) / from * 100.0
    } else {
        0.0
    }
}

/// Project the first price forward at `rate` per year and compare it with the
/// last observed price. `points` must already be sorted by date.
pub fn project_inflation(points: &[PricePoint], rate: f64) -> InflationProjection {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return InflationProjection::placeholder();
    };

    let old_price = first.price();
    if old_price <= 0.0 {
        return InflationProjection::placeholder();
    }
    let new_price = last.price();

    let elapsed_days = (last.date() - first.date()).num_days() as f64;
    let years = elapsed_days / DAYS_PER_YEAR;
    let inflation_adjusted_price = old_price * (1.0 + rate).powf(years);

    InflationProjection {
        old_price: cents(old_price),
        new_price: cents(new_price),
        old_year: first.date().year(),
        new_year: last.date().year(),
        actual_dollar_change: cents(new_price - old_price),
        actual_percent_change: tenths(percent_change(old_price, new_price)),
        inflation_adjusted_price: cents(inflation_adjusted_price),
        inflation_percent_change: tenths(percent_change(old_price, inflation_adjusted_price)),
        difference_vs_inflation_dollars: cents(new_price - inflation_adjusted_price),
        difference_vs_inflation_percent: tenths(percent_change(
            inflation_adjusted_price,
            new_price,
        )),
    }
}
