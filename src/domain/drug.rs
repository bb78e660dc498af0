// Drug domain models
use super::price::{PricePoint, RawPriceRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Identity of a drug concept as carried on every price point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugMetadata {
    pub rxcui: String,
    pub name: String,
    pub is_brand: bool,
}

/// A validated per-drug price document
#[derive(Debug, Clone, PartialEq)]
pub struct DrugRecord {
    pub metadata: DrugMetadata,
    pub brand_rxcui: Option<String>,
    pub generic_rxcui: Option<String>,
    pub ingredient_name: Option<String>,
    pub manufacturer_name: Option<String>,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub prices: RawPriceRecord,
}

impl DrugRecord {
    /// The counterpart code on the other side of a brand/generic pair
    pub fn mate_rxcui(&self) -> Option<&str> {
        let own = self.metadata.rxcui.as_str();
        let mate = if self.metadata.is_brand {
            self.generic_rxcui.as_deref()
        } else {
            self.brand_rxcui.as_deref()
        };
        mate.filter(|m| *m != own && !m.is_empty())
    }
}

/// Full per-drug view handed to detail pages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugDetail {
    pub rxcui: String,
    pub friendly_name: String,
    pub full_name: String,
    pub is_brand: bool,
    pub brand_rxcui: Option<String>,
    pub generic_rxcui: Option<String>,
    pub ingredient_name: Option<String>,
    pub manufacturer_name: Option<String>,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub form_category: FormCategory,
    pub prices: Vec<PricePoint>,
}

/// Direction of a first-to-last price move using a ±1% stability band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendDirection {
    Increased,
    Decreased,
    Stable,
}

impl TrendDirection {
    pub const STABLE_BAND_PERCENT: f64 = 1.0;

    pub fn from_prices(first: f64, last: f64) -> Self {
        let percent_change = (last - first) / first * 100.0;
        if percent_change > Self::STABLE_BAND_PERCENT {
            TrendDirection::Increased
        } else if percent_change < -Self::STABLE_BAND_PERCENT {
            TrendDirection::Decreased
        } else {
            TrendDirection::Stable
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TrendDirection::Increased => "#355b75",
            TrendDirection::Decreased => "#E74C3C",
            TrendDirection::Stable => "#9a2f1f",
        }
    }
}

/// Display-ready drug for the price-drop chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugSummary {
    drug_id: String,
    name: String,
    display_color: &'static str,
    price_series: Vec<PricePoint>,
    is_highlighted: bool,
}

impl DrugSummary {
    /// Returns `None` for an empty series since there is no trend to colour.
    pub fn new(
        drug_id: String,
        name: String,
        price_series: Vec<PricePoint>,
        is_highlighted: bool,
    ) -> Option<Self> {
        let first = price_series.first()?.price();
        let last = price_series.last()?.price();
        let display_color = TrendDirection::from_prices(first, last).color();

        Some(Self {
            drug_id,
            name,
            display_color,
            price_series,
            is_highlighted,
        })
    }

    pub fn drug_id(&self) -> &str {
        &self.drug_id
    }

    pub fn display_color(&self) -> &'static str {
        self.display_color
    }

    pub fn price_series(&self) -> &[PricePoint] {
        &self.price_series
    }

    pub fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }

    pub fn latest_price(&self) -> f64 {
        self.price_series.last().map(|p| p.price()).unwrap_or(0.0)
    }
}

/// Closed set of dosage-form buckets, serialized as their display labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FormCategory {
    #[serde(rename = "Delayed/Extended Release Oral Capsules")]
    ExtendedReleaseCapsule,
    #[serde(rename = "Delayed/Extended Release Oral Tablets")]
    ExtendedReleaseTablet,
    #[serde(rename = "Oral Capsule")]
    OralCapsule,
    #[serde(rename = "Oral Tablet")]
    OralTablet,
    #[serde(rename = "Injection")]
    Injection,
    #[serde(rename = "Inhalation")]
    Inhalation,
    #[serde(rename = "Topical")]
    Topical,
    #[serde(rename = "Other")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub name: String,
    pub is_brand: bool,
    pub mate_rxcui: Option<String>,
    pub mate_name: Option<String>,
    pub ingredient_name: Option<String>,
    pub manufacturer_name: Option<String>,
    #[serde(skip)]
    pub prices: Option<RawPriceRecord>,
}

/// Lookup index keyed by drug identifier (RxCUI)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrugIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl DrugIndex {
    pub fn new(entries: BTreeMap<String, IndexEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, rxcui: &str) -> Option<&IndexEntry> {
        self.entries.get(rxcui)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First entry whose name contains `term`, ignoring case
    pub fn find_by_name(&self, term: &str) -> Option<(&str, &IndexEntry)> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.iter()
            .find(|(_, entry)| entry.name.to_lowercase().contains(&needle))
    }
}
