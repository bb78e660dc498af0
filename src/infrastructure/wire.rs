// JSON ingestion boundary - Validates source documents into domain types
use crate::domain::drug::{DrugIndex, DrugMetadata, DrugRecord, IndexEntry};
use crate::domain::error::IngestError;
use crate::domain::price::RawPriceRecord;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct WireDrugDocument {
    #[serde(rename = "RxCUI", default)]
    rxcui: Value,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "IsBrand", default)]
    is_brand: bool,
    #[serde(rename = "Brand_RxCUI", alias = "Brand_Mate_RxCUI", default)]
    brand_rxcui: Value,
    #[serde(rename = "Generic_RxCUI", alias = "Generic_Mate_RxCUI", default)]
    generic_rxcui: Value,
    #[serde(rename = "Ingredient_Name", default)]
    ingredient_name: Option<String>,
    #[serde(rename = "Manufacturer_Name", default)]
    manufacturer_name: Option<String>,
    #[serde(rename = "Strength", default)]
    strength: Option<String>,
    #[serde(rename = "Form", default)]
    form: Option<String>,
    #[serde(default)]
    prices: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct WireIndexEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_brand: bool,
    #[serde(default)]
    mate_rxcui: Value,
    #[serde(default)]
    mate_name: Option<String>,
    #[serde(default)]
    ingredient_name: Option<String>,
    #[serde(default)]
    manufacturer_name: Option<String>,
    #[serde(default)]
    prices: Option<Map<String, Value>>,
}

/// Identifiers become file names and URL segments, so only digits and ASCII
/// letters are accepted.
pub fn validate_identifier(rxcui: &str) -> Result<&str, IngestError> {
    let trimmed = rxcui.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(IngestError::InvalidIdentifier(rxcui.to_string()));
    }
    Ok(trimmed)
}

/// Codes show up both as JSON strings and as bare numbers
fn code_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn price_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// `Map` keeps document order (`preserve_order`), so same-day observations
/// stay in the order the source listed them.
fn price_record(prices: Map<String, Value>) -> RawPriceRecord {
    RawPriceRecord::from_entries(prices.into_iter().flat_map(|(code, dates)| {
        let dates = match dates {
            Value::Object(dates) => dates,
            _ => Map::new(),
        };
        dates
            .into_iter()
            .map(move |(date, value)| (code.clone(), date, price_from_value(&value)))
    }))
}

pub fn parse_drug_document(bytes: &[u8]) -> Result<DrugRecord, IngestError> {
    let wire: WireDrugDocument = serde_json::from_slice(bytes)?;

    let rxcui = code_from_value(&wire.rxcui).ok_or(IngestError::MissingField("RxCUI"))?;
    validate_identifier(&rxcui)?;
    let name = non_empty(wire.name).ok_or(IngestError::MissingField("Name"))?;

    Ok(DrugRecord {
        metadata: DrugMetadata {
            rxcui,
            name,
            is_brand: wire.is_brand,
        },
        brand_rxcui: code_from_value(&wire.brand_rxcui),
        generic_rxcui: code_from_value(&wire.generic_rxcui),
        ingredient_name: non_empty(wire.ingredient_name),
        manufacturer_name: non_empty(wire.manufacturer_name),
        strength: non_empty(wire.strength),
        form: non_empty(wire.form),
        prices: price_record(wire.prices),
    })
}

/// Parse the identifier-keyed index. Malformed entries are logged and skipped
/// so one bad row never hides the rest.
pub fn parse_drug_index(bytes: &[u8]) -> Result<DrugIndex, IngestError> {
    let raw: BTreeMap<String, Value> = serde_json::from_slice(bytes)?;

    let mut entries = BTreeMap::new();
    for (rxcui, value) in raw {
        let wire: WireIndexEntry = match serde_json::from_value(value) {
            Ok(wire) => wire,
            Err(e) => {
                tracing::warn!("Skipping malformed index entry {}: {}", rxcui, e);
                continue;
            }
        };
        let Some(name) = non_empty(wire.name) else {
            tracing::warn!("Skipping index entry {} without a name", rxcui);
            continue;
        };

        entries.insert(
            rxcui,
            IndexEntry {
                name,
                is_brand: wire.is_brand,
                mate_rxcui: code_from_value(&wire.mate_rxcui),
                mate_name: non_empty(wire.mate_name),
                ingredient_name: non_empty(wire.ingredient_name),
                manufacturer_name: non_empty(wire.manufacturer_name),
                prices: wire.prices.map(price_record),
            },
        );
    }

    Ok(DrugIndex::new(entries))
}
