// Drug service - Loads price documents and runs them through the pipeline
use crate::application::aggregator::{average_prices, compare_brand_generic};
use crate::application::classifier::{categorize_dosage_form, count_by_form_category, is_highlighted};
use crate::application::drug_repository::DrugRepository;
use crate::application::inflation::{project_inflation, InflationProjection};
use crate::application::normalizer::normalize_record;
use crate::application::sampler::sample_drugs;
use crate::application::summary::{summarize_index, PriceChangeSummary};
use crate::domain::drug::{DrugDetail, DrugIndex, DrugRecord, DrugSummary, FormCategory};
use crate::domain::price::{AggregatedPoint, PriceComparison};
use crate::infrastructure::config::PipelineConfig;
use anyhow::Context;
use chrono::Datelike;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;

const PROGRESS_INTERVAL: usize = 500;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandGenericComparison {
    pub brand: DrugDetail,
    pub generic: DrugDetail,
    pub brand_averages: Vec<AggregatedPoint>,
    pub generic_averages: Vec<AggregatedPoint>,
    pub comparison: Vec<PriceComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCount {
    pub category: FormCategory,
    pub count: usize,
}

#[derive(Clone)]
pub struct DrugService {
    repository: Arc<dyn DrugRepository>,
    pipeline: PipelineConfig,
}

impl DrugService {
    pub fn new(repository: Arc<dyn DrugRepository>, pipeline: PipelineConfig) -> Self {
        Self {
            repository,
            pipeline,
        }
    }

    pub async fn load_index(&self) -> anyhow::Result<DrugIndex> {
        self.repository
            .load_index()
            .await
            .context("Failed to load drug index")
    }

    /// Load details for each `(rxcui, friendly_name)` pair concurrently.
    ///
    /// Every identifier gets its own task. Missing documents and failed loads
    /// are logged and left out; they never affect the other identifiers.
    pub async fn load_drug_details(&self, requests: &[(String, String)]) -> Vec<DrugDetail> {
        let days_supply = self.pipeline.days_supply;

        let handles: Vec<_> = requests
            .iter()
            .cloned()
            .map(|(rxcui, friendly_name)| {
                let repo = self.repository.clone();
                tokio::spawn(async move {
                    match repo.load_drug(&rxcui).await {
                        Ok(Some(record)) => Some(build_detail(record, friendly_name, days_supply)),
                        Ok(None) => {
                            tracing::warn!("Price file not found for {} ({})", rxcui, friendly_name);
                            None
                        }
                        Err(e) => {
                            tracing::warn!("Failed to load drug {} ({}): {:#}", rxcui, friendly_name, e);
                            None
                        }
                    }
                })
            })
            .collect();

        futures::future::join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::warn!("Drug load task failed: {}", e);
                    None
                }
            })
            .collect()
    }

    pub async fn load_drug_detail(&self, rxcui: &str) -> Option<DrugDetail> {
        self.load_drug_details(&[(rxcui.to_string(), String::new())])
            .await
            .into_iter()
            .next()
    }

    /// Resolve each search term against the index by name, then load the matches
    pub async fn search_by_name(&self, terms: &[String]) -> anyhow::Result<Vec<DrugDetail>> {
        let index = self.load_index().await?;

        let requests: Vec<(String, String)> = terms
            .iter()
            .filter_map(|term| match index.find_by_name(term) {
                Some((rxcui, entry)) => {
                    tracing::debug!("Found match: {:?} -> {:?}", term, entry.name);
                    Some((rxcui.to_string(), term.clone()))
                }
                None => {
                    tracing::warn!("Drug matching {:?} not found in search index", term);
                    None
                }
            })
            .collect();

        Ok(self.load_drug_details(&requests).await)
    }

    /// Actual vs inflation-adjusted movement for one drug.
    ///
    /// Never fails: any load problem is logged and yields the placeholder.
    pub async fn inflation_for(&self, rxcui: &str) -> InflationProjection {
        match self.try_inflation_for(rxcui).await {
            Ok(projection) => projection,
            Err(e) => {
                tracing::error!("Error computing inflation for {}: {:#}", rxcui, e);
                InflationProjection::placeholder()
            }
        }
    }

    async fn try_inflation_for(&self, rxcui: &str) -> anyhow::Result<InflationProjection> {
        let record = self
            .repository
            .load_drug(rxcui)
            .await?
            .with_context(|| format!("No price document for {}", rxcui))?;
        let detail = build_detail(record, String::new(), self.pipeline.days_supply);
        Ok(project_inflation(&detail.prices, self.pipeline.inflation_rate))
    }

    /// Brand vs generic comparison for a drug and its cross-referenced mate.
    ///
    /// `Ok(None)` when either side is missing or the drug has no mate.
    pub async fn compare_brand_generic(
        &self,
        rxcui: &str,
    ) -> anyhow::Result<Option<BrandGenericComparison>> {
        let Some(record) = self.repository.load_drug(rxcui).await? else {
            return Ok(None);
        };
        let Some(mate_rxcui) = record.mate_rxcui().map(str::to_string) else {
            tracing::debug!("{} has no brand/generic mate", rxcui);
            return Ok(None);
        };
        let Some(mate) = self.repository.load_drug(&mate_rxcui).await? else {
            tracing::warn!("Mate {} of {} has no price document", mate_rxcui, rxcui);
            return Ok(None);
        };

        let days_supply = self.pipeline.days_supply;
        let own = build_detail(record, String::new(), days_supply);
        let other = build_detail(mate, String::new(), days_supply);
        let (brand, generic) = if own.is_brand { (own, other) } else { (other, own) };

        let brand_averages = average_prices(&brand.prices);
        let generic_averages = average_prices(&generic.prices);
        let comparison = compare_brand_generic(&brand_averages, &generic_averages);

        Ok(Some(BrandGenericComparison {
            brand,
            generic,
            brand_averages,
            generic_averages,
            comparison,
        }))
    }

    /// Every indexed drug as a chart-ready summary, sampled down for display
    pub async fn load_drop_chart(&self) -> anyhow::Result<Vec<DrugSummary>> {
        let index = self.load_index().await?;
        let min_year = self.pipeline.min_year;

        let drugs: Vec<DrugSummary> = self
            .load_all_records(&index)
            .await
            .into_iter()
            .filter_map(|(rxcui, name, record)| build_summary(rxcui, name, &record, min_year))
            .collect();

        tracing::info!("Loaded {} drugs with price data", drugs.len());
        Ok(sample_drugs(drugs, self.pipeline.sample_size))
    }

    pub async fn price_change_summary(&self) -> anyhow::Result<PriceChangeSummary> {
        let index = self.load_index().await?;
        Ok(summarize_index(&index))
    }

    /// Number of indexed drugs in each dosage-form bucket
    pub async fn form_breakdown(&self) -> anyhow::Result<Vec<FormCount>> {
        let index = self.load_index().await?;
        let records = self.load_all_records(&index).await;

        let counts = count_by_form_category(
            records
                .iter()
                .map(|(_, _, record)| record.form.as_deref().unwrap_or("")),
        );
        Ok(counts
            .into_iter()
            .map(|(category, count)| FormCount { category, count })
            .collect())
    }

    /// Load every indexed record with bounded concurrency, in index order
    async fn load_all_records(&self, index: &DrugIndex) -> Vec<(String, String, DrugRecord)> {
        let total = index.len();
        let concurrency = self.pipeline.load_concurrency.max(1);
        let entries: Vec<(String, String)> = index
            .iter()
            .map(|(rxcui, entry)| (rxcui.to_string(), entry.name.clone()))
            .collect();

        let mut loads = stream::iter(entries)
            .map(|(rxcui, name)| {
                let repo = self.repository.clone();
                async move {
                    let result = repo.load_drug(&rxcui).await;
                    (rxcui, name, result)
                }
            })
            .buffered(concurrency);

        let mut records = Vec::new();
        let mut processed = 0;
        while let Some((rxcui, name, result)) = loads.next().await {
            processed += 1;
            if processed % PROGRESS_INTERVAL == 0 {
                tracing::info!("Loading {}/{} drugs...", processed, total);
            }

            match result {
                Ok(Some(record)) => records.push((rxcui, name, record)),
                Ok(None) => tracing::debug!("No price document for {}", rxcui),
                Err(e) => tracing::warn!("Skipping {}: {:#}", rxcui, e),
            }
        }

        records
    }
}

fn build_detail(record: DrugRecord, friendly_name: String, days_supply: f64) -> DrugDetail {
    let prices = normalize_record(&record.prices, &record.metadata)
        .iter()
        .map(|p| p.scaled(days_supply))
        .collect();
    let form_category = categorize_dosage_form(record.form.as_deref().unwrap_or(""));

    DrugDetail {
        rxcui: record.metadata.rxcui,
        friendly_name,
        full_name: record.metadata.name,
        is_brand: record.metadata.is_brand,
        brand_rxcui: record.brand_rxcui,
        generic_rxcui: record.generic_rxcui,
        ingredient_name: record.ingredient_name,
        manufacturer_name: record.manufacturer_name,
        strength: record.strength,
        form: record.form,
        form_category,
        prices,
    }
}

/// `name` comes from the index and drives the highlight keyword match
fn build_summary(
    rxcui: String,
    name: String,
    record: &DrugRecord,
    min_year: i32,
) -> Option<DrugSummary> {
    let points: Vec<_> = normalize_record(&record.prices, &record.metadata)
        .into_iter()
        .filter(|p| p.date().year() >= min_year)
        .collect();
    let highlighted = is_highlighted(&name, &points);
    DrugSummary::new(rxcui, name, points, highlighted)
}
