// HTTP repository - Fetches the same JSON documents from a static host
use crate::application::drug_repository::DrugRepository;
use crate::domain::drug::{DrugIndex, DrugRecord};
use crate::infrastructure::fs_repository::{INDEX_FILE, PRICES_DIR};
use crate::infrastructure::wire::{parse_drug_document, parse_drug_index, validate_identifier};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDrugRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDrugRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, INDEX_FILE)
    }

    fn drug_url(&self, rxcui: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.base_url,
            PRICES_DIR,
            urlencoding::encode(rxcui)
        )
    }

    /// `Ok(None)` on 404, error on any other non-success status
    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request to {} failed with status {}: {}", url, status, body);
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body from {}", url))?;
        Ok(Some(bytes.to_vec()))
    }
}

#[async_trait]
impl DrugRepository for HttpDrugRepository {
    async fn load_index(&self) -> Result<DrugIndex> {
        let url = self.index_url();
        let bytes = self
            .fetch(&url)
            .await?
            .with_context(|| format!("Index not found at {}", url))?;

        parse_drug_index(&bytes).with_context(|| format!("Failed to parse index from {}", url))
    }

    async fn load_drug(&self, rxcui: &str) -> Result<Option<DrugRecord>> {
        let rxcui = validate_identifier(rxcui)?;
        let url = self.drug_url(rxcui);

        let Some(bytes) = self.fetch(&url).await? else {
            return Ok(None);
        };
        let record =
            parse_drug_document(&bytes).with_context(|| format!("Failed to parse {}", url))?;
        Ok(Some(record))
    }
}
