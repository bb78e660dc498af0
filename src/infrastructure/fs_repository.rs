// Filesystem repository - Reads the preprocessed JSON documents from disk
use crate::application::drug_repository::DrugRepository;
use crate::domain::drug::{DrugIndex, DrugRecord};
use crate::infrastructure::wire::{parse_drug_document, parse_drug_index, validate_identifier};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const INDEX_FILE: &str = "search_index_all.json";
pub const PRICES_DIR: &str = "prices";

#[derive(Debug, Clone)]
pub struct FsDrugRepository {
    root: PathBuf,
}

impl FsDrugRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn drug_path(&self, rxcui: &str) -> PathBuf {
        self.root.join(PRICES_DIR).join(format!("{}.json", rxcui))
    }
}

#[async_trait]
impl DrugRepository for FsDrugRepository {
    async fn load_index(&self) -> Result<DrugIndex> {
        let path = self.root.join(INDEX_FILE);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read index {}", path.display()))?;

        let index = parse_drug_index(&bytes)
            .with_context(|| format!("Failed to parse index {}", path.display()))?;
        tracing::debug!("Loaded {} index entries from {}", index.len(), path.display());
        Ok(index)
    }

    async fn load_drug(&self, rxcui: &str) -> Result<Option<DrugRecord>> {
        let rxcui = validate_identifier(rxcui)?;
        let path = self.drug_path(rxcui);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let record = parse_drug_document(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(record))
    }
}
