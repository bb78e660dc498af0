// Repository trait for drug price documents
use crate::domain::drug::{DrugIndex, DrugRecord};
use async_trait::async_trait;

#[async_trait]
pub trait DrugRepository: Send + Sync {
    /// Load the index of every known drug, with prices where the index carries them
    async fn load_index(&self) -> anyhow::Result<DrugIndex>;

    /// Load one drug's price document. `Ok(None)` means no document exists.
    async fn load_drug(&self, rxcui: &str) -> anyhow::Result<Option<DrugRecord>>;
}
