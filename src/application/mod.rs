// Application layer - Price pipeline and the services that feed it
pub mod aggregator;
pub mod classifier;
pub mod drug_repository;
pub mod drug_service;
pub mod inflation;
pub mod normalizer;
pub mod sampler;
pub mod summary;
