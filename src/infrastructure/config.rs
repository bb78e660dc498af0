use serde::Deserialize;

use crate::application::inflation::DEFAULT_INFLATION_RATE;
use crate::application::sampler::DEFAULT_SAMPLE_SIZE;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub data: DataSettings,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Fs,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub source: DataSourceKind,
    /// Root holding `search_index_all.json` and `prices/`
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,
    /// Observations before this year are left off the drop chart
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    /// Per-unit prices are multiplied by this to give a monthly cost
    #[serde(default = "default_days_supply")]
    pub days_supply: f64,
    #[serde(default = "default_load_concurrency")]
    pub load_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            inflation_rate: default_inflation_rate(),
            min_year: default_min_year(),
            days_supply: default_days_supply(),
            load_concurrency: default_load_concurrency(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_inflation_rate() -> f64 {
    DEFAULT_INFLATION_RATE
}

fn default_min_year() -> i32 {
    2017
}

fn default_days_supply() -> f64 {
    30.0
}

fn default_load_concurrency() -> usize {
    32
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
