use crate::core::{ConfigProvider, Storage};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "newsrank")]
#[command(about = "Extract and rank dominant companies from news headlines")]
pub struct CliConfig {
    /// JSON file with the article corpus (array of {title, source, ...})
    #[arg(long, default_value = "articles.json")]
    pub input: String,

    /// Fetch articles from an HTTP endpoint instead of a local file
    #[arg(long)]
    pub articles_endpoint: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Search query the corpus was built from (context only)
    #[arg(long, default_value = "")]
    pub query: String,

    #[arg(long, default_value = "10")]
    pub top_n: usize,

    /// External ML tagger endpoint; pattern-based tagging is used when
    /// absent or failing
    #[arg(long)]
    pub tagger_endpoint: Option<String>,

    /// External contextual validator endpoint (fail-open)
    #[arg(long)]
    pub validator_endpoint: Option<String>,

    /// TOML file overriding denylists, thresholds, and weights
    #[arg(long)]
    pub rules_file: Option<String>,

    #[arg(long, default_value = "20")]
    pub concurrent_requests: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process resource usage per stage")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn input_file(&self) -> &str {
        &self.input
    }

    fn articles_endpoint(&self) -> Option<&str> {
        self.articles_endpoint.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn query(&self) -> &str {
        &self.query
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn tagger_endpoint(&self) -> Option<&str> {
        self.tagger_endpoint.as_deref()
    }

    fn validator_endpoint(&self) -> Option<&str> {
        self.validator_endpoint.as_deref()
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.articles_endpoint.is_none() {
            validate_non_empty_string("input", &self.input)?;
        }
        validate_non_empty_string("output_path", &self.output_path)?;
        validate_positive_number("top_n", self.top_n, 1)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;

        if let Some(endpoint) = &self.articles_endpoint {
            validate_url("articles_endpoint", endpoint)?;
        }
        if let Some(endpoint) = &self.tagger_endpoint {
            validate_url("tagger_endpoint", endpoint)?;
        }
        if let Some(endpoint) = &self.validator_endpoint {
            validate_url("validator_endpoint", endpoint)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        // Absolute paths and explicit relative paths bypass the base dir so
        // the input corpus can live anywhere.
        let candidate = Path::new(path);
        let full_path = if candidate.is_absolute() || candidate.exists() {
            candidate.to_path_buf()
        } else {
            Path::new(&self.base_path).join(path)
        };
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
