use crate::adapters::http::{RemoteTagger, RemoteValidator};
use crate::config::rules::RulesConfig;
use crate::core::aggregator::CorpusAggregator;
use crate::core::ranker::DominanceRanker;
use crate::core::{AnalysisResult, Article, ConfigProvider, Pipeline, RankedEntity, Storage};
use crate::domain::model::EntityRecord;
use crate::utils::error::Result;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use zip::write::{FileOptions, ZipWriter};

/// Top-level entry point: extract, score, and rank organizational entities
/// across a headline corpus using the built-in capabilities. `query` is
/// accepted for context and future use; it does not affect scoring.
pub async fn extract_top_companies(
    articles: &[Article],
    query: &str,
    top_n: usize,
) -> Vec<RankedEntity> {
    if articles.is_empty() {
        return Vec::new();
    }

    tracing::debug!(
        "Extracting top {} companies from {} articles (query: '{}')",
        top_n,
        articles.len(),
        query
    );

    let rules = RulesConfig::default();
    let aggregator = CorpusAggregator::local(&rules);
    let (entities, _) = aggregator.aggregate(articles).await;

    let mut ranked = DominanceRanker::new(rules.ranker).rank(&entities, articles.len());
    ranked.truncate(top_n);
    ranked
}

/// Per-entity detail exported alongside the leaderboard.
#[derive(Debug, Serialize)]
struct EntityDetail<'a> {
    name: &'a str,
    mentions: usize,
    headlines: &'a [String],
    sources: Vec<&'a String>,
}

/// The three-stage extraction pipeline: acquire articles, run the
/// extraction/ranking core, persist the report bundle.
pub struct ExtractionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    rules: RulesConfig,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ExtractionPipeline<S, C> {
    pub fn new(storage: S, config: C, rules: RulesConfig) -> Self {
        Self {
            storage,
            config,
            rules,
            client: Client::new(),
        }
    }

    fn build_aggregator(&self) -> CorpusAggregator {
        let tagger = self.config.tagger_endpoint().map(|endpoint| {
            Arc::new(RemoteTagger::new(
                self.client.clone(),
                endpoint.to_string(),
                self.config.concurrent_requests(),
            )) as Arc<dyn crate::core::Tagger>
        });
        let validator = self.config.validator_endpoint().map(|endpoint| {
            Arc::new(RemoteValidator::new(
                self.client.clone(),
                endpoint.to_string(),
                self.config.concurrent_requests(),
            )) as Arc<dyn crate::core::Validator>
        });
        CorpusAggregator::new(&self.rules, tagger, validator)
    }

    async fn fetch_articles(&self, endpoint: &str) -> Result<Vec<Article>> {
        tracing::debug!("Fetching articles from: {}", endpoint);
        let response = self.client.get(endpoint).send().await?;
        tracing::debug!("Articles response status: {}", response.status());

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let values: Vec<serde_json::Value> = response.json().await?;
        Ok(parse_articles(values))
    }

    async fn read_articles(&self, path: &str) -> Result<Vec<Article>> {
        let data = self.storage.read_file(path).await?;
        let values: Vec<serde_json::Value> = serde_json::from_slice(&data)?;
        Ok(parse_articles(values))
    }

    fn render_csv(ranked: &[RankedEntity]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entity in ranked {
            writer.serialize(entity)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| crate::utils::error::NewsRankError::ProcessingError {
                message: format!("CSV buffer flush failed: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| crate::utils::error::NewsRankError::ProcessingError {
            message: format!("CSV output was not UTF-8: {}", e),
        })
    }

    fn render_entity_details(
        ranked: &[RankedEntity],
        entities: &HashMap<String, EntityRecord>,
    ) -> Result<String> {
        let details: Vec<EntityDetail> = ranked
            .iter()
            .filter_map(|entity| {
                entities.get(&entity.name).map(|record| EntityDetail {
                    name: &entity.name,
                    mentions: record.mentions,
                    headlines: &record.headlines,
                    sources: {
                        let mut sources: Vec<&String> = record.sources.iter().collect();
                        sources.sort();
                        sources
                    },
                })
            })
            .collect();
        Ok(serde_json::to_string_pretty(&details)?)
    }
}

/// Malformed records are skipped, not fatal; ingestion noise must never
/// abort a run.
fn parse_articles(values: Vec<serde_json::Value>) -> Vec<Article> {
    let total = values.len();
    let articles: Vec<Article> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::warn!("Skipping malformed article record: {}", e);
                None
            }
        })
        .collect();

    if articles.len() < total {
        tracing::warn!("Dropped {} malformed article records", total - articles.len());
    }
    articles
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ExtractionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Article>> {
        let articles = if let Some(endpoint) = self.config.articles_endpoint() {
            self.fetch_articles(endpoint).await?
        } else {
            self.read_articles(self.config.input_file()).await?
        };

        tracing::info!("Loaded {} articles", articles.len());
        Ok(articles)
    }

    async fn transform(&self, articles: Vec<Article>) -> Result<AnalysisResult> {
        let total_articles = articles.len();

        if articles.is_empty() {
            return Ok(AnalysisResult {
                ranked: Vec::new(),
                total_articles: 0,
                stats: Default::default(),
                csv_output: String::new(),
                json_output: "[]".to_string(),
                entities_json: "[]".to_string(),
            });
        }

        if !self.config.query().is_empty() {
            tracing::debug!("Analysis context query: '{}'", self.config.query());
        }

        let aggregator = self.build_aggregator();
        let (entities, stats) = aggregator.aggregate(&articles).await;

        let ranker = DominanceRanker::new(self.rules.ranker.clone());
        let mut ranked = ranker.rank(&entities, total_articles);
        ranked.truncate(self.config.top_n());

        tracing::info!(
            "Ranked {} entities above the noise floor ({} aggregated)",
            ranked.len(),
            entities.len()
        );

        let csv_output = Self::render_csv(&ranked)?;
        let json_output = serde_json::to_string_pretty(&ranked)?;
        let entities_json = Self::render_entity_details(&ranked, &entities)?;

        Ok(AnalysisResult {
            ranked,
            total_articles,
            stats,
            csv_output,
            json_output,
            entities_json,
        })
    }

    async fn load(&self, result: AnalysisResult) -> Result<String> {
        let output_path = format!("{}/entity_report.zip", self.config.output_path());

        let has_details = !result.ranked.is_empty();
        tracing::debug!(
            "Creating report bundle with {} files",
            if has_details { 3 } else { 2 }
        );

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("leaderboard.csv", FileOptions::default())?;
            zip.write_all(result.csv_output.as_bytes())?;

            zip.start_file::<_, ()>("leaderboard.json", FileOptions::default())?;
            zip.write_all(result.json_output.as_bytes())?;

            if has_details {
                zip.start_file::<_, ()>("entities.json", FileOptions::default())?;
                zip.write_all(result.entities_json.as_bytes())?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing report bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file("entity_report.zip", &zip_data).await?;

        Ok(output_path)
    }
}
