use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One input article record. Only `title` and `source` matter to the
/// extraction core; the other fields ride along from ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

fn default_source() -> String {
    "Unknown".to_string()
}

impl Article {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            description: None,
            link: None,
            published: None,
        }
    }
}

/// A raw entity span proposed by a tagger, before any validation.
/// `position` is the zero-based word index of the span's first token within
/// the whitespace-split headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub position: usize,
}

impl Candidate {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// Per-entity aggregate accumulated across the corpus, keyed by the exact
/// entity text. Invariant: `mentions == involvement_scores.len()
/// == headlines.len()` at all times; `article_count()` is derived and never
/// stored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityRecord {
    pub mentions: usize,
    pub involvement_scores: Vec<f64>,
    pub headlines: Vec<String>,
    pub sources: HashSet<String>,
}

impl EntityRecord {
    /// Fold one qualifying occurrence into the aggregate.
    pub fn record_occurrence(&mut self, score: f64, headline: &str, source: &str) {
        self.mentions += 1;
        self.involvement_scores.push(score);
        self.headlines.push(headline.to_string());
        self.sources.insert(source.to_string());
    }

    /// Number of contributing headline entries. An entity mentioned at two
    /// positions within one headline contributes two entries; that
    /// multiplicity is part of the contract (see DESIGN.md).
    pub fn article_count(&self) -> usize {
        self.headlines.len()
    }

    pub fn avg_involvement(&self) -> f64 {
        if self.involvement_scores.is_empty() {
            return 0.0;
        }
        self.involvement_scores.iter().sum::<f64>() / self.involvement_scores.len() as f64
    }

    /// Additive merge for parallel aggregation: concatenate sequences, union
    /// sources, sum counts.
    pub fn merge(&mut self, other: EntityRecord) {
        self.mentions += other.mentions;
        self.involvement_scores.extend(other.involvement_scores);
        self.headlines.extend(other.headlines);
        self.sources.extend(other.sources);
    }
}

/// Read-only ranking projection, created fresh per ranking invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntity {
    pub rank: usize,
    pub name: String,
    pub mentions: usize,
    pub articles: usize,
    /// Percentage of the corpus covered, rounded to 2 decimals.
    pub coverage_pct: f64,
    /// Average involvement as a percentage (0-100), rounded to 1 decimal.
    pub avg_involvement: f64,
    pub sources: usize,
    pub dominance_score: f64,
    /// Constant "company" for now; placeholder for multi-category
    /// classification.
    pub entity_type: String,
}

/// Counters surfaced by one aggregation pass, for logging and reporting.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunStats {
    pub articles_processed: usize,
    pub articles_skipped: usize,
    pub candidates_tagged: usize,
    pub candidates_rejected: usize,
    pub below_threshold: usize,
}

/// Output of the transform stage: the ranked leaderboard plus serialized
/// report bodies ready for the load stage.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub ranked: Vec<RankedEntity>,
    pub total_articles: usize,
    pub stats: RunStats,
    pub csv_output: String,
    pub json_output: String,
    pub entities_json: String,
}
