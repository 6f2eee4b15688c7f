use crate::utils::error::{NewsRankError, Result};
use crate::utils::validation::{validate_positive_number, validate_unit_range, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Tunable rule data for the extraction core. Defaults carry the built-in
/// denylists and weights; a partial TOML file can override any section so
/// tests can substitute small fixtures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub filter: FilterRules,
    #[serde(default)]
    pub tagger: TaggerRules,
    #[serde(default)]
    pub scorer: ScorerRules,
    #[serde(default)]
    pub ranker: RankerRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Substring match against the lowercased entity text.
    pub excluded_publishers: HashSet<String>,
    /// Exact match for single-token entities only.
    pub generic_terms: HashSet<String>,
    /// Exact match against the lowercased entity text.
    pub location_indicators: HashSet<String>,
    /// Base rule is 2; raising to 3 also drops bare 2-letter acronyms.
    pub min_entity_len: usize,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            excluded_publishers: string_set(&[
                "reuters",
                "bloomberg",
                "cnbc",
                "cnn",
                "bbc",
                "forbes",
                "techcrunch",
                "times",
                "post",
                "guardian",
                "journal",
                "news",
                "press",
                "media",
                "tribune",
                "herald",
                "gazette",
                "chronicle",
                "observer",
                "telegraph",
                "associated press",
                "ap news",
                "afp",
                "pti",
                "ani",
                "ians",
            ]),
            generic_terms: string_set(&[
                "government",
                "police",
                "court",
                "hospital",
                "university",
                "school",
                "company",
                "corporation",
                "industry",
                "market",
                "sector",
                "department",
                "ministry",
                "office",
                "bureau",
                "agency",
                "service",
                "center",
                "institute",
                "foundation",
                "trust",
                "group",
                "team",
                "committee",
                "council",
                "board",
                "commission",
                "authority",
                "people",
                "public",
                "officials",
                "sources",
                "experts",
                "analysts",
                "investors",
                "customers",
            ]),
            location_indicators: string_set(&[
                "india",
                "indian",
                "us",
                "usa",
                "uk",
                "china",
                "chinese",
                "japan",
                "america",
                "american",
                "europe",
                "european",
                "asia",
                "asian",
                "delhi",
                "mumbai",
                "bangalore",
                "london",
                "new york",
                "beijing",
                "tokyo",
                "singapore",
                "dubai",
                "california",
                "texas",
            ]),
            min_entity_len: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerRules {
    /// Lowercase tokens that extend a capitalized span even when they are
    /// not themselves capitalized ("Tata motors").
    pub company_suffixes: HashSet<String>,
    pub max_span_words: usize,
}

impl TaggerRules {
    pub fn is_suffix(&self, word: &str) -> bool {
        self.company_suffixes.contains(&word.to_lowercase())
    }
}

impl Default for TaggerRules {
    fn default() -> Self {
        Self {
            company_suffixes: string_set(&[
                "inc",
                "corp",
                "ltd",
                "llc",
                "co",
                "group",
                "holdings",
                "technologies",
                "systems",
                "solutions",
                "services",
                "industries",
                "enterprises",
                "international",
                "global",
                "motors",
                "energy",
                "pharma",
                "labs",
            ]),
            max_span_words: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerRules {
    /// Checked in list order; only the first verb present in the headline is
    /// considered.
    pub action_verbs: Vec<String>,
    /// Occurrences scoring below this are discarded entirely, not retained
    /// with zero weight.
    pub involvement_threshold: f64,
}

impl Default for ScorerRules {
    fn default() -> Self {
        Self {
            action_verbs: [
                "launches",
                "announces",
                "reports",
                "unveils",
                "introduces",
                "acquires",
                "partners",
                "expands",
                "raises",
                "files",
                "wins",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            involvement_threshold: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerRules {
    pub min_mentions: usize,
    /// Below this corpus size the mention floor relaxes to 1.
    pub small_corpus_size: usize,
    /// Coverage floor for corpora larger than `large_corpus_size`.
    pub min_coverage_large: f64,
    /// Lower absolute floor for smaller corpora.
    pub min_coverage_small: f64,
    pub large_corpus_size: usize,
    pub coverage_cap: f64,
    pub involvement_weight: f64,
    pub diversity_weight: f64,
    pub diversity_saturation: usize,
    pub consistency_weight: f64,
    pub consistency_saturation: f64,
}

impl Default for RankerRules {
    fn default() -> Self {
        Self {
            min_mentions: 2,
            small_corpus_size: 10,
            min_coverage_large: 0.005,
            min_coverage_small: 0.003,
            large_corpus_size: 100,
            coverage_cap: 30.0,
            involvement_weight: 40.0,
            diversity_weight: 20.0,
            diversity_saturation: 10,
            consistency_weight: 10.0,
            consistency_saturation: 3.0,
        }
    }
}

impl RulesConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NewsRankError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| NewsRankError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values; unknown
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for RulesConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("filter.min_entity_len", self.filter.min_entity_len, 1)?;
        validate_positive_number("tagger.max_span_words", self.tagger.max_span_words, 1)?;
        validate_unit_range(
            "scorer.involvement_threshold",
            self.scorer.involvement_threshold,
        )?;
        validate_unit_range("ranker.min_coverage_large", self.ranker.min_coverage_large)?;
        validate_unit_range("ranker.min_coverage_small", self.ranker.min_coverage_small)?;
        Ok(())
    }
}

fn string_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
