use crate::config::rules::RulesConfig;
use crate::core::filter::{ValidatorStack, ValidityFilter};
use crate::core::scorer::InvolvementScorer;
use crate::core::tagger::{PatternTagger, TaggerStack};
use crate::domain::model::{Article, EntityRecord, RunStats};
use crate::domain::ports::{Tagger, Validator};
use std::collections::HashMap;
use std::sync::Arc;

/// Minimum headline length worth tagging; anything shorter is skipped.
const MIN_HEADLINE_LEN: usize = 10;

/// Folds per-headline extraction across the corpus into per-entity
/// aggregates. Owns the tagger, filter, scorer, and optional external
/// validator for the duration of one run.
pub struct CorpusAggregator {
    tagger: TaggerStack,
    filter: ValidityFilter,
    validator: ValidatorStack,
    scorer: InvolvementScorer,
}

impl CorpusAggregator {
    pub fn new(
        rules: &RulesConfig,
        external_tagger: Option<Arc<dyn Tagger>>,
        external_validator: Option<Arc<dyn Validator>>,
    ) -> Self {
        Self {
            tagger: TaggerStack::new(
                external_tagger,
                PatternTagger::new(rules.tagger.clone()),
            ),
            filter: ValidityFilter::new(rules.filter.clone()),
            validator: ValidatorStack::new(external_validator, rules.tagger.clone()),
            scorer: InvolvementScorer::new(rules.scorer.clone()),
        }
    }

    /// Built-in capabilities only: pattern tagger, rule-based filter.
    pub fn local(rules: &RulesConfig) -> Self {
        Self::new(rules, None, None)
    }

    pub async fn aggregate(
        &self,
        articles: &[Article],
    ) -> (HashMap<String, EntityRecord>, RunStats) {
        let mut entities: HashMap<String, EntityRecord> = HashMap::new();
        let mut stats = RunStats::default();

        for article in articles {
            let headline = article.title.trim();
            if headline.chars().count() < MIN_HEADLINE_LEN {
                stats.articles_skipped += 1;
                continue;
            }
            stats.articles_processed += 1;

            let total_words = headline.split_whitespace().count();
            let candidates = self.tagger.tag(headline).await;
            stats.candidates_tagged += candidates.len();

            for candidate in candidates {
                if !self.filter.is_valid(&candidate.text) {
                    stats.candidates_rejected += 1;
                    continue;
                }
                if !self.validator.confirm(&candidate.text, headline).await {
                    stats.candidates_rejected += 1;
                    continue;
                }

                let involvement =
                    self.scorer
                        .score(&candidate.text, headline, candidate.position, total_words);

                // Below-threshold occurrences are discarded entirely, not
                // retained with zero weight.
                if involvement < self.scorer.threshold() {
                    stats.below_threshold += 1;
                    continue;
                }

                entities
                    .entry(candidate.text)
                    .or_default()
                    .record_occurrence(involvement, headline, &article.source);
            }
        }

        tracing::debug!(
            "Aggregated {} entities from {} headlines ({} skipped, {} candidates rejected, {} below threshold)",
            entities.len(),
            stats.articles_processed,
            stats.articles_skipped,
            stats.candidates_rejected,
            stats.below_threshold
        );

        (entities, stats)
    }
}
