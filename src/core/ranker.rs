use crate::config::rules::RankerRules;
use crate::domain::model::{EntityRecord, RankedEntity};
use std::collections::HashMap;

/// Ranks entities by dominance rather than raw frequency: a weighted
/// composite of corpus coverage, average involvement, source diversity, and
/// mention consistency, after a noise floor drops entities without enough
/// signal.
#[derive(Debug, Clone)]
pub struct DominanceRanker {
    rules: RankerRules,
}

impl DominanceRanker {
    pub fn new(rules: RankerRules) -> Self {
        Self { rules }
    }

    pub fn rank(
        &self,
        entities: &HashMap<String, EntityRecord>,
        total_articles: usize,
    ) -> Vec<RankedEntity> {
        let mut ranked: Vec<RankedEntity> = entities
            .iter()
            .filter_map(|(name, record)| self.score_entity(name, record, total_articles))
            .collect();

        // Descending by dominance; ties broken by name ascending so the
        // ordering is deterministic regardless of map iteration order.
        ranked.sort_by(|a, b| {
            b.dominance_score
                .partial_cmp(&a.dominance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        for (i, entity) in ranked.iter_mut().enumerate() {
            entity.rank = i + 1;
        }

        ranked
    }

    fn score_entity(
        &self,
        name: &str,
        record: &EntityRecord,
        total_articles: usize,
    ) -> Option<RankedEntity> {
        let mentions = record.mentions;
        let article_count = record.article_count();

        // Noise floor: tiny corpora relax the mention minimum to 1.
        let min_mentions = if total_articles < self.rules.small_corpus_size {
            1
        } else {
            self.rules.min_mentions
        };
        if mentions < min_mentions {
            return None;
        }

        let coverage_ratio = article_count as f64 / total_articles.max(1) as f64;
        let min_coverage = if total_articles > self.rules.large_corpus_size {
            self.rules.min_coverage_large
        } else {
            self.rules.min_coverage_small
        };
        if coverage_ratio < min_coverage {
            return None;
        }

        let coverage_score = (coverage_ratio * 100.0).min(self.rules.coverage_cap);

        let avg_involvement = record.avg_involvement();
        let involvement_score = avg_involvement * self.rules.involvement_weight;

        let diversity_score = (record.sources.len() as f64
            / self.rules.diversity_saturation as f64)
            .min(1.0)
            * self.rules.diversity_weight;

        let consistency = mentions as f64 / article_count.max(1) as f64;
        let consistency_score =
            (consistency / self.rules.consistency_saturation).min(1.0) * self.rules.consistency_weight;

        let dominance_score =
            coverage_score + involvement_score + diversity_score + consistency_score;

        Some(RankedEntity {
            rank: 0, // assigned after the sort
            name: name.to_string(),
            mentions,
            articles: article_count,
            coverage_pct: round2(coverage_ratio * 100.0),
            avg_involvement: round1(avg_involvement * 100.0),
            sources: record.sources.len(),
            dominance_score: round2(dominance_score),
            entity_type: "company".to_string(),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
