use crate::config::rules::ScorerRules;

/// Estimates whether an entity is a headline's main actor (1.0) or an
/// incidental mention (0.0) from four weighted structural signals.
#[derive(Debug, Clone)]
pub struct InvolvementScorer {
    rules: ScorerRules,
}

impl InvolvementScorer {
    pub fn new(rules: ScorerRules) -> Self {
        Self { rules }
    }

    pub fn threshold(&self) -> f64 {
        self.rules.involvement_threshold
    }

    pub fn score(&self, entity: &str, headline: &str, position: usize, total_words: usize) -> f64 {
        let mut score: f64 = 0.0;
        let entity_lower = entity.to_lowercase();
        let headline_lower = headline.to_lowercase();

        // Factor 1 (max 0.3): main actors are introduced early
        let position_ratio = position as f64 / total_words.max(1) as f64;
        if position_ratio <= 0.4 {
            score += 0.3;
        } else if position_ratio <= 0.6 {
            score += 0.15;
        }

        // Factor 2 (max 0.4): entity is the subject, appearing before the
        // action verb. Only the first verb present counts.
        let headline_words: Vec<&str> = headline_lower.split_whitespace().collect();
        let entity_words: Vec<&str> = entity_lower.split_whitespace().collect();

        for verb in &self.rules.action_verbs {
            if let Some(verb_pos) = headline_words.iter().position(|w| *w == verb.as_str()) {
                let subject = entity_words.iter().any(|ent_word| {
                    headline_words
                        .iter()
                        .position(|w| w == ent_word)
                        .is_some_and(|ent_pos| ent_pos < verb_pos)
                });
                if subject {
                    score += 0.4;
                }
                break;
            }
        }

        // Factor 3 (+0.2 / -0.2): possessive or attribution beats a
        // citation-only mention; the branches are mutually exclusive.
        if headline_lower.contains(&format!("{}'s", entity_lower))
            || headline_lower.contains(&format!("{} said", entity_lower))
        {
            score += 0.2;
        } else if let Some((_, after)) = headline_lower.split_once("according to") {
            if after.contains(&entity_lower) {
                score -= 0.2;
            }
        }

        // Factor 4 (max 0.1): standalone mention, not part of a list
        if headline_lower.matches(&entity_lower).count() == 1 {
            score += 0.1;
        }

        score.clamp(0.0, 1.0)
    }
}
