use crate::config::rules::TaggerRules;
use crate::domain::model::Candidate;
use crate::domain::ports::Tagger;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Pattern-based candidate tagger: a greedy, non-backtracking single pass
/// over the whitespace-split headline. A span starts at a capitalized token
/// and extends while the next token is capitalized or a known corporate
/// suffix, capped at `max_span_words`. Overlapping spans never occur.
#[derive(Debug, Clone)]
pub struct PatternTagger {
    rules: TaggerRules,
}

impl PatternTagger {
    pub fn new(rules: TaggerRules) -> Self {
        Self { rules }
    }

    pub fn tag_sync(&self, headline: &str) -> Vec<Candidate> {
        let words: Vec<&str> = headline.split_whitespace().collect();
        let mut candidates = Vec::new();

        let mut i = 0;
        while i < words.len() {
            if !starts_uppercase(words[i]) {
                i += 1;
                continue;
            }

            let mut end = i + 1;
            while end < words.len() && end < i + self.rules.max_span_words {
                if starts_uppercase(words[end]) || self.rules.is_suffix(words[end]) {
                    end += 1;
                } else {
                    break;
                }
            }

            candidates.push(Candidate::new(words[i..end].join(" "), i));
            i = end;
        }

        candidates
    }
}

#[async_trait]
impl Tagger for PatternTagger {
    async fn tag(&self, headline: &str) -> Result<Vec<Candidate>> {
        Ok(self.tag_sync(headline))
    }
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Composes an optional external tagger with the pattern-based fallback.
/// External failures are logged and absorbed; callers never see them.
pub struct TaggerStack {
    external: Option<Arc<dyn Tagger>>,
    fallback: PatternTagger,
}

impl TaggerStack {
    pub fn new(external: Option<Arc<dyn Tagger>>, fallback: PatternTagger) -> Self {
        Self { external, fallback }
    }

    pub fn pattern_only(rules: TaggerRules) -> Self {
        Self {
            external: None,
            fallback: PatternTagger::new(rules),
        }
    }

    pub async fn tag(&self, headline: &str) -> Vec<Candidate> {
        if let Some(external) = &self.external {
            match external.tag(headline).await {
                Ok(candidates) => return candidates,
                Err(e) => {
                    tracing::warn!("External tagger failed, using pattern fallback: {}", e);
                }
            }
        }
        self.fallback.tag_sync(headline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::NewsRankError;

    fn tagger() -> PatternTagger {
        PatternTagger::new(TaggerRules::default())
    }

    #[test]
    fn test_groups_consecutive_capitalized_tokens() {
        let candidates = tagger().tag_sync("Apple Inc unveils new iPhone model");
        assert_eq!(candidates[0], Candidate::new("Apple Inc", 0));
    }

    #[test]
    fn test_suffix_extends_span_case_insensitively() {
        let candidates = tagger().tag_sync("Shares of Tata motors surge in Mumbai");
        assert!(candidates.contains(&Candidate::new("Tata motors", 2)));
        assert!(candidates.contains(&Candidate::new("Mumbai", 6)));
    }

    #[test]
    fn test_span_capped_at_four_words() {
        let candidates = tagger().tag_sync("Alpha Beta Gamma Delta Epsilon wins");
        assert_eq!(candidates[0], Candidate::new("Alpha Beta Gamma Delta", 0));
        assert_eq!(candidates[1], Candidate::new("Epsilon", 4));
    }

    #[test]
    fn test_no_span_starts_at_lowercase_token() {
        let candidates = tagger().tag_sync("shares of inc rise again");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_positions_are_word_offsets() {
        let candidates = tagger().tag_sync("Today the markets watched Tesla closely");
        // "Today" is capitalized and emitted too; noise is the filter's job.
        assert_eq!(candidates[0], Candidate::new("Today", 0));
        assert_eq!(candidates[1], Candidate::new("Tesla", 4));
    }

    #[test]
    fn test_empty_headline() {
        assert!(tagger().tag_sync("").is_empty());
    }

    struct FailingTagger;

    #[async_trait]
    impl Tagger for FailingTagger {
        async fn tag(&self, _headline: &str) -> Result<Vec<Candidate>> {
            Err(NewsRankError::ProcessingError {
                message: "tagger offline".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_stack_falls_back_on_external_failure() {
        let stack = TaggerStack::new(
            Some(Arc::new(FailingTagger)),
            PatternTagger::new(TaggerRules::default()),
        );
        let candidates = stack.tag("Tesla unveils new factory in Texas").await;
        assert!(candidates.contains(&Candidate::new("Tesla", 0)));
    }

    struct CannedTagger(Vec<Candidate>);

    #[async_trait]
    impl Tagger for CannedTagger {
        async fn tag(&self, _headline: &str) -> Result<Vec<Candidate>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_stack_prefers_external_when_available() {
        let canned = vec![Candidate::new("OpenAI", 0)];
        let stack = TaggerStack::new(
            Some(Arc::new(CannedTagger(canned.clone()))),
            PatternTagger::new(TaggerRules::default()),
        );
        let candidates = stack.tag("OpenAI announces new model").await;
        assert_eq!(candidates, canned);
    }
}
