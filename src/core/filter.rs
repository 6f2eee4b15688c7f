use crate::config::rules::{FilterRules, TaggerRules};
use crate::domain::ports::Validator;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Rule-based company-name validation. Pure and deterministic: lookups are
/// case-insensitive, the proper-noun check is case-sensitive. Denylists are
/// injected at construction so tests can substitute small fixtures.
#[derive(Debug, Clone)]
pub struct ValidityFilter {
    rules: FilterRules,
    numeric_pattern: Regex,
}

impl ValidityFilter {
    pub fn new(rules: FilterRules) -> Self {
        Self {
            rules,
            numeric_pattern: Regex::new(r"^[\d\s\-/]+$").unwrap(),
        }
    }

    /// Applies the reject rules in order; all must pass to accept.
    pub fn is_valid(&self, entity: &str) -> bool {
        let entity = entity.trim();
        let entity_lower = entity.to_lowercase();

        // Rule 1: publishers and news outlets, substring match
        if self
            .rules
            .excluded_publishers
            .iter()
            .any(|pub_name| entity_lower.contains(pub_name))
        {
            return false;
        }

        // Rule 2: single-token generic institution nouns
        if !entity_lower.contains(' ') && self.rules.generic_terms.contains(&entity_lower) {
            return false;
        }

        // Rule 3: locations, countries, demonyms
        if self.rules.location_indicators.contains(&entity_lower) {
            return false;
        }

        // Rule 4: must be a proper noun
        if !entity.chars().next().is_some_and(|c| c.is_uppercase()) {
            return false;
        }

        // Rule 5: minimum length
        if entity.chars().count() < self.rules.min_entity_len {
            return false;
        }

        // Rule 6: bare acronym without disambiguating context
        if is_all_uppercase(entity) && entity.chars().count() < 3 {
            return false;
        }

        // Rule 7: digits, spaces, hyphens, slashes only
        if self.numeric_pattern.is_match(entity) {
            return false;
        }

        true
    }
}

fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase()) && !text.chars().any(|c| c.is_lowercase())
}

/// Optional second-stage contextual validation. Entities that are obviously
/// companies (more than two words and a known corporate suffix) skip the
/// external call; everything else goes through the capability with the
/// verdict cached per (entity, headline) pair.
pub struct ValidatorStack {
    external: Option<Arc<dyn Validator>>,
    suffixes: TaggerRules,
    cache: Mutex<HashMap<(String, String), bool>>,
}

impl ValidatorStack {
    pub fn new(external: Option<Arc<dyn Validator>>, suffixes: TaggerRules) -> Self {
        Self {
            external,
            suffixes,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn confirm(&self, entity: &str, headline: &str) -> bool {
        let Some(external) = &self.external else {
            return true;
        };

        if self.obviously_company(entity) {
            return true;
        }

        let key = (entity.to_string(), headline.to_string());
        {
            let cache = self.cache.lock().await;
            if let Some(&verdict) = cache.get(&key) {
                return verdict;
            }
        }

        let verdict = external.validate(entity, headline).await;
        self.cache.lock().await.insert(key, verdict);
        verdict
    }

    fn obviously_company(&self, entity: &str) -> bool {
        let words: Vec<&str> = entity.split_whitespace().collect();
        words.len() > 2 && words.iter().any(|w| self.suffixes.is_suffix(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn filter() -> ValidityFilter {
        ValidityFilter::new(FilterRules::default())
    }

    #[test]
    fn test_rejects_publishers() {
        assert!(!filter().is_valid("Reuters"));
        assert!(!filter().is_valid("The Washington Post"));
        assert!(!filter().is_valid("Bloomberg Intelligence"));
    }

    #[test]
    fn test_rejects_single_token_generic_terms() {
        assert!(!filter().is_valid("Government"));
        assert!(!filter().is_valid("Company"));
        // Generic term embedded in a longer name is fine
        assert!(filter().is_valid("Tata Group"));
    }

    #[test]
    fn test_rejects_locations() {
        assert!(!filter().is_valid("India"));
        assert!(!filter().is_valid("New York"));
    }

    #[test]
    fn test_rejects_non_proper_nouns() {
        assert!(!filter().is_valid("apple"));
        assert!(!filter().is_valid("us"));
    }

    #[test]
    fn test_rejects_short_acronyms() {
        assert!(!filter().is_valid("AI"));
        assert!(!filter().is_valid("X"));
        assert!(filter().is_valid("IBM"));
    }

    #[test]
    fn test_rejects_numeric_strings() {
        assert!(!filter().is_valid("12-34"));
        assert!(!filter().is_valid("2024/25"));
    }

    #[test]
    fn test_accepts_company_names() {
        assert!(filter().is_valid("Apple Inc"));
        assert!(filter().is_valid("OpenAI"));
        assert!(filter().is_valid("Tesla"));
    }

    #[test]
    fn test_stricter_min_length_drops_two_letter_names() {
        let rules = FilterRules {
            min_entity_len: 3,
            ..FilterRules::default()
        };
        let filter = ValidityFilter::new(rules);
        assert!(!filter.is_valid("Go"));
        assert!(filter.is_valid("IBM"));
    }

    struct CountingValidator {
        calls: AtomicUsize,
        verdict: bool,
    }

    #[async_trait]
    impl Validator for CountingValidator {
        async fn validate(&self, _entity: &str, _headline: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict
        }
    }

    #[tokio::test]
    async fn test_stack_without_external_accepts() {
        let stack = ValidatorStack::new(None, TaggerRules::default());
        assert!(stack.confirm("Anything", "Anything at all today").await);
    }

    #[tokio::test]
    async fn test_stack_caches_by_entity_and_headline() {
        let validator = Arc::new(CountingValidator {
            calls: AtomicUsize::new(0),
            verdict: false,
        });
        let stack = ValidatorStack::new(Some(validator.clone()), TaggerRules::default());

        assert!(!stack.confirm("Acme", "Acme does a thing").await);
        assert!(!stack.confirm("Acme", "Acme does a thing").await);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);

        // Different headline is a different cache key
        assert!(!stack.confirm("Acme", "Another headline about Acme").await);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stack_skips_external_for_obvious_companies() {
        let validator = Arc::new(CountingValidator {
            calls: AtomicUsize::new(0),
            verdict: false,
        });
        let stack = ValidatorStack::new(Some(validator.clone()), TaggerRules::default());

        // More than two words and carries a corporate suffix
        assert!(stack.confirm("Acme Widget Corp", "Acme Widget Corp wins").await);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }
}
