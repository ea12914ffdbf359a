//! Near-duplicate title suppression.
//!
//! News feeds surface the same story many times with lightly reworded
//! headlines ("Senate passes Ukraine aid bill" vs "Ukraine aid bill passes
//! Senate"). [`SeenTitles`] tracks the titles accepted so far within one
//! topic's pass and rejects candidates that match an accepted title either
//! exactly or by a word-order-invariant similarity score.
//!
//! Each check compares against every accepted title, so cost is linear per
//! candidate and quadratic per topic. Fine at feed scale (tens to low
//! hundreds of candidates); revisit if topics ever return thousands.

use tracing::debug;

/// Default similarity score (0-100) at or above which a title is a duplicate.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 87;

/// The titles accepted so far within one topic's collection pass.
///
/// Create a fresh scope per topic and discard it afterwards: duplicate
/// suppression during collection is deliberately per-topic, so the same
/// story may be accepted under two different topics. The collector removes
/// exact cross-topic duplicates in its final pass.
#[derive(Debug)]
pub struct SeenTitles {
    accepted: Vec<String>,
    threshold: u8,
}

impl SeenTitles {
    /// Create an empty scope with the given similarity threshold.
    pub fn new(threshold: u8) -> Self {
        Self {
            accepted: Vec::new(),
            threshold,
        }
    }

    /// Check a candidate title against the scope; accept it if it is new.
    ///
    /// Returns `true` (duplicate) when the normalized candidate exactly
    /// matches an accepted title or scores at or above the threshold against
    /// any of them. Otherwise the candidate is recorded and `false` is
    /// returned. Empty titles are never duplicates of an empty scope.
    pub fn is_duplicate(&mut self, title: &str) -> bool {
        let candidate = title.to_lowercase().trim().to_string();
        if candidate.is_empty() {
            return false;
        }

        if self.accepted.iter().any(|seen| *seen == candidate) {
            return true;
        }

        for seen in &self.accepted {
            let ratio = token_sort_ratio(&candidate, seen);
            if ratio >= self.threshold {
                debug!(%candidate, %seen, ratio, "fuzzy title match");
                return true;
            }
        }

        self.accepted.push(candidate);
        false
    }

    /// Number of titles accepted into this scope.
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Whether no titles have been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Word-order-invariant similarity between two strings on a 0-100 scale.
///
/// Both inputs are tokenized on whitespace, the tokens sorted and rejoined,
/// and the normalized Levenshtein similarity of the sorted forms scaled to
/// 0-100. Reordered but otherwise identical headlines score 100.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let ratio = strsim::normalized_levenshtein(&sort_tokens(a), &sort_tokens(b));
    (ratio * 100.0).round() as u8
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reordered_headline_scores_100() {
        assert_eq!(
            token_sort_ratio(
                "ukraine aid bill passes senate",
                "senate passes ukraine aid bill"
            ),
            100
        );
    }

    #[test]
    fn test_unrelated_headlines_score_low() {
        let ratio = token_sort_ratio("fed raises rates", "volcano erupts in iceland");
        assert!(ratio < DEFAULT_FUZZY_THRESHOLD, "ratio was {ratio}");
    }

    #[test]
    fn test_reordered_title_suppressed_in_same_scope() {
        let mut scope = SeenTitles::new(DEFAULT_FUZZY_THRESHOLD);
        assert!(!scope.is_duplicate("Ukraine aid bill passes Senate"));
        assert!(scope.is_duplicate("Senate passes Ukraine aid bill"));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_exact_match_suppressed_case_insensitively() {
        let mut scope = SeenTitles::new(DEFAULT_FUZZY_THRESHOLD);
        assert!(!scope.is_duplicate("Fed raises rates"));
        assert!(scope.is_duplicate("  FED RAISES RATES  "));
    }

    #[test]
    fn test_dissimilar_titles_all_accepted() {
        let mut scope = SeenTitles::new(DEFAULT_FUZZY_THRESHOLD);
        assert!(!scope.is_duplicate("Fed raises rates"));
        assert!(!scope.is_duplicate("Volcano erupts in Iceland"));
        assert!(!scope.is_duplicate("New trade deal signed with Japan"));
        assert_eq!(scope.len(), 3);
    }

    #[test]
    fn test_fresh_scope_forgets_previous_topic() {
        let mut economy = SeenTitles::new(DEFAULT_FUZZY_THRESHOLD);
        assert!(!economy.is_duplicate("Fed raises rates"));

        // Same exact title in a new scope (another topic) is accepted again.
        let mut inflation = SeenTitles::new(DEFAULT_FUZZY_THRESHOLD);
        assert!(!inflation.is_duplicate("Fed raises rates"));
    }

    #[test]
    fn test_empty_title_never_flagged() {
        let mut scope = SeenTitles::new(DEFAULT_FUZZY_THRESHOLD);
        assert!(!scope.is_duplicate(""));
        assert!(!scope.is_duplicate("   "));
        assert!(scope.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // With the threshold at 100 only perfect token-sorted matches count.
        let mut scope = SeenTitles::new(100);
        assert!(!scope.is_duplicate("senate passes ukraine aid bill"));
        assert!(scope.is_duplicate("ukraine aid bill passes senate"));
        assert!(!scope.is_duplicate("ukraine aid bill passes the senate"));
    }
}
