use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration for selecting which pages a run covers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugFilterConfig {
    /// Regex patterns for slugs to include (if empty, all slugs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for slugs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Slug filter built from include/exclude regex patterns
#[derive(Debug, Default)]
pub struct SlugFilter {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl SlugFilter {
    /// Create a new slug filter from configuration
    pub fn new(config: &SlugFilterConfig) -> Result<Self, regex::Error> {
        // Compile regex patterns
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a page should be part of the run
    pub fn admits(&self, slug: &str) -> bool {
        // Check regex exclusions (these take precedence)
        if self.exclude_regexes.iter().any(|r| r.is_match(slug)) {
            ::log::debug!("Slug filter excluded: {}", slug);
            return false;
        }

        // If include patterns are specified, at least one must match
        if !self.include_regexes.is_empty() && !self.include_regexes.iter().any(|r| r.is_match(slug))
        {
            ::log::debug!("Slug filter did not include: {}", slug);
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_admits_everything() {
        let filter = SlugFilter::default();
        assert!(filter.admits("faq"));
        assert!(filter.admits("fight-speeding-ticket-calgary"));
    }

    #[test]
    fn test_regex_patterns() {
        let config = SlugFilterConfig {
            include_patterns: vec![r"^fight-.*-ticket-".to_string()],
            exclude_patterns: vec![r"-draft$".to_string()],
        };
        let filter = SlugFilter::new(&config).unwrap();

        // Matching include pattern should be admitted
        assert!(filter.admits("fight-speeding-ticket-calgary"));

        // Non-matching include pattern should be excluded
        assert!(!filter.admits("how-it-works"));

        // Matching exclude pattern should be excluded even if it matches include
        assert!(!filter.admits("fight-speeding-ticket-calgary-draft"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = SlugFilterConfig {
            include_patterns: vec!["(".to_string()],
            exclude_patterns: Vec::new(),
        };
        assert!(SlugFilter::new(&config).is_err());
    }
}
