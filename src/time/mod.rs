//! Hebrew time-expression extraction.
//!
//! Text flows one way: the rule recognizers and the external fallback each
//! produce candidates, the two streams are merged, and a fixed policy picks
//! one canonical `HH:MM` value (or reports no match).
//!
//! ```
//! use shaon::time::extract_best_time;
//!
//! assert_eq!(extract_best_time("שלוש בערב").unwrap().to_string(), "15:00");
//! assert!(extract_best_time("שלום מה קורה").is_none());
//! ```

pub mod candidate;
pub mod clock;
pub mod fallback;
pub mod hours;
pub mod period;
pub mod rules;
pub mod select;

use log::debug;
use once_cell::sync::Lazy;

pub use candidate::{Candidate, CandidateSource, Extraction, Span};
pub use clock::ClockTime;
pub use fallback::{DateSearch, ExternalFallback, FoundDate, NumericClockSearch, SearchSettings};
pub use period::PeriodContext;

use crate::config::ExtractorConfig;

/// The full extraction pipeline. Holds no per-call state.
pub struct TimeExtractor {
    fallback: Option<ExternalFallback>,
}

impl Default for TimeExtractor {
    fn default() -> Self {
        Self {
            fallback: Some(ExternalFallback::hebrew()),
        }
    }
}

impl TimeExtractor {
    pub fn new(fallback: Option<ExternalFallback>) -> Self {
        Self { fallback }
    }

    /// Rules only, no external searcher.
    pub fn rules_only() -> Self {
        Self { fallback: None }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        if !config.fallback_enabled {
            return Self::rules_only();
        }
        Self::new(Some(ExternalFallback::new(
            Box::new(NumericClockSearch),
            config.languages.clone(),
        )))
    }

    /// Every candidate, rule candidates first, duplicates by value removed.
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let rule = rules::rule_candidates(text);
        let external = self
            .fallback
            .as_ref()
            .map(|f| f.candidates(text))
            .unwrap_or_default();
        let merged = select::aggregate(rule, external);
        debug!(
            "Candidates for '{}': {:?}",
            text,
            merged.iter().map(|c| c.value().to_string()).collect::<Vec<_>>()
        );
        merged
    }

    pub fn extract(&self, text: &str) -> Extraction {
        let result = select::select_best(&self.candidates(text));
        debug!("Extracted '{}' from '{}'", result, text);
        result
    }
}

static DEFAULT_EXTRACTOR: Lazy<TimeExtractor> = Lazy::new(TimeExtractor::default);

/// Best time in `text` using the default pipeline.
pub fn extract_best_time(text: &str) -> Option<ClockTime> {
    DEFAULT_EXTRACTOR.extract(text).time()
}

/// All merged candidates for `text` using the default pipeline.
pub fn extract_times_all(text: &str) -> Vec<Candidate> {
    DEFAULT_EXTRACTOR.candidates(text)
}
