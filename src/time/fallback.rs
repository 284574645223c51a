//! Last-resort candidates from a general-purpose date searcher.
//!
//! The searcher is a collaborator behind the [`DateSearch`] trait. Whatever
//! goes wrong inside it is logged and swallowed; the rule-based recognizers
//! never depend on it.

use std::panic::{self, AssertUnwindSafe};

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::candidate::Candidate;
use super::clock::ClockTime;
use crate::error::FallbackError;

/// Which direction to resolve ambiguous dates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferDates {
    Past,
    #[default]
    Future,
}

/// Settings handed to the searcher on every call.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub prefer_dates_from: PreferDates,
    /// Reference "now"; `None` means the searcher's own clock.
    pub relative_base: Option<NaiveDateTime>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            prefer_dates_from: PreferDates::Future,
            relative_base: None,
        }
    }
}

/// One hit: the matched substring and the moment it denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundDate {
    pub fragment: String,
    pub timestamp: NaiveDateTime,
}

/// A multilingual date/time search capability.
pub trait DateSearch: Send + Sync {
    fn search(
        &self,
        text: &str,
        languages: &[String],
        settings: &SearchSettings,
    ) -> Result<Vec<FoundDate>, FallbackError>;
}

static DOTTED_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{1,2})[.h]([0-9]{2})\b").unwrap());
static MERIDIEM_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([0-9]{1,2})(?::([0-9]{2}))?\s*([ap])\.?m\.?(?:\s|$|[,!?])").unwrap()
});

/// Searcher for numeric clock notations the rules do not cover: `21.15`,
/// `9h30`, `9pm`, `10:15 a.m.`.
#[derive(Debug, Default)]
pub struct NumericClockSearch;

impl NumericClockSearch {
    /// Languages whose messages use these notations.
    pub const LANGUAGES: &'static [&'static str] = &["he", "en"];

    fn convert_to_24_hour(hour: u32, meridiem: &str) -> u32 {
        match (hour, meridiem) {
            (12, "a") => 0,
            (h, "p") if h < 12 => h + 12,
            (h, _) => h,
        }
    }

    fn anchor(time: NaiveTime, settings: &SearchSettings) -> NaiveDateTime {
        let base = settings
            .relative_base
            .unwrap_or_else(|| Local::now().naive_local());
        let candidate = base.date().and_time(time);
        match settings.prefer_dates_from {
            PreferDates::Future if candidate < base => candidate + Duration::days(1),
            PreferDates::Past if candidate > base => candidate - Duration::days(1),
            _ => candidate,
        }
    }
}

impl DateSearch for NumericClockSearch {
    fn search(
        &self,
        text: &str,
        languages: &[String],
        settings: &SearchSettings,
    ) -> Result<Vec<FoundDate>, FallbackError> {
        if !languages.is_empty()
            && !languages
                .iter()
                .any(|l| Self::LANGUAGES.contains(&l.as_str()))
        {
            return Err(FallbackError::UnsupportedLanguage(languages.join(",")));
        }

        let mut hits: Vec<(usize, String, NaiveTime)> = Vec::new();

        for caps in DOTTED_TIME.captures_iter(text) {
            let (Ok(h), Ok(m)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
                continue;
            };
            if let Some(time) = NaiveTime::from_hms_opt(h, m, 0) {
                hits.push((caps.get(0).map_or(0, |g| g.start()), caps[0].to_string(), time));
            }
        }

        for caps in MERIDIEM_TIME.captures_iter(text) {
            let Ok(h) = caps[1].parse::<u32>() else {
                continue;
            };
            if !(1..=12).contains(&h) {
                continue;
            }
            let m = caps.get(2).and_then(|g| g.as_str().parse::<u32>().ok()).unwrap_or(0);
            let meridiem = caps[3].to_lowercase();
            let hour = Self::convert_to_24_hour(h, &meridiem);
            if let Some(time) = NaiveTime::from_hms_opt(hour, m, 0) {
                hits.push((
                    caps.get(0).map_or(0, |g| g.start()),
                    caps[0].trim().to_string(),
                    time,
                ));
            }
        }

        hits.sort_by_key(|(start, _, _)| *start);
        Ok(hits
            .into_iter()
            .map(|(_, fragment, time)| FoundDate {
                fragment,
                timestamp: Self::anchor(time, settings),
            })
            .collect())
    }
}

/// Wraps a [`DateSearch`] and turns its hits into external candidates.
pub struct ExternalFallback {
    searcher: Box<dyn DateSearch>,
    languages: Vec<String>,
    settings: SearchSettings,
}

impl ExternalFallback {
    pub fn new(searcher: Box<dyn DateSearch>, languages: Vec<String>) -> Self {
        Self {
            searcher,
            languages,
            settings: SearchSettings::default(),
        }
    }

    /// Hebrew, future-preferring, built-in numeric searcher.
    pub fn hebrew() -> Self {
        Self::new(Box::new(NumericClockSearch), vec!["he".to_string()])
    }

    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.searcher.search(text, &self.languages, &self.settings)
        }))
        .unwrap_or(Err(FallbackError::Panicked));

        match outcome {
            Ok(found) => {
                let candidates: Vec<Candidate> = found
                    .into_iter()
                    .map(|f| Candidate::external(ClockTime::from(f.timestamp.time()), f.fragment))
                    .collect();
                debug!("External fallback produced {} candidate(s)", candidates.len());
                candidates
            }
            Err(e) => {
                warn!("External date search failed, ignoring: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Failing;

    impl DateSearch for Failing {
        fn search(
            &self,
            _text: &str,
            languages: &[String],
            _settings: &SearchSettings,
        ) -> Result<Vec<FoundDate>, FallbackError> {
            Err(FallbackError::UnsupportedLanguage(languages.join(",")))
        }
    }

    struct Panicking;

    impl DateSearch for Panicking {
        fn search(
            &self,
            _text: &str,
            _languages: &[String],
            _settings: &SearchSettings,
        ) -> Result<Vec<FoundDate>, FallbackError> {
            panic!("searcher exploded")
        }
    }

    fn fixed_settings() -> SearchSettings {
        SearchSettings {
            prefer_dates_from: PreferDates::Future,
            relative_base: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(12, 0, 0)),
        }
    }

    #[test]
    fn test_numeric_search_finds_notations_in_order() {
        let found = NumericClockSearch
            .search("ניפגש 9pm או 21.15", &["he".to_string()], &fixed_settings())
            .unwrap();
        let times: Vec<String> = found
            .iter()
            .map(|f| ClockTime::from(f.timestamp.time()).to_string())
            .collect();
        assert_eq!(times, vec!["21:00", "21:15"]);
        assert_eq!(found[0].fragment, "9pm");
    }

    #[test]
    fn test_future_preference_rolls_to_next_day() {
        let found = NumericClockSearch
            .search("at 9am", &[], &fixed_settings())
            .unwrap();
        assert_eq!(
            found[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_past_preference_rolls_to_previous_day() {
        let settings = SearchSettings {
            prefer_dates_from: PreferDates::Past,
            ..fixed_settings()
        };
        let found = NumericClockSearch.search("at 9pm", &[], &settings).unwrap();
        assert_eq!(
            found[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap().and_hms_opt(21, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unsupported_language_is_rejected() {
        let result = NumericClockSearch.search("9pm", &["fr".to_string()], &fixed_settings());
        assert!(matches!(result, Err(FallbackError::UnsupportedLanguage(l)) if l == "fr"));

        let fallback = ExternalFallback::new(Box::new(NumericClockSearch), vec!["fr".to_string()]);
        assert!(fallback.candidates("9pm").is_empty());
    }

    #[test]
    fn test_meridiem_edges() {
        let test_cases = vec![
            ("12am", "00:00"),
            ("12pm", "12:00"),
            ("7:45 PM", "19:45"),
            ("6 a.m.", "06:00"),
        ];

        for (input, expected) in test_cases {
            let found = NumericClockSearch.search(input, &[], &fixed_settings()).unwrap();
            assert_eq!(
                ClockTime::from(found[0].timestamp.time()).to_string(),
                expected,
                "Failed for input: {}",
                input
            );
        }
    }

    #[test]
    fn test_plain_text_finds_nothing() {
        let found = NumericClockSearch
            .search("שלום מה קורה", &[], &fixed_settings())
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_failures_contribute_nothing() {
        let fallback = ExternalFallback::new(Box::new(Failing), vec!["he".to_string()]);
        assert!(fallback.candidates("9pm").is_empty());

        let fallback = ExternalFallback::new(Box::new(Panicking), vec!["he".to_string()]);
        assert!(fallback.candidates("9pm").is_empty());
    }

    #[test]
    fn test_external_candidates_carry_fragment() {
        let candidates = ExternalFallback::hebrew().candidates("call at 9pm");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value().to_string(), "21:00");
        assert_eq!(candidates[0].fragment(), Some("9pm"));
        assert!(candidates[0].span().is_none());
        assert!(!candidates[0].is_rule());
    }
}
