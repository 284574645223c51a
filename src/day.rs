//! Day qualifiers ("היום", "מחר", "ביום שלישי") that ride alongside a time.
//!
//! Only detection; no date arithmetic happens here.

use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayQualifier {
    Today,
    Tomorrow,
    Weekday(Weekday),
}

static WEEKDAY_NAMES: &[(&str, Weekday)] = &[
    ("ראשון", Weekday::Sun),
    ("שני", Weekday::Mon),
    ("שלישי", Weekday::Tue),
    ("רביעי", Weekday::Wed),
    ("חמישי", Weekday::Thu),
    ("שישי", Weekday::Fri),
    ("שבת", Weekday::Sat),
];

static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    let names = WEEKDAY_NAMES
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?:^|\s)(?:ב?יום\s+({names})|ב?(שבת))(?:[\s,.!?]|$)")).unwrap()
});

static TOMORROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)ו?מחר(?:[\s,.!?]|$)").unwrap());
static TODAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)ו?היום(?:[\s,.!?]|$)").unwrap());

/// The first qualifier found, checking tomorrow, then today, then weekdays.
pub fn detect_day(text: &str) -> Option<DayQualifier> {
    if TOMORROW.is_match(text) {
        return Some(DayQualifier::Tomorrow);
    }
    if TODAY.is_match(text) {
        return Some(DayQualifier::Today);
    }
    let caps = WEEKDAY.captures(text)?;
    let name = caps.get(1).or_else(|| caps.get(2))?.as_str();
    WEEKDAY_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, day)| DayQualifier::Weekday(*day))
}

impl DayQualifier {
    /// Hebrew label used in replies.
    pub fn label(&self) -> String {
        match self {
            DayQualifier::Today => "היום".to_string(),
            DayQualifier::Tomorrow => "מחר".to_string(),
            DayQualifier::Weekday(Weekday::Sat) => "שבת".to_string(),
            DayQualifier::Weekday(day) => {
                let name = WEEKDAY_NAMES
                    .iter()
                    .find(|(_, d)| d == day)
                    .map_or("", |(n, _)| *n);
                format!("יום {}", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_day() {
        let test_cases = vec![
            ("מחר בשעה 9", Some(DayQualifier::Tomorrow)),
            ("נתראה היום בערב", Some(DayQualifier::Today)),
            ("ביום שלישי בשמונה", Some(DayQualifier::Weekday(Weekday::Tue))),
            ("יום ראשון", Some(DayQualifier::Weekday(Weekday::Sun))),
            ("בשבת בבוקר", Some(DayQualifier::Weekday(Weekday::Sat))),
            ("מחרתיים", None),
            ("שלום מה קורה", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(detect_day(input), expected, "Failed for input: {}", input);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(DayQualifier::Tomorrow.label(), "מחר");
        assert_eq!(DayQualifier::Weekday(Weekday::Wed).label(), "יום רביעי");
        assert_eq!(DayQualifier::Weekday(Weekday::Sat).label(), "שבת");
    }
}
