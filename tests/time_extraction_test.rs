// Integration tests for the Hebrew time extraction pipeline
use pretty_assertions::assert_eq;
use shaon::time::{CandidateSource, Extraction, TimeExtractor};
use shaon::{extract_best_time, extract_times_all};
use test_case::test_case;

fn best(text: &str) -> Option<String> {
    extract_best_time(text).map(|t| t.to_string())
}

#[test_case("שלוש בערב", "15:00" ; "evening shifts to afternoon hours")]
#[test_case("שלוש בבוקר", "03:00" ; "morning keeps small hour")]
#[test_case("חצות", "00:00" ; "midnight")]
#[test_case("חצות היום", "12:00" ; "midnight of today reads as noon")]
#[test_case("רבע לשלוש בערב", "14:45" ; "quarter to with evening")]
#[test_case("רבע לשלוש", "02:45" ; "quarter to without period")]
#[test_case("נפגש בשבע וחצי בערב", "19:30" ; "half past with evening")]
#[test_case("מחר בשעה 9", "09:00" ; "digits after at the hour")]
#[test_case("ב-21:15 ליד הבית", "21:15" ; "dashed literal")]
#[test_case("סביבות 7 בערב", "19:00" ; "approximate digits")]
#[test_case("אחת בצהריים", "13:00" ; "one at noon")]
#[test_case("שתיים בלילה", "02:00" ; "two at night stays small")]
#[test_case("תשע בלילה", "21:00" ; "nine at night falls through to bare word")]
#[test_case("בערב בשבע", "19:00" ; "period before the hour")]
#[test_case("בשעה 12 בערב", "00:00" ; "twelve in the evening is midnight")]
#[test_case("בשעה 12", "12:00" ; "bare twelve is noon")]
#[test_case("נדבר בבוקר", "08:00" ; "morning default")]
#[test_case("נדבר בערב", "20:00" ; "evening default")]
#[test_case("אחרי הצהריים", "17:00" ; "afternoon default")]
#[test_case("נאכל צהריים", "12:00" ; "noon default")]
fn test_best_time(input: &str, expected: &str) {
    assert_eq!(best(input).as_deref(), Some(expected));
}

#[test]
fn test_no_match_for_plain_greeting() {
    assert_eq!(best("שלום מה קורה"), None);
    assert_eq!(TimeExtractor::default().extract("שלום מה קורה"), Extraction::NoMatch);
    assert!(extract_times_all("שלום מה קורה").is_empty());
}

#[test]
fn test_literal_is_a_fixed_point() {
    let test_cases = vec![
        "09:30",
        "הפגישה נקבעה ל 09:30 אם אפשר",
        "אז 09:30, תודה רבה!",
    ];

    for input in test_cases {
        assert_eq!(best(input).as_deref(), Some("09:30"), "Failed for input: {}", input);
    }
}

#[test]
fn test_leftmost_mention_wins() {
    assert_eq!(best("בתשע ואז ב-20:00 נדבר").as_deref(), Some("09:00"));
    assert_eq!(best("ב-20:00 ואז בתשע").as_deref(), Some("20:00"));
}

#[test]
fn test_first_context_default_wins_when_several_periods_appear() {
    let all: Vec<String> = extract_times_all("בערב או אחרי הצהריים")
        .iter()
        .map(|c| c.value().to_string())
        .collect();
    assert_eq!(all, vec!["17:00", "12:00", "20:00"]);
    assert_eq!(best("בערב או אחרי הצהריים").as_deref(), Some("17:00"));
}

#[test]
fn test_external_fallback_used_only_without_rules() {
    assert_eq!(best("call me at 9pm").as_deref(), Some("21:00"));

    let all = extract_times_all("call me at 9pm");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].source(), CandidateSource::External);
    assert_eq!(all[0].fragment(), Some("9pm"));

    // An anchored rule candidate always outranks the fallback.
    assert_eq!(best("שמונה בבוקר או 9pm").as_deref(), Some("08:00"));
}

#[test]
fn test_all_candidates_are_valid_clock_values() {
    let inputs = [
        "בשעה 99 בערב",
        "ב-24:61",
        "סביבות 23 בלילה",
        "רבע לאחת בערב",
        "שתיים עשרה וחצי בלילה",
        "11 בערב ו-12 בלילה",
        "בשעה 3:45 בלילה",
    ];

    for input in inputs {
        for candidate in extract_times_all(input) {
            let value = candidate.value();
            assert!(value.hour() <= 23, "hour out of range for {}", input);
            assert!(value.minute() <= 59, "minute out of range for {}", input);
            assert_eq!(value.to_string().len(), 5);
        }
    }
}

#[test]
fn test_anchored_candidates_carry_character_spans() {
    let all = extract_times_all("מחר בשעה 9");
    let spans: Vec<(usize, usize)> = all
        .iter()
        .filter_map(|c| c.span().map(|s| (s.start, s.end)))
        .collect();
    assert_eq!(spans, vec![(4, 10), (9, 10)]);
}

#[test]
fn test_invalid_literal_does_not_hide_valid_one() {
    let all: Vec<String> = extract_times_all("ב-25:10 או 09:30")
        .iter()
        .map(|c| c.value().to_string())
        .collect();
    assert_eq!(all, vec!["09:30"]);
    assert_eq!(best("ב-25:10 או 09:30").as_deref(), Some("09:30"));
    assert_eq!(best("בשעה 40 או בשעה 6 בערב").as_deref(), Some("18:00"));
}
