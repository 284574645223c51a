//! Rule-based time recognizers.
//!
//! Each recognizer looks at the whole message on its own and reports what it
//! finds; none of them suppresses another. The pipeline runs them in the order
//! of [`RECOGNIZERS`], and that order is what breaks ties later on.
//!
//! The `regex` crate has no lookaround, so the word-boundary conditions of the
//! Hebrew patterns are written as consumed groups around a named `m` group:
//! `(?:^|\s)` in front of the match, [`WORD_END`] after it. Only `m` counts as
//! the matched span.

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::candidate::{Candidate, Span};
use super::clock::ClockTime;
use super::hours::{hour_for_word, hour_word_alternation};
use super::period::{local_period, periods_present, PeriodContext, NIGHT_MARKER};

/// Characters (or end of text) allowed right after a word match.
const WORD_END: &str = r#"(?:[\s,.!?״”)]|$)"#;

/// Optional "ב" / "בשעה" in front of an hour word.
const AT_PREFIX: &str = r"(?:ב(?:שעה)?\s*)?";

/// The message being inspected, trimmed, plus facts every recognizer needs.
pub struct Utterance<'a> {
    text: &'a str,
    night: bool,
}

impl<'a> Utterance<'a> {
    pub fn new(text: &'a str) -> Self {
        let text = text.trim();
        Self {
            text,
            night: text.contains(NIGHT_MARKER),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// "בלילה" appears somewhere in the message.
    pub fn mentions_night(&self) -> bool {
        self.night
    }

    fn span(&self, m: regex::Match<'_>) -> Span {
        Span::from_byte_range(self.text, m.start(), m.end())
    }

    fn period_near(&self, span: Span) -> PeriodContext {
        local_period(self.text, span)
    }
}

/// One independent recognizer.
pub trait Recognizer: Sync {
    /// Short identifier used in debug logs.
    fn name(&self) -> &'static str;

    /// Zero or more candidates found in the utterance.
    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate>;

    /// Runs only when no earlier recognizer anchored a match.
    fn is_fallback(&self) -> bool {
        false
    }
}

/// Every recognizer, in priority order.
pub static RECOGNIZERS: &[&dyn Recognizer] = &[
    &Midnight,
    &QuarterTo,
    &HalfPast,
    &DirectClock,
    &AtDigits,
    &WordAtNoon,
    &WordAtNight,
    &BareWord,
    &Approximate,
    &BareNumber,
    &ContextDefault,
];

/// Run every recognizer and collect their candidates in order.
pub fn rule_candidates(text: &str) -> Vec<Candidate> {
    let utterance = Utterance::new(text);
    let mut candidates = Vec::new();
    for recognizer in RECOGNIZERS {
        if recognizer.is_fallback() && candidates.iter().any(|c: &Candidate| c.span().is_some()) {
            continue;
        }
        let found = recognizer.attempt(&utterance);
        if !found.is_empty() {
            debug!(
                "Recognizer '{}' produced: {:?}",
                recognizer.name(),
                found.iter().map(|c| c.value().to_string()).collect::<Vec<_>>()
            );
        }
        candidates.extend(found);
    }
    candidates
}

/// First match of `re` for which `accept` holds.
///
/// Rejected matches restart the search one character further on, which is how
/// a lookaround-capable engine would move past them.
fn first_match<'t>(
    re: &Regex,
    text: &'t str,
    accept: impl Fn(&Captures<'t>) -> bool,
) -> Option<Captures<'t>> {
    let mut pos = 0;
    while pos <= text.len() {
        let caps = re.captures_at(text, pos)?;
        if accept(&caps) {
            return Some(caps);
        }
        let start = caps.get(0)?.start();
        pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn word_pattern(core: &str) -> Regex {
    Regex::new(&format!(r"(?:^|\s)(?P<m>{}){}", core, WORD_END)).unwrap()
}

/// 12-hour reading of an hour using the period found next to it.
///
/// Twelve is noon unless an afternoon/evening word sits next to it, in which
/// case it is midnight. Hours 1..=4 stay as they are when the message talks
/// about the night at all.
fn resolve_hour(utterance: &Utterance<'_>, hour: u32, span: Span) -> Option<ClockTime> {
    let period = utterance.period_near(span);
    if hour == 12 {
        return twelve_oclock(period);
    }
    if utterance.mentions_night() && (1..=4).contains(&hour) {
        return ClockTime::on_the_hour(hour);
    }
    if period.is_late() && hour < 12 {
        return ClockTime::on_the_hour(hour + 12);
    }
    ClockTime::on_the_hour(hour)
}

/// Twelve next to a noon word, or with no period word, is noon; next to an
/// afternoon/evening word it is midnight.
fn twelve_oclock(period: PeriodContext) -> Option<ClockTime> {
    if period.is_late() {
        ClockTime::on_the_hour(0)
    } else {
        ClockTime::on_the_hour(12)
    }
}

/// Move an hour into 13..=23 when the period is late.
fn shift_if_late(hour: u32, period: PeriodContext) -> u32 {
    if period.is_late() && hour < 12 {
        hour + 12
    } else {
        hour
    }
}

fn word_hour(caps: &Captures<'_>) -> Option<u32> {
    caps.name("w").and_then(|w| hour_for_word(w.as_str()))
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group).and_then(|g| g.as_str().parse().ok())
}

/// Hour group within 0..=23 and, when present, minute group within 0..=59.
fn in_clock_range(caps: &Captures<'_>, hour_group: usize, minute_group: usize) -> bool {
    let hour_ok = number(caps, hour_group).is_some_and(|h| h <= 23);
    let minute_ok = caps.get(minute_group).is_none() || number(caps, minute_group).is_some_and(|m| m <= 59);
    hour_ok && minute_ok
}

/// "חצות" is midnight, "חצות היום" is read as noon.
pub struct Midnight;

impl Recognizer for Midnight {
    fn name(&self) -> &'static str {
        "midnight"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let text = utterance.text();
        let mut found = Vec::new();
        if text.contains("חצות היום") {
            found.extend(ClockTime::on_the_hour(12).map(Candidate::unanchored));
        }
        if text.contains("חצות") {
            found.extend(ClockTime::on_the_hour(0).map(Candidate::unanchored));
        }
        found
    }
}

static QUARTER_TO: Lazy<Regex> = Lazy::new(|| {
    word_pattern(&format!(r"ב?רבע\s+ל[־-]?\s*(?P<w>{})", hour_word_alternation()))
});

/// "רבע לשלוש": quarter to the hour.
pub struct QuarterTo;

impl Recognizer for QuarterTo {
    fn name(&self) -> &'static str {
        "quarter-to"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let Some(caps) = QUARTER_TO.captures(utterance.text()) else {
            return Vec::new();
        };
        let (Some(m), Some(hour)) = (caps.name("m"), word_hour(&caps)) else {
            return Vec::new();
        };
        let span = utterance.span(m);
        let base = if hour > 1 { hour - 1 } else { 12 };
        ClockTime::new(shift_if_late(base, utterance.period_near(span)), 45)
            .map(|t| Candidate::anchored(t, span))
            .into_iter()
            .collect()
    }
}

static HALF_PAST: Lazy<Regex> = Lazy::new(|| {
    word_pattern(&format!(r"{}(?P<w>{})\s+וחצי", AT_PREFIX, hour_word_alternation()))
});

/// "שבע וחצי": half past the hour.
pub struct HalfPast;

impl Recognizer for HalfPast {
    fn name(&self) -> &'static str {
        "half-past"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let Some(caps) = HALF_PAST.captures(utterance.text()) else {
            return Vec::new();
        };
        let (Some(m), Some(hour)) = (caps.name("m"), word_hour(&caps)) else {
            return Vec::new();
        };
        let span = utterance.span(m);
        let hh = shift_if_late(hour, utterance.period_near(span));
        ClockTime::new(hh, 30)
            .map(|t| Candidate::anchored(t, span))
            .into_iter()
            .collect()
    }
}

static DIRECT_CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{1,2}):([0-9]{2})\b").unwrap());

/// A literal 24-hour "21:15".
pub struct DirectClock;

impl Recognizer for DirectClock {
    fn name(&self) -> &'static str {
        "direct-clock"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let Some(caps) = first_match(&DIRECT_CLOCK, utterance.text(), |c| in_clock_range(c, 1, 2))
        else {
            return Vec::new();
        };
        let (Some(m), Some(h), Some(mm)) = (caps.get(0), number(&caps, 1), number(&caps, 2)) else {
            return Vec::new();
        };
        ClockTime::new(h, mm)
            .map(|t| Candidate::anchored(t, utterance.span(m)))
            .into_iter()
            .collect()
    }
}

static AT_HOUR_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bבש(?:עה)?\s*([0-9]{1,2})(?::([0-9]{2}))?\b").unwrap());
static AT_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bב[־-]?\s*([0-9]{1,2})(?::([0-9]{2}))?\b").unwrap());

/// "בשעה 8", "ב-21:00", "ב9:30".
pub struct AtDigits;

impl Recognizer for AtDigits {
    fn name(&self) -> &'static str {
        "at-digits"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let text = utterance.text();
        let valid = |c: &Captures<'_>| in_clock_range(c, 1, 2);
        let Some(caps) = first_match(&AT_HOUR_DIGITS, text, valid)
            .or_else(|| first_match(&AT_DIGITS, text, valid))
        else {
            return Vec::new();
        };
        let (Some(m), Some(h)) = (caps.get(0), number(&caps, 1)) else {
            return Vec::new();
        };
        let mm = number(&caps, 2).unwrap_or(0);
        let span = utterance.span(m);
        let period = utterance.period_near(span);

        if h == 12 {
            return twelve_oclock(period)
                .map(|t| Candidate::anchored(t, span))
                .into_iter()
                .collect();
        }

        let mut found = Vec::new();
        if utterance.mentions_night() && (1..=4).contains(&h) {
            found.extend(ClockTime::new(h, mm).map(|t| Candidate::anchored(t, span)));
        }
        found.extend(ClockTime::new(shift_if_late(h, period), mm).map(|t| Candidate::anchored(t, span)));
        found
    }
}

static WORD_AT_NOON: Lazy<Regex> = Lazy::new(|| {
    word_pattern(&format!(r"{}(?P<w>{})\s+בצהריים", AT_PREFIX, hour_word_alternation()))
});

/// "אחת בצהריים": an hour word followed by "at noon".
pub struct WordAtNoon;

impl Recognizer for WordAtNoon {
    fn name(&self) -> &'static str {
        "word-at-noon"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let Some(caps) = WORD_AT_NOON.captures(utterance.text()) else {
            return Vec::new();
        };
        let (Some(m), Some(hour)) = (caps.name("m"), word_hour(&caps)) else {
            return Vec::new();
        };
        let value = match hour {
            12 => ClockTime::on_the_hour(12),
            h => ClockTime::on_the_hour(h + 12),
        };
        value
            .map(|t| Candidate::anchored(t, utterance.span(m)))
            .into_iter()
            .collect()
    }
}

static WORD_AT_NIGHT: Lazy<Regex> = Lazy::new(|| {
    word_pattern(&format!(r"{}(?P<w>{})\s+בלילה", AT_PREFIX, hour_word_alternation()))
});

/// "שתיים בלילה": an hour word followed by "at night".
///
/// Only twelve and one through four are unambiguous; five to eleven at night
/// are left to the bare-word recognizer.
pub struct WordAtNight;

impl Recognizer for WordAtNight {
    fn name(&self) -> &'static str {
        "word-at-night"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let Some(caps) = WORD_AT_NIGHT.captures(utterance.text()) else {
            return Vec::new();
        };
        let (Some(m), Some(hour)) = (caps.name("m"), word_hour(&caps)) else {
            return Vec::new();
        };
        let value = match hour {
            12 => ClockTime::on_the_hour(0),
            1..=4 => ClockTime::on_the_hour(hour),
            _ => None,
        };
        value
            .map(|t| Candidate::anchored(t, utterance.span(m)))
            .into_iter()
            .collect()
    }
}

static BARE_WORD: Lazy<Regex> =
    Lazy::new(|| word_pattern(&format!(r"{}(?P<w>{})", AT_PREFIX, hour_word_alternation())));
static HALF_FOLLOWS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+וחצי").unwrap());

/// An hour word on its own, "בשמונה", "נפגש בשעה תשע".
pub struct BareWord;

impl Recognizer for BareWord {
    fn name(&self) -> &'static str {
        "bare-word"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let text = utterance.text();
        let caps = first_match(&BARE_WORD, text, |caps| {
            caps.name("m")
                .is_some_and(|m| !HALF_FOLLOWS.is_match(&text[m.end()..]))
        });
        let Some(caps) = caps else {
            return Vec::new();
        };
        let (Some(m), Some(hour)) = (caps.name("m"), word_hour(&caps)) else {
            return Vec::new();
        };
        let span = utterance.span(m);
        resolve_hour(utterance, hour, span)
            .map(|t| Candidate::anchored(t, span))
            .into_iter()
            .collect()
    }
}

static APPROXIMATE: Lazy<Regex> = Lazy::new(|| {
    word_pattern(&format!(
        r"(?:סביב|סביבות|בערך)\s+{}(?:(?P<w>{})|(?P<d>[0-9]{{1,2}}))",
        AT_PREFIX,
        hour_word_alternation()
    ))
});

/// "סביב שמונה", "בערך 9".
pub struct Approximate;

impl Recognizer for Approximate {
    fn name(&self) -> &'static str {
        "approximate"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let caps = first_match(&APPROXIMATE, utterance.text(), |c| {
            c.name("d")
                .map_or(true, |d| d.as_str().parse::<u32>().is_ok_and(|h| h <= 23))
        });
        let Some(caps) = caps else {
            return Vec::new();
        };
        let Some(m) = caps.name("m") else {
            return Vec::new();
        };
        let hour = match caps.name("d") {
            Some(d) => d.as_str().parse::<u32>().ok(),
            None => word_hour(&caps),
        };
        let Some(hour) = hour.filter(|h| *h <= 23) else {
            return Vec::new();
        };
        let span = utterance.span(m);
        resolve_hour(utterance, hour, span)
            .map(|t| Candidate::anchored(t, span))
            .into_iter()
            .collect()
    }
}

static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([0-9]{1,2})\b").unwrap());

/// Either side of a number touches a colon, i.e. it belongs to an `HH:MM` literal.
fn inside_clock_literal(text: &str, m: regex::Match<'_>) -> bool {
    text[..m.start()].ends_with(':') || text[m.end()..].starts_with(':')
}

/// Any standalone one- or two-digit number up to 23. Lowest priority numeric rule.
///
/// Digits that are part of an `HH:MM` literal are left to the clock recognizers.
pub struct BareNumber;

impl Recognizer for BareNumber {
    fn name(&self) -> &'static str {
        "bare-number"
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        let text = utterance.text();
        let caps = first_match(&BARE_NUMBER, text, |c| {
            in_clock_range(c, 1, 2) && c.get(0).is_some_and(|m| !inside_clock_literal(text, m))
        });
        let Some(caps) = caps else {
            return Vec::new();
        };
        let (Some(m), Some(hour)) = (caps.get(0), number(&caps, 1)) else {
            return Vec::new();
        };
        let span = utterance.span(m);
        resolve_hour(utterance, hour, span)
            .map(|t| Candidate::anchored(t, span))
            .into_iter()
            .collect()
    }
}

/// A period word with no time attached: "בבוקר" alone means 08:00.
///
/// Each category present emits its own default, in period lookup order, so the
/// first one is the default for [`global_period`](super::period::global_period).
pub struct ContextDefault;

impl ContextDefault {
    fn default_for(period: PeriodContext) -> Option<ClockTime> {
        match period {
            PeriodContext::Morning => ClockTime::on_the_hour(8),
            PeriodContext::Evening => ClockTime::on_the_hour(20),
            PeriodContext::Noon => ClockTime::on_the_hour(12),
            PeriodContext::Afternoon => ClockTime::on_the_hour(17),
            PeriodContext::Default => None,
        }
    }
}

impl Recognizer for ContextDefault {
    fn name(&self) -> &'static str {
        "context-default"
    }

    fn is_fallback(&self) -> bool {
        true
    }

    fn attempt(&self, utterance: &Utterance<'_>) -> Vec<Candidate> {
        periods_present(utterance.text())
            .into_iter()
            .filter_map(Self::default_for)
            .map(Candidate::unanchored)
            .collect()
    }
}
