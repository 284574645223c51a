//! Time-of-day context detection.
//!
//! Hebrew speakers rarely say "PM"; they attach a period word to the hour
//! ("שלוש בערב", "בבוקר בשבע"). This module finds those words either
//! anywhere in the message or pressed up against a specific match.

use once_cell::sync::Lazy;
use regex::Regex;

use super::candidate::Span;

/// Width, in characters, of the window inspected on each side of a match.
pub const LOCAL_WINDOW_CHARS: usize = 15;

/// Marker that switches small hours (1..=4) to "late night, keep as is".
pub const NIGHT_MARKER: &str = "בלילה";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodContext {
    Morning,
    Noon,
    Afternoon,
    Evening,
    /// No evidence; callers assume morning and do not shift.
    Default,
}

impl PeriodContext {
    /// Afternoon and evening both push a 1..=11 hour into the 13..=23 range.
    pub fn is_late(self) -> bool {
        matches!(self, PeriodContext::Afternoon | PeriodContext::Evening)
    }
}

/// Keyword groups in lookup priority order.
static PERIOD_KEYWORDS: &[(PeriodContext, &[&str])] = &[
    (PeriodContext::Morning, &["בבוקר", "בוקר"]),
    (PeriodContext::Afternoon, &["אחרי הצהריים", "אחה\"צ"]),
    (PeriodContext::Noon, &["בצהריים", "צהריים"]),
    (PeriodContext::Evening, &["בערב", "בלילה", "לילה"]),
];

struct BoundaryPatterns {
    period: PeriodContext,
    /// Keyword right at the start of the window after the match.
    leading: Regex,
    /// Keyword right at the end of the window before the match.
    trailing: Regex,
}

static BOUNDARY_PATTERNS: Lazy<Vec<BoundaryPatterns>> = Lazy::new(|| {
    PERIOD_KEYWORDS
        .iter()
        .map(|(period, words)| {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            BoundaryPatterns {
                period: *period,
                leading: Regex::new(&format!(r"^\s*(?:{})", alternation)).unwrap(),
                trailing: Regex::new(&format!(r"(?:{})\s*$", alternation)).unwrap(),
            }
        })
        .collect()
});

/// Period keyword found anywhere in `text`, first category wins.
///
/// This is always the first entry of [`periods_present`], which is what the
/// context-only fallback emits first. It never overrides a local decision.
pub fn global_period(text: &str) -> PeriodContext {
    periods_present(text)
        .first()
        .copied()
        .unwrap_or(PeriodContext::Default)
}

/// Every period category with a keyword present in `text`, in lookup priority order.
pub fn periods_present(text: &str) -> Vec<PeriodContext> {
    PERIOD_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map(|(period, _)| *period)
        .collect()
}

/// Period keyword immediately adjacent to `span`.
///
/// The window after the match is checked before the window preceding it.
pub fn local_period(text: &str, span: Span) -> PeriodContext {
    let chars: Vec<char> = text.chars().collect();
    let end = span.end.min(chars.len());
    let start = span.start.min(end);

    let after: String = chars[end..(end + LOCAL_WINDOW_CHARS).min(chars.len())]
        .iter()
        .collect();
    let before: String = chars[start.saturating_sub(LOCAL_WINDOW_CHARS)..start]
        .iter()
        .collect();

    BOUNDARY_PATTERNS
        .iter()
        .find(|p| p.leading.is_match(&after))
        .or_else(|| BOUNDARY_PATTERNS.iter().find(|p| p.trailing.is_match(&before)))
        .map_or(PeriodContext::Default, |p| p.period)
}
