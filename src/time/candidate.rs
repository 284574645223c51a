//! Candidate times and their provenance.

use std::fmt;

use super::clock::ClockTime;

/// Character offsets (not bytes) into the trimmed source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Convert a byte range produced by the regex engine into character offsets.
    pub fn from_byte_range(text: &str, start: usize, end: usize) -> Self {
        let start_chars = text[..start].chars().count();
        let len_chars = text[start..end].chars().count();
        Self::new(start_chars, start_chars + len_chars)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Produced by one of the built-in pattern recognizers.
    Rule,
    /// Produced by the external date searcher.
    External,
}

/// A provisional extracted time. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    value: ClockTime,
    span: Option<Span>,
    source: CandidateSource,
    fragment: Option<String>,
}

impl Candidate {
    /// A recognizer hit anchored at `span`.
    pub fn anchored(value: ClockTime, span: Span) -> Self {
        Self {
            value,
            span: Some(span),
            source: CandidateSource::Rule,
            fragment: None,
        }
    }

    /// A recognizer hit with no position, e.g. a context-only default.
    pub fn unanchored(value: ClockTime) -> Self {
        Self {
            value,
            span: None,
            source: CandidateSource::Rule,
            fragment: None,
        }
    }

    /// A hit from the external searcher, keeping the matched fragment for diagnostics.
    pub fn external(value: ClockTime, fragment: impl Into<String>) -> Self {
        Self {
            value,
            span: None,
            source: CandidateSource::External,
            fragment: Some(fragment.into()),
        }
    }

    pub fn value(&self) -> ClockTime {
        self.value
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn source(&self) -> CandidateSource {
        self.source
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn is_rule(&self) -> bool {
        self.source == CandidateSource::Rule
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Time(ClockTime),
    NoMatch,
}

impl Extraction {
    pub fn time(&self) -> Option<ClockTime> {
        match self {
            Extraction::Time(t) => Some(*t),
            Extraction::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Extraction::Time(_))
    }
}

impl From<Option<ClockTime>> for Extraction {
    fn from(value: Option<ClockTime>) -> Self {
        value.map_or(Extraction::NoMatch, Extraction::Time)
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::Time(t) => write!(f, "{}", t),
            Extraction::NoMatch => write!(f, "no match"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_counts_characters() {
        let text = "בשעה 9 מחר";
        let byte_start = text.find('9').unwrap();
        let span = Span::from_byte_range(text, byte_start, byte_start + 1);
        assert_eq!(span, Span::new(5, 6));
    }

    #[test]
    fn test_extraction_display() {
        let t = ClockTime::new(7, 45).unwrap();
        assert_eq!(Extraction::Time(t).to_string(), "07:45");
        assert_eq!(Extraction::NoMatch.to_string(), "no match");
        assert_eq!(Extraction::from(None), Extraction::NoMatch);
    }
}
