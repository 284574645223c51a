//! Merging candidate streams and picking the winner.

use std::collections::HashSet;

use super::candidate::{Candidate, Extraction};
use super::clock::ClockTime;

/// Rule candidates in generation order, followed by external candidates whose
/// value has not been seen yet. The first candidate with a given value wins.
pub fn aggregate(rule: Vec<Candidate>, external: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<ClockTime> = rule.iter().map(Candidate::value).collect();
    let mut merged = rule;
    for candidate in external {
        if seen.insert(candidate.value()) {
            merged.push(candidate);
        }
    }
    merged
}

/// Pick one candidate:
///
/// 1. the anchored rule candidate that starts leftmost (ties keep generation order),
/// 2. otherwise the first rule candidate,
/// 3. otherwise the first external candidate,
/// 4. otherwise no match.
pub fn select_best(candidates: &[Candidate]) -> Extraction {
    let leftmost = candidates
        .iter()
        .filter(|c| c.is_rule())
        .filter_map(|c| c.span().map(|span| (span.start, c)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, c)| c);

    leftmost
        .or_else(|| candidates.iter().find(|c| c.is_rule()))
        .or_else(|| candidates.first())
        .map(Candidate::value)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::candidate::Span;
    use pretty_assertions::assert_eq;

    fn t(h: u32, m: u32) -> ClockTime {
        ClockTime::new(h, m).unwrap()
    }

    #[test]
    fn test_aggregate_drops_duplicate_values() {
        let rule = vec![Candidate::anchored(t(9, 0), Span::new(0, 4))];
        let external = vec![
            Candidate::external(t(9, 0), "9"),
            Candidate::external(t(21, 0), "9pm"),
            Candidate::external(t(21, 0), "21.00"),
        ];
        let merged = aggregate(rule, external);
        let values: Vec<String> = merged.iter().map(|c| c.value().to_string()).collect();
        assert_eq!(values, vec!["09:00", "21:00"]);
        assert_eq!(merged[1].fragment(), Some("9pm"));
    }

    #[test]
    fn test_leftmost_anchored_wins() {
        let candidates = vec![
            Candidate::anchored(t(20, 0), Span::new(10, 15)),
            Candidate::anchored(t(9, 0), Span::new(0, 4)),
            Candidate::unanchored(t(8, 0)),
        ];
        assert_eq!(select_best(&candidates), Extraction::Time(t(9, 0)));
    }

    #[test]
    fn test_ties_keep_generation_order() {
        let candidates = vec![
            Candidate::anchored(t(9, 30), Span::new(3, 8)),
            Candidate::anchored(t(9, 0), Span::new(3, 5)),
        ];
        assert_eq!(select_best(&candidates), Extraction::Time(t(9, 30)));
    }

    #[test]
    fn test_unanchored_rule_beats_external() {
        let candidates = vec![
            Candidate::unanchored(t(20, 0)),
            Candidate::unanchored(t(17, 0)),
            Candidate::external(t(9, 0), "9am"),
        ];
        assert_eq!(select_best(&candidates), Extraction::Time(t(20, 0)));
    }

    #[test]
    fn test_external_only_and_empty() {
        let candidates = vec![Candidate::external(t(21, 15), "21.15")];
        assert_eq!(select_best(&candidates), Extraction::Time(t(21, 15)));
        assert_eq!(select_best(&[]), Extraction::NoMatch);
    }
}
