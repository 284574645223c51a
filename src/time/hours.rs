//! Hebrew hour words, including the common spelling variants.

/// Word → hour (1..=12).
pub static HOUR_WORDS: &[(&str, u32)] = &[
    ("אחת עשרה", 11),
    ("אחד עשר", 11),
    ("אחד עשרה", 11),
    ("שתיים עשרה", 12),
    ("שתים עשרה", 12),
    ("שניים עשר", 12),
    ("אחת", 1),
    ("אחד", 1),
    ("שתיים", 2),
    ("שניים", 2),
    ("שתים", 2),
    ("שלוש", 3),
    ("ארבע", 4),
    ("חמש", 5),
    ("שש", 6),
    ("שבע", 7),
    ("שמונה", 8),
    ("תשע", 9),
    ("עשר", 10),
];

/// Regex alternation over every hour word. Compound forms come first so that
/// "אחת עשרה" is not read as "אחת".
pub fn hour_word_alternation() -> String {
    HOUR_WORDS
        .iter()
        .map(|(word, _)| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|")
}

pub fn hour_for_word(word: &str) -> Option<u32> {
    HOUR_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, hour)| *hour)
}
