use once_cell::sync::Lazy;
use regex::Regex;

/// Phrases and shapes that have no business in a condolence book.
static SPAM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(viagra|cialis|casino|lottery|winner|congratulations|free money|click here|act now)\b",
        r"(?i)\b(www\.|http|\.com|\.net|\.org)\b",
        r"[A-Z]{10,}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

const MAX_TEXT_LENGTH: usize = 500;
const MAX_CHAR_RUN: usize = 5;

/// Heuristic spam check for free-text submission fields. Err on the side of
/// letting real condolences through; this only has to stop drive-by bots.
pub fn detect_spam(text: &str) -> bool {
    if text.chars().count() > MAX_TEXT_LENGTH {
        return true;
    }
    if has_repeated_run(text, MAX_CHAR_RUN) {
        return true;
    }
    SPAM_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

/// True when any character repeats `run` or more times in a row, the classic
/// keyboard-mash signature ("aaaaa", "!!!!!").
fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut current = 0usize;
    let mut previous: Option<char> = None;
    for ch in text.chars() {
        if Some(ch) == previous {
            current += 1;
        } else {
            previous = Some(ch);
            current = 1;
        }
        if current >= run {
            return true;
        }
    }
    false
}
