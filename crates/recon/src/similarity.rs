//! Normalized edit distance.
//!
//! Scores are dissimilarities: 0.0 means the two strings are identical after key
//! normalization, 1.0 means every character of the longer string had to change.

use crate::normalize::normalize_key;

/// Levenshtein distance (unit-cost insert, delete, substitute) over `char`s.
///
/// Keeps a single DP row sized by the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current = vec![0usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        current[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + usize::from(lc != sc);
            current[j + 1] = insertion.min(deletion).min(substitution);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[short.len()]
}

/// Edit distance between the normalized forms of `a` and `b`, divided by the length of the
/// longer normalized string. Always in `[0.0, 1.0]`; two empty strings score 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_key(a);
    let b = normalize_key(b);
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    edit_distance(&a, &b) as f64 / longest as f64
}
