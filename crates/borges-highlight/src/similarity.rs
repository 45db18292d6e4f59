//! Approximate token-sequence similarity.
//!
//! This is not a Jaccard index. For every token on the left we ask whether the
//! right side has an "equivalent" token (identical, substring either way, or a
//! single edit away) and divide the hit count by the longer sequence length.
//! The score is asymmetric and permissive for short tokens; callers compensate
//! with a match threshold.

/// Score in `[0, 1]`; `0.0` when either side is empty.
pub fn similarity<A, B>(left: &[A], right: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let matches = left
        .iter()
        .filter(|a| right.iter().any(|b| tokens_match(a.as_ref(), b.as_ref())))
        .count();

    matches as f64 / left.len().max(right.len()) as f64
}

fn tokens_match(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a) || levenshtein(a, b) <= 1
}

/// Classic dynamic-programming edit distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();
    if n == 0 {
        return a.chars().count();
    }

    // Two DP rows: distances between `a[..i]` and `b[..j]`.
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr: Vec<usize> = vec![0; n + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for j in 1..=n {
            let cost = usize::from(ca != b_chars[j - 1]);
            let deletion = prev[j] + 1;
            let insertion = curr[j - 1] + 1;
            let substitution = prev[j - 1] + cost;
            curr[j] = deletion.min(insertion).min(substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
