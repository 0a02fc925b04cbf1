//! Fuzzy string similarity on a 0–100 scale.
//!
//! The primitive is rapidfuzz's Indel ratio, `2 * LCS(a, b) / (|a| + |b|)`
//! over chars. On top of it sit the usual partial and token-based variants,
//! and [`weighted_ratio`] picks the best of them with penalties for the
//! looser strategies.
//!
//! ```text
//! "what r ur hours" vs "What are your hours?"
//!   preprocess → "what r ur hours" / "what are your hours"
//!   ratio      → 2*15 / (15+19) = 88
//! ```

use rapidfuzz::fuzz;
use std::collections::BTreeSet;

/// Penalty applied to token-based strategies.
const UNBASE_SCALE: f64 = 0.95;
/// Penalty for substring strategies when lengths differ by 1.5x or more.
const PARTIAL_SCALE: f64 = 0.9;
/// Penalty for substring strategies when lengths differ by 8x or more.
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// Lowercase, turn every non-alphanumeric char into a space, trim.
pub fn preprocess(s: &str) -> String {
    let mapped: String = s
        .chars()
        .flat_map(|c| {
            let lower: Vec<char> = if c.is_alphanumeric() {
                c.to_lowercase().collect()
            } else {
                vec![' ']
            };
            lower
        })
        .collect();
    mapped.trim().to_string()
}

fn raw_ratio(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    fuzz::ratio(a.iter().copied(), b.iter().copied())
}

fn raw_partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }
    if short.len() == long.len() {
        return raw_ratio(short, long);
    }
    let mut best = 0.0f64;
    for window in long.windows(short.len()) {
        let score = raw_ratio(short, window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Round half to even, clamp to the score range.
fn to_score(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 100.0) as u8
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sorted intersection plus each side's intersection-prefixed remainder.
fn token_set_parts(a: &str, b: &str) -> (String, String, String) {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let common = set_a.intersection(&set_b).copied().collect::<Vec<_>>().join(" ");
    let only_a = set_a.difference(&set_b).copied().collect::<Vec<_>>().join(" ");
    let only_b = set_b.difference(&set_a).copied().collect::<Vec<_>>().join(" ");

    let t1 = join_nonempty(&[common.as_str(), only_a.as_str()]);
    let t2 = join_nonempty(&[common.as_str(), only_b.as_str()]);
    (common, t1, t2)
}

fn best_of_set(parts: (String, String, String), f: fn(&[char], &[char]) -> f64) -> f64 {
    let (t0, t1, t2) = parts;
    let (t0, t1, t2) = (chars(&t0), chars(&t1), chars(&t2));
    let mut best = f(&t1, &t2);
    // An empty intersection would otherwise compare "" against a full string.
    if !t0.is_empty() {
        best = best.max(f(&t0, &t1)).max(f(&t0, &t2));
    }
    best
}

/// Plain similarity of the two strings as given.
pub fn ratio(a: &str, b: &str) -> u8 {
    to_score(raw_ratio(&chars(a), &chars(b)))
}

/// Best similarity of the shorter string against any same-length window of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_partial_ratio(&chars(a), &chars(b)))
}

/// Similarity after sorting whitespace-separated tokens; ignores word order.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_ratio(&chars(&sorted_tokens(a)), &chars(&sorted_tokens(b))))
}

pub fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    to_score(raw_partial_ratio(
        &chars(&sorted_tokens(a)),
        &chars(&sorted_tokens(b)),
    ))
}

/// Similarity over token sets; tolerant of repeated and extra words.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    to_score(best_of_set(token_set_parts(a, b), raw_ratio))
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    to_score(best_of_set(token_set_parts(a, b), raw_partial_ratio))
}

/// Composite score: the best of several strategies, chosen by relative length.
///
/// Both inputs are run through [`preprocess`] first; if either ends up empty
/// the score is 0.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = preprocess(a);
    let p2 = preprocess(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let len1 = p1.chars().count();
    let len2 = p2.chars().count();
    let len_ratio = len1.max(len2) as f64 / len1.min(len2) as f64;

    let base = f64::from(ratio(&p1, &p2));

    if len_ratio < 1.5 {
        let tsor = f64::from(token_sort_ratio(&p1, &p2)) * UNBASE_SCALE;
        let tser = f64::from(token_set_ratio(&p1, &p2)) * UNBASE_SCALE;
        return to_score(base.max(tsor).max(tser));
    }

    let partial_scale = if len_ratio < 8.0 {
        PARTIAL_SCALE
    } else {
        LONG_PARTIAL_SCALE
    };
    let partial = f64::from(partial_ratio(&p1, &p2)) * partial_scale;
    let ptsor = f64::from(partial_token_sort_ratio(&p1, &p2)) * UNBASE_SCALE * partial_scale;
    let ptser = f64::from(partial_token_set_ratio(&p1, &p2)) * UNBASE_SCALE * partial_scale;

    to_score(base.max(partial).max(ptsor).max(ptser))
}
