//! Entropy Analyzer: flags high-randomness tokens
//!
//! Base64 and hex blobs such as API keys have a flatter character
//! distribution than words or paths. Entropy is computed over raw chars,
//! with no case folding or normalisation.

use std::collections::HashMap;

/// Token delimiters besides whitespace
const DELIMITERS: [char; 6] = ['&', '?', '=', ',', ';', '|'];

/// Shannon entropy of `s` in bits per character
pub fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut length = 0usize;
    for ch in s.chars() {
        *freq.entry(ch).or_insert(0) += 1;
        length += 1;
    }

    if length == 0 {
        return 0.0;
    }

    let length = length as f64;
    let entropy: f64 = freq
        .values()
        .map(|&count| {
            let p = count as f64 / length;
            p * p.log2()
        })
        .sum();

    // -0.0 for single-symbol strings
    (-entropy).max(0.0)
}

/// Split on whitespace runs and the delimiter set, dropping empty tokens
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || DELIMITERS.contains(&c))
        .filter(|t| !t.is_empty())
}

/// First token of at least `min_length` chars whose entropy reaches `threshold`
pub fn scan(text: &str, threshold: f64, min_length: usize) -> Option<&str> {
    tokens(text).find(|token| {
        token.chars().count() >= min_length && shannon_entropy(token) >= threshold
    })
}
