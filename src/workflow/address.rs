//! Wallet address validation and extraction.
//!
//! # Design Decisions
//! - Syntactic validation only; ownership proof is out of scope
//! - Addresses are classic ledger identifiers: 'r' prefix, 25-35 chars,
//!   base58 alphabet (no '0', 'O', 'I', 'l')
//! - Extraction scans free text so both "linkwallet rXyz" and structured
//!   input pass through the same path

/// Base58 alphabet used by ledger account identifiers.
const ADDRESS_ALPHABET: &str = "rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

/// Check the syntactic form of a wallet address.
pub fn is_valid_address(candidate: &str) -> bool {
    candidate.starts_with('r')
        && (25..=35).contains(&candidate.len())
        && candidate.chars().all(|c| ADDRESS_ALPHABET.contains(c))
}

/// Find the first token in free text that looks like a wallet address.
pub fn extract_address(text: &str) -> Option<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .find(|token| is_valid_address(token))
}

/// Format a points value for display: truncated (not rounded) to two
/// decimal places, trailing zeros dropped.
pub fn format_points(points: f64) -> String {
    let truncated = (points * 100.0).trunc() / 100.0;
    let formatted = format!("{:.2}", truncated);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
