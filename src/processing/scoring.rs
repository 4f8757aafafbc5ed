//! Final score composition

/// Weight of the embedding similarity in the final score
pub const SEMANTIC_WEIGHT: f64 = 0.8;

/// Weight of the boost keyword score in the final score
pub const KEYWORD_WEIGHT: f64 = 0.2;

/// Combine semantic similarity and keyword boost into a percentage rounded
/// to two decimals.
pub fn compose_score(semantic_score: f64, keyword_score: f64) -> f64 {
    round_to(
        (semantic_score * SEMANTIC_WEIGHT + keyword_score * KEYWORD_WEIGHT) * 100.0,
        2,
    )
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
