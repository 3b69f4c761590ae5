use crate::score::ScoreText;

/// The smallest playable score: one second of middle C at half amplitude.
pub const STATIC_SCORE: &str = "i1 0 1 0.5 8.00";

pub fn static_score() -> ScoreText {
    ScoreText::from(STATIC_SCORE)
}
