mod static_literal;
mod structured;
mod templated;

pub use static_literal::{STATIC_SCORE, static_score};
pub use structured::{
    PALETTE_SIZE, PitchPicker, RandomPitches, build_records, pitch_palette, structured_score,
};
pub use templated::{templated_score, templated_score_with};

use crate::score::{ScoreError, ScoreText};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Notes per generated score.
pub const EVENT_COUNT: usize = 13;
/// Largest count whose note indices still fit the two-digit semitone
/// field of the templated builder.
pub const MAX_EVENT_COUNT: usize = 100;
/// Seconds between consecutive note starts.
pub const TIME_STEP: f64 = 0.25;
pub const NOTE_DURATION: f64 = 0.25;
pub const NOTE_AMPLITUDE: f64 = 0.5;
pub const BASE_OCTAVE: u8 = 8;
/// Instrument number every generated note plays on.
pub const INSTRUMENT: u32 = 1;

/// Which of the three score builders to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Static,
    Templated,
    #[default]
    Structured,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown score strategy {0:?} (expected static, templated or structured)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" => Ok(Strategy::Static),
            "templated" => Ok(Strategy::Templated),
            "structured" => Ok(Strategy::Structured),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Static => "static",
            Strategy::Templated => "templated",
            Strategy::Structured => "structured",
        }
    }

    /// Runs the selected builder. `count` is ignored by the static literal,
    /// and `picker` is only consulted by the structured builder.
    pub fn generate<P: PitchPicker + ?Sized>(
        self,
        count: usize,
        picker: &mut P,
    ) -> Result<ScoreText, ScoreError> {
        match self {
            Strategy::Static => Ok(static_score()),
            Strategy::Templated => Ok(templated_score_with(count)),
            Strategy::Structured => structured_score(count, picker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_strategy_parses_case_insensitively() {
        assert_eq!("static".parse::<Strategy>(), Ok(Strategy::Static));
        assert_eq!("Templated".parse::<Strategy>(), Ok(Strategy::Templated));
        assert_eq!("STRUCTURED".parse::<Strategy>(), Ok(Strategy::Structured));
        assert_eq!(
            "random".parse::<Strategy>(),
            Err(UnknownStrategy("random".to_string()))
        );
    }

    #[test]
    fn test_strategy_dispatch() {
        let mut picker = RandomPitches(StdRng::seed_from_u64(3));
        let sco = Strategy::Static.generate(EVENT_COUNT, &mut picker).unwrap();
        assert_eq!(sco.as_str(), STATIC_SCORE);

        let sco2 = Strategy::Templated.generate(EVENT_COUNT, &mut picker).unwrap();
        assert_eq!(sco2, templated_score());

        let sco3 = Strategy::Structured.generate(4, &mut picker).unwrap();
        assert_eq!(sco3.line_count(), 4);
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in [Strategy::Static, Strategy::Templated, Strategy::Structured] {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
    }
}
