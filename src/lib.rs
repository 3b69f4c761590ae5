//! Score generation for an external synthesis engine.
//!
//! Three builders produce the same line-oriented score format:
//! - a hand-written literal ([`generators::static_score`]),
//! - a format-string loop ([`generators::templated_score`]),
//! - structured records flattened to text ([`generators::structured_score`]).
//!
//! [`engine`] drives the engine through its lifecycle with the chosen score
//! and the orchestra from [`orchestra`].

pub mod config;
pub mod engine;
pub mod events;
pub mod generators;
pub mod orchestra;
pub mod score;

pub use config::{Config, ConfigError};
pub use engine::{
    DryRunEngine, DryRunHost, Engine, EngineError, EngineHost, InitFlags, Perform, Session,
    run_performance,
};
pub use events::{Field, NoteEvent, Pitch, Record};
pub use generators::{PitchPicker, RandomPitches, Strategy};
pub use orchestra::{EnvelopeConfig, OrchestraConfig};
pub use score::{Score, ScoreError, ScoreText};
