use serde::{Deserialize, Serialize};
use std::fmt;

/// Statement character that opens every note line of a score.
pub const INSTRUMENT_STATEMENT: char = 'i';

/// Pitch in octave.semitone notation, e.g. `8.00` is middle C and `8.07`
/// the G above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub octave: u8,
    pub semitone: u8,
}

impl Pitch {
    pub const fn new(octave: u8, semitone: u8) -> Self {
        Self { octave, semitone }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.octave, self.semitone)
    }
}

/// One positional value in a score record.
///
/// Reals render through `f64`'s shortest round-trip `Display`, so `0.0`
/// becomes `0` and `0.25` stays `0.25`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Int(i64),
    Real(f64),
    Text(String),
}

impl Field {
    /// Whether the rendered value can sit on a score line without breaking
    /// the space/newline framing.
    pub fn is_framable(&self) -> bool {
        match self {
            Field::Int(_) => true,
            Field::Real(value) => value.is_finite(),
            Field::Text(text) => !text.is_empty() && !text.chars().any(char::is_whitespace),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Int(value) => write!(f, "{}", value),
            Field::Real(value) => write!(f, "{}", value),
            Field::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Int(value)
    }
}

impl From<u32> for Field {
    fn from(value: u32) -> Self {
        Field::Int(value as i64)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Real(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

impl From<Pitch> for Field {
    fn from(pitch: Pitch) -> Self {
        Field::Text(pitch.to_string())
    }
}

/// A statement character followed by its positional fields.
///
/// Renders as the statement character glued to the space-joined fields:
/// `i` with `[1, 0.5, 0.25]` becomes `i1 0.5 0.25`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub statement: char,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(statement: char, fields: Vec<Field>) -> Self {
        Self { statement, fields }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statement)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// A single note for one instrument: p1 instrument, p2 start, p3 duration,
/// p4 amplitude, p5 pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub instrument: u32,
    /// Seconds
    pub start: f64,
    /// Seconds
    pub duration: f64,
    /// 0.0 -> full scale
    pub amplitude: f64,
    pub pitch: Pitch,
}

impl NoteEvent {
    pub fn to_record(&self) -> Record {
        Record::new(
            INSTRUMENT_STATEMENT,
            vec![
                self.instrument.into(),
                self.start.into(),
                self.duration.into(),
                self.amplitude.into(),
                self.pitch.into(),
            ],
        )
    }
}
