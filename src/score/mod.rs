mod text;

pub use text::ScoreText;

use crate::events::Record;
use std::fmt::Write;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("record {index} has no fields")]
    EmptyRecord { index: usize },
    #[error("record {index} has {found} fields, expected {expected}")]
    ArityMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("record {index}, field {position}: {value:?} would break line framing")]
    InvalidField {
        index: usize,
        position: usize,
        value: String,
    },
}

/// Ordered list of score records, all of the same arity.
///
/// Insertion order is kept as-is; the engine may reorder by start time on
/// its own, but the text form follows the order records were pushed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    records: Vec<Record>,
}

impl Score {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn from_records<I>(records: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut score = Self::new();
        for record in records {
            score.push(record)?;
        }
        Ok(score)
    }

    /// Appends a record, rejecting it if it would break the framing or
    /// differ in arity from the records already in the score.
    pub fn push(&mut self, record: Record) -> Result<(), ScoreError> {
        let index = self.records.len();
        if record.fields.is_empty() {
            return Err(ScoreError::EmptyRecord { index });
        }
        if let Some(expected) = self.arity() {
            if record.arity() != expected {
                return Err(ScoreError::ArityMismatch {
                    index,
                    expected,
                    found: record.arity(),
                });
            }
        }
        if let Some(position) = record.fields.iter().position(|f| !f.is_framable()) {
            return Err(ScoreError::InvalidField {
                index,
                position,
                value: record.fields[position].to_string(),
            });
        }

        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn arity(&self) -> Option<usize> {
        self.records.first().map(Record::arity)
    }

    pub fn to_text(&self) -> ScoreText {
        let mut buffer = String::new();
        for record in &self.records {
            // Writing into a String cannot fail.
            let _ = writeln!(buffer, "{}", record);
        }
        ScoreText::from(buffer)
    }
}
