use super::{BASE_OCTAVE, INSTRUMENT, NOTE_AMPLITUDE, NOTE_DURATION, TIME_STEP};
use crate::events::{NoteEvent, Pitch, Record};
use crate::score::{Score, ScoreError, ScoreText};
use rand::Rng;

/// Number of pitches the structured builder chooses from.
pub const PALETTE_SIZE: usize = 16;

/// `8.00` through `8.15`.
pub fn pitch_palette() -> [Pitch; PALETTE_SIZE] {
    std::array::from_fn(|i| Pitch::new(BASE_OCTAVE, i as u8))
}

/// Source of pitch choices for generated notes.
pub trait PitchPicker {
    /// Picks one entry of `palette`, which is never empty.
    fn pick(&mut self, palette: &[Pitch]) -> Pitch;
}

/// Uniform choice backed by any `rand` generator.
///
/// Wrap an entropy-seeded `StdRng` for a fresh melody every run, or a
/// `seed_from_u64` one for reproducible output.
pub struct RandomPitches<R>(pub R);

impl<R: Rng> PitchPicker for RandomPitches<R> {
    fn pick(&mut self, palette: &[Pitch]) -> Pitch {
        palette[self.0.random_range(0..palette.len())]
    }
}

/// Builds one heterogeneous record per note: instrument number, start,
/// duration, amplitude and a picked pitch.
pub fn build_records<P: PitchPicker + ?Sized>(count: usize, picker: &mut P) -> Vec<Record> {
    let palette = pitch_palette();
    (0..count)
        .map(|i| {
            NoteEvent {
                instrument: INSTRUMENT,
                start: i as f64 * TIME_STEP,
                duration: NOTE_DURATION,
                amplitude: NOTE_AMPLITUDE,
                pitch: picker.pick(&palette),
            }
            .to_record()
        })
        .collect()
}

/// Records first, text last: `count` notes with picked pitches, validated
/// into a `Score` and flattened line by line.
pub fn structured_score<P: PitchPicker + ?Sized>(
    count: usize,
    picker: &mut P,
) -> Result<ScoreText, ScoreError> {
    let score = Score::from_records(build_records(count, picker))?;
    Ok(score.to_text())
}
