use super::{BASE_OCTAVE, EVENT_COUNT, INSTRUMENT, NOTE_AMPLITUDE, NOTE_DURATION, TIME_STEP};
use crate::score::ScoreText;
use std::fmt::Write;

/// Ascending line of `EVENT_COUNT` notes, one semitone apart.
pub fn templated_score() -> ScoreText {
    templated_score_with(EVENT_COUNT)
}

/// Formats `count` note lines straight into the score string. Note `i`
/// starts at `i * TIME_STEP` and sits `i` semitones above `8.00`.
pub fn templated_score_with(count: usize) -> ScoreText {
    let mut sco = String::new();
    for i in 0..count {
        let _ = writeln!(
            sco,
            "i{} {} {} {} {}.{:02}",
            INSTRUMENT,
            i as f64 * TIME_STEP,
            NOTE_DURATION,
            NOTE_AMPLITUDE,
            BASE_OCTAVE,
            i
        );
    }
    ScoreText::from(sco)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templated_score_has_thirteen_lines() {
        assert_eq!(templated_score().line_count(), 13);
    }

    #[test]
    fn test_templated_lines_follow_index() {
        let text = templated_score();
        for (i, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split(' ').collect();
            assert_eq!(fields.len(), 5, "line {}: {}", i, line);
            assert_eq!(fields[0], "i1");
            assert_eq!(fields[1], format!("{}", i as f64 * 0.25));
            assert_eq!(fields[2], "0.25");
            assert_eq!(fields[3], "0.5");
            assert_eq!(fields[4], format!("8.{:02}", i));
        }
    }

    #[test]
    fn test_templated_first_and_last_lines() {
        let text = templated_score();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "i1 0 0.25 0.5 8.00");
        assert_eq!(lines[12], "i1 3 0.25 0.5 8.12");
        assert!(text.as_str().ends_with('\n'));
    }

    #[test]
    fn test_templated_largest_count_keeps_two_digit_pitches() {
        let text = templated_score_with(crate::generators::MAX_EVENT_COUNT);
        assert_eq!(text.line_count(), 100);
        assert_eq!(text.lines().last(), Some("i1 24.75 0.25 0.5 8.99"));
    }

    #[test]
    fn test_templated_zero_count_is_empty() {
        assert!(templated_score_with(0).is_empty());
    }
}
