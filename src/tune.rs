//! Tune notation parser.
//!
//! A tune is a whitespace-separated sequence of tokens, each a note with
//! an optional duration:
//!
//! ```text
//! token    := note-part "-" duration-part | note-part
//! note     := letter [# | b] octave-digits      (empty = tied to previous)
//! duration := denominator ["."]                 (empty/absent = quarter)
//! ```
//!
//! Example: `C4 D4-8 E4-8 -4. D4 C4-1` — a C4 quarter, D4 and E4 eighths,
//! a dotted quarter tied to E4, a D4 quarter and a C4 whole note.

use std::str::FromStr;

use crate::duration::{DurationError, DurationValue};
use crate::pitch::{Pitch, PitchError};

/// One parsed note: a pitch plus its duration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub value: DurationValue,
}

impl Note {
    /// Frequency in Hz, from the pitch.
    pub fn frequency(&self) -> f64 {
        self.pitch.frequency()
    }

    /// Number of samples this note spans at the given tempo and rate.
    pub fn sample_count(&self, tempo_bpm: u32, sample_rate: u32) -> usize {
        self.value.sample_count(tempo_bpm, sample_rate)
    }
}

/// Why a token failed to parse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Pitch(#[from] PitchError),
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error("tied note has no preceding pitch")]
    TieWithoutPitch,
}

/// Parse failures. Token errors abort the whole parse and point at the
/// offending token and its position in the sequence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("token '{token}' at position {index}: {kind}")]
    Token {
        token: String,
        index: usize,
        kind: ParseErrorKind,
    },
    #[error("tune data is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// An ordered sequence of notes; insertion order is playback order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tune {
    notes: Vec<Note>,
}

impl Tune {
    /// Parse a tune string. Empty input is an empty tune, not an error.
    /// The first malformed token aborts the parse.
    pub fn parse(input: &str) -> Result<Tune, ParseError> {
        let token_error = |token: &str, index, kind| ParseError::Token {
            token: token.to_string(),
            index,
            kind,
        };

        let mut notes = Vec::new();
        // The parser's only state: the last non-tied pitch, which tied
        // notes (empty note part) reuse.
        let mut last_pitch: Option<Pitch> = None;

        for (index, token) in input.split_whitespace().enumerate() {
            let (note_part, duration_part) = match token.split_once('-') {
                Some((note, duration)) => (note, duration),
                None => (token, ""),
            };

            let pitch = if note_part.is_empty() {
                last_pitch
                    .ok_or_else(|| token_error(token, index, ParseErrorKind::TieWithoutPitch))?
            } else {
                let pitch = Pitch::parse(note_part)
                    .map_err(|e| token_error(token, index, e.into()))?;
                last_pitch = Some(pitch);
                pitch
            };

            let value = if duration_part.is_empty() {
                DurationValue::QUARTER
            } else {
                DurationValue::parse(duration_part)
                    .map_err(|e| token_error(token, index, e.into()))?
            };

            notes.push(Note { pitch, value });
        }

        Ok(Tune { notes })
    }

    /// Parse a tune from raw bytes (e.g. a file read with `fs::read`).
    pub fn parse_bytes(bytes: &[u8]) -> Result<Tune, ParseError> {
        Tune::parse(std::str::from_utf8(bytes)?)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl FromStr for Tune {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tune::parse(s)
    }
}

impl<'a> IntoIterator for &'a Tune {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DEFAULT_TEMPO_BPM;

    fn pitches(tune: &Tune) -> Vec<String> {
        tune.iter().map(|n| n.pitch.to_string()).collect()
    }

    fn values(tune: &Tune) -> Vec<f64> {
        tune.iter().map(|n| n.value.value()).collect()
    }

    #[test]
    fn test_parse_example_tune() {
        let tune = Tune::parse("C4 D4-8 E4-8 -4. D4 C4-1").unwrap();
        assert_eq!(tune.len(), 6);
        assert_eq!(pitches(&tune), ["C4", "D4", "E4", "E4", "D4", "C4"]);
        assert_eq!(values(&tune), [4.0, 8.0, 8.0, 2.0, 4.0, 1.0]);
    }

    #[test]
    fn test_empty_input_is_empty_tune() {
        assert!(Tune::parse("").unwrap().is_empty());
        assert!(Tune::parse("   \n\t  ").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_collapses() {
        let tune = Tune::parse("  C4   D4\n\nE4\t").unwrap();
        assert_eq!(pitches(&tune), ["C4", "D4", "E4"]);
    }

    #[test]
    fn test_missing_duration_defaults_to_quarter() {
        let tune = Tune::parse("A4 A4-").unwrap();
        assert_eq!(values(&tune), [4.0, 4.0]);
    }

    #[test]
    fn test_tied_note_reuses_last_pitch() {
        let tune = Tune::parse("G3-2 -8 -16.").unwrap();
        assert_eq!(pitches(&tune), ["G3", "G3", "G3"]);
        assert_eq!(values(&tune), [2.0, 8.0, 8.0]);
    }

    #[test]
    fn test_leading_tie_fails() {
        let err = Tune::parse("-4 C4").unwrap_err();
        assert_eq!(
            err,
            ParseError::Token {
                token: "-4".to_string(),
                index: 0,
                kind: ParseErrorKind::TieWithoutPitch,
            }
        );
    }

    #[test]
    fn test_bad_pitch_aborts_with_position() {
        let err = Tune::parse("C4 D4 H9-8").unwrap_err();
        match err {
            ParseError::Token { token, index, kind } => {
                assert_eq!(token, "H9-8");
                assert_eq!(index, 2);
                assert!(matches!(kind, ParseErrorKind::Pitch(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_duration_aborts_whole_parse() {
        let err = Tune::parse("C4-3").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Token {
                index: 0,
                kind: ParseErrorKind::Duration(DurationError::BadDenominator(3)),
                ..
            }
        ));
    }

    #[test]
    fn test_no_silent_fallback_pitch() {
        // A bad pitch must fail the parse, never default to some pitch.
        assert!(Tune::parse("Q4").is_err());
        assert!(Tune::parse("C4 Zz-8").is_err());
    }

    #[test]
    fn test_parse_bytes() {
        let tune = Tune::parse_bytes(b"C4 E4 G4").unwrap();
        assert_eq!(tune.len(), 3);
        assert!(matches!(
            Tune::parse_bytes(&[0xff, 0xfe]).unwrap_err(),
            ParseError::InvalidUtf8(_)
        ));
    }

    #[test]
    fn test_note_delegation() {
        let tune = Tune::parse("A4-4").unwrap();
        let note = &tune.notes()[0];
        assert_eq!(note.frequency(), 440.0);
        assert_eq!(
            note.sample_count(DEFAULT_TEMPO_BPM, 44100),
            note.value.sample_count(DEFAULT_TEMPO_BPM, 44100)
        );
    }
}
