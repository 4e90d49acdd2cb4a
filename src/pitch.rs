//! Musical pitch: chromatic pitch classes plus an octave, with range
//! validation and equal-temperament frequency calculation.

use std::fmt;
use std::str::FromStr;

/// Lowest supported octave.
pub const OCTAVE_MIN: u8 = 0;
/// Highest supported octave. Only C is playable up here (C8).
pub const OCTAVE_MAX: u8 = 8;

/// The twelve chromatic pitch classes, spelled with sharps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    /// Semitone offset relative to A in the same octave (C=-9 .. B=+2).
    pub fn offset_from_a(self) -> i32 {
        match self {
            PitchClass::C => -9,
            PitchClass::CSharp => -8,
            PitchClass::D => -7,
            PitchClass::DSharp => -6,
            PitchClass::E => -5,
            PitchClass::F => -4,
            PitchClass::FSharp => -3,
            PitchClass::G => -2,
            PitchClass::GSharp => -1,
            PitchClass::A => 0,
            PitchClass::ASharp => 1,
            PitchClass::B => 2,
        }
    }

    /// Look up a letter + optional accidental spelling. Letters are
    /// case-insensitive; flat spellings map to the enharmonic sharp
    /// (Bb == A#). Spellings outside the table (E#, Cb, ...) are None.
    pub fn from_spelling(letter: char, accidental: Option<char>) -> Option<PitchClass> {
        match (letter.to_ascii_uppercase(), accidental) {
            ('C', None) => Some(PitchClass::C),
            ('C', Some('#')) | ('D', Some('b')) => Some(PitchClass::CSharp),
            ('D', None) => Some(PitchClass::D),
            ('D', Some('#')) | ('E', Some('b')) => Some(PitchClass::DSharp),
            ('E', None) => Some(PitchClass::E),
            ('F', None) => Some(PitchClass::F),
            ('F', Some('#')) | ('G', Some('b')) => Some(PitchClass::FSharp),
            ('G', None) => Some(PitchClass::G),
            ('G', Some('#')) | ('A', Some('b')) => Some(PitchClass::GSharp),
            ('A', None) => Some(PitchClass::A),
            ('A', Some('#')) | ('B', Some('b')) => Some(PitchClass::ASharp),
            ('B', None) => Some(PitchClass::B),
            _ => None,
        }
    }

    /// Sharp-spelled name, e.g. "C#".
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pitch construction and parsing errors. Each violated range rule gets
/// its own variant so callers can tell exactly what was wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PitchError {
    #[error("note name '{0}' must be between A and G")]
    NameOutOfRange(char),
    #[error("octave {0} must be between 0 and 8")]
    OctaveOutOfRange(u32),
    #[error("octave 8 only supports C")]
    OctaveEightNotC,
    #[error("octave 0 only supports A, A#/Bb, B")]
    OctaveZeroBelowA,
    #[error("unknown pitch class '{0}'")]
    UnknownPitchClass(String),
    #[error("pitch '{0}' must be in a format like \"C#5\"")]
    Malformed(String),
}

/// A concrete pitch: pitch class + octave. Validated at construction,
/// so every live value is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    class: PitchClass,
    octave: u8,
}

impl Pitch {
    /// Construct a pitch, enforcing the supported range A0..=C8.
    pub fn new(class: PitchClass, octave: u8) -> Result<Pitch, PitchError> {
        if octave > OCTAVE_MAX {
            return Err(PitchError::OctaveOutOfRange(u32::from(octave)));
        }
        if octave == OCTAVE_MAX && class != PitchClass::C {
            return Err(PitchError::OctaveEightNotC);
        }
        if octave == OCTAVE_MIN && class.offset_from_a() < 0 {
            return Err(PitchError::OctaveZeroBelowA);
        }
        Ok(Pitch { class, octave })
    }

    /// Parse a token like `C4`, `C#5` or `Bb3`: a letter, an optional
    /// `#`/`b` accidental, then the octave digits.
    pub fn parse(token: &str) -> Result<Pitch, PitchError> {
        let bytes = token.as_bytes();
        if bytes.len() < 2 || !bytes[0].is_ascii_alphabetic() {
            return Err(PitchError::Malformed(token.to_string()));
        }

        let letter = bytes[0] as char;
        let accidental = if bytes.len() > 2 && (bytes[1] == b'#' || bytes[1] == b'b') {
            Some(bytes[1] as char)
        } else {
            None
        };
        let name_len = if accidental.is_some() { 2 } else { 1 };

        let octave: u32 = token[name_len..]
            .parse()
            .map_err(|_| PitchError::Malformed(token.to_string()))?;

        if !('A'..='G').contains(&letter.to_ascii_uppercase()) {
            return Err(PitchError::NameOutOfRange(letter));
        }
        let class = PitchClass::from_spelling(letter, accidental)
            .ok_or_else(|| PitchError::UnknownPitchClass(token[..name_len].to_string()))?;

        if octave > u32::from(OCTAVE_MAX) {
            return Err(PitchError::OctaveOutOfRange(octave));
        }
        Pitch::new(class, octave as u8)
    }

    pub fn class(self) -> PitchClass {
        self.class
    }

    pub fn octave(self) -> u8 {
        self.octave
    }

    /// Frequency in Hz, equal temperament with A4 = 440 Hz:
    /// f = 440 * 2^(n/12) where n is the semitone distance from A4.
    pub fn frequency(self) -> f64 {
        let semitones = self.class.offset_from_a() + (i32::from(self.octave) - 4) * 12;
        440.0 * 2.0_f64.powf(f64::from(semitones) / 12.0)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::parse(s)
    }
}
