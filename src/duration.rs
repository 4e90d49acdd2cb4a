//! Note durations: notation tokens (`4`, `8.`, ...) normalized to a
//! quarter-note-equivalent value, then to seconds and sample counts.

use std::fmt;

/// Default playback tempo in beats per minute (one beat = one quarter note).
pub const DEFAULT_TEMPO_BPM: u32 = 88;
/// Sample rate used when reporting sample counts outside a live stream.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Duration token errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("duration '{0}' must be digits with an optional trailing dot")]
    Malformed(String),
    #[error("duration denominator {0} must be one of 1, 2, 4, 8, 16 or 32")]
    BadDenominator(u32),
}

/// A note duration, stored as its quarter-note-equivalent value: a plain
/// denominator maps to itself (quarter=4, eighth=8), a dotted one to a
/// fixed lookup (dotted quarter=2, dotted eighth=4, ...). Smaller value
/// means longer note: seconds = (60/tempo) * (4/value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationValue {
    value: f64,
}

impl DurationValue {
    /// The default duration when a token omits it.
    pub const QUARTER: DurationValue = DurationValue { value: 4.0 };

    /// Parse a duration token: digits from {1,2,4,8,16,32}, optionally
    /// followed by `.` for a dotted note. Dotted values come from a fixed
    /// table rather than arithmetic, so there is no rounding drift.
    pub fn parse(token: &str) -> Result<DurationValue, DurationError> {
        let (digits, dotted) = match token.strip_suffix('.') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        let denominator: u32 = digits
            .parse()
            .map_err(|_| DurationError::Malformed(token.to_string()))?;

        let value = match (denominator, dotted) {
            (1, false) => 1.0,
            (1, true) => 1.5,
            (2, false) => 2.0,
            (2, true) => 1.0,
            (4, false) => 4.0,
            (4, true) => 2.0,
            (8, false) => 8.0,
            (8, true) => 4.0,
            (16, false) => 16.0,
            (16, true) => 8.0,
            (32, false) => 32.0,
            (32, true) => 16.0,
            _ => return Err(DurationError::BadDenominator(denominator)),
        };
        Ok(DurationValue { value })
    }

    /// The normalized quarter-note-equivalent value.
    pub fn value(self) -> f64 {
        self.value
    }

    /// Real-time length at the given tempo, where one beat is a quarter
    /// note. `tempo_bpm` must be non-zero.
    pub fn seconds(self, tempo_bpm: u32) -> f64 {
        let seconds_per_beat = 60.0 / f64::from(tempo_bpm);
        seconds_per_beat * (4.0 / self.value)
    }

    /// Number of samples this duration spans at the given rate, rounded
    /// to nearest so concatenated notes do not drift audibly.
    pub fn sample_count(self, tempo_bpm: u32, sample_rate: u32) -> usize {
        (self.seconds(tempo_bpm) * f64::from(sample_rate)).round() as usize
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
