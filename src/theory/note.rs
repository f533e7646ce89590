use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
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
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Wraps any semitone count into the octave.
    pub fn from_semitone(semitone: i32) -> Self {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    pub fn semitone(self) -> i32 {
        self as i32
    }

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

/// Lowest and highest octave accepted when parsing a note name.
pub const MIN_OCTAVE: i32 = -1;
pub const MAX_OCTAVE: i32 = 9;

/// A pitch in scientific notation, e.g. `C3` or `F#4`. Always spelled with
/// sharps; flats are accepted when parsing and normalized away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    pub pitch_class: PitchClass,
    pub octave: i32,
}

impl Note {
    pub fn new(pitch_class: PitchClass, octave: i32) -> Self {
        Self {
            pitch_class,
            octave,
        }
    }

    fn from_absolute(semitones: i32) -> Self {
        Self {
            pitch_class: PitchClass::from_semitone(semitones),
            octave: semitones.div_euclid(12),
        }
    }

    fn absolute(&self) -> i32 {
        self.octave
            .saturating_mul(12)
            .saturating_add(self.pitch_class.semitone())
    }

    /// MIDI note number, with `C4` = 60.
    pub fn midi(&self) -> i32 {
        self.absolute().saturating_add(12)
    }

    pub fn transpose(&self, semitones: i32) -> Self {
        Self::from_absolute(self.absolute().saturating_add(semitones))
    }

    pub fn raise_octave(&mut self) {
        self.octave = self.octave.saturating_add(1);
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class.name(), self.octave)
    }
}

impl FromStr for Note {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidNote(s.to_string());
        let mut chars = s.trim().chars().peekable();

        let natural = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(invalid()),
        };

        let mut accidental: i32 = 0;
        while let Some(&c) = chars.peek() {
            match c {
                '#' => accidental += 1,
                'b' => accidental -= 1,
                _ => break,
            }
            chars.next();
        }

        let octave: i32 = chars.collect::<String>().parse().map_err(|_| invalid())?;
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) || accidental.abs() > 2 {
            return Err(invalid());
        }

        Ok(Self::from_absolute(octave * 12 + natural + accidental))
    }
}

impl TryFrom<String> for Note {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}
