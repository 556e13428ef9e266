// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Key signatures and spelled note names.
//!
//! A key is built once from its root pitch class. The circle-of-fifths
//! table gives the signed accidental count, the order of sharps or flats
//! picks which letters are altered, and the seven white-key letters are
//! rotated to begin on the root.

use std::fmt;

use crate::error::{ComposeError, Result};

use super::pitch::{Pitch, DIATONIC_OFFSETS};

/// Number of octaves covered by [`KeySignature::all_note_values`]
pub const KEY_OCTAVES: i32 = 8;

/// Signed accidental count per root pitch class (negative = flats)
pub const CIRCLE_OF_FIFTHS: [i8; 12] = [0, -5, 2, -3, 4, -1, -6, 1, -4, 3, -2, 5];

const ORDER_OF_SHARPS: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

const ORDER_OF_FLATS: [Letter; 7] = [
    Letter::B,
    Letter::E,
    Letter::A,
    Letter::D,
    Letter::G,
    Letter::C,
    Letter::F,
];

/// White-key letter names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters starting from C
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Pitch class of the natural letter
    pub fn natural_pitch_class(self) -> u8 {
        DIATONIC_OFFSETS[self.index()] as u8
    }

    fn index(self) -> usize {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        };
        write!(f, "{}", c)
    }
}

/// A spelled note name such as `F#` or `Bb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    letter: Letter,
    /// -1 for flat, 0 for natural, 1 for sharp
    alter: i8,
}

impl NoteName {
    /// Create a note name from a letter and alteration
    pub fn new(letter: Letter, alter: i8) -> Self {
        Self {
            letter,
            alter: alter.clamp(-1, 1),
        }
    }

    /// Parse a note name (e.g., "C", "F#", "Bb")
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| ComposeError::InvalidNoteName(s.to_string()))?;
        let alter = match (chars.next(), chars.next()) {
            (None, _) => 0,
            (Some('#'), None) => 1,
            (Some('b'), None) => -1,
            _ => return Err(ComposeError::InvalidNoteName(s.to_string())),
        };
        Ok(Self::new(letter, alter))
    }

    /// Get the letter
    pub fn letter(self) -> Letter {
        self.letter
    }

    /// Get the alteration (-1, 0 or 1)
    pub fn alter(self) -> i8 {
        self.alter
    }

    /// Get the pitch class (0-11)
    pub fn pitch_class(self) -> u8 {
        (self.letter.natural_pitch_class() as i8 + self.alter).rem_euclid(12) as u8
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alter {
            1 => write!(f, "{}#", self.letter),
            -1 => write!(f, "{}b", self.letter),
            _ => write!(f, "{}", self.letter),
        }
    }
}

/// Which accidentals a key signature uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Natural,
    Sharps,
    Flats,
}

/// A major key signature with its spelled diatonic scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySignature {
    root: u8,
    scale: [NoteName; 7],
}

impl KeySignature {
    /// Create a key from a root pitch class (0-11)
    pub fn from_pitch_class(pitch_class: u8) -> Result<Self> {
        if pitch_class > 11 {
            return Err(ComposeError::InvalidParameter(format!(
                "key pitch class {} is outside 0-11",
                pitch_class
            )));
        }
        Ok(Self {
            root: pitch_class,
            scale: Self::build_scale(pitch_class),
        })
    }

    /// Create a key from a root note name
    ///
    /// Enharmonic spellings are normalized to the circle-of-fifths spelling,
    /// so `F#` yields the key of Gb.
    pub fn from_name(name: &str) -> Result<Self> {
        let note = NoteName::parse(name)?;
        Self::from_pitch_class(note.pitch_class())
    }

    /// Build the seven spelled scale degrees for a root pitch class
    pub fn build_scale(pitch_class: u8) -> [NoteName; 7] {
        let pitch_class = pitch_class % 12;
        let count = CIRCLE_OF_FIFTHS[pitch_class as usize];
        let (order, alter) = if count > 0 {
            (&ORDER_OF_SHARPS, 1)
        } else {
            (&ORDER_OF_FLATS, -1)
        };
        let altered = &order[..count.unsigned_abs() as usize];

        let spelled: Vec<NoteName> = Letter::ALL
            .iter()
            .map(|&letter| {
                if altered.contains(&letter) {
                    NoteName::new(letter, alter)
                } else {
                    NoteName::new(letter, 0)
                }
            })
            .collect();

        let start = spelled
            .iter()
            .position(|n| n.pitch_class() == pitch_class)
            .unwrap_or(0);

        let mut scale = [NoteName::new(Letter::C, 0); 7];
        for (i, slot) in scale.iter_mut().enumerate() {
            *slot = spelled[(start + i) % 7];
        }
        scale
    }

    /// Get the root pitch class
    pub fn root(&self) -> u8 {
        self.root
    }

    /// Get the spelled root note
    pub fn root_name(&self) -> NoteName {
        self.scale[0]
    }

    /// Get the spelled scale, starting on the root
    pub fn scale(&self) -> &[NoteName; 7] {
        &self.scale
    }

    /// Get the spelled note on a scale step (1-7)
    pub fn name_of_step(&self, step: u8) -> NoteName {
        self.scale[((step as usize).max(1) - 1) % 7]
    }

    /// Signed accidental count for key-signature notation
    pub fn accidentals(&self) -> i8 {
        CIRCLE_OF_FIFTHS[self.root as usize]
    }

    /// Whether the key is written with sharps or flats
    pub fn uses(&self) -> Accidental {
        match self.accidentals() {
            0 => Accidental::Natural,
            n if n > 0 => Accidental::Sharps,
            _ => Accidental::Flats,
        }
    }

    /// The root pitch in octave 0
    pub fn root_pitch(&self) -> Pitch {
        Pitch::diatonic(self.root as i32, *self)
    }

    /// Get the pitch on a scale step (1-based, may exceed 7) in an octave
    pub fn pitch(&self, step: u8, octave: i32) -> Pitch {
        let step = step.max(1) as usize - 1;
        let octave = octave + (step / 7) as i32;
        let value = 12 * octave + self.root as i32 + DIATONIC_OFFSETS[step % 7];
        Pitch::diatonic(value, *self)
    }

    /// All diatonic pitch values over eight octaves, ascending from the root
    pub fn all_note_values(&self) -> Vec<i32> {
        (0..KEY_OCTAVES)
            .flat_map(|octave| {
                let base = octave * 12 + self.root as i32;
                DIATONIC_OFFSETS.iter().map(move |offset| base + offset)
            })
            .collect()
    }
}

impl Default for KeySignature {
    /// C major
    fn default() -> Self {
        Self {
            root: 0,
            scale: Self::build_scale(0),
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(key: &KeySignature) -> Vec<String> {
        key.scale().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_note_name_parse() {
        assert_eq!(NoteName::parse("C").unwrap().pitch_class(), 0);
        assert_eq!(NoteName::parse("F#").unwrap().pitch_class(), 6);
        assert_eq!(NoteName::parse("Bb").unwrap().pitch_class(), 10);
        assert_eq!(NoteName::parse("Cb").unwrap().pitch_class(), 11);
        assert!(NoteName::parse("H").is_err());
        assert!(NoteName::parse("C##").is_err());
        assert!(NoteName::parse("c").is_err());
        assert!(NoteName::parse("").is_err());
    }

    #[test]
    fn test_c_major_scale() {
        let key = KeySignature::from_name("C").unwrap();
        assert_eq!(names(&key), vec!["C", "D", "E", "F", "G", "A", "B"]);
        assert_eq!(key.accidentals(), 0);
        assert_eq!(key.uses(), Accidental::Natural);
    }

    #[test]
    fn test_d_major_scale() {
        let key = KeySignature::from_name("D").unwrap();
        assert_eq!(names(&key), vec!["D", "E", "F#", "G", "A", "B", "C#"]);
        assert_eq!(key.accidentals(), 2);
        assert_eq!(key.uses(), Accidental::Sharps);
    }

    #[test]
    fn test_flat_keys() {
        let key = KeySignature::from_name("Gb").unwrap();
        assert_eq!(names(&key), vec!["Gb", "Ab", "Bb", "Cb", "Db", "Eb", "F"]);
        assert_eq!(key.uses(), Accidental::Flats);

        let key = KeySignature::from_pitch_class(10).unwrap();
        assert_eq!(names(&key), vec!["Bb", "C", "D", "Eb", "F", "G", "A"]);
    }

    #[test]
    fn test_enharmonic_root_normalized() {
        let key = KeySignature::from_name("F#").unwrap();
        assert_eq!(key.root(), 6);
        assert_eq!(key.root_name().to_string(), "Gb");
    }

    #[test]
    fn test_every_root_has_seven_letters() {
        for pc in 0..12u8 {
            let key = KeySignature::from_pitch_class(pc).unwrap();
            let mut letters: Vec<Letter> = key.scale().iter().map(|n| n.letter()).collect();
            letters.sort_by_key(|l| l.natural_pitch_class());
            letters.dedup();
            assert_eq!(letters.len(), 7, "key {}", key);

            let altered = key.scale().iter().filter(|n| n.alter() != 0).count();
            assert_eq!(altered, CIRCLE_OF_FIFTHS[pc as usize].unsigned_abs() as usize);

            assert_eq!(key.root_name().pitch_class(), pc);
            for (i, name) in key.scale().iter().enumerate() {
                let expected = (pc as i32 + DIATONIC_OFFSETS[i]).rem_euclid(12) as u8;
                assert_eq!(name.pitch_class(), expected);
            }
        }
    }

    #[test]
    fn test_invalid_pitch_class() {
        assert!(KeySignature::from_pitch_class(12).is_err());
    }

    #[test]
    fn test_all_note_values() {
        let key = KeySignature::from_name("D").unwrap();
        let values = key.all_note_values();
        assert_eq!(values.len(), 56);
        assert_eq!(&values[..8], &[2, 4, 6, 7, 9, 11, 13, 14]);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_key_pitch() {
        let key = KeySignature::from_name("C").unwrap();
        assert_eq!(key.pitch(1, 4).value(), 48);
        assert_eq!(key.pitch(5, 4).value(), 55);
        assert_eq!(key.pitch(8, 4).value(), 60);
        assert_eq!(key.root_pitch().value(), 0);
    }
}
