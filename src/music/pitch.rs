// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Absolute pitches constrained to a key.
//!
//! A pitch value counts half steps above C0 (C4 = 48). Every pitch carries
//! its key, and only values on the key's seven diatonic offsets are valid.

use std::fmt;

use crate::error::{ComposeError, Result};

use super::key::{KeySignature, Letter, NoteName};

/// Half steps from the root for each major-scale degree
pub const DIATONIC_OFFSETS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Modulus-safe lookup into [`DIATONIC_OFFSETS`]
pub fn diatonic_offset(index: i32) -> i32 {
    DIATONIC_OFFSETS[index.rem_euclid(7) as usize]
}

/// Octave-independent interval classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Unison,
    MinorSecond,
    MajorSecond,
    MinorThird,
    MajorThird,
    PerfectFourth,
    Tritone,
    PerfectFifth,
    MinorSixth,
    MajorSixth,
    MinorSeventh,
    MajorSeventh,
}

impl Interval {
    /// All interval classes in ascending order
    pub const ALL: [Interval; 12] = [
        Interval::Unison,
        Interval::MinorSecond,
        Interval::MajorSecond,
        Interval::MinorThird,
        Interval::MajorThird,
        Interval::PerfectFourth,
        Interval::Tritone,
        Interval::PerfectFifth,
        Interval::MinorSixth,
        Interval::MajorSixth,
        Interval::MinorSeventh,
        Interval::MajorSeventh,
    ];

    /// Interval class for a half-step count (octaves removed)
    pub fn from_semitones(semitones: u8) -> Self {
        Interval::ALL[(semitones % 12) as usize]
    }

    /// Size in half steps
    pub fn semitones(self) -> u8 {
        Interval::ALL.iter().position(|&i| i == self).unwrap_or(0) as u8
    }
}

/// A pitch within a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    value: i32,
    step: u8,
    key: KeySignature,
}

impl Pitch {
    /// Create a pitch, rejecting values outside the key
    pub fn new(value: i32, key: KeySignature) -> Result<Self> {
        if value < 0 {
            return Err(ComposeError::OffKeyPitch {
                value,
                key: key.to_string(),
            });
        }
        let step = Self::step_in_scale(value, &key)?;
        Ok(Self { value, step, key })
    }

    /// Create a pitch whose value was produced by diatonic arithmetic
    pub(crate) fn diatonic(value: i32, key: KeySignature) -> Self {
        let step = Self::step_in_scale(value, &key);
        debug_assert!(step.is_ok(), "diatonic value {} left key {}", value, key);
        Self {
            value,
            step: step.unwrap_or(1),
            key,
        }
    }

    /// Get the 1-based scale step of a value in a key
    pub fn step_in_scale(value: i32, key: &KeySignature) -> Result<u8> {
        let relative = (value.rem_euclid(12) - key.root() as i32).rem_euclid(12);
        DIATONIC_OFFSETS
            .iter()
            .position(|&offset| offset == relative)
            .map(|i| i as u8 + 1)
            .ok_or_else(|| ComposeError::OffKeyPitch {
                value,
                key: key.to_string(),
            })
    }

    /// Get the absolute value
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Get the key
    pub fn key(&self) -> &KeySignature {
        &self.key
    }

    /// Get the octave (C-based)
    pub fn octave(&self) -> i32 {
        self.value.div_euclid(12)
    }

    /// Get the scale step (1-7)
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Get the spelled note name
    pub fn letter(&self) -> NoteName {
        self.key.name_of_step(self.step)
    }

    /// Get the alteration of the spelled name (-1, 0 or 1)
    pub fn alter(&self) -> i8 {
        self.letter().alter()
    }

    /// Octave as written; Cb and B# sit across the C boundary
    pub fn written_octave(&self) -> i32 {
        let name = self.letter();
        match (name.letter(), name.alter()) {
            (Letter::C, -1) => self.octave() + 1,
            (Letter::B, 1) => self.octave() - 1,
            _ => self.octave(),
        }
    }

    /// Move by half steps, failing if the result leaves the key
    pub fn add_half_steps(&self, half_steps: i32) -> Result<Pitch> {
        Pitch::new(self.value + half_steps, self.key).map_err(|_| {
            ComposeError::InvalidTransposition {
                half_steps,
                from: self.letter().to_string(),
                key: self.key.to_string(),
            }
        })
    }

    /// Move up by diatonic steps
    pub fn add_scale_steps(&self, steps: usize) -> Pitch {
        let mut value = self.value;
        let mut index = self.step as i32 - 1;
        for _ in 0..steps {
            value += (diatonic_offset(index + 1) - diatonic_offset(index)).rem_euclid(12);
            index += 1;
        }
        Pitch::diatonic(value, self.key)
    }

    /// Interval class (0-11) from a lower or equal base pitch in the same key
    pub fn get_interval(&self, base: &Pitch) -> Result<u8> {
        if self.value < base.value {
            return Err(ComposeError::InvertedInterval {
                base: base.value,
                top: self.value,
            });
        }
        if self.key != base.key {
            return Err(ComposeError::KeyMismatch);
        }
        Ok((self.value.rem_euclid(12) + 12 - base.value.rem_euclid(12)).rem_euclid(12) as u8)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.written_octave())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> KeySignature {
        KeySignature::from_name(name).unwrap()
    }

    #[test]
    fn test_step_in_scale() {
        let d = key("D");
        assert_eq!(Pitch::step_in_scale(2, &d), Ok(1));
        assert_eq!(Pitch::step_in_scale(4, &d), Ok(2));
        assert_eq!(Pitch::step_in_scale(7, &d), Ok(4));
        assert_eq!(Pitch::step_in_scale(13, &d), Ok(7));
        assert!(Pitch::step_in_scale(12, &d).is_err());
    }

    #[test]
    fn test_every_key_value_has_a_step() {
        for pc in 0..12u8 {
            let k = KeySignature::from_pitch_class(pc).unwrap();
            let values = k.all_note_values();
            for &value in &values {
                let step = Pitch::step_in_scale(value, &k).unwrap();
                assert!((1..=7).contains(&step));
            }
            let lowest = values[0];
            let highest = values[values.len() - 1];
            for value in lowest..=highest {
                if !values.contains(&value) {
                    assert!(matches!(
                        Pitch::new(value, k),
                        Err(ComposeError::OffKeyPitch { .. })
                    ));
                }
            }
        }
    }

    #[test]
    fn test_pitch_fields() {
        let d = key("D");
        let p = Pitch::new(49, d).unwrap();
        assert_eq!(p.octave(), 4);
        assert_eq!(p.step(), 7);
        assert_eq!(p.letter().to_string(), "C#");
        assert_eq!(p.alter(), 1);
        assert_eq!(p.to_string(), "C#4");
    }

    #[test]
    fn test_cb_written_octave() {
        let gb = key("Gb");
        let cb = Pitch::new(59, gb).unwrap();
        assert_eq!(cb.letter().to_string(), "Cb");
        assert_eq!(cb.octave(), 4);
        assert_eq!(cb.written_octave(), 5);
    }

    #[test]
    fn test_pitch_equality_includes_key() {
        let c = Pitch::new(48, key("C")).unwrap();
        let f = Pitch::new(48, key("F")).unwrap();
        assert_ne!(c, f);
        assert_eq!(c, Pitch::new(48, key("C")).unwrap());
    }

    #[test]
    fn test_add_half_steps() {
        let c = key("C");
        let e = Pitch::new(52, c).unwrap();
        assert_eq!(e.add_half_steps(1).unwrap().value(), 53);
        assert_eq!(e.add_half_steps(-4).unwrap().value(), 48);

        let err = e.add_half_steps(2).unwrap_err();
        assert_eq!(
            err,
            ComposeError::InvalidTransposition {
                half_steps: 2,
                from: "E".to_string(),
                key: "C".to_string(),
            }
        );
        // source pitch is unchanged
        assert_eq!(e.value(), 52);
    }

    #[test]
    fn test_add_scale_steps() {
        let c = key("C");
        let b = Pitch::new(59, c).unwrap();
        assert_eq!(b.add_scale_steps(1).value(), 60);
        assert_eq!(b.add_scale_steps(0), b);

        let g = Pitch::new(55, c).unwrap();
        assert_eq!(g.add_scale_steps(2).value(), 59);
        assert_eq!(g.add_scale_steps(7).value(), 67);
    }

    #[test]
    fn test_add_scale_steps_interval_property() {
        for pc in 0..12u8 {
            let k = KeySignature::from_pitch_class(pc).unwrap();
            for &value in &k.all_note_values()[..21] {
                let base = Pitch::new(value, k).unwrap();
                for n in 0..15usize {
                    let moved = base.add_scale_steps(n);
                    let start = base.step() as i32 - 1;
                    let traversed: i32 = (0..n as i32)
                        .map(|i| {
                            (diatonic_offset(start + i + 1) - diatonic_offset(start + i))
                                .rem_euclid(12)
                        })
                        .sum();
                    assert_eq!(moved.value() - base.value(), traversed);
                    assert_eq!(
                        moved.get_interval(&base).unwrap() as i32,
                        traversed.rem_euclid(12)
                    );
                    assert_eq!(moved.step() as i32, (start + n as i32) % 7 + 1);
                }
            }
        }
    }

    #[test]
    fn test_get_interval() {
        let c = key("C");
        let c2 = Pitch::new(24, c).unwrap();
        let e4 = Pitch::new(52, c).unwrap();
        assert_eq!(e4.get_interval(&c2), Ok(4));
        assert_eq!(
            Interval::from_semitones(e4.get_interval(&c2).unwrap()),
            Interval::MajorThird
        );
        assert!(matches!(
            c2.get_interval(&e4),
            Err(ComposeError::InvertedInterval { .. })
        ));

        let other = Pitch::new(52, key("A")).unwrap();
        assert_eq!(e4.get_interval(&other), Err(ComposeError::KeyMismatch));
    }

    #[test]
    fn test_interval_semitones() {
        assert_eq!(Interval::PerfectFifth.semitones(), 7);
        assert_eq!(Interval::from_semitones(19), Interval::PerfectFifth);
    }
}
