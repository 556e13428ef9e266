// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! A single bar of melody with its chord and optional harmony note.

use crate::error::{ComposeError, Result};
use crate::generators::Chord;
use crate::music::Note;

/// One measure of a song
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    duration: f64,
    notes: Vec<Note>,
    chords: Vec<Chord>,
    /// Beat offset and note of an added harmony voice
    harmony: Option<(f64, Note)>,
}

impl Measure {
    /// Create a measure whose notes fill `duration` exactly
    pub fn new(duration: f64, notes: Vec<Note>, chords: Vec<Chord>) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ComposeError::InvalidDuration(duration));
        }
        let actual: f64 = notes.iter().map(|n| n.duration()).sum();
        if actual != duration {
            return Err(ComposeError::MeasureMisaligned {
                expected: duration,
                actual,
            });
        }

        Ok(Self {
            duration,
            notes,
            chords,
            harmony: None,
        })
    }

    /// Get the duration in beats
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Get the melody notes
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Get the chords
    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Get the harmony note
    pub fn harmony(&self) -> Option<&(f64, Note)> {
        self.harmony.as_ref()
    }

    /// Set the harmony note
    pub fn set_harmony(&mut self, harmony: Option<(f64, Note)>) {
        self.harmony = harmony;
    }

    /// Beat offset where note `index` starts
    pub fn beat_of_note(&self, index: usize) -> Option<f64> {
        if index >= self.notes.len() {
            return None;
        }
        Some(self.notes[..index].iter().map(|n| n.duration()).sum())
    }

    /// Melody note sounding at a beat offset
    pub fn note_at_beat(&self, beat: f64) -> Option<&Note> {
        let mut start = 0.0;
        for note in &self.notes {
            if beat >= start && beat < start + note.duration() {
                return Some(note);
            }
            start += note.duration();
        }
        None
    }

    /// Chord sounding at a beat offset
    ///
    /// Chords divide the measure evenly.
    pub fn chord_at_beat(&self, beat: f64) -> Option<&Chord> {
        if self.chords.is_empty() || beat < 0.0 || beat >= self.duration {
            return None;
        }
        let span = self.duration / self.chords.len() as f64;
        self.chords.get((beat / span).floor() as usize)
    }

    /// Last melody note
    pub fn last_note(&self) -> Option<&Note> {
        self.notes.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{KeySignature, Pitch};

    fn note(value: i32, duration: f64) -> Note {
        Note::new(Pitch::new(value, KeySignature::default()).unwrap(), duration).unwrap()
    }

    fn measure() -> Measure {
        Measure::new(
            4.0,
            vec![note(48, 1.5), note(50, 0.5), note(52, 2.0)],
            vec![Chord::tonic(KeySignature::default())],
        )
        .unwrap()
    }

    #[test]
    fn test_measure_must_fill_duration() {
        let err = Measure::new(4.0, vec![note(48, 3.0)], vec![]).unwrap_err();
        assert_eq!(
            err,
            ComposeError::MeasureMisaligned {
                expected: 4.0,
                actual: 3.0
            }
        );
        assert!(Measure::new(0.0, vec![], vec![]).is_err());
    }

    #[test]
    fn test_note_lookup() {
        let m = measure();
        assert_eq!(m.beat_of_note(0), Some(0.0));
        assert_eq!(m.beat_of_note(2), Some(2.0));
        assert_eq!(m.beat_of_note(3), None);
        assert_eq!(m.note_at_beat(1.75).map(|n| n.pitch().value()), Some(50));
        assert_eq!(m.note_at_beat(3.9).map(|n| n.pitch().value()), Some(52));
        assert!(m.note_at_beat(4.0).is_none());
        assert_eq!(m.last_note().map(|n| n.pitch().value()), Some(52));
    }

    #[test]
    fn test_chord_lookup() {
        let key = KeySignature::default();
        let mut m = measure();
        assert_eq!(m.chord_at_beat(3.0).map(|c| c.step()), Some(1));
        assert!(m.chord_at_beat(4.0).is_none());

        m.chords = vec![Chord::tonic(key), Chord::new(5, key).unwrap()];
        assert_eq!(m.chord_at_beat(1.5).map(|c| c.step()), Some(1));
        assert_eq!(m.chord_at_beat(2.0).map(|c| c.step()), Some(5));
    }

    #[test]
    fn test_harmony() {
        let mut m = measure();
        assert!(m.harmony().is_none());
        m.set_harmony(Some((2.0, note(55, 2.0))));
        assert_eq!(m.harmony().map(|(beat, _)| *beat), Some(2.0));
    }
}
