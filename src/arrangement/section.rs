// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sections and song form.
//!
//! A section is a labelled block of measures (A, B, C...) with its own chord
//! progression and melody. The form is the order sections are played in.

use rand::Rng;

use crate::error::{ComposeError, Result};
use crate::generators::rhythm::NEUTRAL_WEIGHT;
use crate::generators::{ChordProgression, GeneratorContext};
use crate::music::Note;

use super::measure::Measure;

/// Section label ('A', 'B', ...)
pub type SectionId = char;

/// A labelled section of a song
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: SectionId,
    num_measures: usize,
    num_chords: usize,
    /// Rhythm weight (1 = short notes, 5 = long notes)
    rhythm_weight: u8,
    progression: Option<ChordProgression>,
    melody: Option<Vec<Note>>,
}

impl Section {
    /// Create a section; the chord count must divide the measure count
    pub fn new(id: SectionId, num_measures: usize, num_chords: usize) -> Result<Self> {
        if num_measures == 0 || num_chords == 0 || !num_measures.is_multiple_of(num_chords) {
            return Err(ComposeError::UnevenChordCount {
                measures: num_measures,
                chords: num_chords,
            });
        }

        Ok(Self {
            id,
            num_measures,
            num_chords,
            rhythm_weight: NEUTRAL_WEIGHT,
            progression: None,
            melody: None,
        })
    }

    /// Set the rhythm weight
    pub fn with_rhythm_weight(mut self, weight: u8) -> Result<Self> {
        if !(1..=5).contains(&weight) {
            return Err(ComposeError::InvalidParameter(format!(
                "rhythm weight {} is outside 1-5",
                weight
            )));
        }
        self.rhythm_weight = weight;
        Ok(self)
    }

    /// Get the label
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Get the number of measures
    pub fn num_measures(&self) -> usize {
        self.num_measures
    }

    /// Get the number of chords
    pub fn num_chords(&self) -> usize {
        self.num_chords
    }

    /// Get the rhythm weight
    pub fn rhythm_weight(&self) -> u8 {
        self.rhythm_weight
    }

    /// Get the chord progression
    pub fn progression(&self) -> Option<&ChordProgression> {
        self.progression.as_ref()
    }

    /// Set the chord progression
    pub fn set_progression(&mut self, progression: Option<ChordProgression>) {
        self.progression = progression;
    }

    /// Get the melody
    pub fn melody(&self) -> Option<&[Note]> {
        self.melody.as_deref()
    }

    /// Set the melody
    pub fn set_melody(&mut self, melody: Vec<Note>) {
        self.melody = Some(melody);
    }

    /// Slice the melody into measures, each carrying its chord
    ///
    /// The melody must already be split at barlines.
    pub fn measures(&self, context: &GeneratorContext) -> Result<Vec<Measure>> {
        let progression = self
            .progression
            .as_ref()
            .ok_or(ComposeError::MissingProgression(self.id))?;
        let melody = self
            .melody
            .as_ref()
            .ok_or(ComposeError::MissingMelody(self.id))?;

        let beats = context.measure_beats();
        let mut measures = Vec::with_capacity(self.num_measures);
        let mut current: Vec<Note> = Vec::new();
        let mut elapsed = 0.0;

        for note in melody {
            if context.is_barline(elapsed) && !current.is_empty() {
                let index = measures.len();
                measures.push(self.close_measure(progression, index, beats, &mut current)?);
            }
            current.push(*note);
            elapsed += note.duration();
        }
        if !current.is_empty() {
            let index = measures.len();
            measures.push(self.close_measure(progression, index, beats, &mut current)?);
        }

        if measures.len() != self.num_measures {
            return Err(ComposeError::MeasureMisaligned {
                expected: self.num_measures as f64 * beats,
                actual: elapsed,
            });
        }
        Ok(measures)
    }

    fn close_measure(
        &self,
        progression: &ChordProgression,
        index: usize,
        beats: f64,
        notes: &mut Vec<Note>,
    ) -> Result<Measure> {
        let chords = progression
            .chord_for_measure(index)
            .map(|c| vec![*c])
            .unwrap_or_default();
        Measure::new(beats, std::mem::take(notes), chords)
    }

    /// Random form of `total` sections using up to `unique` labels
    ///
    /// The form opens with A then B, never repeats a label back to back, and
    /// introduces a new label only after the newest one has been used.
    pub fn random_form<R: Rng + ?Sized>(
        total: usize,
        unique: usize,
        rng: &mut R,
    ) -> Result<Vec<SectionId>> {
        if total == 0 || unique == 0 {
            return Err(ComposeError::InvalidForm(format!(
                "{} sections with {} unique",
                total, unique
            )));
        }
        if total == 1 {
            return Ok(vec!['A']);
        }
        if unique == 1 || unique > total || unique > 26 {
            return Err(ComposeError::InvalidForm(format!(
                "cannot arrange {} sections from {} unique",
                total, unique
            )));
        }

        let mut form = vec!['A', 'B'];
        let mut possible = vec!['A', 'B'];
        if unique > 2 {
            possible.push('C');
        }

        while form.len() < total {
            let last = form[form.len() - 1];
            let working: Vec<char> = possible.iter().copied().filter(|&c| c != last).collect();
            let chosen = working[rng.gen_range(0..working.len())];
            if Some(&chosen) == possible.last() && possible.len() < unique {
                possible.push((b'A' + possible.len() as u8) as char);
            }
            form.push(chosen);
        }

        Ok(form)
    }
}
