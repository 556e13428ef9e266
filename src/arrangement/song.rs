// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Whole-song arrangement.
//!
//! A song owns its sections and the form they are played in. Once every
//! unique section has a progression and melody, the measures of the whole
//! song are laid out by expanding the form.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{ComposeError, Result};
use crate::generators::{ChordProgression, GeneratorContext};
use crate::music::{KeySignature, Note, Pitch};

use super::measure::Measure;
use super::section::Section;

/// A song being composed
#[derive(Debug, Clone)]
pub struct Song {
    key: KeySignature,
    beats_per_measure: u32,
    structure: Vec<char>,
    sections: BTreeMap<char, Section>,
    measures: Option<Vec<Measure>>,
}

impl Song {
    /// Create a song; every label in the form needs a section
    pub fn new(
        key: KeySignature,
        beats_per_measure: u32,
        structure: Vec<char>,
        sections: Vec<Section>,
    ) -> Result<Self> {
        if beats_per_measure == 0 {
            return Err(ComposeError::InvalidParameter(
                "beats per measure must be at least 1".to_string(),
            ));
        }
        if structure.is_empty() {
            return Err(ComposeError::InvalidForm("empty form".to_string()));
        }

        let sections: BTreeMap<char, Section> =
            sections.into_iter().map(|s| (s.id(), s)).collect();
        if let Some(&missing) = structure.iter().find(|id| !sections.contains_key(id)) {
            return Err(ComposeError::MissingSection(missing));
        }

        Ok(Self {
            key,
            beats_per_measure,
            structure,
            sections,
            measures: None,
        })
    }

    /// Get the key
    pub fn key(&self) -> &KeySignature {
        &self.key
    }

    /// Get beats per measure
    pub fn beats_per_measure(&self) -> u32 {
        self.beats_per_measure
    }

    /// Generator context for this song
    pub fn context(&self) -> GeneratorContext {
        GeneratorContext::new(self.key, self.beats_per_measure)
    }

    /// Get the form
    pub fn structure(&self) -> &[char] {
        &self.structure
    }

    /// Section labels in order of first appearance in the form
    pub fn unique_sections(&self) -> Vec<char> {
        let mut unique = Vec::new();
        for &id in &self.structure {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        unique
    }

    /// Get a section by label
    pub fn section(&self, id: char) -> Result<&Section> {
        self.sections.get(&id).ok_or(ComposeError::MissingSection(id))
    }

    /// Get a mutable section by label
    ///
    /// Laid-out measures are discarded, since the section may change under them.
    pub fn section_mut(&mut self, id: char) -> Result<&mut Section> {
        let section = self
            .sections
            .get_mut(&id)
            .ok_or(ComposeError::MissingSection(id))?;
        self.measures = None;
        Ok(section)
    }

    /// Iterate over sections in label order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Set a section's chord progression, discarding laid-out measures
    pub fn set_chord_progression(&mut self, id: char, progression: ChordProgression) -> Result<()> {
        self.section_mut(id)?.set_progression(Some(progression));
        Ok(())
    }

    /// Progressions assigned so far, by label
    pub fn all_chord_progressions(&self) -> Vec<(char, &ChordProgression)> {
        self.sections
            .values()
            .filter_map(|s| s.progression().map(|p| (s.id(), p)))
            .collect()
    }

    /// Remove every progression, discarding laid-out measures
    pub fn clear_all_chord_progressions(&mut self) {
        for section in self.sections.values_mut() {
            section.set_progression(None);
        }
        self.measures = None;
    }

    /// Set a section's melody, discarding laid-out measures
    pub fn set_section_melody(&mut self, id: char, melody: Vec<Note>) -> Result<()> {
        self.section_mut(id)?.set_melody(melody);
        Ok(())
    }

    /// Lay out the measures of the whole song
    pub fn populate_measures(&mut self) -> Result<()> {
        self.populate_measures_with(|_| Ok(()))
    }

    /// Lay out the measures, passing each unique section measure through
    /// `decorate` once before the form is expanded
    pub fn populate_measures_with<F>(&mut self, mut decorate: F) -> Result<()>
    where
        F: FnMut(&mut Measure) -> Result<()>,
    {
        let context = self.context();
        let mut by_section: BTreeMap<char, Vec<Measure>> = BTreeMap::new();
        for id in self.unique_sections() {
            let mut measures = self.section(id)?.measures(&context)?;
            for measure in &mut measures {
                decorate(measure)?;
            }
            by_section.insert(id, measures);
        }

        let mut measures = Vec::new();
        for id in &self.structure {
            let section = by_section.get(id).ok_or(ComposeError::MissingSection(*id))?;
            measures.extend(section.iter().cloned());
        }
        self.measures = Some(measures);
        Ok(())
    }

    /// Get the measures of the whole song
    pub fn get_measures(&self) -> Result<&[Measure]> {
        self.measures
            .as_deref()
            .ok_or(ComposeError::MeasuresNotPopulated)
    }

    /// Get one measure
    pub fn measure(&self, index: usize) -> Option<&Measure> {
        self.measures.as_ref().and_then(|m| m.get(index))
    }

    /// Number of populated measures
    pub fn num_measures(&self) -> usize {
        self.measures.as_ref().map_or(0, Vec::len)
    }

    /// Append a closing measure
    pub fn append_final_measure(&mut self, measure: Measure) -> Result<()> {
        let expected = self.beats_per_measure as f64;
        if measure.duration() != expected {
            return Err(ComposeError::MeasureMisaligned {
                expected,
                actual: measure.duration(),
            });
        }
        self.measures
            .as_mut()
            .ok_or(ComposeError::MeasuresNotPopulated)?
            .push(measure);
        Ok(())
    }

    /// Last melody pitch of the song
    pub fn last_pitch(&self) -> Option<Pitch> {
        self.measures
            .as_ref()?
            .iter()
            .rev()
            .find_map(|m| m.last_note())
            .map(|n| *n.pitch())
    }

    /// Playing time at a tempo in beats per minute
    pub fn duration_at(&self, bpm: f64) -> Duration {
        if bpm <= 0.0 || !bpm.is_finite() {
            return Duration::ZERO;
        }
        let beats = self.num_measures() as f64 * self.beats_per_measure as f64;
        Duration::from_secs_f64(beats * 60.0 / bpm)
    }
}
