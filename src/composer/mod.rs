// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song composition pipeline.
//!
//! Composing runs in a fixed order: chord progressions for every unique
//! section, then a rhythm and melody per section, then the measures of the
//! whole form with optional harmony notes, and finally a cadence measure
//! on the tonic.

pub mod progressions;

pub use progressions::{ProgressionOutcome, ProgressionSearch};

use rand::Rng;
use tracing::{debug, info};

use crate::arrangement::Song;
use crate::error::{ComposeError, Result};
use crate::generators::{Chord, MelodyEngine, RhythmGenerator};

use progressions::{DEFAULT_MAX_RESTARTS, DEFAULT_SECTION_ATTEMPTS};

/// A finished song and how its progressions were found
#[derive(Debug, Clone)]
pub struct Composition {
    pub song: Song,
    pub progressions: ProgressionOutcome,
}

/// Drives the generators over a song
#[derive(Debug, Clone)]
pub struct Composer {
    max_section_attempts: usize,
    max_restarts: usize,
}

impl Composer {
    /// Create a composer with default search limits
    pub fn new() -> Self {
        Self {
            max_section_attempts: DEFAULT_SECTION_ATTEMPTS,
            max_restarts: DEFAULT_MAX_RESTARTS,
        }
    }

    /// Set the progression search limits
    pub fn with_limits(mut self, max_section_attempts: usize, max_restarts: usize) -> Self {
        self.max_section_attempts = max_section_attempts;
        self.max_restarts = max_restarts;
        self
    }

    /// Compose every part of the song
    pub fn compose<R: Rng + ?Sized>(&self, mut song: Song, rng: &mut R) -> Result<Composition> {
        let context = song.context();
        info!(
            key = %song.key(),
            beats_per_measure = context.beats_per_measure,
            form = %song.structure().iter().collect::<String>(),
            "composing song"
        );

        let mut search = ProgressionSearch::new(self.max_section_attempts, self.max_restarts);
        let progressions = search.run(&mut song, rng)?;

        let engine = MelodyEngine::new(context);
        for id in song.unique_sections() {
            let section = song.section(id)?;
            let progression = section
                .progression()
                .ok_or(ComposeError::MissingProgression(id))?;
            let rhythm = RhythmGenerator::new(section.rhythm_weight())?.generate(
                section.num_measures() as u32,
                context.beats_per_measure,
                rng,
            )?;
            let melody = engine.create_melody(progression, &rhythm, rng)?;
            let melody = engine.divide_cross_measure_notes(&melody)?;
            debug!(
                section = %id,
                rhythm = rhythm.len(),
                notes = melody.len(),
                "melody generated"
            );
            song.set_section_melody(id, melody)?;
        }

        song.populate_measures_with(|measure| {
            let harmony = engine.harmonize(measure, rng)?;
            measure.set_harmony(harmony);
            Ok(())
        })?;

        let last = song.last_pitch().ok_or(ComposeError::MeasuresNotPopulated)?;
        let cadence = engine.final_measure(Chord::tonic(*song.key()), &last)?;
        song.append_final_measure(cadence)?;

        info!(
            measures = song.num_measures(),
            restarts = progressions.restarts(),
            distinct = progressions.is_distinct(),
            "song composed"
        );
        Ok(Composition { song, progressions })
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}
