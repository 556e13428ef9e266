// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generative engines for algorithmic composition.
//!
//! This module provides the rhythm, chord-progression, melody and
//! accompaniment generators. Each one draws from a caller-supplied RNG so a
//! whole song can be reproduced from a single seed.

pub mod chord;
pub mod melody;
pub mod rhythm;
pub mod voicing;

pub use chord::{different_enough, edit_distance, Chord, ChordProgression, Quality};
pub use melody::MelodyEngine;
pub use rhythm::{count_over_measure_ties, RhythmGenerator};
pub use voicing::Accompanist;

use crate::music::KeySignature;

/// Context shared by generators working on one song
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorContext {
    /// Key of the song
    pub key: KeySignature,
    /// Beats per measure (constant for the whole song)
    pub beats_per_measure: u32,
}

impl GeneratorContext {
    /// Create a new context
    pub fn new(key: KeySignature, beats_per_measure: u32) -> Self {
        Self {
            key,
            beats_per_measure,
        }
    }

    /// Measure length in beats
    pub fn measure_beats(&self) -> f64 {
        self.beats_per_measure as f64
    }

    /// Zero-based measure containing a beat position
    pub fn measure_of(&self, beat: f64) -> usize {
        (beat / self.measure_beats()).floor() as usize
    }

    /// Offset of a beat position from the start of its measure
    pub fn beat_in_measure(&self, beat: f64) -> f64 {
        beat % self.measure_beats()
    }

    /// Beats left until the next barline (a full measure on a barline)
    pub fn remaining_in_measure(&self, beat: f64) -> f64 {
        self.measure_beats() - self.beat_in_measure(beat)
    }

    /// Whether a beat position falls exactly on a barline
    pub fn is_barline(&self, beat: f64) -> bool {
        self.beat_in_measure(beat) == 0.0
    }
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self {
            key: KeySignature::default(),
            beats_per_measure: 4,
        }
    }
}
