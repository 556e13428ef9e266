// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Left-hand accompaniment and bass-register chord voicings.

use rand::Rng;

use crate::error::{ComposeError, Result};
use crate::music::{Note, Pitch, BASS_RANGE};

use super::chord::Chord;
use super::rhythm::RhythmGenerator;

/// Octave the accompaniment root is placed in
pub const ACCOMPANIMENT_OCTAVE: i32 = 2;

/// Diatonic steps above the root for the two-note figures, cycled in order
const FIGURE_STEPS: [(usize, usize); 3] = [(2, 4), (2, 7), (4, 7)];

/// Chance of voicing the full triad instead of root and fifth
const FULL_TRIAD_PROBABILITY: f64 = 0.6;

/// Voicings must span fewer half steps than this
const MAX_SPAN: i32 = 15;

/// Every voiced pitch must lie above this value
const VOICING_FLOOR: i32 = 35;

/// Builds accompaniment for a chord
#[derive(Debug, Clone)]
pub struct Accompanist {
    rhythm: RhythmGenerator,
    register: (i32, i32),
    max_span: i32,
}

impl Accompanist {
    /// Create an accompanist over the bass register
    pub fn new() -> Self {
        Self {
            rhythm: RhythmGenerator::accompaniment(),
            register: BASS_RANGE,
            max_span: MAX_SPAN,
        }
    }

    /// Use a different register window for voicings
    pub fn with_register(mut self, low: i32, high: i32) -> Self {
        self.register = (low, high);
        self
    }

    /// Voicings must span fewer than `span` half steps
    pub fn with_max_span(mut self, span: i32) -> Self {
        self.max_span = span;
        self
    }

    /// Root on the first beat, then two-note figures above it
    ///
    /// Each inner vector sounds together; the durations of the groups add up
    /// to `duration`, which must be a whole number of beats.
    pub fn accompany<R: Rng + ?Sized>(
        &self,
        chord: &Chord,
        duration: f64,
        rng: &mut R,
    ) -> Result<Vec<Vec<Note>>> {
        if duration < 1.0 || duration.fract() != 0.0 {
            return Err(ComposeError::InvalidParameter(format!(
                "accompaniment needs whole beats, got {}",
                duration
            )));
        }

        let rhythm = self.rhythm.generate(1, duration as u32, rng)?;
        let root = chord.pitch(1, ACCOMPANIMENT_OCTAVE);
        let mut groups = Vec::with_capacity(rhythm.len());

        for (i, &beats) in rhythm.iter().enumerate() {
            if i == 0 {
                groups.push(vec![Note::new(root, beats)?]);
                continue;
            }
            let (low, high) = FIGURE_STEPS[(i - 1) % FIGURE_STEPS.len()];
            groups.push(vec![
                Note::new(root.add_scale_steps(low), beats)?,
                Note::new(root.add_scale_steps(high), beats)?,
            ]);
        }

        Ok(groups)
    }

    /// A compact block voicing of the chord in the bass register
    ///
    /// Falls back to the other chord-tone subset, then to an unbounded span,
    /// before giving up.
    pub fn random_voicing<R: Rng + ?Sized>(
        &self,
        chord: &Chord,
        duration: f64,
        rng: &mut R,
    ) -> Result<Vec<Note>> {
        let [root, third, fifth] = chord.triad_steps();
        let triad = vec![root, third, fifth];
        let open = vec![root, fifth];
        let (preferred, other) = if rng.gen_bool(FULL_TRIAD_PROBABILITY) {
            (triad, open)
        } else {
            (open, triad)
        };

        for (steps, bounded) in [(&preferred, true), (&other, true), (&preferred, false)] {
            let voicings = self.voicings(chord, steps, bounded);
            if voicings.is_empty() {
                continue;
            }
            let chosen = &voicings[rng.gen_range(0..voicings.len())];
            return chosen
                .iter()
                .map(|&value| {
                    let pitch = Pitch::new(value, *chord.key())?;
                    Note::new(pitch, duration)
                })
                .collect();
        }

        Err(ComposeError::VoicingExhausted {
            chord: chord.to_string(),
        })
    }

    /// All voicings with one pitch per scale step, sorted low to high
    pub fn voicings(&self, chord: &Chord, steps: &[u8], span_bounded: bool) -> Vec<Vec<i32>> {
        let key = chord.key();
        let values = key.all_note_values();
        let (low, high) = self.register;

        let mut voicings: Vec<Vec<i32>> = vec![Vec::new()];
        for &step in steps {
            let options: Vec<i32> = values
                .iter()
                .copied()
                .filter(|&v| v >= low && v <= high)
                .filter(|&v| Pitch::step_in_scale(v, key).ok() == Some(step))
                .collect();
            voicings = voicings
                .iter()
                .flat_map(|partial| {
                    options.iter().map(move |&v| {
                        let mut next = partial.clone();
                        next.push(v);
                        next
                    })
                })
                .collect();
        }

        voicings
            .into_iter()
            .filter_map(|mut voicing| {
                voicing.sort_unstable();
                let lowest = *voicing.first()?;
                let highest = *voicing.last()?;
                let compact = !span_bounded || highest - lowest < self.max_span;
                (lowest > VOICING_FLOOR && compact).then_some(voicing)
            })
            .collect()
    }
}

impl Default for Accompanist {
    fn default() -> Self {
        Self::new()
    }
}
