// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melody generator constrained by register and harmony.
//!
//! The melody is a random walk over the key's diatonic pitch table, moving
//! one or two scale steps per note. Candidates must stay in the treble
//! register and, for notes of an eighth or longer, fit every chord sounding
//! under them. When no candidate fits the harmony the register-valid set is
//! used instead.

use rand::Rng;

use crate::arrangement::Measure;
use crate::error::{ComposeError, Result};
use crate::music::{Note, Pitch, Tie, TREBLE_RANGE};

use super::chord::{Chord, ChordProgression};
use super::GeneratorContext;

/// Allowed moves, in scale steps
pub const STEP_CHANGES: [i32; 4] = [-2, -1, 1, 2];

/// Octave of the pitch table the melody starts in
pub const START_OCTAVE: usize = 4;

/// Notes shorter than this ignore the harmony
const HARMONY_FIT_MIN_DURATION: f64 = 0.5;

/// Chance of adding a harmony note when one is available
const HARMONY_PROBABILITY: f64 = 0.7;

/// Melody engine for one song
#[derive(Debug, Clone)]
pub struct MelodyEngine {
    context: GeneratorContext,
    /// Every diatonic pitch value of the key, ascending
    scale_values: Vec<i32>,
    /// Inclusive register bounds for melody pitches
    register: (i32, i32),
}

impl MelodyEngine {
    /// Create an engine using the treble register
    pub fn new(context: GeneratorContext) -> Self {
        Self {
            scale_values: context.key.all_note_values(),
            context,
            register: TREBLE_RANGE,
        }
    }

    /// Use a different register window
    pub fn with_register(mut self, low: i32, high: i32) -> Self {
        self.register = (low, high);
        self
    }

    /// Get the context
    pub fn context(&self) -> &GeneratorContext {
        &self.context
    }

    /// Get the register bounds
    pub fn register(&self) -> (i32, i32) {
        self.register
    }

    /// Get the diatonic pitch table
    pub fn scale_values(&self) -> &[i32] {
        &self.scale_values
    }

    fn pitch_at(&self, index: usize) -> Pitch {
        Pitch::diatonic(self.scale_values[index], self.context.key)
    }

    fn in_register(&self, index: usize) -> bool {
        let value = self.scale_values[index];
        value >= self.register.0 && value <= self.register.1
    }

    /// Distinct chords sounding during `[start, start + duration)`
    pub fn chords_during(
        &self,
        progression: &ChordProgression,
        start: f64,
        duration: f64,
    ) -> Vec<Chord> {
        let measure = self.context.measure_beats();
        let first = self.context.measure_of(start);
        let last = (((start + duration) / measure).ceil() as usize).max(first + 1);

        let mut chords: Vec<Chord> = Vec::new();
        for index in first..last {
            if let Some(chord) = progression.chord_for_measure(index) {
                if !chords.contains(chord) {
                    chords.push(*chord);
                }
            }
        }
        chords
    }

    /// Choose the next index into the pitch table
    pub fn next_index<R: Rng + ?Sized>(
        &self,
        current: usize,
        duration: f64,
        chords: &[Chord],
        rng: &mut R,
    ) -> Result<usize> {
        let mut candidates: Vec<usize> = STEP_CHANGES
            .iter()
            .filter_map(|&delta| usize::try_from(current as i32 + delta).ok())
            .filter(|&index| index < self.scale_values.len() && self.in_register(index))
            .collect();
        if candidates.is_empty() {
            return Err(ComposeError::EmptyRegister { index: current });
        }

        if duration >= HARMONY_FIT_MIN_DURATION {
            let fitting: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&index| {
                    let pitch = self.pitch_at(index);
                    chords.iter().all(|chord| chord.fits(&pitch))
                })
                .collect();
            if !fitting.is_empty() {
                candidates = fitting;
            }
        }

        Ok(candidates[rng.gen_range(0..candidates.len())])
    }

    /// Create a melody over a rhythm and chord progression
    pub fn create_melody<R: Rng + ?Sized>(
        &self,
        progression: &ChordProgression,
        rhythm: &[f64],
        rng: &mut R,
    ) -> Result<Vec<Note>> {
        let Some((&first, rest)) = rhythm.split_first() else {
            return Ok(Vec::new());
        };

        // start on a tonic triad tone
        let mut index = rng.gen_range(0..=2) * 2 + START_OCTAVE * 7;
        let mut melody = vec![Note::new(self.pitch_at(index), first)?];
        let mut beat = first;

        for &duration in rest {
            let chords = self.chords_during(progression, beat, duration);
            index = self.next_index(index, duration, &chords, rng)?;
            melody.push(Note::new(self.pitch_at(index), duration)?);
            beat += duration;
        }

        Ok(melody)
    }

    /// Pick an optional harmony note a third above or below one of the
    /// measure's longest notes
    pub fn harmonize<R: Rng + ?Sized>(
        &self,
        measure: &Measure,
        rng: &mut R,
    ) -> Result<Option<(f64, Note)>> {
        let Some(chord) = measure.chords().first() else {
            return Ok(None);
        };
        let longest = measure
            .notes()
            .iter()
            .map(|n| n.duration())
            .fold(0.0, f64::max);
        let longest_notes: Vec<usize> = measure
            .notes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.duration() == longest)
            .map(|(i, _)| i)
            .collect();
        if longest_notes.is_empty() {
            return Ok(None);
        }

        let chosen = longest_notes[rng.gen_range(0..longest_notes.len())];
        let note = measure.notes()[chosen];
        let Some(index) = self
            .scale_values
            .iter()
            .position(|&v| v == note.pitch().value())
        else {
            return Ok(None);
        };

        let root = self.context.key.root_pitch();
        let mut candidates = Vec::new();
        for neighbour in [index.checked_sub(2), Some(index + 2)].into_iter().flatten() {
            if neighbour >= self.scale_values.len() {
                continue;
            }
            let pitch = self.pitch_at(neighbour);
            let interval = pitch.get_interval(&root)?;
            let step = Pitch::step_in_scale(root.value() + interval as i32, &self.context.key)?;
            if chord.passing_tones().contains(&step) {
                candidates.push(pitch);
            }
        }

        if candidates.is_empty() || !rng.gen_bool(HARMONY_PROBABILITY) {
            return Ok(None);
        }
        let pitch = candidates[rng.gen_range(0..candidates.len())];
        let beat = measure.beat_of_note(chosen).unwrap_or(0.0);
        Ok(Some((beat, Note::new(pitch, note.duration())?)))
    }

    /// Closing measure: one note on the chord tone nearest the last pitch
    pub fn final_measure(&self, chord: Chord, last_pitch: &Pitch) -> Result<Measure> {
        let triad = chord.triad_steps();
        let mut closest: Option<(i32, i32)> = None;
        for &value in &self.scale_values {
            let pitch = Pitch::diatonic(value, self.context.key);
            if !triad.contains(&pitch.step()) {
                continue;
            }
            let distance = (value - last_pitch.value()).abs();
            if closest.is_none_or(|(_, best)| distance < best) {
                closest = Some((value, distance));
            }
        }

        let value = closest.map(|(v, _)| v).unwrap_or(last_pitch.value());
        let beats = self.context.measure_beats();
        let note = Note::new(Pitch::new(value, self.context.key)?, beats)?;
        Measure::new(beats, vec![note], vec![chord])
    }

    /// Split notes that run across a barline into tied notes
    pub fn divide_cross_measure_notes(&self, melody: &[Note]) -> Result<Vec<Note>> {
        let measure = self.context.measure_beats();
        let mut result = Vec::with_capacity(melody.len());
        let mut beat = 0.0;

        for note in melody {
            let mut pieces = Vec::new();
            let mut position = beat;
            let mut left = note.duration();
            loop {
                let barline = ((position / measure).floor() + 1.0) * measure;
                if position + left <= barline {
                    break;
                }
                pieces.push(barline - position);
                left -= barline - position;
                position = barline;
            }

            if pieces.is_empty() {
                result.push(*note);
            } else {
                pieces.push(left);
                let last = pieces.len() - 1;
                for (i, &duration) in pieces.iter().enumerate() {
                    let tie = match i {
                        0 => Tie::Start,
                        i if i == last => Tie::Stop,
                        _ => Tie::Continue,
                    };
                    result.push(Note::tied(*note.pitch(), duration, tie)?);
                }
            }
            beat += note.duration();
        }

        Ok(result)
    }
}

/// Fraction of a measure's duration whose notes fit a chord
pub fn fit_ratio(measure: &Measure, chord: &Chord) -> f64 {
    let fitting: f64 = measure
        .notes()
        .iter()
        .filter(|n| chord.fits(n.pitch()))
        .map(|n| n.duration())
        .sum();
    fitting / measure.duration()
}
