// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rhythm generator producing duration sequences.
//!
//! Rhythms are generated for many measures at once. A weight between 1 and
//! 5 skews the pool of candidate durations toward short (1) or long (5)
//! notes. Each choice is capped by the beats left, so the sequence always
//! sums to exactly `num_measures * beats_per_measure`.

use rand::Rng;

use crate::error::{ComposeError, Result};

/// Default melody durations, longest first
pub const DEFAULT_DURATIONS: [f64; 5] = [3.0, 2.0, 1.5, 1.0, 0.5];

/// Durations used by the left-hand accompaniment
pub const ACCOMPANIMENT_DURATIONS: [f64; 4] = [1.0, 2.0, 3.0, 4.0];

/// Neutral weight (equal copies of every duration)
pub const NEUTRAL_WEIGHT: u8 = 3;

const EIGHTH: f64 = 0.5;

/// Probabilities steering the rhythm search
#[derive(Debug, Clone)]
struct RhythmConfig {
    /// Chance of dropping eighths when starting on a beat
    skip_eighth_on_beat: f64,
    /// Chance of restricting choices to what fits in the current measure
    fit_measure: f64,
    /// Chance of following an on-beat eighth with a second eighth
    pair_eighths: f64,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            skip_eighth_on_beat: 0.5,
            fit_measure: 0.6,
            pair_eighths: 0.5,
        }
    }
}

/// Rhythm generator
#[derive(Debug, Clone)]
pub struct RhythmGenerator {
    config: RhythmConfig,
    weight: u8,
    /// Frequency-weighted candidate durations
    pool: Vec<f64>,
}

impl RhythmGenerator {
    /// Create a generator over the default durations
    pub fn new(weight: u8) -> Result<Self> {
        Self::with_durations(&DEFAULT_DURATIONS, weight)
    }

    /// Create a generator over custom durations
    pub fn with_durations(durations: &[f64], weight: u8) -> Result<Self> {
        if !(1..=5).contains(&weight) {
            return Err(ComposeError::InvalidParameter(format!(
                "rhythm weight {} is outside 1-5",
                weight
            )));
        }
        if durations.is_empty() || durations.iter().any(|&d| !d.is_finite() || d <= 0.0) {
            return Err(ComposeError::InvalidParameter(
                "rhythm durations must be positive".to_string(),
            ));
        }

        Ok(Self {
            config: RhythmConfig::default(),
            weight,
            pool: Self::weighted_pool(durations, weight),
        })
    }

    /// Generator for the accompaniment (whole beats only, neutral weight)
    pub fn accompaniment() -> Self {
        Self {
            config: RhythmConfig::default(),
            weight: NEUTRAL_WEIGHT,
            pool: Self::weighted_pool(&ACCOMPANIMENT_DURATIONS, NEUTRAL_WEIGHT),
        }
    }

    /// Expand durations into a pool where rank `i` (0 = longest) gets
    /// `10 + (2 - i) * 2 * (weight - 3)` copies
    pub fn weighted_pool(durations: &[f64], weight: u8) -> Vec<f64> {
        let mut ranked = durations.to_vec();
        ranked.sort_by(|a, b| b.total_cmp(a));
        ranked.dedup();

        let shift = weight as i32 - NEUTRAL_WEIGHT as i32;
        ranked
            .iter()
            .enumerate()
            .flat_map(|(i, &d)| {
                let copies = (10 + (2 - i as i32) * 2 * shift).max(0) as usize;
                std::iter::repeat(d).take(copies)
            })
            .collect()
    }

    /// Get the weight
    pub fn weight(&self) -> u8 {
        self.weight
    }

    /// Get the weighted candidate pool
    pub fn pool(&self) -> &[f64] {
        &self.pool
    }

    /// Generate durations filling `num_measures` measures exactly
    pub fn generate<R: Rng + ?Sized>(
        &self,
        num_measures: u32,
        beats_per_measure: u32,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        let measure = beats_per_measure as f64;
        let total = (num_measures * beats_per_measure) as f64;
        let mut result = Vec::new();
        let mut elapsed = 0.0;

        while elapsed < total {
            let remaining = total - elapsed;
            let mut available: Vec<f64> =
                self.pool.iter().copied().filter(|&d| d <= remaining).collect();
            if available.is_empty() {
                return Err(ComposeError::UnfillableRhythm { remaining });
            }

            let on_beat = remaining.fract() == 0.0;
            if on_beat && rng.gen_bool(self.config.skip_eighth_on_beat) {
                retain_if_any(&mut available, |d| d != EIGHTH);
            }
            if rng.gen_bool(self.config.fit_measure) {
                let left_in_measure = measure - elapsed % measure;
                retain_if_any(&mut available, |d| d <= left_in_measure);
            }

            let duration = available[rng.gen_range(0..available.len())];
            result.push(duration);
            elapsed += duration;

            if on_beat && duration == EIGHTH && rng.gen_bool(self.config.pair_eighths) {
                result.push(EIGHTH);
                elapsed += EIGHTH;
            }
        }

        Ok(result)
    }
}

/// Keep only matching candidates, unless none match
fn retain_if_any(candidates: &mut Vec<f64>, keep: impl Fn(f64) -> bool) {
    if candidates.iter().any(|&d| keep(d)) {
        candidates.retain(|&d| keep(d));
    }
}

/// Count durations that run across a barline without ending on it
pub fn count_over_measure_ties(rhythm: &[f64], beats_per_measure: u32) -> usize {
    let measure = beats_per_measure as f64;
    let mut start = 0.0;
    let mut count = 0;
    for &duration in rhythm {
        let end = start + duration;
        if (end / measure).floor() > (start / measure).floor() && end % measure != 0.0 {
            count += 1;
        }
        start = end;
    }
    count
}
