// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Assigning distinct chord progressions to the sections of a song.
//!
//! Each unique section gets a random progression that must differ from
//! every progression already assigned, in both directions. A section that
//! keeps colliding forces a restart of the whole assignment. When restarts
//! run out the search settles for the least-colliding candidates.

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::arrangement::Song;
use crate::error::Result;
use crate::generators::{different_enough, ChordProgression};

/// Attempts per section before restarting
pub const DEFAULT_SECTION_ATTEMPTS: usize = 15;

/// Restarts before settling for best effort
pub const DEFAULT_MAX_RESTARTS: usize = 50;

/// How a progression search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionOutcome {
    /// Every pair of progressions is different enough
    Distinct { restarts: usize },
    /// Restarts ran out and some progressions may be too similar
    BestEffort { restarts: usize },
}

impl ProgressionOutcome {
    /// Number of restarts used
    pub fn restarts(&self) -> usize {
        match self {
            ProgressionOutcome::Distinct { restarts } => *restarts,
            ProgressionOutcome::BestEffort { restarts } => *restarts,
        }
    }

    /// Whether the progressions are all distinct
    pub fn is_distinct(&self) -> bool {
        matches!(self, ProgressionOutcome::Distinct { .. })
    }
}

/// Search state for one song
#[derive(Debug, Clone)]
pub struct ProgressionSearch {
    max_section_attempts: usize,
    max_restarts: usize,
    restarts: usize,
}

enum SectionResult {
    Accepted(ChordProgression),
    RestartNeeded,
}

impl ProgressionSearch {
    /// Create a new search
    pub fn new(max_section_attempts: usize, max_restarts: usize) -> Self {
        Self {
            max_section_attempts: max_section_attempts.max(1),
            max_restarts,
            restarts: 0,
        }
    }

    /// Get the number of restarts so far
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Assign a progression to every unique section of the song
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        song: &mut Song,
        rng: &mut R,
    ) -> Result<ProgressionOutcome> {
        loop {
            song.clear_all_chord_progressions();
            let mut restart = false;

            for id in song.unique_sections() {
                let num_chords = song.section(id)?.num_chords();
                match self.search_section(song, num_chords, rng) {
                    SectionResult::Accepted(progression) => {
                        debug!(
                            section = %id,
                            chords = %progression.numerals(),
                            "progression accepted"
                        );
                        song.set_chord_progression(id, progression)?;
                    }
                    SectionResult::RestartNeeded => {
                        debug!(
                            section = %id,
                            restarts = self.restarts,
                            "progression search restarting"
                        );
                        restart = true;
                        break;
                    }
                }
            }

            if !restart {
                return Ok(ProgressionOutcome::Distinct {
                    restarts: self.restarts,
                });
            }

            self.restarts += 1;
            if self.restarts >= self.max_restarts {
                warn!(
                    restarts = self.restarts,
                    "could not find distinct progressions, using closest candidates"
                );
                self.best_effort(song, rng)?;
                return Ok(ProgressionOutcome::BestEffort {
                    restarts: self.restarts,
                });
            }
        }
    }

    fn search_section<R: Rng + ?Sized>(
        &self,
        song: &Song,
        num_chords: usize,
        rng: &mut R,
    ) -> SectionResult {
        let accepted: Vec<&ChordProgression> =
            song.all_chord_progressions().into_iter().map(|(_, p)| p).collect();

        let mut candidate = ChordProgression::generate(*song.key(), num_chords, rng);
        let mut failures = 0;
        while collisions(&candidate, &accepted) > 0 {
            failures += 1;
            trace!(chords = %candidate.numerals(), failures, "progression rejected");
            if failures >= self.max_section_attempts {
                return SectionResult::RestartNeeded;
            }
            candidate = ChordProgression::generate(*song.key(), num_chords, rng);
        }
        SectionResult::Accepted(candidate)
    }

    fn best_effort<R: Rng + ?Sized>(&self, song: &mut Song, rng: &mut R) -> Result<()> {
        song.clear_all_chord_progressions();
        for id in song.unique_sections() {
            let num_chords = song.section(id)?.num_chords();
            let accepted: Vec<ChordProgression> = song
                .all_chord_progressions()
                .into_iter()
                .map(|(_, p)| p.clone())
                .collect();
            let accepted: Vec<&ChordProgression> = accepted.iter().collect();

            let mut best: Option<(ChordProgression, usize)> = None;
            for _ in 0..self.max_section_attempts {
                let candidate = ChordProgression::generate(*song.key(), num_chords, rng);
                let count = collisions(&candidate, &accepted);
                if best.as_ref().is_none_or(|(_, c)| count < *c) {
                    best = Some((candidate, count));
                }
                if count == 0 {
                    break;
                }
            }

            if let Some((progression, count)) = best {
                if count > 0 {
                    warn!(section = %id, collisions = count, "section progression is not distinct");
                }
                song.set_chord_progression(id, progression)?;
            }
        }
        Ok(())
    }
}

impl Default for ProgressionSearch {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_ATTEMPTS, DEFAULT_MAX_RESTARTS)
    }
}

/// Number of accepted progressions too similar to a candidate
fn collisions(candidate: &ChordProgression, accepted: &[&ChordProgression]) -> usize {
    accepted
        .iter()
        .filter(|other| {
            !different_enough(candidate, other) || !different_enough(other, candidate)
        })
        .count()
}
