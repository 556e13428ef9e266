// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Diatonic chords and Markov chord progressions.
//!
//! Progressions are a random walk over the degrees I..vi starting from a
//! synthetic start state. Sections of a song should sound different, so
//! progressions can be compared by normalized edit distance.

use std::fmt;

use rand::Rng;

use crate::error::{ComposeError, Result};
use crate::music::{KeySignature, NoteName, Pitch};

/// Synthetic state every progression starts from
pub const START_STATE: u8 = 0;

/// Highest chord degree generated (vi)
pub const MAX_CHORD_STEP: u8 = 6;

const ROMAN_NUMERALS: [&str; 6] = ["I", "ii", "iii", "IV", "V", "vi"];

/// Chord quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Major,
    Minor,
}

impl Quality {
    /// Quality of the diatonic triad on a degree (1-6)
    pub fn of_step(step: u8) -> Option<Self> {
        match step {
            1 | 4 | 5 => Some(Quality::Major),
            2 | 3 | 6 => Some(Quality::Minor),
            _ => None,
        }
    }

    /// Short suffix used in chord names
    pub fn suffix(self) -> &'static str {
        match self {
            Quality::Major => "maj",
            Quality::Minor => "min",
        }
    }
}

/// Legal successor degrees for a progression state
pub fn successors(state: u8) -> &'static [u8] {
    match state {
        0 => &[1, 4, 6],
        1 => &[2, 3, 4, 5, 6],
        2 => &[4, 5],
        3 => &[4, 5, 6],
        4 => &[1, 5, 6],
        5 => &[1, 4, 6],
        6 => &[1, 2, 3, 4, 5],
        _ => &[],
    }
}

/// Scale steps outside the triad that a melody may use over a chord
pub fn passing_tones(step: u8) -> &'static [u8] {
    match step {
        1 => &[2],
        2 => &[1],
        3 => &[1],
        4 => &[3],
        5 => &[1],
        6 => &[2, 5],
        _ => &[],
    }
}

/// A diatonic triad in a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    step: u8,
    quality: Quality,
    key: KeySignature,
}

impl Chord {
    /// Create the diatonic chord on a degree (1-6)
    pub fn new(step: u8, key: KeySignature) -> Result<Self> {
        let quality = Quality::of_step(step).ok_or(ComposeError::InvalidChordStep(step))?;
        Ok(Self { step, quality, key })
    }

    /// The tonic (I) chord
    pub fn tonic(key: KeySignature) -> Self {
        Self {
            step: 1,
            quality: Quality::Major,
            key,
        }
    }

    /// Get the degree (1-6)
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Get the quality
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Get the key
    pub fn key(&self) -> &KeySignature {
        &self.key
    }

    /// Roman numeral label, e.g. "IV" or "ii"
    pub fn roman_numeral(&self) -> &'static str {
        ROMAN_NUMERALS[(self.step - 1) as usize]
    }

    /// Spelled root name
    pub fn root_name(&self) -> NoteName {
        self.key.name_of_step(self.step)
    }

    /// Scale steps of root, third and fifth
    pub fn triad_steps(&self) -> [u8; 3] {
        let root = self.step - 1;
        [root + 1, (root + 2) % 7 + 1, (root + 4) % 7 + 1]
    }

    /// Scale steps of the passing tones allowed over this chord
    pub fn passing_tones(&self) -> &'static [u8] {
        passing_tones(self.step)
    }

    /// Whether a pitch can be played over this chord
    pub fn fits(&self, pitch: &Pitch) -> bool {
        let step = pitch.step();
        self.triad_steps().contains(&step) || self.passing_tones().contains(&step)
    }

    /// Pitch of a chord tone (1 = root, 3 = third, 5 = fifth) with the root
    /// in the given octave
    pub fn pitch(&self, chord_step: u8, octave: i32) -> Pitch {
        let root = self.key.pitch(self.step, octave);
        root.add_scale_steps(chord_step.saturating_sub(1) as usize)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} ({})",
            self.root_name(),
            self.quality.suffix(),
            self.roman_numeral()
        )
    }
}

/// An ordered sequence of chords for one section
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordProgression {
    chords: Vec<Chord>,
}

impl ChordProgression {
    /// Create a progression from chords
    pub fn new(chords: Vec<Chord>) -> Self {
        Self { chords }
    }

    /// Create a progression from chord degrees
    pub fn from_steps(steps: &[u8], key: KeySignature) -> Result<Self> {
        let chords = steps
            .iter()
            .map(|&step| Chord::new(step, key))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(chords))
    }

    /// Random walk over the adjacency table
    pub fn generate<R: Rng + ?Sized>(key: KeySignature, num_chords: usize, rng: &mut R) -> Self {
        let mut chords = Vec::with_capacity(num_chords);
        let mut state = START_STATE;
        while chords.len() < num_chords {
            let options = successors(state);
            state = options[rng.gen_range(0..options.len())];
            if let Ok(chord) = Chord::new(state, key) {
                chords.push(chord);
            }
        }
        Self::new(chords)
    }

    /// Get the chords
    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Number of chords
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// Whether the progression has no chords
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Chord degrees in order
    pub fn steps(&self) -> Vec<u8> {
        self.chords.iter().map(|c| c.step()).collect()
    }

    /// Chord for a zero-based measure; the progression repeats
    pub fn chord_for_measure(&self, measure: usize) -> Option<&Chord> {
        if self.chords.is_empty() {
            return None;
        }
        self.chords.get(measure % self.chords.len())
    }

    /// Roman numerals joined with dashes, e.g. "I-IV-V-I"
    pub fn numerals(&self) -> String {
        self.chords
            .iter()
            .map(|c| c.roman_numeral())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Levenshtein distance between two degree sequences
pub fn edit_distance(a: &[u8], b: &[u8]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current = vec![0; short.len() + 1];
    for (i, &lc) in long.iter().enumerate() {
        current[0] = i + 1;
        for (j, &sc) in short.iter().enumerate() {
            let change = previous[j] + usize::from(sc != lc);
            current[j + 1] = change.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[short.len()]
}

/// Whether `a` is sufficiently different from `b`
///
/// The edit distance is normalized by the length of `a`, so the relation is
/// not symmetric when the lengths differ. Progressions that open on the
/// same degree are never different enough.
pub fn different_enough(a: &ChordProgression, b: &ChordProgression) -> bool {
    let (Some(first_a), Some(first_b)) = (a.chords().first(), b.chords().first()) else {
        return false;
    };
    let distance = edit_distance(&a.steps(), &b.steps()) as f64 / a.len() as f64;
    distance > 0.5 && first_a.step() != first_b.step()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn c_major() -> KeySignature {
        KeySignature::from_name("C").unwrap()
    }

    fn prog(steps: &[u8]) -> ChordProgression {
        ChordProgression::from_steps(steps, c_major()).unwrap()
    }

    #[test]
    fn test_chord_quality_table() {
        let key = c_major();
        let qualities: Vec<Quality> = (1..=6)
            .map(|s| Chord::new(s, key).unwrap().quality())
            .collect();
        assert_eq!(
            qualities,
            vec![
                Quality::Major,
                Quality::Minor,
                Quality::Minor,
                Quality::Major,
                Quality::Major,
                Quality::Minor
            ]
        );
        assert_eq!(Chord::new(0, key), Err(ComposeError::InvalidChordStep(0)));
        assert_eq!(Chord::new(7, key), Err(ComposeError::InvalidChordStep(7)));
    }

    #[test]
    fn test_roman_numerals_and_display() {
        let key = KeySignature::from_name("F").unwrap();
        let chord = Chord::new(4, key).unwrap();
        assert_eq!(chord.roman_numeral(), "IV");
        assert_eq!(chord.to_string(), "Bbmaj (IV)");
        assert_eq!(Chord::new(2, key).unwrap().to_string(), "Gmin (ii)");
    }

    #[test]
    fn test_triad_steps() {
        let key = c_major();
        assert_eq!(Chord::new(1, key).unwrap().triad_steps(), [1, 3, 5]);
        assert_eq!(Chord::new(5, key).unwrap().triad_steps(), [5, 7, 2]);
        assert_eq!(Chord::new(6, key).unwrap().triad_steps(), [6, 1, 3]);
    }

    #[test]
    fn test_chord_fits() {
        let key = c_major();
        let tonic = Chord::tonic(key);
        let pitch = |v| Pitch::new(v, key).unwrap();
        assert!(tonic.fits(&pitch(48)));
        assert!(tonic.fits(&pitch(50)));
        assert!(tonic.fits(&pitch(52)));
        assert!(!tonic.fits(&pitch(53)));
        assert!(tonic.fits(&pitch(55)));
        assert!(!tonic.fits(&pitch(57)));

        let vi = Chord::new(6, key).unwrap();
        assert!(vi.fits(&pitch(55)));
        assert!(!vi.fits(&pitch(53)));
    }

    #[test]
    fn test_chord_pitch() {
        let key = c_major();
        let v = Chord::new(5, key).unwrap();
        assert_eq!(v.pitch(1, 2).value(), 31);
        assert_eq!(v.pitch(3, 2).value(), 35);
        assert_eq!(v.pitch(5, 2).value(), 38);
    }

    #[test]
    fn test_generated_progressions_follow_table() {
        let mut rng = StdRng::seed_from_u64(42);
        let key = c_major();
        for len in 1..=16 {
            for _ in 0..50 {
                let progression = ChordProgression::generate(key, len, &mut rng);
                assert_eq!(progression.len(), len);
                let steps = progression.steps();
                assert!(successors(START_STATE).contains(&steps[0]));
                assert!(steps.iter().all(|&s| (1..=MAX_CHORD_STEP).contains(&s)));
                for pair in steps.windows(2) {
                    assert!(successors(pair[0]).contains(&pair[1]), "{:?}", steps);
                }
            }
        }
    }

    #[test]
    fn test_chord_for_measure_repeats() {
        let progression = prog(&[1, 4, 5, 1]);
        assert_eq!(progression.chord_for_measure(5).unwrap().step(), 4);
        assert_eq!(progression.numerals(), "I-IV-V-I");
        assert!(ChordProgression::new(Vec::new()).chord_for_measure(0).is_none());
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance(&[1, 2, 3], &[1, 3]), 1);
        assert_eq!(edit_distance(&[], &[1, 2]), 2);
        assert_eq!(edit_distance(&[1, 4, 5, 1], &[1, 4, 5, 1]), 0);
        assert_eq!(edit_distance(&[1, 2, 4, 5], &[6, 3, 6, 3]), 4);
        assert_eq!(edit_distance(&[1, 2], &[4, 1, 2, 3]), 2);
    }

    #[test]
    fn test_different_enough() {
        assert!(different_enough(&prog(&[1, 2, 4, 5]), &prog(&[6, 3, 6, 3])));
        assert!(!different_enough(&prog(&[1, 2, 4, 5]), &prog(&[4, 2, 4, 5])));
    }

    #[test]
    fn test_same_opening_never_different_enough() {
        let a = prog(&[1, 2, 4, 5]);
        let b = prog(&[1, 6, 3, 6]);
        assert!(edit_distance(&a.steps(), &b.steps()) as f64 / 4.0 > 0.5);
        assert!(!different_enough(&a, &b));
        assert!(!different_enough(&b, &a));
    }

    #[test]
    fn test_different_enough_is_asymmetric() {
        let short = prog(&[1, 2]);
        let long = prog(&[4, 1, 2, 3]);
        assert!(different_enough(&short, &long));
        assert!(!different_enough(&long, &short));
    }
}
