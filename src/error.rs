// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error type shared by the composition engine.

use thiserror::Error;

/// Errors raised by the music-theory primitives, generators and song model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    /// Note name is not a white-key letter with an optional `#` or `b`
    #[error("invalid note name: {0:?}")]
    InvalidNoteName(String),

    /// Pitch value does not belong to the key's diatonic scale
    #[error("pitch value {value} is not in the key of {key}")]
    OffKeyPitch { value: i32, key: String },

    /// Half-step arithmetic left the key
    #[error("adding {half_steps} half steps to {from} in the key of {key} is not valid")]
    InvalidTransposition {
        half_steps: i32,
        from: String,
        key: String,
    },

    /// Two pitches from different keys were compared
    #[error("pitches must share the same key")]
    KeyMismatch,

    /// Interval base pitch is above the top pitch
    #[error("base pitch {base} must not be above {top}")]
    InvertedInterval { base: i32, top: i32 },

    /// Note duration must be positive
    #[error("invalid note duration: {0}")]
    InvalidDuration(f64),

    /// Chord step outside I..vi
    #[error("invalid chord step: {0}")]
    InvalidChordStep(u8),

    /// Section measure count is not a multiple of its chord count
    #[error("{measures} measures cannot be divided evenly among {chords} chords")]
    UnevenChordCount { measures: usize, chords: usize },

    /// Section form parameters cannot produce a valid form
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// Song measures were requested before population
    #[error("song measures have not been populated yet")]
    MeasuresNotPopulated,

    /// Melody walk has no pitch inside the register window
    #[error("no pitch in register reachable from scale index {index}")]
    EmptyRegister { index: usize },

    /// Rhythm candidates cannot fill the remaining beats
    #[error("no rhythm candidate fits the remaining {remaining} beats")]
    UnfillableRhythm { remaining: f64 },

    /// Notes do not line up with measure boundaries
    #[error("expected {expected} beats but found {actual}")]
    MeasureMisaligned { expected: f64, actual: f64 },

    /// Section id is not part of the song
    #[error("section {0} does not exist")]
    MissingSection(char),

    /// Section has no chord progression yet
    #[error("section {0} has no chord progression")]
    MissingProgression(char),

    /// Section has no melody yet
    #[error("section {0} has no melody")]
    MissingMelody(char),

    /// Voicing search found no usable combination
    #[error("no voicing available for chord {chord}")]
    VoicingExhausted { chord: String },

    /// Generation parameter out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias for composition operations
pub type Result<T> = std::result::Result<T, ComposeError>;
