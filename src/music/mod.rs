// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory primitives for the composer.
//!
//! This module provides key signatures, in-key pitch arithmetic and
//! notes with durations. Only notes in the current key are representable.

pub mod key;
pub mod note;
pub mod pitch;

pub use key::{Accidental, KeySignature, Letter, NoteName, CIRCLE_OF_FIFTHS};
pub use note::{Note, NoteType, Tie};
pub use pitch::{diatonic_offset, Interval, Pitch, DIATONIC_OFFSETS};

/// Lowest and highest pitch values allowed in the melody (A3..C6)
pub const TREBLE_RANGE: (i32, i32) = (45, 72);

/// Lowest and highest pitch values allowed in bass voicings (E2..C4)
pub const BASS_RANGE: (i32, i32) = (28, 48);
