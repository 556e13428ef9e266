// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Notes: a pitch held for a number of beats.
//!
//! Durations are measured in beats (quarter note = 1.0). Every duration the
//! generators produce is a multiple of an eighth, so sums stay exact in f64.

use std::fmt;

use crate::error::{ComposeError, Result};

use super::pitch::Pitch;

/// Written note value, ignoring dots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteType {
    Sixteenth,
    Eighth,
    Quarter,
    Half,
    Whole,
}

impl NoteType {
    /// Largest note value not longer than the duration
    pub fn from_duration(duration: f64) -> Self {
        if duration >= 4.0 {
            NoteType::Whole
        } else if duration >= 2.0 {
            NoteType::Half
        } else if duration >= 1.0 {
            NoteType::Quarter
        } else if duration >= 0.5 {
            NoteType::Eighth
        } else {
            NoteType::Sixteenth
        }
    }

    /// Length in beats
    pub fn beats(self) -> f64 {
        match self {
            NoteType::Sixteenth => 0.25,
            NoteType::Eighth => 0.5,
            NoteType::Quarter => 1.0,
            NoteType::Half => 2.0,
            NoteType::Whole => 4.0,
        }
    }

    /// Notation name
    pub fn name(self) -> &'static str {
        match self {
            NoteType::Sixteenth => "16th",
            NoteType::Eighth => "eighth",
            NoteType::Quarter => "quarter",
            NoteType::Half => "half",
            NoteType::Whole => "whole",
        }
    }
}

/// Tie marker joining a note to its neighbours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tie {
    /// Not tied
    #[default]
    None,
    /// Tied to the next note
    Start,
    /// Tied to both the previous and next note
    Continue,
    /// Tied from the previous note
    Stop,
}

/// A pitched note with a duration in beats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pitch: Pitch,
    duration: f64,
    note_type: NoteType,
    dot: bool,
    tie: Tie,
}

impl Note {
    /// Create an untied note
    pub fn new(pitch: Pitch, duration: f64) -> Result<Self> {
        Self::tied(pitch, duration, Tie::None)
    }

    /// Create a note with a tie marker
    pub fn tied(pitch: Pitch, duration: f64, tie: Tie) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ComposeError::InvalidDuration(duration));
        }
        let note_type = NoteType::from_duration(duration);
        Ok(Self {
            pitch,
            duration,
            note_type,
            dot: duration == note_type.beats() * 1.5,
            tie,
        })
    }

    /// Get the pitch
    pub fn pitch(&self) -> &Pitch {
        &self.pitch
    }

    /// Get the duration in beats
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Get the written note value
    pub fn note_type(&self) -> NoteType {
        self.note_type
    }

    /// Whether the note is written dotted
    pub fn is_dotted(&self) -> bool {
        self.dot
    }

    /// Get the tie marker
    pub fn tie(&self) -> Tie {
        self.tie
    }

    /// Same note with a different tie marker
    pub fn with_tie(mut self, tie: Tie) -> Self {
        self.tie = tie;
        self
    }

    /// Split into two tied notes; the first lasts `first_duration` beats
    pub fn split(&self, first_duration: f64) -> Result<(Note, Note)> {
        let first = Note::tied(self.pitch, first_duration, Tie::Start)?;
        let second = Note::tied(self.pitch, self.duration - first_duration, Tie::Stop)?;
        Ok((first, second))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.pitch, self.duration)?;
        match self.tie {
            Tie::None => Ok(()),
            Tie::Start => write!(f, " /"),
            Tie::Continue => write!(f, " \\/"),
            Tie::Stop => write!(f, " \\"),
        }
    }
}
