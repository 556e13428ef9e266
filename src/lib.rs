// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tunesmith - procedural song composer.
//!
//! Songs are built from a key, a meter and a form of labelled sections.
//! Every section gets a chord progression, a rhythm and a melody that
//! follows the harmony; the song ends on a cadence to the tonic.

pub mod arrangement;
pub mod composer;
pub mod config;
pub mod error;
pub mod generators;
pub mod music;
pub mod score;

pub use arrangement::{Measure, Section, Song};
pub use composer::{Composer, Composition, ProgressionOutcome};
pub use config::{ComposerConfig, KeyChoice, SongParams};
pub use error::{ComposeError, Result};
pub use music::{KeySignature, Note, Pitch};
pub use score::{ScoreWriter, TextScoreWriter};
