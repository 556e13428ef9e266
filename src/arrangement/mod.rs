// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song arrangement.
//!
//! This module provides:
//! - Measures: one bar of melody with its chord and harmony note
//! - Sections: labelled blocks with a progression and melody
//! - Songs: sections laid out in a form

pub mod measure;
pub mod section;
pub mod song;

pub use measure::Measure;
pub use section::{Section, SectionId};
pub use song::Song;
