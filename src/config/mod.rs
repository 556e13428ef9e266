// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for the composer.
//!
//! A config file pins any of the song parameters; anything left out is
//! drawn at random when the config is resolved. YAML and TOML are both
//! accepted, chosen by file extension.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::arrangement::{Section, Song};
use crate::composer::progressions::{DEFAULT_MAX_RESTARTS, DEFAULT_SECTION_ATTEMPTS};
use crate::composer::Composer;
use crate::error::ComposeError;
use crate::music::KeySignature;

/// A key given by name ("Eb") or pitch class (0-11)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeyChoice {
    PitchClass(u8),
    Name(String),
}

impl KeyChoice {
    /// Resolve to a key signature
    pub fn to_key(&self) -> crate::Result<KeySignature> {
        match self {
            KeyChoice::PitchClass(pc) => KeySignature::from_pitch_class(*pc),
            KeyChoice::Name(name) => KeySignature::from_name(name),
        }
    }
}

/// Composer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComposerConfig {
    /// Key of the song (random if unset)
    #[serde(default)]
    pub key: Option<KeyChoice>,
    /// Beats per measure (random 2-4 if unset)
    #[serde(default)]
    pub beats_per_measure: Option<u32>,
    /// Number of distinct sections (random 2-4 if unset)
    #[serde(default)]
    pub unique_sections: Option<usize>,
    /// Number of sections in the form (random 4-6 if unset)
    #[serde(default)]
    pub total_sections: Option<usize>,
    /// Measures in every section
    #[serde(default = "default_measures_per_section")]
    pub measures_per_section: usize,
    /// Rhythm weight for every section (random 1-5 per section if unset)
    #[serde(default)]
    pub rhythm_weight: Option<u8>,
    /// RNG seed (entropy if unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Progression attempts per section before restarting
    #[serde(default = "default_max_section_attempts")]
    pub max_section_attempts: usize,
    /// Progression search restarts before settling for best effort
    #[serde(default = "default_max_restarts")]
    pub max_restarts: usize,
}

fn default_measures_per_section() -> usize {
    16
}
fn default_max_section_attempts() -> usize {
    DEFAULT_SECTION_ATTEMPTS
}
fn default_max_restarts() -> usize {
    DEFAULT_MAX_RESTARTS
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            key: None,
            beats_per_measure: None,
            unique_sections: None,
            total_sections: None,
            measures_per_section: default_measures_per_section(),
            rhythm_weight: None,
            seed: None,
            max_section_attempts: default_max_section_attempts(),
            max_restarts: default_max_restarts(),
        }
    }
}

impl ComposerConfig {
    /// Load a configuration file (`.toml` or YAML)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// RNG seeded from the config, or from entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Composer using the configured search limits
    pub fn composer(&self) -> Composer {
        Composer::new().with_limits(self.max_section_attempts, self.max_restarts)
    }

    /// Fill in unset parameters at random
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> crate::Result<SongParams> {
        let key = match &self.key {
            Some(choice) => choice.to_key()?,
            None => KeySignature::from_pitch_class(rng.gen_range(0..12))?,
        };
        let beats_per_measure = self.beats_per_measure.unwrap_or_else(|| rng.gen_range(2..=4));
        if beats_per_measure == 0 {
            return Err(ComposeError::InvalidParameter(
                "beats_per_measure must be at least 1".to_string(),
            ));
        }

        let total_sections = self.total_sections.unwrap_or_else(|| rng.gen_range(4..=6));
        let unique_sections = self
            .unique_sections
            .unwrap_or_else(|| rng.gen_range(2..=4).min(total_sections));
        let structure = Section::random_form(total_sections, unique_sections, rng)?;

        let mut ids = structure.clone();
        ids.sort_unstable();
        ids.dedup();

        let sections = ids
            .into_iter()
            .map(|id| {
                let num_chords = self.pick_chord_count(rng)?;
                let rhythm_weight = self.rhythm_weight.unwrap_or_else(|| rng.gen_range(1..=5));
                if !(1..=5).contains(&rhythm_weight) {
                    return Err(ComposeError::InvalidParameter(format!(
                        "rhythm weight {} is outside 1-5",
                        rhythm_weight
                    )));
                }
                Ok(SectionParams {
                    id,
                    num_measures: self.measures_per_section,
                    num_chords,
                    rhythm_weight,
                })
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(SongParams {
            key,
            beats_per_measure,
            structure,
            sections,
        })
    }

    /// One chord per measure, per two measures or per four measures
    fn pick_chord_count<R: Rng + ?Sized>(&self, rng: &mut R) -> crate::Result<usize> {
        let measures = self.measures_per_section;
        if measures == 0 {
            return Err(ComposeError::InvalidParameter(
                "measures_per_section must be at least 1".to_string(),
            ));
        }
        let options: Vec<usize> = [1, 2, 4]
            .into_iter()
            .filter(|&d| measures.is_multiple_of(d))
            .map(|d| measures / d)
            .collect();
        Ok(options[rng.gen_range(0..options.len())])
    }
}

/// Resolved parameters of one section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionParams {
    pub id: char,
    pub num_measures: usize,
    pub num_chords: usize,
    pub rhythm_weight: u8,
}

/// Fully resolved song parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SongParams {
    pub key: KeySignature,
    pub beats_per_measure: u32,
    pub structure: Vec<char>,
    pub sections: Vec<SectionParams>,
}

impl SongParams {
    /// Build an empty song from these parameters
    pub fn build(&self) -> crate::Result<Song> {
        let sections = self
            .sections
            .iter()
            .map(|p| {
                Section::new(p.id, p.num_measures, p.num_chords)?
                    .with_rhythm_weight(p.rhythm_weight)
            })
            .collect::<crate::Result<Vec<_>>>()?;
        Song::new(self.key, self.beats_per_measure, self.structure.clone(), sections)
    }
}
