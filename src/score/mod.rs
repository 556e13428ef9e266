// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Score output.
//!
//! Writers consume a composed song measure by measure. The text writer
//! prints a readable listing of melody, harmony and bass for each measure.

use std::io::Write;

use anyhow::{Context, Result};
use rand::Rng;

use crate::arrangement::{Measure, Song};
use crate::generators::Accompanist;
use crate::music::{Accidental, Note};

/// Something that can render a composed song
pub trait ScoreWriter {
    /// Write the whole song
    fn write_song<R: Rng + ?Sized>(
        &mut self,
        song: &Song,
        accompanist: &Accompanist,
        rng: &mut R,
    ) -> Result<()>;
}

/// Plain-text score listing
pub struct TextScoreWriter<W: Write> {
    out: W,
}

impl<W: Write> TextScoreWriter<W> {
    /// Create a new writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self, song: &Song) -> Result<()> {
        let key = song.key();
        let count = key.accidentals().abs();
        let plural = if count == 1 { "" } else { "s" };
        let signature = match key.uses() {
            Accidental::Natural => "no accidentals".to_string(),
            Accidental::Sharps => format!("{} sharp{}", count, plural),
            Accidental::Flats => format!("{} flat{}", count, plural),
        };
        let form: Vec<String> = song.structure().iter().map(char::to_string).collect();
        writeln!(
            self.out,
            "Key: {} major ({})  Time: {}/4  Form: {}",
            key,
            signature,
            song.beats_per_measure(),
            form.join(" ")
        )?;
        Ok(())
    }

    fn write_measure<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        measure: &Measure,
        accompanist: &Accompanist,
        rng: &mut R,
    ) -> Result<()> {
        let chords: Vec<String> = measure.chords().iter().map(|c| c.to_string()).collect();
        writeln!(self.out, "Measure {} [{}]", index + 1, chords.join(", "))?;
        writeln!(self.out, "  melody:  {}", join_notes(measure.notes()))?;
        if let Some((beat, note)) = measure.harmony() {
            writeln!(self.out, "  harmony: beat {}: {}", beat, note)?;
        }

        if let Some(chord) = measure.chords().first() {
            let groups = accompanist
                .accompany(chord, measure.duration(), rng)
                .with_context(|| format!("Failed to accompany measure {}", index + 1))?;
            let bass: Vec<String> = groups.iter().map(|g| join_group(g)).collect();
            writeln!(self.out, "  bass:    {}", bass.join(" | "))?;
        }
        Ok(())
    }
}

impl<W: Write> ScoreWriter for TextScoreWriter<W> {
    fn write_song<R: Rng + ?Sized>(
        &mut self,
        song: &Song,
        accompanist: &Accompanist,
        rng: &mut R,
    ) -> Result<()> {
        self.write_header(song)?;
        for (index, measure) in song.get_measures()?.iter().enumerate() {
            self.write_measure(index, measure, accompanist, rng)?;
        }
        self.out.flush().context("Failed to flush score output")
    }
}

fn join_notes(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Simultaneous notes share one duration
fn join_group(notes: &[Note]) -> String {
    let pitches: Vec<String> = notes.iter().map(|n| n.pitch().to_string()).collect();
    let duration = notes.first().map_or(0.0, |n| n.duration());
    format!("{}, {}", pitches.join("+"), duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::Section;
    use crate::composer::Composer;
    use crate::music::KeySignature;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_text_score_listing() {
        let mut rng = StdRng::seed_from_u64(5);
        let song = Song::new(
            KeySignature::from_name("D").unwrap(),
            4,
            vec!['A'],
            vec![Section::new('A', 2, 2).unwrap()],
        )
        .unwrap();
        let song = Composer::new().compose(song, &mut rng).unwrap().song;

        let mut writer = TextScoreWriter::new(Vec::new());
        writer
            .write_song(&song, &Accompanist::new(), &mut rng)
            .unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        assert!(text.starts_with("Key: D major (2 sharps)  Time: 4/4  Form: A"));
        assert!(text.contains("Measure 1 ["));
        assert!(text.contains("Measure 3 [Dmaj (I)]"));
        assert_eq!(text.matches("  bass:").count(), 3);
    }

    #[test]
    fn test_unpopulated_song_fails() {
        let mut rng = StdRng::seed_from_u64(5);
        let song = Song::new(
            KeySignature::default(),
            4,
            vec!['A'],
            vec![Section::new('A', 2, 2).unwrap()],
        )
        .unwrap();
        let mut writer = TextScoreWriter::new(Vec::new());
        assert!(writer.write_song(&song, &Accompanist::new(), &mut rng).is_err());
    }
}
