// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for Tunesmith
//!
//! These tests verify that multiple components work together correctly.

use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tunesmith::generators::{
    count_over_measure_ties, Accompanist, ChordProgression, RhythmGenerator,
};
use tunesmith::music::{Tie, TREBLE_RANGE};
use tunesmith::{
    ComposeError, Composer, ComposerConfig, KeySignature, ScoreWriter, Section, Song,
    TextScoreWriter,
};

/// Full pipeline on a minimal song
#[test]
fn test_single_section_song() {
    let mut rng = StdRng::seed_from_u64(2026);
    let key = KeySignature::from_name("C").unwrap();
    let song = Song::new(key, 4, vec!['A'], vec![Section::new('A', 4, 4).unwrap()]).unwrap();

    let composition = Composer::new().compose(song, &mut rng).unwrap();
    let song = composition.song;
    let measures = song.get_measures().unwrap();

    assert_eq!(measures.len(), 5);
    for measure in measures {
        let total: f64 = measure.notes().iter().map(|n| n.duration()).sum();
        assert_eq!(total, 4.0);
        assert_eq!(measure.chords().len(), 1);
    }

    let progression = song.section('A').unwrap().progression().unwrap();
    for (i, measure) in measures[..4].iter().enumerate() {
        assert_eq!(measure.chords()[0], progression.chords()[i]);
    }

    let last = &measures[4];
    assert_eq!(last.notes().len(), 1);
    assert_eq!(last.chords()[0].step(), 1);
    assert!([1, 3, 5].contains(&last.notes()[0].pitch().step()));
}

/// Config-driven generation across many seeds
#[test]
fn test_random_songs_hold_invariants() {
    for seed in 0..12u64 {
        let config = ComposerConfig {
            seed: Some(seed),
            measures_per_section: 8,
            ..Default::default()
        };
        let mut rng = config.rng();
        let params = config.resolve(&mut rng).unwrap();
        let song = params.build().unwrap();
        let composition = config.composer().compose(song, &mut rng).unwrap();
        let song = composition.song;

        let beats = song.beats_per_measure() as f64;
        let measures = song.get_measures().unwrap();
        assert_eq!(measures.len(), song.structure().len() * 8 + 1);

        let mut previous_tie = Tie::None;
        for measure in measures {
            assert_eq!(measure.duration(), beats);
            for note in measure.notes() {
                let value = note.pitch().value();
                assert!(value >= TREBLE_RANGE.0 && value <= TREBLE_RANGE.1);
                match note.tie() {
                    Tie::Continue | Tie::Stop => {
                        assert!(matches!(previous_tie, Tie::Start | Tie::Continue))
                    }
                    _ => assert!(!matches!(previous_tie, Tie::Start | Tie::Continue)),
                }
                previous_tie = note.tie();
            }
            if let Some((beat, harmony)) = measure.harmony() {
                assert!(*beat < beats);
                assert!(measure.chords()[0]
                    .passing_tones()
                    .contains(&harmony.pitch().step()));
            }
        }
    }
}

/// Same seed, same song
#[test]
fn test_seed_is_reproducible() {
    let config = ComposerConfig {
        seed: Some(314),
        measures_per_section: 4,
        ..Default::default()
    };

    let render = || {
        let mut rng = config.rng();
        let song = config.resolve(&mut rng).unwrap().build().unwrap();
        let song = config.composer().compose(song, &mut rng).unwrap().song;
        let mut writer = TextScoreWriter::new(Vec::new());
        writer.write_song(&song, &Accompanist::new(), &mut rng).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    };

    assert_eq!(render(), render());
}

/// Config file on disk through to a score
#[test]
fn test_config_file_to_score() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "key: F\nbeats_per_measure: 3\nunique_sections: 2\ntotal_sections: 4\n\
         measures_per_section: 4\nseed: 8"
    )
    .unwrap();

    let config = ComposerConfig::load(file.path()).unwrap();
    let mut rng = config.rng();
    let song = config.resolve(&mut rng).unwrap().build().unwrap();
    let song = config.composer().compose(song, &mut rng).unwrap().song;

    assert_eq!(song.key().to_string(), "F");
    assert_eq!(song.num_measures(), 17);

    let mut writer = TextScoreWriter::new(Vec::new());
    writer.write_song(&song, &Accompanist::new(), &mut rng).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert!(text.starts_with("Key: F major (1 flat)  Time: 3/4"));
    assert!(text.contains("Measure 17 [Fmaj (I)]"));
}

/// Rhythms and melody stay aligned to barlines once split
#[test]
fn test_rhythm_ties_are_split() {
    let mut rng = StdRng::seed_from_u64(17);
    let key = KeySignature::from_name("Ab").unwrap();
    let rhythm = RhythmGenerator::new(5).unwrap();
    let engine = tunesmith::generators::MelodyEngine::new(
        tunesmith::generators::GeneratorContext::new(key, 3),
    );

    for _ in 0..20 {
        let durations = rhythm.generate(8, 3, &mut rng).unwrap();
        let progression = ChordProgression::generate(key, 4, &mut rng);
        let melody = engine.create_melody(&progression, &durations, &mut rng).unwrap();
        let split = engine.divide_cross_measure_notes(&melody).unwrap();

        let crossings = count_over_measure_ties(&durations, 3);
        let starts = split.iter().filter(|n| n.tie() == Tie::Start).count();
        assert_eq!(starts, crossings);
        let split_durations: Vec<f64> = split.iter().map(|n| n.duration()).collect();
        assert_eq!(count_over_measure_ties(&split_durations, 3), 0);
    }
}

/// Errors surface from the public API
#[test]
fn test_error_paths() {
    let key = KeySignature::default();
    assert_eq!(
        Section::new('A', 10, 4).unwrap_err(),
        ComposeError::UnevenChordCount {
            measures: 10,
            chords: 4
        }
    );
    assert_eq!(
        Song::new(key, 4, vec!['A', 'B'], vec![Section::new('A', 4, 4).unwrap()]).unwrap_err(),
        ComposeError::MissingSection('B')
    );
    assert!(KeySignature::from_name("H").is_err());
}
