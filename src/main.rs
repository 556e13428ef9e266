// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::io;

use anyhow::{Context, Result};
use tracing::Level;

use tunesmith::generators::Accompanist;
use tunesmith::{ComposerConfig, KeyChoice, ScoreWriter, TextScoreWriter};

fn print_usage() {
    println!("Tunesmith - Procedural Song Composer");
    println!();
    println!("Usage: tunesmith [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <FILE>   Load settings from a YAML or TOML file");
    println!("  --seed <N>        Seed the random generator");
    println!("  --key <KEY>       Key name (C, F#, Bb...) or pitch class 0-11");
    println!("  --beats <N>       Beats per measure");
    println!("  -v, --verbose     Log progress (repeat for more detail)");
    println!("  --help            Show this help message");
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} requires a value", flag))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config = ComposerConfig::default();
    let mut seed = None;
    let mut key = None;
    let mut beats = None;
    let mut verbosity = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let path = next_value(&args, i, "--config")?;
                config = ComposerConfig::load(path)?;
                i += 1;
            }
            "--seed" => {
                let value = next_value(&args, i, "--seed")?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| anyhow::anyhow!("Invalid seed: {}", value))?,
                );
                i += 1;
            }
            "--key" => {
                let value = next_value(&args, i, "--key")?;
                key = Some(match value.parse::<u8>() {
                    Ok(pc) => KeyChoice::PitchClass(pc),
                    Err(_) => KeyChoice::Name(value.to_string()),
                });
                i += 1;
            }
            "--beats" => {
                let value = next_value(&args, i, "--beats")?;
                beats = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| anyhow::anyhow!("Invalid beats per measure: {}", value))?,
                );
                i += 1;
            }
            "-v" | "--verbose" => verbosity += 1,
            "-vv" => verbosity += 2,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run with --help for usage information");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // command-line values win over the config file
    if seed.is_some() {
        config.seed = seed;
    }
    if key.is_some() {
        config.key = key;
    }
    if beats.is_some() {
        config.beats_per_measure = beats;
    }

    let mut rng = config.rng();
    let params = config.resolve(&mut rng)?;
    let song = params.build()?;
    let composition = config.composer().compose(song, &mut rng)?;

    let stdout = io::stdout();
    let mut writer = TextScoreWriter::new(stdout.lock());
    writer.write_song(&composition.song, &Accompanist::new(), &mut rng)?;

    Ok(())
}
