mod duration;
mod pitch;
mod synth;
mod tune;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use duration::{DEFAULT_SAMPLE_RATE, DEFAULT_TEMPO_BPM};
use tune::Tune;

#[derive(Parser)]
#[command(name = "tuneplay", about = "Play compact tune notation through your speakers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a .tune file through the default audio output
    Play {
        /// Path to a .tune file
        file: PathBuf,

        /// Tempo in BPM (one beat = one quarter note)
        #[arg(long, default_value_t = DEFAULT_TEMPO_BPM, value_parser = clap::value_parser!(u32).range(1..))]
        tempo: u32,
    },

    /// Parse a .tune file and display the resolved notes
    Parse {
        /// Path to a .tune file
        file: PathBuf,

        /// Tempo in BPM used for the reported durations
        #[arg(long, default_value_t = DEFAULT_TEMPO_BPM, value_parser = clap::value_parser!(u32).range(1..))]
        tempo: u32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { file, tempo } => {
            let tune = load_tune(&file)?;
            println!(
                "Playing {} ({} notes, {} BPM)",
                file.display(),
                tune.len(),
                tempo
            );
            synth::play(&tune, tempo)?;
        }
        Command::Parse { file, tempo } => {
            let tune = load_tune(&file)?;
            print_tune(&tune, tempo);
        }
    }

    Ok(())
}

fn load_tune(path: &PathBuf) -> anyhow::Result<Tune> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Tune::parse_bytes(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn print_tune(tune: &Tune, tempo: u32) {
    println!(
        "{} notes at {} BPM, {} Hz sample rate",
        tune.len(),
        tempo,
        DEFAULT_SAMPLE_RATE
    );
    println!();
    for note in tune {
        println!(
            "  {:<4} value {:<4} {:9.3} Hz  {:.3} s  {} samples",
            note.pitch.to_string(),
            note.value.to_string(),
            note.frequency(),
            note.value.seconds(tempo),
            note.sample_count(tempo, DEFAULT_SAMPLE_RATE)
        );
    }
}
