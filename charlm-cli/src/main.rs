use std::path::PathBuf;

use charlm_core::{LanguageModel, SeedMode};
use clap::Parser;
use log::info;

/// Generates text with a character-level sliding-window language model.
///
/// Example: `charlm 7 "Roses are red" 300 fixed shakespeare.txt`
#[derive(Parser)]
#[command(name = "charlm")]
#[command(version)]
struct Cli {
    /// Number of preceding characters used as context
    window_length: usize,

    /// Text to start generating from (at least `window_length` characters)
    initial_text: String,

    /// Total length of the generated text, initial text included
    length: usize,

    /// 'random', 'fixed' (seed 20), 'fixed:<n>' or an integer seed
    seed: SeedMode,

    /// Corpus to train on ('-' reads standard input)
    corpus: PathBuf,

    /// Print the trained model to stderr before generating
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // Fixed seeds give the same text on every run, 'random' differs each time
    let mut model = LanguageModel::new(cli.window_length, cli.seed)?;
    info!("seed {}", model.seed());

    model.train_file(&cli.corpus)?;
    if model.is_empty() {
        info!("corpus {} is too short for window length {}", cli.corpus.display(), cli.window_length);
    }

    if cli.dump {
        eprint!("{}", model.to_debug_string());
    }

    println!("{}", model.generate(&cli.initial_text, cli.length)?);

    Ok(())
}
