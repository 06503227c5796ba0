mod terminal;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use keyprob_core::{KeypressModel, ModelConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalSource;

/// Train a keypress model and watch its predictions while you type.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value = "exemple")]
    name: String,
    #[arg(long, default_value = ModelConfig::DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,
    #[arg(long, default_value_t = ModelConfig::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    #[arg(long, default_value_t = ModelConfig::DEFAULT_MIN_ACCEPTABLE_DATAPOINTS)]
    min_datapoints: u64,
    /// Text file to train on before anything else
    #[arg(long)]
    train_file: Option<PathBuf>,
    /// Also learn from what is typed in the live session
    #[arg(long)]
    train_keys: bool,
    /// Print this many characters sampled from the model, then exit
    #[arg(long)]
    babble: Option<usize>,
    /// Number of predictions shown after each key
    #[arg(long, default_value_t = 5)]
    top: usize,
}

/// Generates text by repeatedly sampling the model from its own output.
fn babble(model: &KeypressModel, length: usize) -> String {
    let mut rng = rand::rng();
    let mut text: Vec<char> = Vec::with_capacity(length);

    for _ in 0..length {
        let start = text.len().saturating_sub(model.max_depth());
        let context: String = text[start..].iter().collect();
        match model.probabilities_for(&context).sample(&mut rng) {
            Some(c) => text.push(c),
            None => break,
        }
    }

    text.into_iter().collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Values below only apply if the model file does not exist yet
    let config = ModelConfig::new(&args.name)
        .with_model_dir(&args.model_dir)
        .with_max_depth(args.max_depth)
        .with_min_acceptable_datapoints(args.min_datapoints);
    let mut model = KeypressModel::load_or_create(config)?;

    if let Some(path) = &args.train_file {
        model.train_on_file(path)?;
        model.persist()?;
    }

    if let Some(length) = args.babble {
        println!("{}", babble(&model, length));
        return Ok(());
    }

    if args.train_keys {
        model.enable_keystroke_training();
    }

    // Raw mode: lines need an explicit carriage return
    let top = args.top;
    model.subscribe_to_predictions(move |distribution| {
        let line: Vec<String> = distribution
            .top(top)
            .into_iter()
            .map(|(c, p)| format!("{c:?} {:.1}%", p * 100.0))
            .collect();
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{}\r\n", line.join("  "));
        let _ = stdout.flush();
    });

    println!("Type to see predictions (Esc to quit)");
    let events = {
        let mut source = TerminalSource::new()?;
        model.listen(&mut source)?
    };
    info!("Session ended after {} key events", events);

    model.persist()?;
    Ok(())
}
