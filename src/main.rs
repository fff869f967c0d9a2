//! rpnsynth CLI - render an RPN signal program to a mono WAV file
//!
//! ```text
//! echo "440 sin 0.5 mul" | rpnsynth 2 > a4.wav
//! rpnsynth 4 -i pad.rpn -o pad.wav --stats
//! ```

use clap::{CommandFactory, FromArgMatches, Parser};
use rpnsynth::registry::OperatorRegistry;
use rpnsynth::render::{RenderConfig, Renderer};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rpnsynth")]
#[command(about = "Render an RPN signal program to a 44.1 kHz mono 16-bit WAV file", long_about = None)]
struct Cli {
    /// Clip duration in seconds
    #[arg(value_parser = parse_duration)]
    duration: f32,

    /// Program file (default: read from stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output WAV file (default: write to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print render statistics to stderr
    #[arg(short, long)]
    stats: bool,

    /// Log pipeline stages to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_duration(arg: &str) -> Result<f32, String> {
    let duration: f32 = arg
        .parse()
        .map_err(|_| format!("'{arg}' is not a number of seconds"))?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(format!("duration must be positive, got {arg}"));
    }
    Ok(duration)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout may carry the WAV stream
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli, registry: OperatorRegistry) -> Result<(), Box<dyn std::error::Error>> {
    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let renderer = Renderer::with_registry(RenderConfig::with_duration(cli.duration), registry);
    let rendered = renderer.render(&source)?;

    // Only touch the output once the whole buffer exists
    match &cli.output {
        Some(path) => {
            fs::write(path, &rendered.wav)?;
            info!("wrote {} bytes to {}", rendered.wav.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&rendered.wav)?;
            stdout.flush()?;
        }
    }

    if cli.stats {
        rendered.stats.print_summary();
    }
    Ok(())
}

fn main() -> ExitCode {
    let registry = OperatorRegistry::with_builtins();

    // The operator table in --help comes straight from the registry
    let matches = Cli::command()
        .after_help(registry.describe())
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(cli.verbose);

    match run(&cli, registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
