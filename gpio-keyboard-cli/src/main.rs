mod layout;
mod trace;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gpio_keyboard::{
    Channel, EdgeOutcome, KeySink, Keyboard, KeyboardConfig, Keycode, MonotonicClock,
    RecordingSink,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gpio-keyboard")]
#[command(about = "Debounced four-line GPIO keyboard with a layer-toggle gesture")]
struct Cli {
    /// TOML file with timing constants and keymap
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded trace of `<millis> <channel>` edges
    Replay {
        /// Path to the trace file
        trace: PathBuf,
        /// Show a progress bar instead of one line per edge
        #[arg(long)]
        progress: bool,
    },
    /// Read channel numbers from stdin and timestamp them live
    Listen,
    /// Print the effective configuration as TOML
    Config,
    /// Render the keymap as an HTML/SVG diagram
    Layout {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Prints each tap to stdout as it is emitted.
struct StdoutSink;

impl KeySink for StdoutSink {
    fn key_down(&mut self, code: Keycode) {
        println!("{} ({})", code, code.code());
    }

    fn key_up(&mut self, _code: Keycode) {}
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(path: Option<&Path>) -> Result<KeyboardConfig> {
    let Some(path) = path else {
        return Ok(KeyboardConfig::default());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    KeyboardConfig::from_toml(&contents).with_context(|| format!("loading {}", path.display()))
}

#[derive(Default)]
struct ReplayStats {
    taps: usize,
    debounced: usize,
    swallowed: usize,
    toggles: usize,
}

impl ReplayStats {
    fn record(&mut self, outcome: EdgeOutcome) {
        match outcome {
            EdgeOutcome::Tapped(_) => self.taps += 1,
            EdgeOutcome::Debounced => self.debounced += 1,
            EdgeOutcome::Counted { .. } => self.swallowed += 1,
            EdgeOutcome::LayerToggled(_) => self.toggles += 1,
        }
    }
}

fn replay(config: &KeyboardConfig, path: &Path, progress: bool) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let edges = trace::parse_trace(&contents).context("parsing trace file")?;
    info!("replaying {} edges from {}", edges.len(), path.display());

    let keyboard = Keyboard::new(config, RecordingSink::new());
    let mut stats = ReplayStats::default();

    let pb = if progress {
        let pb = ProgressBar::new(edges.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} edges")?
                .progress_chars("=> "),
        );
        pb.set_message("Replaying");
        pb
    } else {
        ProgressBar::hidden()
    };

    for edge in &edges {
        let outcome = keyboard.on_edge(edge.channel, edge.millis);
        stats.record(outcome);
        if !progress {
            println!("{:>10}ms  ch{}  {}", edge.millis, edge.channel, outcome);
        }
        pb.inc(1);
    }
    pb.finish_with_message("Replayed");

    let snapshot = keyboard.snapshot();
    let sink = keyboard.into_sink();
    println!(
        "{} edges: {} taps, {} debounced, {} swallowed, {} layer toggles",
        edges.len(),
        stats.taps,
        stats.debounced,
        stats.swallowed,
        stats.toggles
    );
    println!(
        "{} key events emitted, final layer: {}",
        sink.events().len(),
        snapshot.layer
    );

    Ok(())
}

fn listen(config: &KeyboardConfig) -> Result<()> {
    let keyboard = Keyboard::new(config, StdoutSink);
    let clock = MonotonicClock::new();
    info!("listening for channel numbers on stdin");

    for (line_num, line) in io::stdin().lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let index: u8 = line
            .parse()
            .with_context(|| format!("line {}: invalid channel {:?}", line_num + 1, line))?;
        let channel = Channel::try_from(index)
            .with_context(|| format!("line {}", line_num + 1))?;
        if let EdgeOutcome::LayerToggled(layer) = keyboard.on_edge_now(channel, &clock) {
            println!("layer: {}", layer);
        }
        io::stdout().flush().context("flushing stdout")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Replay { trace, progress } => replay(&config, &trace, progress)?,
        Command::Listen => listen(&config)?,
        Command::Config => {
            print!("{}", config.to_toml().context("serializing config")?);
        }
        Command::Layout { output } => {
            let html = layout::generate_html(&config.keymap, &config.timing);
            match output {
                Some(path) => {
                    fs::write(&path, html)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Layout written to {}", path.display());
                }
                None => print!("{}", html),
            }
        }
    }

    Ok(())
}
