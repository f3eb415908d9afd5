//! protochain Demos - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use protochain_core::Config;
use protochain_demos::{Demo, Transcript, run_all, run_demo};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "protochain-demos", version)]
#[command(about = "Walkthroughs of delegation, cloning, constructors and classes")]
struct Cli {
    /// Demo to run; every demo runs when omitted
    #[arg(value_enum)]
    demo: Option<Demo>,

    /// Print transcripts as JSON
    #[arg(long)]
    json: bool,

    /// Longest delegate chain a lookup will walk
    #[arg(long, env = "PROTOCHAIN_MAX_CHAIN_DEPTH")]
    max_chain_depth: Option<usize>,

    /// Nesting depth rendered when printing records
    #[arg(long, env = "PROTOCHAIN_MAX_DESCRIBE_DEPTH")]
    max_describe_depth: Option<usize>,

    /// Longest array a write may pad out to
    #[arg(long, env = "PROTOCHAIN_MAX_ARRAY_LEN")]
    max_array_len: Option<usize>,
}

impl Cli {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            max_chain_depth: self.max_chain_depth.unwrap_or(defaults.max_chain_depth),
            max_describe_depth: self.max_describe_depth.unwrap_or(defaults.max_describe_depth),
            max_array_len: self.max_array_len.unwrap_or(defaults.max_array_len),
        }
    }
}

fn print_text(transcripts: &[Transcript]) {
    for transcript in transcripts {
        println!("== {}", transcript.demo);
        for line in &transcript.lines {
            println!("{line}");
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    tracing::info!("Starting protochain demos v{} ({:?})", protochain_core::VERSION, config);

    let transcripts = match cli.demo {
        Some(demo) => vec![run_demo(demo, &config)?],
        None => run_all(&config)?,
    };

    if cli.json {
        let rendered = serde_json::to_string_pretty(&transcripts).context("serializing transcripts")?;
        println!("{rendered}");
    } else {
        print_text(&transcripts);
    }
    Ok(())
}
