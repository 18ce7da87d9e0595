use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common_substring::{decode, input, select, GeneralizedText, SuffixTree, TerminatorPolicy};

#[derive(Parser, Debug)]
#[command(name = "common-substring")]
#[command(author, version, about = "Print the longest substring common to K strings", long_about = None)]
struct Cli {
    /// File holding the count K followed by K strings (stdin when absent or `-`)
    input: Option<PathBuf>,

    /// Terminator symbols appended to each string
    #[arg(long, value_enum, default_value_t = Terminators::Descending, env = "COMMON_SUBSTRING_TERMINATORS")]
    terminators: Terminators,

    /// Print the suffix tree to stderr before the answer
    #[arg(long)]
    dump_tree: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Terminators {
    /// Symbols counting down from the top of the symbol range, no practical limit on K
    Descending,
    /// The digits '0'..'9', at most ten strings, digits in the input are rejected
    Ascii,
}

impl From<Terminators> for TerminatorPolicy {
    fn from(terminators: Terminators) -> Self {
        match terminators {
            Terminators::Descending => TerminatorPolicy::default(),
            Terminators::Ascii => TerminatorPolicy::ASCII_DIGITS,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let strings = match &cli.input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            input::read_strings(file).with_context(|| format!("cannot read {}", path.display()))?
        }
        _ => input::read_strings(io::stdin().lock()).context("cannot read stdin")?,
    };
    tracing::info!(count = strings.len(), "read input strings");

    let text = GeneralizedText::from_strs(&strings, cli.terminators.into())?;
    let tree = SuffixTree::build(&text);
    if cli.dump_tree {
        eprint!("{}", tree.render());
    }

    let found = select(&tree);
    println!("{}", decode(&found.symbols));
    Ok(())
}
