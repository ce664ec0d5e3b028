use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use log::info;
use sufindex::{Naive, StringSearch, SuffixIndex, Text};

/// Example:
/// cargo run --release -- --input GTAGT sa
/// cargo run --release -- -t data/chr1.txt --measure-time find TCGC GATTACA --verify
/// RUST_LOG=debug for per-stage sizes, RUST_LOG=trace for each doubling round
#[derive(Debug, Parser)]
#[command(
    name = "sufindex",
    about = "Build the suffix array, LCP array and suffix tree of a text and query them"
)]
struct Cli {
    /// Text file to index, `-` reads stdin
    #[arg(
        short = 't',
        long = "text",
        value_name = "TEXT",
        conflicts_with = "input",
        required_unless_present = "input"
    )]
    text: Option<PathBuf>,

    /// Literal text to index
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    input: Option<String>,

    /// Sentinel appended to the text; must sort below every text symbol
    #[arg(long, default_value_t = '$')]
    sentinel: char,

    /// Optional output file; if omitted, results are written to stdout
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Measure and print index construction time
    #[arg(long)]
    measure_time: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the suffix array as space-separated positions
    Sa,
    /// Print the LCP array as space-separated lengths
    Lcp,
    /// Print one suffix tree edge per line: parent child start end label
    Tree,
    /// Print the occurrence positions of each pattern
    Find {
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Cross-check every result against a brute-force scan
        #[arg(long)]
        verify: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let sentinel = u8::try_from(cli.sentinel)
        .map_err(|_| format!("sentinel must be a single-byte character (got {:?})", cli.sentinel))?;
    let body = load_input(&cli)?;
    let text = Text::with_sentinel(body.as_bytes(), sentinel)?;
    info!("indexing {} bytes", text.len());

    let (index, duration) = build_index(text, cli.measure_time)?;

    let mut out: Box<dyn Write> = match cli.output {
        Some(ref path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    if let Some(d) = duration {
        writeln!(out, "# build_time: {}ns", d.as_nanos())?;
    }

    match cli.command {
        Command::Sa => writeln!(out, "{}", join(index.suffix_array().iter().copied()))?,
        Command::Lcp => writeln!(out, "{}", join(index.lcp_array().iter().copied()))?,
        Command::Tree => {
            let tree = index.suffix_tree()?;
            for (parent, child, span) in tree.edges() {
                writeln!(
                    out,
                    "{} {} {} {} {}",
                    parent,
                    child,
                    span.start,
                    span.end,
                    String::from_utf8_lossy(tree.edge_label(child))
                )?;
            }
        }
        Command::Find { patterns, verify } => {
            for pattern in &patterns {
                let positions = index.find_positions(pattern.as_bytes());
                if verify {
                    let expected = Naive::find_all(index.text(), pattern);
                    if !positions.iter().copied().eq(expected.iter().copied()) {
                        return Err(format!(
                            "verification failed for {:?}: index found {:?}, scan found {:?}",
                            pattern, positions, expected
                        )
                        .into());
                    }
                }
                writeln!(out, "{}: {}", pattern, join(positions))?;
            }
        }
    }

    Ok(())
}

fn load_input(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let raw = if let Some(ref input) = cli.input {
        input.clone()
    } else if let Some(ref path) = cli.text {
        load_text(path)?
    } else {
        return Err("Either --text or --input must be provided".into());
    };

    Ok(raw.trim_end_matches(['\n', '\r']).to_string())
}

fn load_text(path: &PathBuf) -> Result<String, Box<dyn std::error::Error>> {
    let mut buf = String::new();
    if path.as_os_str() == "-" {
        io::stdin().read_to_string(&mut buf)?;
    } else {
        File::open(path)?.read_to_string(&mut buf)?;
    }
    Ok(buf)
}

fn build_index(
    text: Text,
    measure_time: bool,
) -> Result<(SuffixIndex, Option<Duration>), Box<dyn std::error::Error>> {
    let start = if measure_time {
        Some(Instant::now())
    } else {
        None
    };

    let index = SuffixIndex::new(text)?;
    let duration = start.map(|s| s.elapsed());

    Ok((index, duration))
}

fn join(values: impl IntoIterator<Item = usize>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
