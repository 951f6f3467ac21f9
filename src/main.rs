mod cli;

use std::fs;
use std::io::{self, BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use ofac_sdn::matcher;
use ofac_sdn::parser;
use ofac_sdn::record::PartyRecord;

fn init_logging() {
    tracing_subscriber::fmt()
        .event_format(ofac_sdn::log_format::TargetFirstFormat)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            input,
            out,
            pretty,
            source_url,
        } => run_parse(&input, out.as_deref(), pretty, &source_url),
        Command::Screen {
            corpus,
            name,
            threshold,
            limit,
        } => run_screen(&corpus, &name, threshold, limit),
    }
}

fn run_parse(input: &str, out: Option<&str>, pretty: bool, source_url: &str) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading {input}"))?;

    let output = parser::parse_with_source_url(&bytes, source_url).with_context(|| format!("parsing {input}"))?;

    tracing::info!(
        locations_resolved = output.stats.locations_resolved,
        id_docs_resolved = output.stats.id_docs_resolved,
        sanctions_profiles_resolved = output.stats.sanctions_profiles_resolved,
        parties_emitted = output.stats.parties_emitted,
        "parse complete"
    );
    if output.stats.parties_skipped > 0 {
        tracing::warn!(
            parties_skipped = output.stats.parties_skipped,
            "some parties had no FixedRef and were skipped"
        );
    }

    let stdout;
    let file_writer;
    let mut writer: Box<dyn Write> = match out {
        Some(path) => {
            file_writer = BufWriter::new(fs::File::create(path).with_context(|| format!("creating {path}"))?);
            Box::new(file_writer)
        }
        None => {
            stdout = BufWriter::new(io::stdout());
            Box::new(stdout)
        }
    };

    for record in &output.records {
        let line = if pretty {
            serde_json::to_string_pretty(record)
        } else {
            serde_json::to_string(record)
        }
        .context("serializing record")?;
        writeln!(writer, "{line}").context("writing record")?;
    }

    Ok(())
}

fn run_screen(corpus_path: &str, name: &str, threshold: u32, limit: usize) -> Result<()> {
    let file = fs::File::open(corpus_path).with_context(|| format!("opening {corpus_path}"))?;
    let reader = io::BufReader::new(file);

    let mut corpus = Vec::new();
    for line in reader.lines() {
        let line = line.context("reading corpus line")?;
        if line.trim().is_empty() {
            continue;
        }
        let record: PartyRecord = serde_json::from_str(&line).context("parsing corpus record")?;
        corpus.push(record);
    }

    let hits = matcher::screen(&corpus, name, threshold, limit);
    let json = serde_json::to_string_pretty(&hits).context("serializing hits")?;
    println!("{json}");

    Ok(())
}
