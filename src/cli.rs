//! §6.1 command-line surface.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ofac-sdn",
    about = "Parse the OFAC SDN Advanced XML sanctions list and screen names against it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse an SDN Advanced XML document into flat JSON party records.
    Parse {
        /// Path to the SDN_ADVANCED.XML document.
        #[arg(long)]
        input: String,
        /// Write output here instead of stdout.
        #[arg(long)]
        out: Option<String>,
        /// Pretty-print each JSON record.
        #[arg(long, default_value_t = false)]
        pretty: bool,
        /// Source URL recorded on every emitted record.
        #[arg(long, env = "OFAC_SOURCE_URL", default_value = ofac_sdn::constants::OFAC_SOURCE_URL)]
        source_url: String,
    },
    /// Screen a name against a previously parsed JSONL corpus.
    Screen {
        /// Path to a JSONL file of `PartyRecord`s, as written by `parse`.
        #[arg(long)]
        corpus: String,
        /// Name to screen.
        #[arg(long)]
        name: String,
        /// Edit-distance threshold for a tier-3 match.
        #[arg(long, default_value_t = 3)]
        threshold: u32,
        /// Maximum number of hits to return.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}
