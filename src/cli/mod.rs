// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the chunklens command-line interface.
//!
//! One subcommand per payload kind. Each reads a JSON payload from a file
//! (or stdin with `-`), runs the matching render pipeline, and prints either
//! a boxed terminal view or the pipeline output as JSON.

pub mod display;
pub mod views;

use clap::{Args, Parser, Subcommand, ValueEnum};

use chunklens::LocateStrategy;

#[derive(Parser)]
#[command(
    name = "chunklens",
    about = "Overlay chunks, similarities, and hallucinations on their source text",
    version
)]
pub struct Cli {
    /// Engine config file (JSON). Defaults apply to anything it leaves out.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Print the pipeline output as JSON instead of the terminal view
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// The payload argument shared by every subcommand.
#[derive(Args)]
pub struct PayloadArg {
    /// Payload JSON file, or `-` for stdin
    #[arg(default_value = "-")]
    pub payload: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show chunk boundaries, overlaps, and chunk statistics
    Chunks {
        #[command(flatten)]
        input: PayloadArg,
    },

    /// Show a chunk similarity heatmap and discontinuities
    Similarity {
        #[command(flatten)]
        input: PayloadArg,

        /// Report the whole matrix instead of the leading 20×20
        #[arg(long)]
        full: bool,
    },

    /// Highlight hallucinations in a generated answer
    Answer {
        #[command(flatten)]
        input: PayloadArg,

        /// How annotations are matched against the answer
        ///
        /// `two-pass` sorts annotations by where they first appear before
        /// matching; `greedy` matches them in the order given.
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Highlight retrieved chunks in their source document
    Context {
        #[command(flatten)]
        input: PayloadArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    TwoPass,
    Greedy,
}

impl From<StrategyArg> for LocateStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::TwoPass => LocateStrategy::TwoPass,
            StrategyArg::Greedy => LocateStrategy::Greedy,
        }
    }
}
