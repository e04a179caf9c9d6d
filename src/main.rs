// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chunklens::{
    render_answer, render_chunks, render_context, render_similarity, AnswerPayload, ChunkPayload,
    ContextPayload, EngineConfig, SimilarityPayload,
};

mod cli;
use cli::{views, Cli, Commands};

fn main() {
    // Logs go to stderr so `--json` output stays clean on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Chunks { input } => {
            let payload: ChunkPayload = read_payload(&input.payload)?;
            let render = render_chunks(&payload);
            if cli.json {
                print_json(&render)?;
            } else {
                views::print_chunks(&payload, &render);
            }
        }
        Commands::Similarity { input, full } => {
            if full {
                config.matrix = config.matrix.full();
            }
            let payload: SimilarityPayload = read_payload(&input.payload)?;
            let render = render_similarity(&payload, &config);
            if cli.json {
                print_json(&render)?;
            } else {
                views::print_similarity(&render, &config);
            }
        }
        Commands::Answer { input, strategy } => {
            if let Some(strategy) = strategy {
                config.locate.strategy = strategy.into();
            }
            let payload: AnswerPayload = read_payload(&input.payload)?;
            let render = render_answer(&payload, &config);
            if cli.json {
                print_json(&render)?;
            } else {
                views::print_answer(&render);
            }
        }
        Commands::Context { input } => {
            let payload: ContextPayload = read_payload(&input.payload)?;
            let render = render_context(&payload);
            if cli.json {
                print_json(&render)?;
            } else {
                views::print_context(&render);
            }
        }
    }
    Ok(())
}

/// Read a payload from `path`, or from stdin when `path` is `-`.
fn read_payload<T: DeserializeOwned>(path: &str) -> Result<T> {
    let json = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading payload from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading payload {}", path))?
    };
    chunklens::payload::parse(&json).with_context(|| format!("parsing payload {}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
