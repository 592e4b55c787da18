// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use aura_core::certificate::{EventCertificate, EventTrustCertificate, ReliabilityMetadata};
use aura_core::consistency::{AgentEvent, ConsistencyCalculator};
use aura_core::embedding::embed_text;
use aura_core::hash::{hash_canonical, hash_text};
use aura_core::policy::HaltSwitch;
use aura_core::{Digest, MerkleTree};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "auractl")]
#[command(about = "Aura PoCA batch attestation and compliance certificates")]
struct Cli {
    #[arg(long, default_value = "info")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the merkle root of an event batch.
    Root {
        /// JSON array of events: strings are hashed as raw text, objects
        /// are canonicalized first.
        #[arg(long)]
        events: PathBuf,
    },
    /// Print the inclusion proof for one leaf of a batch.
    Prove {
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        index: usize,
    },
    /// Verify a serialized inclusion proof against a leaf and root.
    Verify {
        #[arg(long)]
        leaf: String,
        #[arg(long)]
        root: String,
        /// Path to the proof JSON, as emitted by `prove`.
        #[arg(long)]
        proof: PathBuf,
    },
    /// Issue a bound compliance certificate for one event of a batch.
    Certify {
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        agent_id: String,
        /// RFC 3339; defaults to now (UTC).
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long)]
        batch_id: Option<String>,
        #[arg(long)]
        score: f64,
        #[arg(long)]
        drift: f64,
        #[arg(long)]
        status: String,
    },
    /// Score text content against a constitution with the consistency
    /// calculator.
    Evaluate {
        #[arg(long)]
        constitution: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        timestamp: Option<String>,
    },
}

fn load_leaves(path: &Path) -> Result<Vec<Digest>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let Some(items) = value.as_array() else {
        return Err("events file must contain a JSON array".into());
    };
    let mut leaves = Vec::with_capacity(items.len());
    for item in items {
        let leaf = match item {
            Value::String(s) => hash_text(s),
            other => hash_canonical(other)?,
        };
        leaves.push(leaf);
    }
    tracing::info!(count = leaves.len(), "hashed event batch");
    Ok(leaves)
}

fn run(cmd: Command) -> Result<ExitCode, Box<dyn Error>> {
    match cmd {
        Command::Root { events } => {
            let tree = MerkleTree::build(load_leaves(&events)?)?;
            println!("{}", tree.root());
        }
        Command::Prove { events, index } => {
            let tree = MerkleTree::build(load_leaves(&events)?)?;
            let proof = tree.prove(index)?;
            println!("{}", serde_json::to_string_pretty(&proof)?);
        }
        Command::Verify { leaf, root, proof } => {
            let raw = fs::read_to_string(&proof)?;
            let steps: Vec<aura_verifier::ProofStep> = serde_json::from_str(&raw)?;
            if aura_verifier::verify_proof(&leaf, &steps, &root) {
                println!("ok");
            } else {
                println!("verification failed");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Certify {
            events,
            index,
            agent_id,
            timestamp,
            batch_id,
            score,
            drift,
            status,
        } => {
            let tree = MerkleTree::build(load_leaves(&events)?)?;
            let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
            let etc = EventTrustCertificate::issue(&tree, index, &timestamp, batch_id)?;
            let cert = EventCertificate::bind(
                &agent_id,
                &timestamp,
                ReliabilityMetadata {
                    score,
                    drift,
                    status,
                },
                &etc,
            )?;
            let fingerprint = cert.fingerprint()?;
            tracing::info!(%fingerprint, leaf_index = index, "certificate bound");
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "certificate": cert.to_value(),
                    "etc": etc,
                    "fingerprint": fingerprint,
                }))?
            );
        }
        Command::Evaluate {
            constitution,
            content,
            timestamp,
        } => {
            let calc = ConsistencyCalculator::new(
                embed_text(&constitution),
                Vec::new(),
                HaltSwitch::new(),
            )?;
            let event = AgentEvent {
                timestamp: timestamp.unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
                content: content.clone(),
                embedding: embed_text(&content),
            };
            let assessment = calc.calculate(&event)?;
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log.clone())),
        )
        .init();
    run(cli.cmd)
}
