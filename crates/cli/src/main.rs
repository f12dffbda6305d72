// KS10 Console - EPI Bus Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ks10_config::{BridgeManifest, ResolvedBridge};
use ks10_epi::sim::{BusWrite, SystemBus};
use ks10_epi::Capability;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

const EXIT_PASS: u8 = 0;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

const PLAN_SCHEMA_VERSION: &str = "1.0";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "KS10 console EPI bridge tool",
    long_about = None
)]
struct Cli {
    /// Log every register write
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a bridge manifest without touching any hardware.
    Check(CheckArgs),

    /// Run bring-up against the simulated SoC and print the register writes.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Path to the bridge manifest (YAML). Uses the built-in console profile if omitted.
    manifest: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Path to the bridge manifest (YAML). Uses the built-in console profile if omitted.
    manifest: Option<PathBuf>,

    /// Emit the plan as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct EpiRegisters {
    cfg: u32,
    baud: u32,
    hb8cfg: u32,
    addrmap: u32,
}

#[derive(Debug, Serialize)]
struct BringUpPlan {
    plan_schema_version: String,
    name: String,
    capability: Capability,
    writes: Vec<BusWrite>,
    epi: EpiRegisters,
    #[serde(skip_serializing_if = "Option::is_none")]
    window_base: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    window_size: Option<u32>,
    faults: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `plan --json` stays machine-readable.
    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Plan(args) => run_plan(args),
    }
}

fn load_bridge(manifest: Option<&Path>) -> Result<ResolvedBridge> {
    match manifest {
        Some(path) => {
            let manifest = BridgeManifest::from_file(path)?;
            manifest
                .resolve()
                .with_context(|| format!("Invalid bridge manifest {:?}", path))
        }
        None => Ok(ResolvedBridge::ks10()),
    }
}

fn run_check(args: CheckArgs) -> ExitCode {
    let resolved = match load_bridge(args.manifest.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    info!("{}", check_summary(&resolved));
    ExitCode::from(EXIT_PASS)
}

fn check_summary(resolved: &ResolvedBridge) -> String {
    let profile = resolved.profile();
    // A resolved profile always has a placement slot.
    let base = profile.window.base().unwrap_or_default();
    format!(
        "Bridge '{}' OK: {} pins, HB8CFG={:#010x}, ADDRMAP={:#010x}, window at {:#010x}",
        resolved.name,
        profile.pins.len(),
        profile.timing.timing_word(),
        profile.window.addrmap_word(),
        base,
    )
}

fn run_plan(args: PlanArgs) -> ExitCode {
    let plan = match load_bridge(args.manifest.as_deref()).and_then(|r| build_plan(&r)) {
        Ok(p) => p,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&plan) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                error!("Failed to serialize plan: {}", e);
                return ExitCode::from(EXIT_RUNTIME_ERROR);
            }
        }
    } else {
        print_plan(&plan);
    }

    if plan.faults.is_empty() {
        ExitCode::from(EXIT_PASS)
    } else {
        error!("Bring-up faulted {} time(s) on the simulated SoC", plan.faults.len());
        ExitCode::from(EXIT_RUNTIME_ERROR)
    }
}

fn build_plan(resolved: &ResolvedBridge) -> Result<BringUpPlan> {
    let bridge = resolved
        .bridge()
        .with_context(|| format!("Bridge '{}' is not a usable profile", resolved.name))?;

    let mut bus = SystemBus::new();
    bridge.initialize(&mut bus);

    let epi0 = bus.epi().context("Simulated SoC has no EPI0 block")?;
    let window = epi0.mapped_window();
    Ok(BringUpPlan {
        plan_schema_version: PLAN_SCHEMA_VERSION.to_string(),
        name: resolved.name.clone(),
        capability: resolved.capability,
        writes: bus.writes().to_vec(),
        epi: EpiRegisters {
            cfg: epi0.cfg(),
            baud: epi0.baud(),
            hb8cfg: epi0.hb8cfg(),
            addrmap: epi0.addrmap(),
        },
        window_base: window.map(|(base, _)| base),
        window_size: window.map(|(_, size)| size),
        faults: bus.faults().iter().map(|f| f.to_string()).collect(),
    })
}

fn print_plan(plan: &BringUpPlan) {
    println!("Bridge '{}' ({:?})", plan.name, plan.capability);
    println!("{:>4}  {:<10} {:<12} value", "#", "block", "address");
    for (i, w) in plan.writes.iter().enumerate() {
        println!(
            "{:>4}  {:<10} {:#010x}   {:#010x}",
            i + 1,
            w.peripheral,
            w.addr,
            w.value
        );
    }
    println!(
        "EPI0: CFG={:#010x} BAUD={:#010x} HB8CFG={:#010x} ADDRMAP={:#010x}",
        plan.epi.cfg, plan.epi.baud, plan.epi.hb8cfg, plan.epi.addrmap
    );
    match (plan.window_base, plan.window_size) {
        (Some(base), Some(size)) => println!("Window: {:#010x} ({} bytes)", base, size),
        _ => println!("Window: unmapped"),
    }
    for f in &plan.faults {
        println!("FAULT: {}", f);
    }
}
