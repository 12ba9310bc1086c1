// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use uartboot_config::BootConfig;
use uartboot_core::boot::bring_up;
use uartboot_core::snapshot::RegisterSnapshot;
use uartboot_core::{ErrorCode, RecordFault, Register, Uart, UartInstance};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the boot configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// UART instance to bring up (uart0, uart2..uart5)
    #[arg(short, long)]
    instance: Option<UartInstance>,

    /// Message to transmit once the link is verified
    #[arg(short, long)]
    message: Option<String>,

    /// Seed a register before bring-up, e.g. `itop=0xAA` (repeatable)
    #[arg(long, value_parser = parse_seed)]
    seed: Vec<(Register, u32)>,

    /// Disable the simulated integration-test loopback
    #[arg(long)]
    no_loopback: bool,

    /// Write the final register state as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable register-level tracing
    #[arg(short, long)]
    trace: bool,
}

fn parse_seed(s: &str) -> Result<(Register, u32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected REG=VALUE, got '{}'", s))?;
    let reg = Register::from_name(name.trim())
        .ok_or_else(|| format!("unknown register '{}'", name))?;
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    }
    .map_err(|e| format!("invalid value '{}': {}", value, e))?;
    Ok((reg, parsed))
}

/// Exit status for failures outside the driver (bad config, I/O). Kept clear of
/// the `ErrorCode` range.
const RUNNER_FAILURE_EXIT: u8 = 0x80;

fn main() -> ExitCode {
    let args = Args::parse();

    // stdout carries the transmitted bytes only
    let level = if args.trace {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(code) => ExitCode::from(code.as_u32() as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(RUNNER_FAILURE_EXIT)
        }
    }
}

fn run(args: Args) -> anyhow::Result<ErrorCode> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading boot config: {:?}", path);
            BootConfig::from_file(path)?
        }
        None => BootConfig::default(),
    };
    if let Some(instance) = args.instance {
        config.instance = instance;
    }
    if let Some(message) = args.message {
        config.message = message;
    }
    if args.no_loopback {
        config.simulation.loopback = false;
    }
    for (reg, value) in args.seed {
        config.simulation.seed.insert(reg, value);
    }
    config.validate()?;

    let divisor = config.divisor()?;
    info!(
        "Bringing up {} at {:#010x} (IBRD={}, FBRD={})",
        config.instance,
        config.instance.base_address(),
        divisor.integer,
        divisor.fractional
    );

    let mut uart =
        Uart::with_fault_handler(config.simulation.build(), RecordFault::new()).with_divisor(divisor);
    let result = bring_up(&mut uart, config.message.as_bytes());
    let code = ErrorCode::from(&result);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(uart.registers().transmitted())?;
    stdout.flush()?;

    if let Some(path) = &args.snapshot {
        let snapshot = RegisterSnapshot::capture(uart.registers(), uart.state(), code.as_u32());
        std::fs::write(path, snapshot.to_json()?)
            .with_context(|| format!("Failed to write snapshot to {:?}", path))?;
        info!("Snapshot written to {:?}", path);
    }

    if code.is_success() {
        info!("Result: {}", code);
    } else if let Err(e) = result {
        info!("Result: {} - {}", code, e);
    }
    Ok(code)
}
