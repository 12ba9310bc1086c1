// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uartboot_core::boot::BOOT_MESSAGE;
use uartboot_core::{BaudDivisor, Register, SimulatedRegisters, UartInstance};

pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    /// Explicit IBRD/FBRD values.
    #[serde(default)]
    pub divisor: Option<BaudDivisor>,
    /// UART reference clock, used with `baud` when no divisor is given.
    #[serde(default)]
    pub clock_hz: Option<u32>,
    #[serde(default)]
    pub baud: Option<u32>,
}

impl LineConfig {
    pub fn resolve(&self) -> Result<BaudDivisor> {
        if let Some(divisor) = self.divisor {
            if self.clock_hz.is_some() || self.baud.is_some() {
                anyhow::bail!("'line.divisor' cannot be combined with 'clock_hz'/'baud'");
            }
            if !divisor.is_valid() {
                anyhow::bail!(
                    "Divisor {}/{} out of range (integer 1..=65535, fractional 0..=63)",
                    divisor.integer,
                    divisor.fractional
                );
            }
            return Ok(divisor);
        }

        match (self.clock_hz, self.baud) {
            (None, None) => Ok(BaudDivisor::REFERENCE),
            (Some(clock), Some(baud)) => BaudDivisor::from_clock(clock, baud).ok_or_else(|| {
                anyhow::anyhow!("Baud rate {} is not reachable from a {} Hz clock", baud, clock)
            }),
            _ => anyhow::bail!("'line.clock_hz' and 'line.baud' must be given together"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default = "default_loopback")]
    pub loopback: bool,
    #[serde(default)]
    pub tx_full_polls: u32,
    /// Initial register values, keyed by register name.
    #[serde(default)]
    pub seed: BTreeMap<Register, u32>,
}

fn default_loopback() -> bool {
    true
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            loopback: default_loopback(),
            tx_full_polls: 0,
            seed: BTreeMap::new(),
        }
    }
}

impl SimulationConfig {
    pub fn build(&self) -> SimulatedRegisters {
        let mut regs = SimulatedRegisters::new()
            .with_loopback(self.loopback)
            .with_tx_full_polls(self.tx_full_polls);
        for (reg, value) in &self.seed {
            regs.seed(*reg, *value);
        }
        regs
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BootConfig {
    pub schema_version: String,
    #[serde(default)]
    pub instance: UartInstance,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default = "default_message")]
    pub message: String,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_message() -> String {
    BOOT_MESSAGE.to_string()
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            instance: UartInstance::default(),
            line: LineConfig::default(),
            message: default_message(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl BootConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open boot config at {:?}", path.as_ref()))?;
        let config: Self =
            serde_yaml::from_reader(f).context("Failed to parse Boot Config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse Boot Config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '{}'",
                self.schema_version,
                SCHEMA_VERSION
            );
        }

        if !self.instance.is_supported() {
            anyhow::bail!(
                "Instance '{}' is the mini UART and is not supported by this driver",
                self.instance
            );
        }

        self.line.resolve()?;
        Ok(())
    }

    pub fn divisor(&self) -> Result<BaudDivisor> {
        self.line.resolve()
    }
}
