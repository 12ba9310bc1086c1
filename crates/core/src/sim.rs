// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Simulated PL011 register block for host-side testing.

use crate::registers::{Flags, Register, RegisterMap, ITCP_ENABLE};
use tracing::{trace, warn};

/// Bytes covered by the simulated block (DATA through ITOP).
pub const WINDOW_SIZE: usize = 0x48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// One driver access, in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterAccess {
    pub kind: AccessKind,
    pub register: Register,
    pub value: u32,
}

/// Byte-addressable register backing store with the PL011 layout.
///
/// Registers hold whatever was last stored, so tests seed status registers directly.
/// Two optional behaviours approximate the device: loopback (ITIP drives ITOP while
/// test mode is on) and a transmit FIFO that reports full for a number of polls.
#[derive(Debug, Clone)]
pub struct SimulatedRegisters {
    data: Vec<u8>,
    log: Vec<RegisterAccess>,
    transmitted: Vec<u8>,
    loopback: bool,
    tx_full_polls: u32,
}

impl Default for SimulatedRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRegisters {
    /// All registers zero, as after a cold reset of the backing array.
    pub fn new() -> Self {
        Self {
            data: vec![0; WINDOW_SIZE],
            log: Vec::new(),
            transmitted: Vec::new(),
            loopback: false,
            tx_full_polls: 0,
        }
    }

    /// Writing ITIP while ITCP is enabled stores the complement of the stimulus's
    /// low byte in ITOP.
    pub fn with_loopback(mut self, enabled: bool) -> Self {
        self.loopback = enabled;
        self
    }

    /// The next `polls` reads of FLAG report TX-FIFO-full.
    pub fn with_tx_full_polls(mut self, polls: u32) -> Self {
        self.tx_full_polls = polls;
        self
    }

    pub fn seed(&mut self, reg: Register, value: u32) {
        self.write_u32(reg.offset() as usize, value);
    }

    pub fn peek(&self, reg: Register) -> u32 {
        self.read_u32(reg.offset() as usize)
    }

    pub fn log(&self) -> &[RegisterAccess] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Bytes written to DATA, in order.
    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    /// Values stored to `reg` by the driver, in order.
    pub fn writes_to(&self, reg: Register) -> Vec<u32> {
        self.log
            .iter()
            .filter(|a| a.kind == AccessKind::Write && a.register == reg)
            .map(|a| a.value)
            .collect()
    }

    pub fn remaining_tx_full_polls(&self) -> u32 {
        self.tx_full_polls
    }

    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) -> bool {
        match self.data.get_mut(offset) {
            Some(byte) => {
                *byte = value;
                true
            }
            None => false,
        }
    }

    fn read_u32(&self, offset: usize) -> u32 {
        let b0 = self.read_u8(offset).unwrap_or(0) as u32;
        let b1 = self.read_u8(offset + 1).unwrap_or(0) as u32;
        let b2 = self.read_u8(offset + 2).unwrap_or(0) as u32;
        let b3 = self.read_u8(offset + 3).unwrap_or(0) as u32;
        // Little Endian
        b0 | (b1 << 8) | (b2 << 16) | (b3 << 24)
    }

    fn write_u32(&mut self, offset: usize, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_u8(offset + i, byte);
        }
    }
}

impl RegisterMap for SimulatedRegisters {
    fn read(&mut self, reg: Register) -> u32 {
        if !reg.access().readable() {
            warn!("Read of write-only register {}", reg);
        }
        let mut value = self.peek(reg);
        if reg == Register::Flag && self.tx_full_polls > 0 {
            self.tx_full_polls -= 1;
            value |= Flags::TXFF.bits();
        }
        trace!("SIM: read {} -> {:#x}", reg, value);
        self.log.push(RegisterAccess {
            kind: AccessKind::Read,
            register: reg,
            value,
        });
        value
    }

    fn write(&mut self, reg: Register, value: u32) {
        if !reg.access().writable() {
            warn!("Write of read-only register {}", reg);
        }
        trace!("SIM: write {} <- {:#x}", reg, value);
        self.log.push(RegisterAccess {
            kind: AccessKind::Write,
            register: reg,
            value,
        });
        self.seed(reg, value);

        match reg {
            Register::Data => self.transmitted.push((value & 0xFF) as u8),
            Register::Itip if self.loopback => {
                if self.peek(Register::Itcp) & ITCP_ENABLE != 0 {
                    self.seed(Register::Itop, !value & 0xFF);
                }
            }
            _ => {}
        }
    }
}
