// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! PL011 register layout.
//!
//! Offsets and bit positions are the hardware contract and must stay bit-exact.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Line control word-length field (bits 5-6).
pub const LCRH_WLEN_MASK: u32 = 0b11 << 5;
/// Word-length encoding for 8 data bits. Parity and two-stop-bit flags stay clear.
pub const LCRH_WLEN_8: u32 = 0b11 << 5;

/// ITCP value that routes the transceiver through its integration test path.
pub const ITCP_ENABLE: u32 = 1;
pub const ITCP_DISABLE: u32 = 0;
/// Stimulus driven into ITIP during the loopback test.
pub const IT_STIMULUS: u32 = 0x55;
/// Response expected in the low byte of ITOP.
pub const IT_EXPECTED: u8 = 0xAA;
pub const ITOP_MASK: u32 = 0xFF;

bitflags! {
    /// CTRL enable bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u32 {
        const TXE = 1 << 0;
        const RXE = 1 << 9;
    }
}

bitflags! {
    /// FLAG status bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u32 {
        const PE = 1 << 3;
        const RXFE = 1 << 4;
        const TXFF = 1 << 5;
        const OE = 1 << 6;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn readable(self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    pub fn writable(self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    Data,
    Flag,
    Ibrd,
    Fbrd,
    Lcrh,
    Ctrl,
    Itcp,
    Itip,
    Itop,
}

impl Register {
    pub const ALL: [Register; 9] = [
        Register::Data,
        Register::Flag,
        Register::Ibrd,
        Register::Fbrd,
        Register::Lcrh,
        Register::Ctrl,
        Register::Itcp,
        Register::Itip,
        Register::Itop,
    ];

    pub const fn offset(self) -> u32 {
        match self {
            Register::Data => 0x00,
            Register::Flag => 0x18,
            Register::Ibrd => 0x24,
            Register::Fbrd => 0x28,
            Register::Lcrh => 0x2C,
            Register::Ctrl => 0x30,
            Register::Itcp => 0x3C,
            Register::Itip => 0x40,
            Register::Itop => 0x44,
        }
    }

    pub const fn access(self) -> Access {
        match self {
            Register::Flag | Register::Itop => Access::ReadOnly,
            Register::Itip => Access::WriteOnly,
            _ => Access::ReadWrite,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Register::Data => "data",
            Register::Flag => "flag",
            Register::Ibrd => "ibrd",
            Register::Fbrd => "fbrd",
            Register::Lcrh => "lcrh",
            Register::Ctrl => "ctrl",
            Register::Itcp => "itcp",
            Register::Itip => "itip",
            Register::Itop => "itop",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{:#04x}", self.name().to_uppercase(), self.offset())
    }
}

/// Access to one PL011 register block.
///
/// Every call must reach the device as exactly one load or store, in program
/// order, even when the value looks unchanged. Reads take `&mut self` because
/// device reads can have side effects.
pub trait RegisterMap {
    fn read(&mut self, reg: Register) -> u32;
    fn write(&mut self, reg: Register, value: u32);

    fn flags(&mut self) -> Flags {
        Flags::from_bits_retain(self.read(Register::Flag))
    }

    fn control(&mut self) -> Control {
        Control::from_bits_retain(self.read(Register::Ctrl))
    }

    fn set_control(&mut self, ctrl: Control) {
        self.write(Register::Ctrl, ctrl.bits());
    }

    fn line_control(&mut self) -> u32 {
        self.read(Register::Lcrh)
    }

    fn set_line_control(&mut self, value: u32) {
        self.write(Register::Lcrh, value);
    }

    fn set_divisor(&mut self, integer: u32, fractional: u32) {
        self.write(Register::Ibrd, integer);
        self.write(Register::Fbrd, fractional);
    }

    fn write_data(&mut self, byte: u8) {
        self.write(Register::Data, byte as u32);
    }

    fn set_test_mode(&mut self, enabled: bool) {
        let value = if enabled { ITCP_ENABLE } else { ITCP_DISABLE };
        self.write(Register::Itcp, value);
    }

    fn write_test_input(&mut self, value: u32) {
        self.write(Register::Itip, value);
    }

    fn test_output(&mut self) -> u32 {
        self.read(Register::Itop)
    }
}

impl<M: RegisterMap + ?Sized> RegisterMap for &mut M {
    fn read(&mut self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }
}
