// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// Largest value the 16-bit IBRD field accepts.
const IBRD_MAX: u32 = 0xFFFF;
/// FBRD holds 64ths in a 6-bit field.
const FBRD_MAX: u32 = 0x3F;

/// Baud-rate divisor split into the IBRD and FBRD register values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaudDivisor {
    pub integer: u32,
    pub fractional: u32,
}

impl BaudDivisor {
    /// 115200 baud from a 3 MHz UART clock.
    pub const REFERENCE: BaudDivisor = BaudDivisor {
        integer: 1,
        fractional: 40,
    };

    pub const fn new(integer: u32, fractional: u32) -> Self {
        Self {
            integer,
            fractional,
        }
    }

    /// Compute the divisor for `baud` from a UART reference clock.
    ///
    /// The divisor is `clock / (16 * baud)`; the fraction is rounded to the nearest 64th.
    /// Returns `None` when the result does not fit the hardware fields.
    pub fn from_clock(clock_hz: u32, baud: u32) -> Option<Self> {
        if baud == 0 {
            return None;
        }
        let baud16 = (baud as u64) * 16;
        let clock = clock_hz as u64;
        let integer = clock / baud16;
        // remainder in 128ths, then round half up to 64ths
        let frac128 = (clock % baud16) * 8 / baud as u64;
        let fractional = frac128 / 2 + frac128 % 2;

        let (integer, fractional) = if fractional > FBRD_MAX as u64 {
            (integer + 1, 0)
        } else {
            (integer, fractional)
        };

        if integer == 0 || integer > IBRD_MAX as u64 {
            return None;
        }
        Some(Self::new(integer as u32, fractional as u32))
    }

    pub fn is_valid(&self) -> bool {
        (1..=IBRD_MAX).contains(&self.integer) && self.fractional <= FBRD_MAX
    }
}

impl Default for BaudDivisor {
    fn default() -> Self {
        Self::REFERENCE
    }
}
