// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::registers::Register;
use crate::sim::SimulatedRegisters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegisterSnapshot {
    pub registers: BTreeMap<String, u32>,
    pub transmitted: Vec<u8>,
    pub state: String,
    pub error_code: u32,
}

impl RegisterSnapshot {
    pub fn capture(regs: &SimulatedRegisters, state: impl ToString, error_code: u32) -> Self {
        let registers = Register::ALL
            .iter()
            .map(|r| (r.name().to_string(), regs.peek(*r)))
            .collect();
        Self {
            registers,
            transmitted: regs.transmitted().to_vec(),
            state: state.to_string(),
            error_code,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
