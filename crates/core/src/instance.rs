// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// UART instances of the BCM2711 peripheral block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UartInstance {
    Uart0,
    /// Mini UART. Not a PL011, so this driver does not support it.
    Uart1,
    Uart2,
    Uart3,
    Uart4,
    Uart5,
}

impl UartInstance {
    pub const ALL: [UartInstance; 6] = [
        UartInstance::Uart0,
        UartInstance::Uart1,
        UartInstance::Uart2,
        UartInstance::Uart3,
        UartInstance::Uart4,
        UartInstance::Uart5,
    ];

    pub const fn base_address(self) -> u32 {
        match self {
            UartInstance::Uart0 => 0x7E20_1000,
            UartInstance::Uart1 => 0x7E21_5000,
            UartInstance::Uart2 => 0x7E20_1400,
            UartInstance::Uart3 => 0x7E20_1600,
            UartInstance::Uart4 => 0x7E20_1800,
            UartInstance::Uart5 => 0x7E20_1A00,
        }
    }

    pub const fn is_supported(self) -> bool {
        !matches!(self, UartInstance::Uart1)
    }

    pub const fn name(self) -> &'static str {
        match self {
            UartInstance::Uart0 => "uart0",
            UartInstance::Uart1 => "uart1",
            UartInstance::Uart2 => "uart2",
            UartInstance::Uart3 => "uart3",
            UartInstance::Uart4 => "uart4",
            UartInstance::Uart5 => "uart5",
        }
    }
}

impl Default for UartInstance {
    fn default() -> Self {
        UartInstance::Uart0
    }
}

impl std::fmt::Display for UartInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown UART instance '{0}' (expected uart0..uart5)")]
pub struct UnknownInstance(pub String);

impl FromStr for UartInstance {
    type Err = UnknownInstance;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownInstance(s.to_string()))
    }
}
