// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Fault policy.
//!
//! Every detected failure ends up in exactly one [`FaultHandler::handle_error`] call.
//! A misconfigured link cannot be repaired from software during bring-up, so the
//! production policy never returns.

use crate::UartError;

/// Terminal sink for driver failures.
pub trait FaultHandler {
    /// Called once, when the controller enters its halted state.
    fn handle_error(&mut self, error: UartError);
}

/// Halts forward progress by spinning on the current core.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinHalt;

impl FaultHandler for SpinHalt {
    fn handle_error(&mut self, error: UartError) {
        tracing::error!("UART fault {} ({}), halting", error.code(), error);
        loop {
            core::hint::spin_loop();
        }
    }
}

/// Records faults and returns, so a harness can observe the halt.
#[derive(Debug, Default, Clone)]
pub struct RecordFault {
    faults: Vec<UartError>,
}

impl RecordFault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> &[UartError] {
        &self.faults
    }

    pub fn last(&self) -> Option<UartError> {
        self.faults.last().copied()
    }
}

impl FaultHandler for RecordFault {
    fn handle_error(&mut self, error: UartError) {
        tracing::error!("UART fault {} ({})", error.code(), error);
        self.faults.push(error);
    }
}

impl<H: FaultHandler + ?Sized> FaultHandler for &mut H {
    fn handle_error(&mut self, error: UartError) {
        (**self).handle_error(error)
    }
}
