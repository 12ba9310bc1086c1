// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Built-in self-tests.
//!
//! The startup test audits the static configuration; the integration test drives the
//! transceiver's internal loopback path, so a dead block is caught without any
//! external wiring.

use crate::controller::Uart;
use crate::fault::FaultHandler;
use crate::registers::{
    Control, RegisterMap, IT_EXPECTED, IT_STIMULUS, ITOP_MASK, LCRH_WLEN_8, LCRH_WLEN_MASK,
};
use crate::{UartError, UartResult};
use tracing::debug;

impl<R: RegisterMap, F: FaultHandler> Uart<R, F> {
    /// Check 8 data bits, then transmit enable, then receive enable.
    pub fn startup_tests(&mut self) -> UartResult<()> {
        self.ensure_live()?;
        let lcrh = self.regs.line_control();
        let ctrl = self.regs.control();

        if lcrh & LCRH_WLEN_MASK != LCRH_WLEN_8 {
            return self.fail(UartError::DataBits { lcrh });
        }
        if !ctrl.contains(Control::TXE) {
            return self.fail(UartError::TransmitEnable);
        }
        if !ctrl.contains(Control::RXE) {
            return self.fail(UartError::ReceiveEnable);
        }

        debug!("Startup tests passed (LCRH={:#x}, CTRL={:#x})", lcrh, ctrl.bits());
        self.startup_passed = true;
        self.mark_verified_if_complete();
        Ok(())
    }

    /// Drive the stimulus through integration test mode and compare the response.
    ///
    /// Test mode is switched off again on both outcomes.
    pub fn integration_tests(&mut self) -> UartResult<()> {
        self.ensure_live()?;
        self.regs.set_test_mode(true);
        self.regs.write_test_input(IT_STIMULUS);
        let observed = (self.regs.test_output() & ITOP_MASK) as u8;
        self.regs.set_test_mode(false);

        if observed != IT_EXPECTED {
            return self.fail(UartError::IntegrationTestFailed {
                observed,
                expected: IT_EXPECTED,
            });
        }

        debug!("Integration test passed ({:#04x} -> {:#04x})", IT_STIMULUS, observed);
        self.integration_passed = true;
        self.mark_verified_if_complete();
        Ok(())
    }
}
