// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! PL011 controller: configuration, transmit path and runtime error checks.

use crate::divisor::BaudDivisor;
use crate::fault::{FaultHandler, SpinHalt};
use crate::registers::{Control, Flags, RegisterMap, LCRH_WLEN_8};
use crate::{UartError, UartResult};
use tracing::{debug, info};

/// Lifecycle of a controller. `Halted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Unknown,
    Disabling,
    Configuring,
    Enabling,
    /// Configured and enabled, self-tests not yet passed.
    Enabled,
    /// Startup and integration tests both passed.
    Verified,
    Transmitting,
    Halted(UartError),
}

impl std::fmt::Display for DriverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverState::Halted(e) => write!(f, "halted: {}", e),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Driver for one PL011 instance.
///
/// The controller owns nothing but its register map; all device state lives in the
/// hardware registers. It assumes exclusive access to the block for its whole lifetime.
#[derive(Debug)]
pub struct Uart<R: RegisterMap, F: FaultHandler = SpinHalt> {
    pub(crate) regs: R,
    fault: F,
    divisor: BaudDivisor,
    state: DriverState,
    pub(crate) startup_passed: bool,
    pub(crate) integration_passed: bool,
}

impl<R: RegisterMap> Uart<R, SpinHalt> {
    pub fn new(regs: R) -> Self {
        Self::with_fault_handler(regs, SpinHalt)
    }
}

impl<R: RegisterMap, F: FaultHandler> Uart<R, F> {
    pub fn with_fault_handler(regs: R, fault: F) -> Self {
        Self {
            regs,
            fault,
            divisor: BaudDivisor::REFERENCE,
            state: DriverState::Unknown,
            startup_passed: false,
            integration_passed: false,
        }
    }

    /// Substitute the divisor programmed by [`Uart::init`].
    pub fn with_divisor(mut self, divisor: BaudDivisor) -> Self {
        self.divisor = divisor;
        self
    }

    pub fn divisor(&self) -> BaudDivisor {
        self.divisor
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, DriverState::Halted(_))
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn fault_handler(&self) -> &F {
        &self.fault
    }

    pub fn into_parts(self) -> (R, F) {
        (self.regs, self.fault)
    }

    /// Bring the UART from any prior state to 8N1 at the configured divisor,
    /// with transmit and receive enabled.
    ///
    /// Line format registers are only written while the UART is disabled.
    pub fn init(&mut self) -> UartResult<()> {
        self.ensure_live()?;
        self.startup_passed = false;
        self.integration_passed = false;

        self.state = DriverState::Disabling;
        let mut ctrl = self.regs.control();
        ctrl.remove(Control::TXE | Control::RXE);
        self.regs.set_control(ctrl);

        self.state = DriverState::Configuring;
        debug!(
            "Programming divisor IBRD={} FBRD={}",
            self.divisor.integer, self.divisor.fractional
        );
        self.regs
            .set_divisor(self.divisor.integer, self.divisor.fractional);
        self.regs.set_line_control(LCRH_WLEN_8);

        self.state = DriverState::Enabling;
        let mut ctrl = self.regs.control();
        ctrl.insert(Control::TXE | Control::RXE);
        self.regs.set_control(ctrl);

        self.state = DriverState::Enabled;
        info!("UART configured: 8N1, transmit and receive enabled");
        Ok(())
    }

    /// Write one byte to DATA once the transmit FIFO has room.
    ///
    /// Spins on TX-FIFO-full with no timeout: a FIFO that never drains blocks the
    /// caller forever.
    pub fn send_char(&mut self, byte: u8) -> UartResult<()> {
        self.ensure_live()?;
        while self.regs.flags().contains(Flags::TXFF) {
            core::hint::spin_loop();
        }
        self.regs.write_data(byte);
        if self.state == DriverState::Verified {
            self.state = DriverState::Transmitting;
        }
        Ok(())
    }

    /// Send `bytes` in order, stopping at the first failure.
    pub fn send_string(&mut self, bytes: impl AsRef<[u8]>) -> UartResult<()> {
        self.ensure_live()?;
        for &byte in bytes.as_ref() {
            self.send_char(byte)?;
        }
        Ok(())
    }

    /// Sample FLAG once for link errors. Parity takes priority over overrun.
    pub fn check_errors(&mut self) -> UartResult<()> {
        self.ensure_live()?;
        let flags = self.regs.flags();
        if flags.contains(Flags::PE) {
            return self.fail(UartError::Parity);
        }
        if flags.contains(Flags::OE) {
            return self.fail(UartError::Overrun);
        }
        Ok(())
    }

    /// Enter the terminal halted state and hand `error` to the fault handler.
    ///
    /// Only the first call has an effect; a halted controller stays halted on its
    /// first error.
    pub fn handle_error(&mut self, error: UartError) {
        if self.is_halted() {
            return;
        }
        self.state = DriverState::Halted(error);
        self.fault.handle_error(error);
    }

    pub(crate) fn fail(&mut self, error: UartError) -> UartResult<()> {
        self.handle_error(error);
        Err(error)
    }

    pub(crate) fn ensure_live(&self) -> UartResult<()> {
        match self.state {
            DriverState::Halted(e) => Err(e),
            _ => Ok(()),
        }
    }

    pub(crate) fn mark_verified_if_complete(&mut self) {
        if self.startup_passed
            && self.integration_passed
            && matches!(self.state, DriverState::Enabled | DriverState::Unknown)
        {
            self.state = DriverState::Verified;
            info!("UART self-tests passed");
        }
    }
}

impl<R: RegisterMap, F: FaultHandler> core::fmt::Write for Uart<R, F> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.send_string(s).map_err(|_| core::fmt::Error)
    }
}
