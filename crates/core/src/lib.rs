// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod boot;
pub mod controller;
pub mod divisor;
pub mod fault;
pub mod instance;
pub mod mmio;
pub mod registers;
pub mod selftest;
pub mod sim;
pub mod snapshot;

pub use controller::{DriverState, Uart};
pub use divisor::BaudDivisor;
pub use fault::{FaultHandler, RecordFault, SpinHalt};
pub use instance::UartInstance;
pub use mmio::MmioRegisters;
pub use registers::{Control, Flags, Register, RegisterMap};
pub use sim::SimulatedRegisters;


/// Failures the driver can detect. Each maps onto exactly one non-success [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UartError {
    #[error("Parity error flagged by the UART")]
    Parity,
    #[error("Overrun error flagged by the UART")]
    Overrun,
    #[error("Receive enable bit is clear")]
    ReceiveEnable,
    #[error("Transmit enable bit is clear")]
    TransmitEnable,
    #[error("Integration test loopback returned {observed:#04x}, expected {expected:#04x}")]
    IntegrationTestFailed { observed: u8, expected: u8 },
    #[error("Line control {lcrh:#x} does not select 8 data bits")]
    DataBits { lcrh: u32 },
}

impl UartError {
    pub fn code(&self) -> ErrorCode {
        match self {
            UartError::Parity => ErrorCode::ParityError,
            UartError::Overrun => ErrorCode::OverrunError,
            UartError::ReceiveEnable => ErrorCode::ReceiveEnableError,
            UartError::TransmitEnable => ErrorCode::TransmitEnableError,
            UartError::IntegrationTestFailed { .. } => ErrorCode::IntegrationTestFailed,
            UartError::DataBits { .. } => ErrorCode::DataBitsError,
        }
    }
}

pub type UartResult<T> = Result<T, UartError>;

/// The closed set of result codes reported by the driver.
///
/// Numeric values are stable and match the codes the boot firmware reports,
/// so they can be used as process exit codes or written to a mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0x00,
    ParityError = 0x01,
    OverrunError = 0x02,
    ReceiveEnableError = 0x03,
    TransmitEnableError = 0x04,
    IntegrationTestFailed = 0x05,
    DataBitsError = 0x06,
}

impl ErrorCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }
}

impl<T> From<&UartResult<T>> for ErrorCode {
    fn from(result: &UartResult<T>) -> Self {
        match result {
            Ok(_) => ErrorCode::Success,
            Err(e) => e.code(),
        }
    }
}

impl From<UartError> for ErrorCode {
    fn from(err: UartError) -> Self {
        err.code()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({:#04x})", self, self.as_u32())
    }
}
