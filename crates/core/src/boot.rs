// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::controller::Uart;
use crate::fault::FaultHandler;
use crate::registers::RegisterMap;
use crate::UartResult;
use tracing::info;

pub const BOOT_MESSAGE: &str = "Hello World\n";

/// Full bring-up: configure, self-test, send `message`, then sample link errors.
///
/// Every failure is forwarded to the fault handler before it is returned.
pub fn bring_up<R, F>(uart: &mut Uart<R, F>, message: impl AsRef<[u8]>) -> UartResult<()>
where
    R: RegisterMap,
    F: FaultHandler,
{
    info!("Initializing UART");
    forward(uart, Uart::init)?;

    info!("Running integration tests");
    forward(uart, Uart::integration_tests)?;

    info!("Running startup tests");
    forward(uart, Uart::startup_tests)?;

    let message = message.as_ref();
    info!("Sending {} byte(s)", message.len());
    forward(uart, |u| u.send_string(message))?;

    info!("Checking line errors");
    forward(uart, Uart::check_errors)?;

    info!("UART bring-up complete");
    Ok(())
}

fn forward<R, F, Op>(uart: &mut Uart<R, F>, op: Op) -> UartResult<()>
where
    R: RegisterMap,
    F: FaultHandler,
    Op: FnOnce(&mut Uart<R, F>) -> UartResult<()>,
{
    op(&mut *uart).map_err(|e| {
        uart.handle_error(e);
        e
    })
}
