// uartboot - PL011 UART bring-up driver
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::registers::{Register, RegisterMap};
use core::ptr;

/// Register block of a real PL011, accessed through volatile loads and stores.
#[derive(Debug)]
pub struct MmioRegisters {
    base: usize,
}

impl MmioRegisters {
    /// # Safety
    ///
    /// `base` must be the mapped, device-memory base address of a PL011 register block,
    /// and the returned value must be the only accessor of that block for its lifetime.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    fn addr(&self, reg: Register) -> *mut u32 {
        (self.base + reg.offset() as usize) as *mut u32
    }
}

impl RegisterMap for MmioRegisters {
    fn read(&mut self, reg: Register) -> u32 {
        // SAFETY: the constructor contract guarantees a mapped, exclusively owned block.
        unsafe { ptr::read_volatile(self.addr(reg)) }
    }

    fn write(&mut self, reg: Register, value: u32) {
        // SAFETY: as above.
        unsafe { ptr::write_volatile(self.addr(reg), value) }
    }
}
