//! Memory-mapped register definitions for the RP2040 DMA and UART blocks
//!
//! This module provides type-safe access to the peripheral registers used by
//! the transport. All register access is volatile to ensure proper hardware
//! interaction.

// Full register maps; the transport touches a subset
#![allow(dead_code)]

pub mod dma;
pub mod pads;
pub mod resets;
pub mod uart;

/// DMA register block base address
pub const DMA_BASE: usize = 0x5000_0000;

/// UART0 register block base address
pub const UART0_BASE: usize = 0x4003_4000;

/// UART1 register block base address
pub const UART1_BASE: usize = 0x4003_8000;

/// RESETS register block base address
pub const RESETS_BASE: usize = 0x4000_C000;

/// IO_BANK0 register block base address
pub const IO_BANK0_BASE: usize = 0x4001_4000;

/// PADS_BANK0 register block base address
pub const PADS_BANK0_BASE: usize = 0x4001_C000;

/// Offset of the atomic XOR alias of a peripheral register
pub const ALIAS_XOR: usize = 0x1000;

/// Offset of the atomic bitmask-set alias of a peripheral register
pub const ALIAS_SET: usize = 0x2000;

/// Offset of the atomic bitmask-clear alias of a peripheral register
pub const ALIAS_CLR: usize = 0x3000;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Modify a register using a read-modify-write operation
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn modify_reg<F>(addr: usize, f: F)
where
    F: FnOnce(u32) -> u32,
{
    // SAFETY: caller guarantees address validity
    let value = unsafe { read_reg(addr) };
    unsafe { write_reg(addr, f(value)) }
}

/// Set bits through the atomic set alias (no read-modify-write race)
///
/// # Safety
/// The caller must ensure `addr` is a peripheral register that has the
/// RP2040 atomic aliases.
#[inline(always)]
pub unsafe fn set_bits(addr: usize, bits: u32) {
    unsafe { write_reg(addr + ALIAS_SET, bits) }
}

/// Clear bits through the atomic clear alias (no read-modify-write race)
///
/// # Safety
/// The caller must ensure `addr` is a peripheral register that has the
/// RP2040 atomic aliases.
#[inline(always)]
pub unsafe fn clear_bits(addr: usize, bits: u32) {
    unsafe { write_reg(addr + ALIAS_CLR, bits) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register of a block whose base
/// is chosen at runtime (one DMA channel, one UART instance).
///
/// # Example
/// ```ignore
/// impl UartRegs {
///     reg_rw!(ibrd, set_ibrd, UARTIBRD_OFFSET, "Integer baud rate divisor");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            unsafe { $crate::internal::register::read_reg(self.base + $offset) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            unsafe { $crate::internal::register::write_reg(self.base + $offset, value) }
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            unsafe { $crate::internal::register::read_reg(self.base + $offset) }
        }
    };
}

/// Generate a bit check method (true when the bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn(&self) -> bool {
            unsafe { ($crate::internal::register::read_reg(self.base + $offset) & $bit) != 0 }
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
