//! RESETS Register Definitions
//!
//! Peripherals come out of boot held in reset; the UART and the GPIO banks
//! have to be released before their registers respond.

use super::{RESETS_BASE, clear_bits, read_reg, set_bits};

/// Reset control register offset
pub const RESET_OFFSET: usize = 0x0;
/// Reset done status register offset
pub const RESET_DONE_OFFSET: usize = 0x8;

/// DMA reset bit
pub const RESET_DMA: u32 = 1 << 2;
/// IO_BANK0 reset bit
pub const RESET_IO_BANK0: u32 = 1 << 5;
/// PADS_BANK0 reset bit
pub const RESET_PADS_BANK0: u32 = 1 << 8;
/// UART0 reset bit
pub const RESET_UART0: u32 = 1 << 22;
/// UART1 reset bit
pub const RESET_UART1: u32 = 1 << 23;

/// Access to the RESETS block.
pub struct ResetRegs;

impl ResetRegs {
    /// Hold the peripherals in `mask` in reset
    #[inline(always)]
    pub fn assert(mask: u32) {
        unsafe { set_bits(RESETS_BASE + RESET_OFFSET, mask) }
    }

    /// Release the peripherals in `mask` and wait until they are out of reset
    pub fn deassert_and_wait(mask: u32) {
        unsafe { clear_bits(RESETS_BASE + RESET_OFFSET, mask) };
        while unsafe { read_reg(RESETS_BASE + RESET_DONE_OFFSET) } & mask != mask {
            core::hint::spin_loop();
        }
    }

    /// Check whether every peripheral in `mask` is out of reset
    #[inline(always)]
    pub fn is_released(mask: u32) -> bool {
        unsafe { read_reg(RESETS_BASE + RESET_DONE_OFFSET) & mask == mask }
    }
}
