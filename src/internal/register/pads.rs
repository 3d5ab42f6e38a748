//! IO_BANK0 / PADS_BANK0 Register Definitions
//!
//! Routes the UART signals to their GPIOs (function select 2) and configures
//! the pad electrical settings (pull-up on RX, input enable).

use super::{IO_BANK0_BASE, PADS_BANK0_BASE, modify_reg, write_reg};

/// Stride between GPIOn_STATUS/GPIOn_CTRL pairs in IO_BANK0
pub const GPIO_CTRL_STRIDE: usize = 0x8;
/// Offset of GPIO0_CTRL within IO_BANK0
pub const GPIO0_CTRL_OFFSET: usize = 0x4;

/// Function select value for UART
pub const GPIO_FUNCSEL_UART: u32 = 2;
/// Function select value that disconnects the pad
pub const GPIO_FUNCSEL_NULL: u32 = 0x1F;

/// Offset of the GPIO0 pad register within PADS_BANK0 (after VOLTAGE_SELECT)
pub const PAD_GPIO0_OFFSET: usize = 0x4;
/// Stride between pad registers
pub const PAD_STRIDE: usize = 0x4;

/// Output disable
pub const PAD_OD: u32 = 1 << 7;
/// Input enable
pub const PAD_IE: u32 = 1 << 6;
/// Pull-up enable
pub const PAD_PUE: u32 = 1 << 3;
/// Pull-down enable
pub const PAD_PDE: u32 = 1 << 2;

/// Access to the GPIO function select and pad control registers.
pub struct PadRegs;

impl PadRegs {
    /// Select peripheral function `funcsel` for `gpio`
    #[inline(always)]
    pub fn set_function(gpio: u8, funcsel: u32) {
        let addr = IO_BANK0_BASE + GPIO0_CTRL_OFFSET + gpio as usize * GPIO_CTRL_STRIDE;
        unsafe { write_reg(addr, funcsel) }
    }

    /// Enable the input buffer and output driver, with optional pull-up
    pub fn configure_pad(gpio: u8, pull_up: bool) {
        let addr = PADS_BANK0_BASE + PAD_GPIO0_OFFSET + gpio as usize * PAD_STRIDE;
        unsafe {
            modify_reg(addr, |v| {
                let v = (v | PAD_IE) & !(PAD_OD | PAD_PDE);
                if pull_up { v | PAD_PUE } else { v & !PAD_PUE }
            });
        }
    }
}
