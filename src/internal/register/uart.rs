//! UART (ARM PL011) Register Definitions
//!
//! Both RP2040 UART instances share this layout; only the base address
//! differs ([`UART0_BASE`](super::UART0_BASE), [`UART1_BASE`](super::UART1_BASE)).

use super::{clear_bits, reg_bit_check, reg_ro, reg_rw, set_bits};

// =============================================================================
// Register Offsets
// =============================================================================

/// Data register offset (DMA source/destination)
pub const UARTDR_OFFSET: usize = 0x000;
/// Receive status / error clear register offset
pub const UARTRSR_OFFSET: usize = 0x004;
/// Flag register offset
pub const UARTFR_OFFSET: usize = 0x018;
/// Integer baud rate divisor offset
pub const UARTIBRD_OFFSET: usize = 0x024;
/// Fractional baud rate divisor offset
pub const UARTFBRD_OFFSET: usize = 0x028;
/// Line control register offset
pub const UARTLCR_H_OFFSET: usize = 0x02C;
/// Control register offset
pub const UARTCR_OFFSET: usize = 0x030;
/// DMA control register offset
pub const UARTDMACR_OFFSET: usize = 0x048;

// =============================================================================
// Flag Register (UARTFR) Bits
// =============================================================================

/// UART busy transmitting
pub const UARTFR_BUSY: u32 = 1 << 3;
/// Receive FIFO empty
pub const UARTFR_RXFE: u32 = 1 << 4;
/// Transmit FIFO full
pub const UARTFR_TXFF: u32 = 1 << 5;
/// Transmit FIFO empty
pub const UARTFR_TXFE: u32 = 1 << 7;

// =============================================================================
// Line Control Register (UARTLCR_H) Bits
// =============================================================================

/// Enable FIFOs
pub const UARTLCR_H_FEN: u32 = 1 << 4;
/// Two stop bits
pub const UARTLCR_H_STP2: u32 = 1 << 3;
/// Word length shift
pub const UARTLCR_H_WLEN_SHIFT: u32 = 5;
/// Word length 8 bits
pub const UARTLCR_H_WLEN_8: u32 = 0b11 << 5;

// =============================================================================
// Control Register (UARTCR) Bits
// =============================================================================

/// UART enable
pub const UARTCR_UARTEN: u32 = 1 << 0;
/// Transmit enable
pub const UARTCR_TXE: u32 = 1 << 8;
/// Receive enable
pub const UARTCR_RXE: u32 = 1 << 9;
/// RTS hardware flow control enable
pub const UARTCR_RTSEN: u32 = 1 << 14;
/// CTS hardware flow control enable
pub const UARTCR_CTSEN: u32 = 1 << 15;

// =============================================================================
// DMA Control Register (UARTDMACR) Bits
// =============================================================================

/// Receive DMA request enable
pub const UARTDMACR_RXDMAE: u32 = 1 << 0;
/// Transmit DMA request enable
pub const UARTDMACR_TXDMAE: u32 = 1 << 1;

// =============================================================================
// Register Accessors
// =============================================================================

/// Register view of one PL011 instance.
#[derive(Debug, Clone, Copy)]
pub struct UartRegs {
    base: usize,
}

impl UartRegs {
    /// Register view of the UART at `base`
    #[inline(always)]
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    /// Address of the data register, the fixed end of every DMA transfer
    #[inline(always)]
    pub const fn data_addr(&self) -> usize {
        self.base + UARTDR_OFFSET
    }

    reg_rw!(data, set_data, UARTDR_OFFSET, "data register");
    reg_ro!(flags, UARTFR_OFFSET, "flag register");
    reg_rw!(ibrd, set_ibrd, UARTIBRD_OFFSET, "integer baud divisor");
    reg_rw!(fbrd, set_fbrd, UARTFBRD_OFFSET, "fractional baud divisor");
    reg_rw!(line_control, set_line_control, UARTLCR_H_OFFSET, "line control");
    reg_rw!(control, set_control, UARTCR_OFFSET, "control register");
    reg_rw!(dma_control, set_dma_control, UARTDMACR_OFFSET, "DMA control");
    reg_bit_check!(rx_empty, UARTFR_OFFSET, UARTFR_RXFE, "Receive FIFO is empty");
    reg_bit_check!(tx_full, UARTFR_OFFSET, UARTFR_TXFF, "Transmit FIFO is full");
    reg_bit_check!(is_busy, UARTFR_OFFSET, UARTFR_BUSY, "UART is still shifting out data");

    /// Set bits in the line control register without a read-modify-write
    #[inline(always)]
    pub fn set_line_control_bits(&self, bits: u32) {
        unsafe { set_bits(self.base + UARTLCR_H_OFFSET, bits) }
    }

    /// Clear bits in the control register without a read-modify-write
    #[inline(always)]
    pub fn clear_control_bits(&self, bits: u32) {
        unsafe { clear_bits(self.base + UARTCR_OFFSET, bits) }
    }
}
