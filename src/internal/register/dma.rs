//! DMA Controller Register Definitions
//!
//! The RP2040 system DMA has 12 identical channels, each a block of 0x40
//! bytes starting at [`DMA_BASE`], followed by shared interrupt and control
//! registers at offset 0x400.

use super::{DMA_BASE, clear_bits, read_reg, reg_bit_check, reg_ro, reg_rw, set_bits, write_reg};

// =============================================================================
// Per-Channel Register Offsets
// =============================================================================

/// Stride between consecutive channel register blocks
pub const CHANNEL_STRIDE: usize = 0x40;
/// Read address register offset
pub const CH_READ_ADDR_OFFSET: usize = 0x00;
/// Write address register offset
pub const CH_WRITE_ADDR_OFFSET: usize = 0x04;
/// Transfer count register offset (no trigger)
pub const CH_TRANS_COUNT_OFFSET: usize = 0x08;
/// Control register offset (write triggers the channel)
pub const CH_CTRL_TRIG_OFFSET: usize = 0x0C;
/// Alias 1 control register offset (no trigger)
pub const CH_AL1_CTRL_OFFSET: usize = 0x10;
/// Alias 1 transfer count register offset (write triggers the channel)
pub const CH_AL1_TRANS_COUNT_TRIG_OFFSET: usize = 0x1C;

// =============================================================================
// Shared Register Offsets
// =============================================================================

/// Raw interrupt status register offset
pub const INTR_OFFSET: usize = 0x400;
/// IRQ 0 enable register offset
pub const INTE0_OFFSET: usize = 0x404;
/// IRQ 0 force register offset
pub const INTF0_OFFSET: usize = 0x408;
/// IRQ 0 masked status register offset (write 1 to clear)
pub const INTS0_OFFSET: usize = 0x40C;
/// Channel abort register offset
pub const CHAN_ABORT_OFFSET: usize = 0x444;

// =============================================================================
// CTRL Register Bits
// =============================================================================

/// Channel enable
pub const CTRL_EN: u32 = 1 << 0;
/// High priority channel
pub const CTRL_HIGH_PRIORITY: u32 = 1 << 1;
/// Transfer data size shift (0 = byte, 1 = halfword, 2 = word)
pub const CTRL_DATA_SIZE_SHIFT: u32 = 2;
/// Transfer data size mask
pub const CTRL_DATA_SIZE_MASK: u32 = 0x3 << 2;
/// Increment the read address after each element
pub const CTRL_INCR_READ: u32 = 1 << 4;
/// Increment the write address after each element
pub const CTRL_INCR_WRITE: u32 = 1 << 5;
/// Ring size shift (wrap at `1 << RING_SIZE` bytes, 0 = off)
pub const CTRL_RING_SIZE_SHIFT: u32 = 6;
/// Ring size mask
pub const CTRL_RING_SIZE_MASK: u32 = 0xF << 6;
/// Ring select: 0 = wrap read address, 1 = wrap write address
pub const CTRL_RING_SEL: u32 = 1 << 10;
/// Chain-to channel shift (chain to self to disable)
pub const CTRL_CHAIN_TO_SHIFT: u32 = 11;
/// Chain-to channel mask
pub const CTRL_CHAIN_TO_MASK: u32 = 0xF << 11;
/// Transfer request select shift
pub const CTRL_TREQ_SEL_SHIFT: u32 = 15;
/// Transfer request select mask
pub const CTRL_TREQ_SEL_MASK: u32 = 0x3F << 15;
/// Only raise the IRQ on null triggers
pub const CTRL_IRQ_QUIET: u32 = 1 << 21;
/// Byte swap within each element
pub const CTRL_BSWAP: u32 = 1 << 22;
/// Channel is busy (read-only)
pub const CTRL_BUSY: u32 = 1 << 24;

/// Largest ring size exponent the CTRL field holds
pub const CTRL_RING_SIZE_MAX: u8 = 15;

// =============================================================================
// NVIC
// =============================================================================

/// Cortex-M0+ NVIC interrupt set-enable register
pub const NVIC_ISER: usize = 0xE000_E100;
/// IRQ number of DMA_IRQ_0
pub const DMA_IRQ_0: u32 = 11;

// =============================================================================
// Register Accessors
// =============================================================================

/// Register view of one DMA channel.
#[derive(Debug, Clone, Copy)]
pub struct DmaChannelRegs {
    base: usize,
}

impl DmaChannelRegs {
    /// Register view of channel `index`
    #[inline(always)]
    pub const fn new(index: u8) -> Self {
        Self {
            base: DMA_BASE + index as usize * CHANNEL_STRIDE,
        }
    }

    reg_rw!(read_addr, set_read_addr, CH_READ_ADDR_OFFSET, "source address");
    reg_rw!(write_addr, set_write_addr, CH_WRITE_ADDR_OFFSET, "destination address");
    reg_rw!(trans_count, set_trans_count, CH_TRANS_COUNT_OFFSET, "transfer count");
    reg_rw!(ctrl, set_ctrl_trigger, CH_CTRL_TRIG_OFFSET, "control (write triggers)");
    reg_rw!(al1_ctrl, set_ctrl, CH_AL1_CTRL_OFFSET, "control (no trigger)");
    reg_ro!(
        al1_trans_count,
        CH_AL1_TRANS_COUNT_TRIG_OFFSET,
        "transfer count via alias 1"
    );
    reg_bit_check!(is_busy, CH_AL1_CTRL_OFFSET, CTRL_BUSY, "Transfer in progress");

    /// Load the transfer count and start the channel
    #[inline(always)]
    pub fn trigger_with_count(&self, count: u32) {
        unsafe { write_reg(self.base + CH_AL1_TRANS_COUNT_TRIG_OFFSET, count) }
    }
}

/// Shared DMA interrupt and control registers.
pub struct DmaRegs;

impl DmaRegs {
    /// Masked IRQ 0 status (one bit per channel)
    #[inline(always)]
    pub fn irq0_status() -> u32 {
        unsafe { read_reg(DMA_BASE + INTS0_OFFSET) }
    }

    /// Acknowledge IRQ 0 for the channels in `mask` (write-1-to-clear)
    #[inline(always)]
    pub fn clear_irq0(mask: u32) {
        unsafe { write_reg(DMA_BASE + INTS0_OFFSET, mask) }
    }

    /// Route the channels in `mask` to IRQ 0
    #[inline(always)]
    pub fn enable_irq0(mask: u32) {
        unsafe { set_bits(DMA_BASE + INTE0_OFFSET, mask) }
    }

    /// Stop routing the channels in `mask` to IRQ 0
    #[inline(always)]
    pub fn disable_irq0(mask: u32) {
        unsafe { clear_bits(DMA_BASE + INTE0_OFFSET, mask) }
    }

    /// Unmask DMA_IRQ_0 in the NVIC
    #[inline(always)]
    pub fn unmask_irq0() {
        unsafe { write_reg(NVIC_ISER, 1 << DMA_IRQ_0) }
    }

    /// Abort the channels in `mask` and wait until they stop
    pub fn abort(mask: u32) {
        unsafe { write_reg(DMA_BASE + CHAN_ABORT_OFFSET, mask) };
        while unsafe { read_reg(DMA_BASE + CHAN_ABORT_OFFSET) } & mask != 0 {
            core::hint::spin_loop();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
