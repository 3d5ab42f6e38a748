//! Completion status of the shared DMA interrupt line.
//!
//! All twelve RP2040 DMA channels can raise DMA_IRQ_0. The status register
//! carries one bit per channel; [`IrqStatus`] wraps that bitmask so the
//! completion handler can pick out its own channel and leave the others alone.

use crate::internal::constants::DMA_CHANNEL_COUNT;

/// Per-channel pending bits of a DMA interrupt line.
///
/// # Example
///
/// ```ignore
/// let status = IrqStatus::from_raw(DmaRegs::irq0_status());
/// if status.is_pending(tx_channel) {
///     DmaRegs::clear_irq0(IrqStatus::channel_mask(tx_channel));
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqStatus {
    raw: u32,
}

impl IrqStatus {
    /// Bits that correspond to real channels
    pub const VALID_MASK: u32 = (1 << DMA_CHANNEL_COUNT) - 1;

    /// Create from a raw status register value
    #[inline]
    pub const fn from_raw(status: u32) -> Self {
        Self {
            raw: status & Self::VALID_MASK,
        }
    }

    /// Bit of `channel` in the status and enable registers
    #[inline]
    pub const fn channel_mask(channel: u8) -> u32 {
        match 1u32.checked_shl(channel as u32) {
            Some(bit) => bit & Self::VALID_MASK,
            None => 0,
        }
    }

    /// Check whether `channel` has a pending completion
    #[inline]
    pub const fn is_pending(&self, channel: u8) -> bool {
        self.raw & Self::channel_mask(channel) != 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irq_status_ignores_reserved_bits() {
        let status = IrqStatus::from_raw(0xFFFF_F000);
        for ch in 0..32 {
            assert!(!status.is_pending(ch));
        }
        assert_eq!(IrqStatus::from_raw(u32::MAX), IrqStatus::from_raw(0x0FFF));
    }

    #[test]
    fn irq_status_identifies_channel() {
        let status = IrqStatus::from_raw(IrqStatus::channel_mask(3));
        assert!(status.is_pending(3));
        assert!(!status.is_pending(2));
        assert!(!status.is_pending(4));
    }

    #[test]
    fn irq_status_with_several_channels_pending() {
        let status = IrqStatus::from_raw((1 << 0) | (1 << 5) | (1 << 11));
        assert!(status.is_pending(0));
        assert!(status.is_pending(5));
        assert!(status.is_pending(11));
        assert!(!status.is_pending(6));
    }

    #[test]
    fn channel_mask_out_of_range_is_empty() {
        assert_eq!(IrqStatus::channel_mask(12), 0);
        assert_eq!(IrqStatus::channel_mask(40), 0);
    }
}
