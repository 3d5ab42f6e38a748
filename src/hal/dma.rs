//! DMA channel abstraction
//!
//! The transfer engines program DMA channels through the [`DmaChannel`] trait
//! and obtain them from a [`DmaController`]. The RP2040 implementations drive
//! the system DMA block directly; host tests substitute mocks.

use crate::driver::config::ChannelConfig;
use crate::driver::error::{DmaError, DmaResult};
use crate::internal::constants::DMA_CHANNEL_COUNT;

// =============================================================================
// Traits
// =============================================================================

/// One hardware DMA channel.
///
/// Addresses are plain bus addresses. Implementations must not start a
/// transfer unless asked to by [`configure`](Self::configure) with
/// `start = true` or by [`start_transfer`](Self::start_transfer).
pub trait DmaChannel {
    /// Channel number (bit position in the shared status registers)
    fn index(&self) -> u8;

    /// Program control word, addresses and transfer count.
    ///
    /// With `start` the channel begins immediately, otherwise it stays armed
    /// but idle.
    fn configure(
        &mut self,
        config: &ChannelConfig,
        read_addr: usize,
        write_addr: usize,
        count: u32,
        start: bool,
    );

    /// Set the source address without starting
    fn set_read_addr(&mut self, addr: usize);

    /// Set the destination address without starting
    fn set_write_addr(&mut self, addr: usize);

    /// Load `count` and start the channel with its current addresses
    fn start_transfer(&mut self, count: u32);

    /// Current destination address (advances as the channel writes)
    fn write_addr(&self) -> usize;

    /// Check whether a transfer is in flight
    fn is_busy(&self) -> bool;

    /// Route (or stop routing) this channel's completion to the IRQ line
    fn set_irq_enabled(&mut self, enabled: bool);

    /// Acknowledge this channel's pending completion.
    ///
    /// Returns `false`, touching nothing, when the pending interrupt belongs
    /// to another channel.
    fn take_irq(&mut self) -> bool;

    /// Stop any transfer in flight
    fn abort(&mut self);
}

/// Owner of the DMA channel pool and the completion interrupt line.
pub trait DmaController {
    /// Channel handle type
    type Channel: DmaChannel;

    /// Claim a free channel
    ///
    /// # Errors
    /// - `NoChannelAvailable` - every channel is claimed
    fn claim(&mut self) -> DmaResult<Self::Channel>;

    /// Return a channel to the pool, stopping it first
    fn release(&mut self, channel: Self::Channel);

    /// Unmask the completion interrupt line
    fn enable_irq(&mut self);
}

// =============================================================================
// Channel Allocator
// =============================================================================

/// Bitmask bookkeeping of claimed channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelAllocator {
    claimed: u16,
}

impl ChannelAllocator {
    const ALL: u16 = (1 << DMA_CHANNEL_COUNT) - 1;

    /// Create an allocator with every channel free
    pub const fn new() -> Self {
        Self { claimed: 0 }
    }

    /// Create an allocator that never hands out the channels in `mask`
    /// (channels owned by other code)
    pub const fn with_reserved(mask: u16) -> Self {
        Self {
            claimed: mask & Self::ALL,
        }
    }

    /// Claim the lowest free channel
    ///
    /// # Errors
    /// - `NoChannelAvailable` - every channel is claimed
    pub fn claim(&mut self) -> DmaResult<u8> {
        let free = !self.claimed & Self::ALL;
        if free == 0 {
            return Err(DmaError::NoChannelAvailable);
        }
        let channel = free.trailing_zeros() as u8;
        self.claimed |= 1 << channel;
        Ok(channel)
    }

    /// Mark `channel` free again
    pub fn release(&mut self, channel: u8) {
        if channel < DMA_CHANNEL_COUNT {
            self.claimed &= !(1 << channel);
        }
    }

    /// Check whether `channel` is claimed
    pub const fn is_claimed(&self, channel: u8) -> bool {
        channel < DMA_CHANNEL_COUNT && self.claimed & (1 << channel) != 0
    }

    /// Number of claimed channels
    pub const fn claimed_count(&self) -> u32 {
        self.claimed.count_ones()
    }
}

// =============================================================================
// RP2040 Implementation
// =============================================================================

#[cfg(feature = "rp2040")]
pub use self::rp2040::{Rp2040Channel, Rp2040Dma};

#[cfg(feature = "rp2040")]
mod rp2040 {
    use super::{ChannelAllocator, DmaChannel, DmaController};
    use crate::driver::config::ChannelConfig;
    use crate::driver::error::DmaResult;
    use crate::driver::interrupt::IrqStatus;
    use crate::internal::register::dma::{DmaChannelRegs, DmaRegs};
    use crate::internal::register::resets::{RESET_DMA, ResetRegs};

    /// System DMA block with DMA_IRQ_0 as the completion line.
    #[derive(Debug, Default)]
    pub struct Rp2040Dma {
        allocator: ChannelAllocator,
    }

    impl Rp2040Dma {
        /// Controller owning all twelve channels
        pub const fn new() -> Self {
            Self {
                allocator: ChannelAllocator::new(),
            }
        }

        /// Controller that leaves the channels in `mask` to other code
        pub const fn with_reserved(mask: u16) -> Self {
            Self {
                allocator: ChannelAllocator::with_reserved(mask),
            }
        }
    }

    impl DmaController for Rp2040Dma {
        type Channel = Rp2040Channel;

        fn claim(&mut self) -> DmaResult<Rp2040Channel> {
            if !ResetRegs::is_released(RESET_DMA) {
                ResetRegs::deassert_and_wait(RESET_DMA);
            }
            let index = self.allocator.claim()?;

            #[cfg(feature = "defmt")]
            defmt::debug!("dma: claimed channel {}", index);
            #[cfg(feature = "log")]
            log::debug!("dma: claimed channel {index}");

            Ok(Rp2040Channel::new(index))
        }

        fn release(&mut self, mut channel: Rp2040Channel) {
            channel.abort();
            self.allocator.release(channel.index());
        }

        fn enable_irq(&mut self) {
            DmaRegs::unmask_irq0();
        }
    }

    /// One claimed RP2040 DMA channel.
    #[derive(Debug)]
    pub struct Rp2040Channel {
        regs: DmaChannelRegs,
        index: u8,
    }

    impl Rp2040Channel {
        const fn new(index: u8) -> Self {
            Self {
                regs: DmaChannelRegs::new(index),
                index,
            }
        }

        #[inline(always)]
        const fn mask(&self) -> u32 {
            IrqStatus::channel_mask(self.index)
        }
    }

    impl DmaChannel for Rp2040Channel {
        fn index(&self) -> u8 {
            self.index
        }

        fn configure(
            &mut self,
            config: &ChannelConfig,
            read_addr: usize,
            write_addr: usize,
            count: u32,
            start: bool,
        ) {
            self.regs.set_read_addr(read_addr as u32);
            self.regs.set_write_addr(write_addr as u32);
            self.regs.set_trans_count(count);
            let ctrl = config.to_ctrl(self.index);
            if start {
                self.regs.set_ctrl_trigger(ctrl);
            } else {
                self.regs.set_ctrl(ctrl);
            }
        }

        fn set_read_addr(&mut self, addr: usize) {
            self.regs.set_read_addr(addr as u32);
        }

        fn set_write_addr(&mut self, addr: usize) {
            self.regs.set_write_addr(addr as u32);
        }

        fn start_transfer(&mut self, count: u32) {
            self.regs.trigger_with_count(count);
        }

        fn write_addr(&self) -> usize {
            self.regs.write_addr() as usize
        }

        fn is_busy(&self) -> bool {
            self.regs.is_busy()
        }

        fn set_irq_enabled(&mut self, enabled: bool) {
            if enabled {
                DmaRegs::enable_irq0(self.mask());
            } else {
                DmaRegs::disable_irq0(self.mask());
            }
        }

        fn take_irq(&mut self) -> bool {
            let status = IrqStatus::from_raw(DmaRegs::irq0_status());
            if !status.is_pending(self.index) {
                return false;
            }
            DmaRegs::clear_irq0(self.mask());
            true
        }

        fn abort(&mut self) {
            // An abort can raise a spurious completion (RP2040-E13), so keep
            // the channel off the IRQ line while it settles.
            DmaRegs::disable_irq0(self.mask());
            DmaRegs::abort(self.mask());
            DmaRegs::clear_irq0(self.mask());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_claims_lowest_free_channel() {
        let mut alloc = ChannelAllocator::new();
        assert_eq!(alloc.claim(), Ok(0));
        assert_eq!(alloc.claim(), Ok(1));
        alloc.release(0);
        assert_eq!(alloc.claim(), Ok(0));
        assert_eq!(alloc.claimed_count(), 2);
    }

    #[test]
    fn allocator_skips_reserved_channels() {
        let mut alloc = ChannelAllocator::with_reserved(0b0111);
        assert_eq!(alloc.claim(), Ok(3));
        assert!(alloc.is_claimed(0));
        assert!(alloc.is_claimed(3));
        assert!(!alloc.is_claimed(4));
    }

    #[test]
    fn allocator_exhausts_after_twelve() {
        let mut alloc = ChannelAllocator::new();
        for expected in 0..12 {
            assert_eq!(alloc.claim(), Ok(expected));
        }
        assert_eq!(alloc.claim(), Err(DmaError::NoChannelAvailable));
        assert_eq!(alloc.claimed_count(), 12);
    }

    #[test]
    fn allocator_release_out_of_range_is_ignored() {
        let mut alloc = ChannelAllocator::new();
        alloc.claim().unwrap();
        alloc.release(200);
        assert_eq!(alloc.claimed_count(), 1);
        assert!(!alloc.is_claimed(200));
    }
}
