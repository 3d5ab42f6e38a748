//! Receive engine
//!
//! A DMA channel copies every byte the UART receives into [`RxBuffer`],
//! wrapping its write address in hardware at the buffer boundary. It is
//! started once and never stopped. The channel's live write address is the
//! producer cursor; the reader keeps its own cursor and never blocks.
//!
//! `TRANS_COUNT` still counts down in ring mode, so after 2^32 bytes the
//! channel goes idle. Every read re-triggers an idle channel; the write
//! address keeps its wrapped position and capture continues in place.
//!
//! There is no overrun detection. A reader that falls a full buffer behind
//! loses data silently, and the bytes it then reads are newer ones.

use core::cell::UnsafeCell;
use core::sync::atomic::{Ordering, compiler_fence};

use super::config::{ChannelConfig, Dreq, RingSelect};
use super::error::{ConfigError, ConfigResult};
use crate::hal::dma::DmaChannel;
use crate::internal::constants::{MIN_RING_SIZE, RX_ENDLESS_COUNT, RX_RING_ALIGN};
use crate::ring::mask;

// =============================================================================
// RX Buffer
// =============================================================================

/// Receive storage aligned for the DMA ring-wrap hardware.
///
/// The wrap works by holding the upper address bits fixed, so the buffer must
/// start on a multiple of its own size. The type is aligned to the largest
/// supported size ([`RX_RING_ALIGN`]), which covers every smaller one.
#[repr(C, align(1024))]
pub struct RxBuffer<const N: usize> {
    data: UnsafeCell<[u8; N]>,
}

impl<const N: usize> RxBuffer<N> {
    const POWER_OF_TWO: () = assert!(
        N >= MIN_RING_SIZE && N.is_power_of_two(),
        "RX buffer size must be a power of two >= 2"
    );

    /// Create a zeroed buffer
    pub const fn new() -> Self {
        let () = Self::POWER_OF_TWO;
        Self {
            data: UnsafeCell::new([0; N]),
        }
    }

    /// Bus address of slot 0
    #[inline(always)]
    pub fn base(&self) -> usize {
        self.data.get() as usize
    }

    /// Byte at slot `index` (masked). Volatile since DMA writes behind our back.
    #[inline(always)]
    pub fn get(&self, index: usize) -> u8 {
        // SAFETY: index masked into bounds
        unsafe { self.data.get().cast::<u8>().add(mask::<N>(index)).read_volatile() }
    }
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// RX Engine
// =============================================================================

/// Free-running circular receive path.
pub struct RxEngine<C: DmaChannel, const N: usize> {
    buf: RxBuffer<N>,
    channel: Option<C>,
    last_read_pos: usize,
}

impl<C: DmaChannel, const N: usize> RxEngine<C, N> {
    /// Ring size exponent for the channel's write wrap
    const RING_BITS: u8 = N.trailing_zeros() as u8;

    /// Create an idle engine
    pub const fn new() -> Self {
        Self {
            buf: RxBuffer::new(),
            channel: None,
            last_read_pos: 0,
        }
    }

    /// Check that `N` fits the ring-wrap hardware
    ///
    /// # Errors
    /// - `InvalidBufferSize` - `N` exceeds the buffer alignment
    pub const fn check_size() -> ConfigResult<()> {
        if N > RX_RING_ALIGN {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(())
    }

    /// Start the endless peripheral → buffer transfer on `channel`.
    ///
    /// The engine must not move after this call.
    pub fn init(&mut self, mut channel: C, dreq: Dreq, data_register: usize) {
        let config =
            ChannelConfig::peripheral_to_memory(dreq).with_ring(RingSelect::Write, Self::RING_BITS);
        self.last_read_pos = 0;
        channel.set_irq_enabled(false);
        channel.configure(&config, data_register, self.buf.base(), RX_ENDLESS_COUNT, true);
        self.channel = Some(channel);
    }

    /// Check if the engine is running
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.channel.is_some()
    }

    /// Index of the claimed channel
    pub fn channel_index(&self) -> Option<u8> {
        self.channel.as_ref().map(DmaChannel::index)
    }

    /// Reader cursor
    #[inline]
    pub fn last_read_pos(&self) -> usize {
        self.last_read_pos
    }

    /// Re-trigger the channel if its transfer count ran out
    fn rearm(&mut self) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };
        if channel.is_busy() {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("rx: transfer count exhausted, re-arming channel {}", channel.index());
        #[cfg(feature = "log")]
        log::debug!("rx: transfer count exhausted, re-arming channel {}", channel.index());
        channel.start_transfer(RX_ENDLESS_COUNT);
    }

    /// Slot the hardware will write next
    fn write_pos(&self) -> Option<usize> {
        let channel = self.channel.as_ref()?;
        let pos = mask::<N>(channel.write_addr().wrapping_sub(self.buf.base()));
        compiler_fence(Ordering::Acquire);
        Some(pos)
    }

    /// Bytes received but not yet read
    pub fn available(&self) -> usize {
        self.write_pos()
            .map_or(0, |now| mask::<N>(now.wrapping_sub(self.last_read_pos)))
    }

    /// Take the oldest unread byte, if any
    pub fn read_byte(&mut self) -> Option<u8> {
        self.rearm();
        let now = self.write_pos()?;
        if now == self.last_read_pos {
            return None;
        }
        let byte = self.buf.get(self.last_read_pos);
        self.last_read_pos = mask::<N>(self.last_read_pos + 1);
        Some(byte)
    }

    /// Copy up to `out.len()` unread bytes into `out`. Never blocks.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        self.rearm();
        let Some(now) = self.write_pos() else {
            return 0;
        };
        let count = mask::<N>(now.wrapping_sub(self.last_read_pos)).min(out.len());
        for slot in out.iter_mut().take(count) {
            *slot = self.buf.get(self.last_read_pos);
            self.last_read_pos = mask::<N>(self.last_read_pos + 1);
        }
        count
    }
}

impl<C: DmaChannel, const N: usize> Default for RxEngine<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
