//! Transmit engine
//!
//! The producer appends to a [`RingBuffer`]; a DMA channel drains it towards
//! the UART one contiguous chunk at a time. A chunk never crosses the physical
//! end of the buffer, so data that straddles the wrap goes out as two chunks
//! chained by the completion interrupt.
//!
//! `tail`, `active_count` and `running` are shared with the completion
//! handler. Every method here takes `&mut self`; callers that share the engine
//! with an interrupt reach it through the critical section in
//! [`crate::sync`], which makes "compute chunk, set addresses, start" one
//! indivisible step.

use core::sync::atomic::{Ordering, compiler_fence};

use super::config::{ChannelConfig, Dreq};
use super::error::{IoError, IoResult};
use crate::hal::dma::DmaChannel;
use crate::ring::RingBuffer;

/// Chunked, interrupt-chained transmit path.
pub struct TxEngine<C: DmaChannel, const N: usize> {
    ring: RingBuffer<N>,
    channel: Option<C>,
    data_register: usize,
    /// Bytes committed to the transfer in flight (0 when idle)
    active_count: usize,
    /// A transfer is in flight
    running: bool,
}

impl<C: DmaChannel, const N: usize> TxEngine<C, N> {
    /// Create an idle engine
    pub const fn new() -> Self {
        Self {
            ring: RingBuffer::new(),
            channel: None,
            data_register: 0,
            active_count: 0,
            running: false,
        }
    }

    /// Arm `channel` for buffer → peripheral transfers. Nothing is sent until
    /// the first byte is queued.
    ///
    /// The engine must not move after this call.
    pub fn init(&mut self, mut channel: C, dreq: Dreq, data_register: usize) {
        let config = ChannelConfig::memory_to_peripheral(dreq);
        channel.configure(
            &config,
            self.ring.tail_ptr() as usize,
            data_register,
            0,
            false,
        );
        channel.set_irq_enabled(true);
        self.data_register = data_register;
        self.channel = Some(channel);
    }

    /// Check if the engine has a channel
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.channel.is_some()
    }

    /// Index of the claimed channel
    pub fn channel_index(&self) -> Option<u8> {
        self.channel.as_ref().map(DmaChannel::index)
    }

    /// Queue one byte and make sure a transfer is on its way.
    ///
    /// # Errors
    /// - `NotInitialized` - called before `init`
    /// - `BufferFull` - no free slot; retry after a completion
    pub fn try_enqueue(&mut self, byte: u8) -> IoResult<()> {
        if self.channel.is_none() {
            return Err(IoError::NotInitialized);
        }
        if !self.ring.push(byte) {
            return Err(IoError::BufferFull);
        }
        self.start_next_chunk();
        Ok(())
    }

    /// Completion handler body.
    ///
    /// Acknowledges the channel's interrupt, retires the finished chunk and
    /// launches the next one. Returns `false` without touching any state if
    /// the pending interrupt is not this channel's.
    pub fn on_complete(&mut self) -> bool {
        let Some(channel) = self.channel.as_mut() else {
            return false;
        };
        if !channel.take_irq() {
            return false;
        }
        if self.active_count > 0 {
            self.ring.consume(self.active_count);
            self.active_count = 0;
            self.running = false;
        }
        self.start_next_chunk();
        true
    }

    /// Start a transfer of the contiguous run at `tail` unless one is in
    /// flight or there is nothing to send.
    fn start_next_chunk(&mut self) {
        if self.running {
            return;
        }
        let count = self.ring.contiguous_len();
        if count == 0 {
            return;
        }
        let Some(channel) = self.channel.as_mut() else {
            return;
        };
        self.active_count = count;
        channel.set_read_addr(self.ring.tail_ptr() as usize);
        channel.set_write_addr(self.data_register);
        self.running = true;
        // Ring writes must land before the channel starts reading them
        compiler_fence(Ordering::Release);
        channel.start_transfer(count as u32);
    }

    /// Nothing queued and nothing in flight
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.running && self.ring.is_empty()
    }

    /// A chunk is in flight
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Length of the chunk in flight
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Producer cursor
    #[inline]
    pub fn head(&self) -> usize {
        self.ring.head()
    }

    /// Consumer cursor
    #[inline]
    pub fn tail(&self) -> usize {
        self.ring.tail()
    }

    /// Bytes queued, including the chunk in flight
    #[inline]
    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    /// Free slots
    #[inline]
    pub fn free(&self) -> usize {
        self.ring.free()
    }

    /// Usable capacity (`N - 1`)
    pub const fn capacity() -> usize {
        RingBuffer::<N>::CAPACITY
    }
}

impl<C: DmaChannel, const N: usize> Default for TxEngine<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
