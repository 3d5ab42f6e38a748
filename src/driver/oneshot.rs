//! One-shot blocking send
//!
//! Sends a caller buffer straight to the UART on a transiently claimed
//! channel, bypassing the TX ring. The transfer borrows the buffer for as long
//! as the [`OneShot`] lives. Hand it back to
//! [`SerialDma::finish_one_shot`](super::serial::SerialDma::finish_one_shot),
//! which aborts an unfinished transfer and releases the channel. Dropping it
//! instead still aborts, so DMA never reads a buffer that went out of scope,
//! but the channel stays claimed.
//!
//! Bytes sent this way interleave with whatever the TX ring is draining at the
//! same time. Flush the ring first if ordering matters.

use core::marker::PhantomData;
use core::sync::atomic::{Ordering, compiler_fence};

use super::config::{ChannelConfig, Dreq};
use crate::hal::dma::DmaChannel;

/// A one-shot transfer in flight.
#[must_use = "pass to `SerialDma::finish_one_shot` to release the channel"]
pub struct OneShot<'a, C: DmaChannel> {
    channel: Option<C>,
    len: usize,
    _data: PhantomData<&'a [u8]>,
}

impl<'a, C: DmaChannel> OneShot<'a, C> {
    /// Start sending `bytes` to `data_register` on `channel`.
    ///
    /// `bytes` must be non-empty and no longer than `u32::MAX`.
    pub(crate) fn start(mut channel: C, dreq: Dreq, data_register: usize, bytes: &'a [u8]) -> Self {
        let config = ChannelConfig::memory_to_peripheral(dreq);
        channel.set_irq_enabled(false);
        compiler_fence(Ordering::Release);
        channel.configure(
            &config,
            bytes.as_ptr() as usize,
            data_register,
            bytes.len() as u32,
            true,
        );
        Self {
            channel: Some(channel),
            len: bytes.len(),
            _data: PhantomData,
        }
    }

    /// Check whether the hardware has finished the transfer
    pub fn is_complete(&self) -> bool {
        self.channel.as_ref().is_none_or(|ch| !ch.is_busy())
    }

    /// Number of bytes being sent
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; empty sends never start
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the channel carrying the transfer
    pub fn channel_index(&self) -> Option<u8> {
        self.channel.as_ref().map(DmaChannel::index)
    }

    /// Hand the channel back for release
    pub(crate) fn into_channel(mut self) -> Option<C> {
        self.channel.take()
    }
}

impl<C: DmaChannel> Drop for OneShot<'_, C> {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.as_mut() {
            if channel.is_busy() {
                channel.abort();
            }
        }
    }
}
