//! Testing utilities and mock implementations
//!
//! Mocks for running the transfer engines on the host without hardware.
//! The DMA mock really moves bytes: a completed TX chunk is copied out of the
//! ring into a sink, and simulated reception writes into the RX buffer at the
//! channel's write address with the ring wrap applied.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::driver::config::{ChannelConfig, RingSelect, SerialConfig, UartInstance};
use crate::driver::error::{ConfigError, ConfigResult, DmaResult};
use crate::driver::interrupt::IrqStatus;
use crate::hal::dma::{ChannelAllocator, DmaChannel, DmaController};
use crate::hal::uart::{BaudDivisor, UartPort};
use crate::internal::constants::DMA_CHANNEL_COUNT;

// =============================================================================
// Mock DMA
// =============================================================================

/// Recorded state of one mock channel
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    pub config: Option<ChannelConfig>,
    pub read_addr: usize,
    pub write_addr: usize,
    pub count: u32,
    pub busy: bool,
    pub irq_enabled: bool,
    /// (read address, count) of every start
    pub starts: Vec<(usize, u32)>,
    pub aborts: usize,
    /// Busy polls left before an IRQ-less transfer finishes by itself
    polls_left: Option<u32>,
}

#[derive(Debug, Default)]
struct Bus {
    channels: [ChannelState; DMA_CHANNEL_COUNT as usize],
    allocator: ChannelAllocator,
    /// Raw interrupt status (INTS0)
    ints: u32,
    claims: usize,
    releases: usize,
    irq_unmasked: bool,
    oneshot_polls: u32,
    /// Everything the channels delivered to the UART, in completion order
    sink: Vec<u8>,
}

impl Bus {
    /// The running ring-wrapped receive channel
    fn rx_channel(&mut self) -> Option<&mut ChannelState> {
        self.channels.iter_mut().find(|ch| {
            ch.busy
                && ch
                    .config
                    .and_then(|c| c.ring)
                    .is_some_and(|r| r.select == RingSelect::Write)
        })
    }

    /// Finish the transfer on `index`, copying its bytes into the sink
    fn finish(&mut self, index: u8) -> usize {
        let st = &mut self.channels[index as usize];
        let count = st.count as usize;
        // SAFETY: the engine under test handed this range to the channel and
        // keeps it alive until the transfer completes
        let bytes = unsafe { core::slice::from_raw_parts(st.read_addr as *const u8, count) };
        self.sink.extend_from_slice(bytes);
        st.read_addr += count;
        st.busy = false;
        st.polls_left = None;
        count
    }
}

/// Mock DMA controller. Clones share the same channels.
///
/// # Example
///
/// ```ignore
/// let dma = MockDma::new();
/// let mut serial = SerialDma::<_, _, 16, 8>::new(dma.clone(), MockUart::new());
/// serial.init(SerialConfig::default(), MockDelay::new()).unwrap();
///
/// serial.try_write_byte(b'a').unwrap();
/// dma.complete_tx();
/// serial.on_interrupt();
/// assert_eq!(dma.sink(), b"a");
/// ```
#[derive(Debug, Clone)]
pub struct MockDma {
    bus: Rc<RefCell<Bus>>,
}

impl Default for MockDma {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDma {
    /// All channels free; one-shot transfers finish on the second busy poll
    pub fn new() -> Self {
        let bus = Bus {
            oneshot_polls: 1,
            ..Bus::default()
        };
        Self {
            bus: Rc::new(RefCell::new(bus)),
        }
    }

    /// Controller with the channels in `mask` already taken
    pub fn with_reserved(mask: u16) -> Self {
        let dma = Self::new();
        dma.bus.borrow_mut().allocator = ChannelAllocator::with_reserved(mask);
        dma
    }

    /// Number of busy polls an IRQ-less transfer reports before finishing
    #[must_use]
    pub fn with_oneshot_polls(self, polls: u32) -> Self {
        self.bus.borrow_mut().oneshot_polls = polls;
        self
    }

    pub fn config(&self, channel: u8) -> Option<ChannelConfig> {
        self.bus.borrow().channels[channel as usize].config
    }

    pub fn starts(&self, channel: u8) -> Vec<(usize, u32)> {
        self.bus.borrow().channels[channel as usize].starts.clone()
    }

    pub fn irq_enabled(&self, channel: u8) -> bool {
        self.bus.borrow().channels[channel as usize].irq_enabled
    }

    pub fn aborts(&self, channel: u8) -> usize {
        self.bus.borrow().channels[channel as usize].aborts
    }

    pub fn is_busy(&self, channel: u8) -> bool {
        self.bus.borrow().channels[channel as usize].busy
    }

    pub fn irq_pending(&self, channel: u8) -> bool {
        IrqStatus::from_raw(self.bus.borrow().ints).is_pending(channel)
    }

    /// Simulate a completion interrupt from any channel
    pub fn raise_irq(&self, channel: u8) {
        self.bus.borrow_mut().ints |= IrqStatus::channel_mask(channel);
    }

    pub fn claims(&self) -> usize {
        self.bus.borrow().claims
    }

    pub fn releases(&self) -> usize {
        self.bus.borrow().releases
    }

    pub fn claimed_count(&self) -> u32 {
        self.bus.borrow().allocator.claimed_count()
    }

    pub fn irq_unmasked(&self) -> bool {
        self.bus.borrow().irq_unmasked
    }

    pub fn sink(&self) -> Vec<u8> {
        self.bus.borrow().sink.clone()
    }

    pub fn clear_sink(&self) {
        self.bus.borrow_mut().sink.clear();
    }

    /// Finish the in-flight chunk of the IRQ-enabled channel and raise its
    /// interrupt. Returns the chunk length, or `None` if nothing was running.
    pub fn complete_tx(&self) -> Option<usize> {
        let mut bus = self.bus.borrow_mut();
        let index = bus
            .channels
            .iter()
            .position(|ch| ch.irq_enabled && ch.busy)? as u8;
        let count = bus.finish(index);
        bus.ints |= IrqStatus::channel_mask(index);
        Some(count)
    }

    /// Write `bytes` through the running ring-wrapped channel, as the UART
    /// receiver would. The channel goes idle when its transfer count reaches
    /// zero; later bytes are not captured. Returns how many were written.
    pub fn receive(&self, bytes: &[u8]) -> usize {
        let mut bus = self.bus.borrow_mut();
        let st = bus.rx_channel().expect("no RX channel running");
        let Some(ring) = st.config.and_then(|c| c.ring) else {
            return 0;
        };
        let size = 1usize << ring.size_bits;
        let mut written = 0;
        for &byte in bytes {
            if st.count == 0 {
                break;
            }
            // SAFETY: the address stays inside the aligned RX buffer thanks
            // to the wrap below
            unsafe { (st.write_addr as *mut u8).write_volatile(byte) };
            let base = st.write_addr & !(size - 1);
            st.write_addr = base | ((st.write_addr + 1) & (size - 1));
            st.count -= 1;
            written += 1;
        }
        if st.count == 0 {
            st.busy = false;
        }
        written
    }

    /// Set how many more bytes the running RX channel accepts before its
    /// transfer count runs out
    pub fn set_rx_remaining(&self, count: u32) {
        let mut bus = self.bus.borrow_mut();
        let st = bus.rx_channel().expect("no RX channel running");
        st.count = count;
    }
}

impl DmaController for MockDma {
    type Channel = MockChannel;

    fn claim(&mut self) -> DmaResult<MockChannel> {
        let mut bus = self.bus.borrow_mut();
        let index = bus.allocator.claim()?;
        bus.claims += 1;
        bus.channels[index as usize] = ChannelState::default();
        Ok(MockChannel {
            index,
            bus: Rc::clone(&self.bus),
        })
    }

    fn release(&mut self, channel: MockChannel) {
        let mut bus = self.bus.borrow_mut();
        bus.allocator.release(channel.index);
        bus.releases += 1;
        let st = &mut bus.channels[channel.index as usize];
        st.busy = false;
        st.irq_enabled = false;
    }

    fn enable_irq(&mut self) {
        self.bus.borrow_mut().irq_unmasked = true;
    }
}

/// Channel handle of [`MockDma`]
#[derive(Debug)]
pub struct MockChannel {
    index: u8,
    bus: Rc<RefCell<Bus>>,
}

impl DmaChannel for MockChannel {
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
        {
            let mut bus = self.bus.borrow_mut();
            let st = &mut bus.channels[self.index as usize];
            st.config = Some(*config);
            st.read_addr = read_addr;
            st.write_addr = write_addr;
            st.count = count;
        }
        if start {
            self.start_transfer(count);
        }
    }

    fn set_read_addr(&mut self, addr: usize) {
        self.bus.borrow_mut().channels[self.index as usize].read_addr = addr;
    }

    fn set_write_addr(&mut self, addr: usize) {
        self.bus.borrow_mut().channels[self.index as usize].write_addr = addr;
    }

    fn start_transfer(&mut self, count: u32) {
        let mut bus = self.bus.borrow_mut();
        let polls = bus.oneshot_polls;
        let st = &mut bus.channels[self.index as usize];
        assert!(!st.busy, "channel {} started while busy", self.index);
        st.busy = true;
        st.count = count;
        st.starts.push((st.read_addr, count));
        let is_ring = st.config.is_some_and(|c| c.ring.is_some());
        if !st.irq_enabled && !is_ring {
            st.polls_left = Some(polls);
        }
    }

    fn write_addr(&self) -> usize {
        self.bus.borrow().channels[self.index as usize].write_addr
    }

    fn is_busy(&self) -> bool {
        let mut bus = self.bus.borrow_mut();
        let index = self.index as usize;
        let polls_left = bus.channels[index].polls_left;
        match polls_left {
            Some(0) => {
                bus.finish(self.index);
                false
            }
            Some(n) => {
                bus.channels[index].polls_left = Some(n - 1);
                true
            }
            None => bus.channels[index].busy,
        }
    }

    fn set_irq_enabled(&mut self, enabled: bool) {
        self.bus.borrow_mut().channels[self.index as usize].irq_enabled = enabled;
    }

    fn take_irq(&mut self) -> bool {
        let mut bus = self.bus.borrow_mut();
        if !IrqStatus::from_raw(bus.ints).is_pending(self.index) {
            return false;
        }
        bus.ints &= !IrqStatus::channel_mask(self.index);
        true
    }

    fn abort(&mut self) {
        let mut bus = self.bus.borrow_mut();
        let st = &mut bus.channels[self.index as usize];
        st.busy = false;
        st.polls_left = None;
        st.aborts += 1;
    }
}

// =============================================================================
// Mock UART
// =============================================================================

#[derive(Debug, Default)]
struct UartState {
    inits: usize,
    config: Option<SerialConfig>,
    rx_garbage: usize,
    busy: bool,
    failure: Option<ConfigError>,
}

/// Mock UART setup collaborator. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockUart {
    state: Rc<RefCell<UartState>>,
}

impl MockUart {
    pub const UART0_DR: usize = 0x4003_4000;
    pub const UART1_DR: usize = 0x4003_8000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes sitting in the RX FIFO before bring-up completes
    #[must_use]
    pub fn with_rx_garbage(self, count: usize) -> Self {
        self.state.borrow_mut().rx_garbage = count;
        self
    }

    /// Make `init` fail
    #[must_use]
    pub fn fail_with(self, error: ConfigError) -> Self {
        self.state.borrow_mut().failure = Some(error);
        self
    }

    pub fn set_busy(&self, busy: bool) {
        self.state.borrow_mut().busy = busy;
    }

    pub fn inits(&self) -> usize {
        self.state.borrow().inits
    }

    pub fn rx_garbage(&self) -> usize {
        self.state.borrow().rx_garbage
    }
}

impl UartPort for MockUart {
    fn init(&mut self, config: &SerialConfig) -> ConfigResult<u32> {
        let mut state = self.state.borrow_mut();
        state.inits += 1;
        if let Some(error) = state.failure {
            return Err(error);
        }
        state.config = Some(config.clone());
        Ok(BaudDivisor::compute(config.peri_clock_hz, config.baud_rate)
            .actual_baud(config.peri_clock_hz))
    }

    fn discard_rx(&mut self) -> usize {
        core::mem::take(&mut self.state.borrow_mut().rx_garbage)
    }

    fn data_register(&self) -> usize {
        match self.instance() {
            UartInstance::Uart0 => Self::UART0_DR,
            UartInstance::Uart1 => Self::UART1_DR,
        }
    }

    fn instance(&self) -> UartInstance {
        self.state
            .borrow()
            .config
            .as_ref()
            .map_or(UartInstance::Uart0, |c| c.uart)
    }

    fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay that records the requested time instead of waiting
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Self Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::Dreq;

    #[test]
    fn mock_dma_claims_distinct_channels() {
        let mut dma = MockDma::new();
        let a = dma.claim().unwrap();
        let b = dma.claim().unwrap();
        assert_ne!(a.index(), b.index());
        assert_eq!(dma.claims(), 2);
        dma.release(a);
        assert_eq!(dma.claimed_count(), 1);
    }

    #[test]
    #[should_panic(expected = "started while busy")]
    fn mock_channel_rejects_double_start() {
        let mut dma = MockDma::new();
        let mut ch = dma.claim().unwrap();
        let data = [0u8; 4];
        ch.configure(
            &ChannelConfig::memory_to_peripheral(Dreq::Uart0Tx),
            data.as_ptr() as usize,
            MockUart::UART0_DR,
            0,
            false,
        );
        ch.set_irq_enabled(true);
        ch.start_transfer(2);
        ch.start_transfer(2);
    }

    #[test]
    fn mock_uart_discards_garbage_once() {
        let mut uart = MockUart::new().with_rx_garbage(2);
        assert_eq!(uart.discard_rx(), 2);
        assert_eq!(uart.discard_rx(), 0);
    }
}
