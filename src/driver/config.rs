//! Configuration types for the RP2040 UART DMA transport

use super::error::{ConfigError, ConfigResult};
use crate::internal::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_PERI_CLOCK_HZ, DEFAULT_RX_PIN, DEFAULT_TX_PIN, DREQ_FORCE,
    DREQ_UART0_RX, DREQ_UART0_TX, DREQ_UART1_RX, DREQ_UART1_TX, STARTUP_SETTLE_MS,
};

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// `init` has not completed
    #[default]
    Uninitialized,
    /// Both DMA channels claimed, RX capturing, TX armed
    Running,
}

/// GPIOs that can carry UART0 TX
const UART0_TX_PINS: [u8; 4] = [0, 12, 16, 28];
/// GPIOs that can carry UART0 RX
const UART0_RX_PINS: [u8; 4] = [1, 13, 17, 29];
/// GPIOs that can carry UART1 TX
const UART1_TX_PINS: [u8; 4] = [4, 8, 20, 24];
/// GPIOs that can carry UART1 RX
const UART1_RX_PINS: [u8; 4] = [5, 9, 21, 25];

/// UART peripheral instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartInstance {
    /// UART0
    #[default]
    Uart0,
    /// UART1
    Uart1,
}

impl UartInstance {
    /// DMA pacing signal raised when the TX FIFO can accept data
    #[must_use]
    pub const fn tx_dreq(self) -> Dreq {
        match self {
            UartInstance::Uart0 => Dreq::Uart0Tx,
            UartInstance::Uart1 => Dreq::Uart1Tx,
        }
    }

    /// DMA pacing signal raised when the RX FIFO holds data
    #[must_use]
    pub const fn rx_dreq(self) -> Dreq {
        match self {
            UartInstance::Uart0 => Dreq::Uart0Rx,
            UartInstance::Uart1 => Dreq::Uart1Rx,
        }
    }

    /// Check whether `gpio` can be routed to this instance's TX signal
    #[must_use]
    pub fn is_tx_pin(self, gpio: u8) -> bool {
        match self {
            UartInstance::Uart0 => UART0_TX_PINS.contains(&gpio),
            UartInstance::Uart1 => UART1_TX_PINS.contains(&gpio),
        }
    }

    /// Check whether `gpio` can be routed to this instance's RX signal
    #[must_use]
    pub fn is_rx_pin(self, gpio: u8) -> bool {
        match self {
            UartInstance::Uart0 => UART0_RX_PINS.contains(&gpio),
            UartInstance::Uart1 => UART1_RX_PINS.contains(&gpio),
        }
    }
}

/// DMA transfer request (pacing) signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Dreq {
    /// UART0 TX FIFO not full
    Uart0Tx = DREQ_UART0_TX,
    /// UART0 RX FIFO not empty
    Uart0Rx = DREQ_UART0_RX,
    /// UART1 TX FIFO not full
    Uart1Tx = DREQ_UART1_TX,
    /// UART1 RX FIFO not empty
    Uart1Rx = DREQ_UART1_RX,
    /// Unpaced, run as fast as the bus allows
    Force = DREQ_FORCE,
}

impl Dreq {
    /// TREQ_SEL field value
    #[must_use]
    pub const fn treq_sel(self) -> u32 {
        self as u32
    }
}

/// Size of each DMA element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TransferSize {
    /// 8-bit elements, the width of the UART data register
    #[default]
    Byte = 0,
}

/// Which address the hardware ring wrap applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingSelect {
    /// Wrap the read address
    Read,
    /// Wrap the write address
    Write,
}

/// Hardware ring-wrap setting of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingWrap {
    /// Address that wraps
    pub select: RingSelect,
    /// Wrap boundary as a power of two (`1 << size_bits` bytes)
    pub size_bits: u8,
}

/// Static configuration of one DMA channel.
///
/// Mirrors the fields of the RP2040 `CTRL` register that this transport uses.
/// Built with the `with_*` const builder; [`ChannelConfig::new`] matches the
/// hardware defaults for a memory-to-memory byte copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Element size
    pub transfer_size: TransferSize,
    /// Increment the read address after each element
    pub read_increment: bool,
    /// Increment the write address after each element
    pub write_increment: bool,
    /// Pacing signal
    pub dreq: Dreq,
    /// Optional hardware address wrap
    pub ring: Option<RingWrap>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transfer_size: TransferSize::Byte,
            read_increment: true,
            write_increment: true,
            dreq: Dreq::Force,
            ring: None,
        }
    }

    /// Peripheral → memory byte stream paced by `dreq`
    #[must_use]
    pub const fn peripheral_to_memory(dreq: Dreq) -> Self {
        Self::new()
            .with_read_increment(false)
            .with_write_increment(true)
            .with_dreq(dreq)
    }

    /// Memory → peripheral byte stream paced by `dreq`
    #[must_use]
    pub const fn memory_to_peripheral(dreq: Dreq) -> Self {
        Self::new()
            .with_read_increment(true)
            .with_write_increment(false)
            .with_dreq(dreq)
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Enable or disable read address increment
    #[must_use]
    pub const fn with_read_increment(mut self, enabled: bool) -> Self {
        self.read_increment = enabled;
        self
    }

    /// Enable or disable write address increment
    #[must_use]
    pub const fn with_write_increment(mut self, enabled: bool) -> Self {
        self.write_increment = enabled;
        self
    }

    /// Set the pacing signal
    #[must_use]
    pub const fn with_dreq(mut self, dreq: Dreq) -> Self {
        self.dreq = dreq;
        self
    }

    /// Wrap `select` at a boundary of `1 << size_bits` bytes
    #[must_use]
    pub const fn with_ring(mut self, select: RingSelect, size_bits: u8) -> Self {
        self.ring = Some(RingWrap { select, size_bits });
        self
    }

    /// Encode as a `CTRL` register value for `channel`, with the channel
    /// enabled and chaining pointed back at itself (no chaining).
    #[cfg(feature = "rp2040")]
    #[must_use]
    pub const fn to_ctrl(&self, channel: u8) -> u32 {
        use crate::internal::register::dma::{
            CTRL_CHAIN_TO_MASK, CTRL_CHAIN_TO_SHIFT, CTRL_DATA_SIZE_SHIFT, CTRL_EN,
            CTRL_INCR_READ, CTRL_INCR_WRITE, CTRL_RING_SEL, CTRL_RING_SIZE_MASK,
            CTRL_RING_SIZE_SHIFT, CTRL_TREQ_SEL_MASK, CTRL_TREQ_SEL_SHIFT,
        };

        let mut ctrl = CTRL_EN | ((self.transfer_size as u32) << CTRL_DATA_SIZE_SHIFT);
        if self.read_increment {
            ctrl |= CTRL_INCR_READ;
        }
        if self.write_increment {
            ctrl |= CTRL_INCR_WRITE;
        }
        if let Some(ring) = self.ring {
            ctrl |= ((ring.size_bits as u32) << CTRL_RING_SIZE_SHIFT) & CTRL_RING_SIZE_MASK;
            if matches!(ring.select, RingSelect::Write) {
                ctrl |= CTRL_RING_SEL;
            }
        }
        ctrl |= ((channel as u32) << CTRL_CHAIN_TO_SHIFT) & CTRL_CHAIN_TO_MASK;
        ctrl |= (self.dreq.treq_sel() << CTRL_TREQ_SEL_SHIFT) & CTRL_TREQ_SEL_MASK;
        ctrl
    }
}

/// Complete serial link configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// UART instance
    pub uart: UartInstance,
    /// Line rate in bits per second
    pub baud_rate: u32,
    /// GPIO carrying TX
    pub tx_pin: u8,
    /// GPIO carrying RX
    pub rx_pin: u8,
    /// Enable the pull-up on the RX pad (idle-high line when unconnected)
    pub rx_pull_up: bool,
    /// Enable the 32-entry hardware FIFOs
    pub fifo_enabled: bool,
    /// Frequency of clk_peri in Hz
    pub peri_clock_hz: u32,
    /// Delay between UART bring-up and the final garbage flush
    pub settle_ms: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialConfig {
    /// Create a new configuration with defaults (UART0, 115200 8N1 on GPIO0/GPIO1)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            uart: UartInstance::Uart0,
            baud_rate: DEFAULT_BAUD_RATE,
            tx_pin: DEFAULT_TX_PIN,
            rx_pin: DEFAULT_RX_PIN,
            rx_pull_up: true,
            fifo_enabled: true,
            peri_clock_hz: DEFAULT_PERI_CLOCK_HZ,
            settle_ms: STARTUP_SETTLE_MS,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Select the UART instance
    #[must_use]
    pub const fn with_uart(mut self, uart: UartInstance) -> Self {
        self.uart = uart;
        self
    }

    /// Set the baud rate
    #[must_use]
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the TX and RX pins
    #[must_use]
    pub const fn with_pins(mut self, tx_pin: u8, rx_pin: u8) -> Self {
        self.tx_pin = tx_pin;
        self.rx_pin = rx_pin;
        self
    }

    /// Enable or disable the RX pull-up
    #[must_use]
    pub const fn with_rx_pull_up(mut self, enabled: bool) -> Self {
        self.rx_pull_up = enabled;
        self
    }

    /// Enable or disable the hardware FIFOs
    #[must_use]
    pub const fn with_fifo(mut self, enabled: bool) -> Self {
        self.fifo_enabled = enabled;
        self
    }

    /// Set the peripheral clock frequency
    #[must_use]
    pub const fn with_peri_clock_hz(mut self, hz: u32) -> Self {
        self.peri_clock_hz = hz;
        self
    }

    /// Set the post-bring-up settle delay
    #[must_use]
    pub const fn with_settle_ms(mut self, ms: u32) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Check the configuration for values the hardware cannot honour
    ///
    /// # Errors
    /// - `ClockError` - peripheral clock is zero
    /// - `InvalidBaudRate` - baud rate is zero or above `clk_peri / 16`
    /// - `InvalidPin` - a pin cannot carry the requested signal
    pub fn validate(&self) -> ConfigResult<()> {
        if self.peri_clock_hz == 0 {
            return Err(ConfigError::ClockError);
        }
        if self.baud_rate == 0 || self.baud_rate > self.peri_clock_hz / 16 {
            return Err(ConfigError::InvalidBaudRate);
        }
        if !self.uart.is_tx_pin(self.tx_pin) || !self.uart.is_rx_pin(self.rx_pin) {
            return Err(ConfigError::InvalidPin);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
