//! The serial DMA transport.
//!
//! [`SerialDma`] owns the UART, the DMA controller and both engines. It is
//! the single engine instance the application and the DMA interrupt share;
//! see [`crate::sync::SharedSerial`] for the interrupt-safe wrapper.

use embedded_hal::delay::DelayNs;

use super::config::{SerialConfig, State};
use super::error::{DmaError, Error, IoError, Result};
use super::oneshot::OneShot;
use super::rx::RxEngine;
use super::tx::TxEngine;
use crate::hal::backoff::Backoff;
use crate::hal::dma::{DmaChannel, DmaController};
use crate::hal::uart::UartPort;

/// DMA-driven UART transport
///
/// # Type Parameters
/// * `D` - DMA controller the channels come from
/// * `U` - UART setup collaborator
/// * `RX` - Receive ring size (power of two, 2..=1024)
/// * `TX` - Transmit ring size (power of two, >= 2; holds `TX - 1` bytes)
///
/// # Example
/// ```ignore
/// static mut SERIAL: SerialDma<Rp2040Dma, Rp2040Uart, 256, 256> =
///     SerialDma::new(Rp2040Dma::new(), Rp2040Uart::new());
///
/// let serial = unsafe { &mut *addr_of_mut!(SERIAL) };
/// serial.init(SerialConfig::default(), timer)?;
/// ```
///
/// The instance must stay at the same address once `init` has run: both DMA
/// channels hold raw pointers into it.
pub struct SerialDma<D: DmaController, U: UartPort, const RX: usize, const TX: usize> {
    dma: D,
    uart: U,
    rx: RxEngine<D::Channel, RX>,
    tx: TxEngine<D::Channel, TX>,
    config: SerialConfig,
    state: State,
    baud_rate: u32,
}

impl<D: DmaController, U: UartPort, const RX: usize, const TX: usize> SerialDma<D, U, RX, TX> {
    /// Create an uninitialized transport (const, suitable for static initialization)
    pub const fn new(dma: D, uart: U) -> Self {
        Self {
            dma,
            uart,
            rx: RxEngine::new(),
            tx: TxEngine::new(),
            config: SerialConfig::new(),
            state: State::Uninitialized,
            baud_rate: 0,
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Bring up the UART and start both DMA paths.
    ///
    /// Runs the UART setup, waits `config.settle_ms`, drops whatever the
    /// receiver picked up meanwhile, then starts RX capture, arms TX and
    /// unmasks the completion interrupt. A second call is a no-op.
    ///
    /// # Errors
    /// - `Config(_)` - the configuration or RX size is unusable
    /// - `Dma(NoChannelAvailable)` - fewer than two free channels; nothing
    ///   stays claimed
    pub fn init<Dl: DelayNs>(&mut self, config: SerialConfig, mut delay: Dl) -> Result<()> {
        if self.state != State::Uninitialized {
            #[cfg(feature = "log")]
            log::debug!("serial: init skipped, already running");
            return Ok(());
        }

        if let Err(e) = config.validate().and(RxEngine::<D::Channel, RX>::check_size()) {
            #[cfg(feature = "defmt")]
            defmt::warn!("serial: rejected configuration: {}", e);
            #[cfg(feature = "log")]
            log::warn!("serial: rejected configuration: {e}");
            return Err(e.into());
        }

        let baud_rate = self.uart.init(&config)?;
        delay.delay_ms(config.settle_ms);
        let _flushed = self.uart.discard_rx();

        #[cfg(feature = "defmt")]
        defmt::debug!("serial: flushed {} startup byte(s)", _flushed);
        #[cfg(feature = "log")]
        log::debug!("serial: flushed {_flushed} startup byte(s)");

        let rx_channel = self.dma.claim()?;
        let tx_channel = match self.dma.claim() {
            Ok(channel) => channel,
            Err(e) => {
                self.dma.release(rx_channel);
                return Err(e.into());
            }
        };

        let instance = self.uart.instance();
        let data_register = self.uart.data_register();
        self.rx.init(rx_channel, instance.rx_dreq(), data_register);
        self.tx.init(tx_channel, instance.tx_dreq(), data_register);
        self.dma.enable_irq();

        self.config = config;
        self.baud_rate = baud_rate;
        self.state = State::Running;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "serial: {} at {} baud, rx ch {}, tx ch {}",
            instance,
            baud_rate,
            self.rx.channel_index(),
            self.tx.channel_index()
        );
        #[cfg(feature = "log")]
        log::info!(
            "serial: {:?} at {} baud, rx ch {:?}, tx ch {:?}",
            instance,
            baud_rate,
            self.rx.channel_index(),
            self.tx.channel_index()
        );

        Ok(())
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Current state
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Check if `init` has completed
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state == State::Running
    }

    /// Configuration passed to `init`
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Baud rate the UART actually runs at (0 before `init`)
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Receive engine
    pub fn rx(&self) -> &RxEngine<D::Channel, RX> {
        &self.rx
    }

    /// Transmit engine
    pub fn tx(&self) -> &TxEngine<D::Channel, TX> {
        &self.tx
    }

    // =========================================================================
    // Receive
    // =========================================================================

    /// Take the oldest received byte, if any. Never blocks.
    #[inline]
    pub fn read_byte(&mut self) -> Option<u8> {
        self.rx.read_byte()
    }

    /// Copy received bytes into `buf` without blocking. Returns the count.
    #[inline]
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        self.rx.read(buf)
    }

    /// Bytes received but not yet read
    #[inline]
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Queue one byte without blocking.
    ///
    /// # Errors
    /// - `Io(BufferFull)` - TX ring full
    /// - `Io(NotInitialized)` - called before `init`
    #[inline]
    pub fn try_write_byte(&mut self, byte: u8) -> Result<()> {
        self.tx.try_enqueue(byte).map_err(Error::from)
    }

    /// Bytes queued for transmission, including the chunk in flight
    #[inline]
    pub fn tx_pending(&self) -> usize {
        self.tx.pending()
    }

    /// Free TX ring slots
    #[inline]
    pub fn tx_free(&self) -> usize {
        self.tx.free()
    }

    /// TX ring drained and the UART done shifting
    pub fn is_tx_idle(&self) -> bool {
        self.tx.is_idle() && !self.uart.is_busy()
    }

    /// DMA completion interrupt body. Returns `false` for interrupts raised
    /// by channels this transport does not own.
    #[inline]
    pub fn on_interrupt(&mut self) -> bool {
        self.tx.on_complete()
    }

    // =========================================================================
    // One-shot Send
    // =========================================================================

    /// Start sending `bytes` on a freshly claimed channel, bypassing the
    /// TX ring. The result must go back through
    /// [`finish_one_shot`](Self::finish_one_shot), normally once
    /// [`OneShot::is_complete`] reports true; dropping it instead aborts the
    /// transfer but leaves the channel claimed.
    ///
    /// # Errors
    /// - `Io(NotInitialized)` - called before `init`
    /// - `Dma(InvalidLength)` - `bytes` is empty or longer than a transfer count
    /// - `Dma(NoChannelAvailable)` - no free channel
    pub fn start_one_shot<'a>(&mut self, bytes: &'a [u8]) -> Result<OneShot<'a, D::Channel>> {
        if !self.is_initialized() {
            return Err(IoError::NotInitialized.into());
        }
        if bytes.is_empty() || u32::try_from(bytes.len()).is_err() {
            return Err(DmaError::InvalidLength.into());
        }
        let channel = self.dma.claim()?;
        let dreq = self.uart.instance().tx_dreq();
        Ok(OneShot::start(channel, dreq, self.uart.data_register(), bytes))
    }

    /// Return a one-shot transfer's channel to the pool. A transfer that is
    /// still running is aborted first.
    pub fn finish_one_shot(&mut self, shot: OneShot<'_, D::Channel>) {
        if let Some(mut channel) = shot.into_channel() {
            if channel.is_busy() {
                channel.abort();
            }
            self.dma.release(channel);
        }
    }

    /// Send `bytes` on a transient channel and wait for the hardware to
    /// finish. Empty input returns immediately.
    ///
    /// Use [`crate::sync::SharedSerial::send_blocking`] when the transport
    /// is shared with the interrupt handler.
    ///
    /// # Errors
    /// See [`start_one_shot`](Self::start_one_shot).
    pub fn send_blocking<B: Backoff>(&mut self, bytes: &[u8], mut backoff: B) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let shot = self.start_one_shot(bytes)?;
        while !shot.is_complete() {
            backoff.pause();
        }
        self.finish_one_shot(shot);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
