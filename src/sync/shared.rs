//! ISR-safe serial wrapper using critical sections.
//!
//! [`SharedSerial`] is the one object mainline code and the `DMA_IRQ_0`
//! handler both reach. Every access to the TX cursors, the in-flight chunk
//! and the DMA start sequence happens inside `critical_section::with()`.
//! Blocking operations release the critical section between attempts, so the
//! completion interrupt can drain the ring while mainline waits.

use embedded_hal::delay::DelayNs;

use super::handle::SerialHandle;
use super::primitives::CriticalSectionCell;
use crate::driver::config::SerialConfig;
use crate::driver::error::{Error, IoError, Result};
use crate::driver::serial::SerialDma;
use crate::hal::backoff::Backoff;
use crate::hal::dma::DmaController;
use crate::hal::uart::UartPort;

/// ISR-safe serial wrapper using critical sections.
///
/// # Example
///
/// ```ignore
/// static SERIAL: SharedSerial<Rp2040Dma, Rp2040Uart, 256, 256> =
///     SharedSerial::new(SerialDma::new(Rp2040Dma::new(), Rp2040Uart::new()));
///
/// SERIAL.init(SerialConfig::default(), timer)?;
/// SERIAL.write_str("ready\r\n", Spin)?;
///
/// #[interrupt]
/// fn DMA_IRQ_0() {
///     SERIAL.on_interrupt();
/// }
/// ```
pub struct SharedSerial<D: DmaController, U: UartPort, const RX: usize, const TX: usize> {
    inner: CriticalSectionCell<SerialDma<D, U, RX, TX>>,
}

impl<D: DmaController, U: UartPort, const RX: usize, const TX: usize> SharedSerial<D, U, RX, TX> {
    /// Wrap a transport (const, suitable for static initialization).
    pub const fn new(serial: SerialDma<D, U, RX, TX>) -> Self {
        Self {
            inner: CriticalSectionCell::new(serial),
        }
    }

    /// Execute a closure with exclusive access to the transport.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut SerialDma<D, U, RX, TX>) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut SerialDma<D, U, RX, TX>) -> R,
    {
        self.inner.try_with(f)
    }

    /// Bring the transport up. See [`SerialDma::init`].
    ///
    /// The settle delay runs inside the critical section.
    ///
    /// # Errors
    /// See [`SerialDma::init`].
    pub fn init<Dl: DelayNs>(&self, config: SerialConfig, delay: Dl) -> Result<()> {
        self.with(|serial| serial.init(config, delay))
    }

    /// Check if `init` has completed
    pub fn is_initialized(&self) -> bool {
        self.inner.with_ref(SerialDma::is_initialized)
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Queue one byte, waiting for ring space if it is full.
    ///
    /// # Errors
    /// - `Io(NotInitialized)` - called before `init`
    pub fn write_byte<B: Backoff>(&self, byte: u8, mut backoff: B) -> Result<()> {
        loop {
            match self.with(|serial| serial.try_write_byte(byte)) {
                Err(Error::Io(IoError::BufferFull)) => backoff.pause(),
                other => return other,
            }
        }
    }

    /// Queue every byte of `bytes` in order, waiting for space as needed.
    ///
    /// Each byte goes through [`write_byte`](Self::write_byte), so the
    /// critical section is released between bytes and a transfer starts as
    /// soon as the first one is queued.
    ///
    /// # Errors
    /// - `Io(NotInitialized)` - called before `init`
    pub fn write_string<B: Backoff>(&self, bytes: &[u8], mut backoff: B) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte, &mut backoff)?;
        }
        Ok(())
    }

    /// Queue the UTF-8 bytes of `s`. See [`write_string`](Self::write_string).
    ///
    /// # Errors
    /// - `Io(NotInitialized)` - called before `init`
    #[inline]
    pub fn write_str<B: Backoff>(&self, s: &str, backoff: B) -> Result<()> {
        self.write_string(s.as_bytes(), backoff)
    }

    /// Wait until everything queued has left the ring and the UART.
    ///
    /// # Errors
    /// - `Io(NotInitialized)` - called before `init`
    pub fn flush<B: Backoff>(&self, mut backoff: B) -> Result<()> {
        if !self.is_initialized() {
            return Err(IoError::NotInitialized.into());
        }
        while !self.inner.with_ref(SerialDma::is_tx_idle) {
            backoff.pause();
        }
        Ok(())
    }

    /// Send `bytes` on a transient channel and wait for the hardware.
    ///
    /// The channel is claimed and released inside the critical section; the
    /// wait itself runs with interrupts enabled.
    ///
    /// # Errors
    /// See [`SerialDma::start_one_shot`].
    pub fn send_blocking<B: Backoff>(&self, bytes: &[u8], mut backoff: B) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let shot = self.with(|serial| serial.start_one_shot(bytes))?;
        while !shot.is_complete() {
            backoff.pause();
        }
        self.with(|serial| serial.finish_one_shot(shot));
        Ok(())
    }

    /// DMA completion interrupt body. Call from the `DMA_IRQ_0` handler.
    #[inline]
    pub fn on_interrupt(&self) -> bool {
        self.with(SerialDma::on_interrupt)
    }

    // =========================================================================
    // Receive
    // =========================================================================

    /// Take the oldest received byte, if any. Never blocks.
    #[inline]
    pub fn read_byte(&self) -> Option<u8> {
        self.with(SerialDma::read_byte)
    }

    /// Copy received bytes into `buf` without blocking. Returns the count.
    #[inline]
    pub fn read(&self, buf: &mut [u8]) -> usize {
        self.with(|serial| serial.read(buf))
    }

    /// Bytes received but not yet read
    #[inline]
    pub fn available(&self) -> usize {
        self.inner.with_ref(SerialDma::available)
    }

    /// Borrow a handle implementing `core::fmt::Write` (and the
    /// `embedded-io` traits with that feature) that waits with `backoff`.
    pub fn handle<B: Backoff>(&self, backoff: B) -> SerialHandle<'_, D, U, B, RX, TX> {
        SerialHandle::new(self, backoff)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
