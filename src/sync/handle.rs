//! Borrowed writer/reader handle over a [`SharedSerial`].
//!
//! Lets `write!` and `embedded-io` consumers use the shared transport. Waits
//! go through the handle's [`Backoff`].

use super::shared::SharedSerial;
use crate::driver::error::{Error, IoError, Result};
use crate::hal::backoff::Backoff;
use crate::hal::dma::DmaController;
use crate::hal::uart::UartPort;

/// Handle returned by [`SharedSerial::handle`].
///
/// # Example
///
/// ```ignore
/// use core::fmt::Write;
///
/// let mut out = SERIAL.handle(Spin);
/// writeln!(out, "temp={}C", temp).ok();
/// ```
pub struct SerialHandle<'a, D, U, B, const RX: usize, const TX: usize>
where
    D: DmaController,
    U: UartPort,
    B: Backoff,
{
    serial: &'a SharedSerial<D, U, RX, TX>,
    backoff: B,
}

impl<'a, D, U, B, const RX: usize, const TX: usize> SerialHandle<'a, D, U, B, RX, TX>
where
    D: DmaController,
    U: UartPort,
    B: Backoff,
{
    pub(crate) fn new(serial: &'a SharedSerial<D, U, RX, TX>, backoff: B) -> Self {
        Self { serial, backoff }
    }

    /// The wrapped transport
    pub fn serial(&self) -> &'a SharedSerial<D, U, RX, TX> {
        self.serial
    }

    /// Queue at least one byte of `buf`, waiting while the ring is full.
    /// Later bytes are queued one at a time until the ring fills. Returns how
    /// many leading bytes were queued.
    ///
    /// # Errors
    /// - `Io(NotInitialized)` - called before `init`
    pub fn write_some(&mut self, buf: &[u8]) -> Result<usize> {
        let Some((&first, rest)) = buf.split_first() else {
            return Ok(0);
        };
        self.serial.write_byte(first, &mut self.backoff)?;
        let mut queued = 1;
        for &byte in rest {
            match self.serial.with(|serial| serial.try_write_byte(byte)) {
                Ok(()) => queued += 1,
                Err(Error::Io(IoError::BufferFull)) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(queued)
    }

    /// Read at least one byte into `buf`, waiting while nothing has arrived.
    ///
    /// # Errors
    /// - `Io(NotInitialized)` - called before `init`
    pub fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.serial.is_initialized() {
            return Err(IoError::NotInitialized.into());
        }
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.serial.read(buf);
            if n > 0 {
                return Ok(n);
            }
            self.backoff.pause();
        }
    }
}

impl<D, U, B, const RX: usize, const TX: usize> core::fmt::Write
    for SerialHandle<'_, D, U, B, RX, TX>
where
    D: DmaController,
    U: UartPort,
    B: Backoff,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.serial
            .write_string(s.as_bytes(), &mut self.backoff)
            .map_err(|_| core::fmt::Error)
    }
}

#[cfg(feature = "embedded-io")]
mod io_impls {
    use super::*;

    impl<D, U, B, const RX: usize, const TX: usize> embedded_io::ErrorType
        for SerialHandle<'_, D, U, B, RX, TX>
    where
        D: DmaController,
        U: UartPort,
        B: Backoff,
    {
        type Error = Error;
    }

    impl<D, U, B, const RX: usize, const TX: usize> embedded_io::Write
        for SerialHandle<'_, D, U, B, RX, TX>
    where
        D: DmaController,
        U: UartPort,
        B: Backoff,
    {
        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            self.write_some(buf)
        }

        fn flush(&mut self) -> Result<()> {
            self.serial.flush(&mut self.backoff)
        }
    }

    impl<D, U, B, const RX: usize, const TX: usize> embedded_io::WriteReady
        for SerialHandle<'_, D, U, B, RX, TX>
    where
        D: DmaController,
        U: UartPort,
        B: Backoff,
    {
        fn write_ready(&mut self) -> Result<bool> {
            self.serial.with(|serial| {
                if serial.is_initialized() {
                    Ok(serial.tx_free() > 0)
                } else {
                    Err(IoError::NotInitialized.into())
                }
            })
        }
    }

    impl<D, U, B, const RX: usize, const TX: usize> embedded_io::Read
        for SerialHandle<'_, D, U, B, RX, TX>
    where
        D: DmaController,
        U: UartPort,
        B: Backoff,
    {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            self.read_some(buf)
        }
    }

    impl<D, U, B, const RX: usize, const TX: usize> embedded_io::ReadReady
        for SerialHandle<'_, D, U, B, RX, TX>
    where
        D: DmaController,
        U: UartPort,
        B: Backoff,
    {
        fn read_ready(&mut self) -> Result<bool> {
            self.serial.with(|serial| {
                if serial.is_initialized() {
                    Ok(serial.available() > 0)
                } else {
                    Err(IoError::NotInitialized.into())
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use core::fmt::Write as _;

    use super::*;
    use crate::driver::config::SerialConfig;
    use crate::driver::serial::SerialDma;
    use crate::hal::backoff::{Spin, Yield};
    use crate::testing::{MockDelay, MockDma, MockUart};

    type TestShared = SharedSerial<MockDma, MockUart, 16, 8>;

    fn shared(dma: &MockDma) -> TestShared {
        SharedSerial::new(SerialDma::new(dma.clone(), MockUart::new()))
    }

    #[test]
    fn fmt_write_goes_through_tx_ring() {
        let dma = MockDma::new();
        let serial = shared(&dma);
        serial.init(SerialConfig::default(), MockDelay::new()).unwrap();

        let drain = Yield(|| {
            if dma.complete_tx().is_some() {
                serial.on_interrupt();
            }
        });
        let mut out = serial.handle(drain);
        write!(out, "t={} ok={}", 42, true).unwrap();
        drop(out);

        while dma.complete_tx().is_some() {
            serial.on_interrupt();
        }
        assert_eq!(dma.sink(), b"t=42 ok=true");
    }

    #[test]
    fn fmt_write_before_init_fails() {
        let serial = shared(&MockDma::new());
        let mut out = serial.handle(Spin);
        assert!(out.write_str("x").is_err());
    }

    #[test]
    fn write_some_stops_at_full_ring() {
        let dma = MockDma::new();
        let serial = shared(&dma);
        serial.init(SerialConfig::default(), MockDelay::new()).unwrap();

        let mut out = serial.handle(Spin);
        assert_eq!(out.write_some(b"0123456789"), Ok(7));
        assert_eq!(out.write_some(b""), Ok(0));
        drop(out);

        // First byte went out on its own
        assert_eq!(dma.complete_tx(), Some(1));
        assert!(serial.on_interrupt());
        assert_eq!(dma.complete_tx(), Some(6));
    }

    #[test]
    fn read_some_before_init_fails() {
        let serial = shared(&MockDma::new());
        let mut out = serial.handle(Spin);
        let mut buf = [0u8; 4];
        assert_eq!(
            out.read_some(&mut buf),
            Err(Error::Io(IoError::NotInitialized))
        );
    }

    #[test]
    fn read_some_waits_for_first_byte() {
        let dma = MockDma::new();
        let serial = shared(&dma);
        serial.init(SerialConfig::default(), MockDelay::new()).unwrap();

        let mut polls = 0;
        let mut handle = serial.handle(Yield(|| {
            polls += 1;
            if polls == 3 {
                dma.receive(b"hi");
            }
        }));
        let mut buf = [0u8; 8];
        assert_eq!(handle.read_some(&mut buf), Ok(2));
        drop(handle);

        assert_eq!(&buf[..2], b"hi");
        assert_eq!(polls, 3);
    }

    #[cfg(feature = "embedded-io")]
    #[test]
    fn embedded_io_write_and_flush() {
        use embedded_io::{Write, WriteReady};

        let dma = MockDma::new();
        let serial = shared(&dma);
        serial.init(SerialConfig::default(), MockDelay::new()).unwrap();

        let mut handle = serial.handle(Yield(|| {
            if dma.complete_tx().is_some() {
                serial.on_interrupt();
            }
        }));
        assert_eq!(handle.write_ready(), Ok(true));
        handle.write_all(b"0123456789abcdef").unwrap();
        handle.flush().unwrap();
        drop(handle);

        assert_eq!(dma.sink(), b"0123456789abcdef");
    }

    #[cfg(feature = "embedded-io")]
    #[test]
    fn embedded_io_read_ready_tracks_rx() {
        use embedded_io::{Read, ReadReady};

        let dma = MockDma::new();
        let serial = shared(&dma);
        serial.init(SerialConfig::default(), MockDelay::new()).unwrap();

        let mut handle = serial.handle(Spin);
        assert_eq!(handle.read_ready(), Ok(false));
        dma.receive(b"abc");
        assert_eq!(handle.read_ready(), Ok(true));

        let mut buf = [0u8; 2];
        assert_eq!(handle.read(&mut buf), Ok(2));
        assert_eq!(&buf, b"ab");
        assert_eq!(handle.read(&mut buf), Ok(1));
        assert_eq!(buf[0], b'c');
    }
}
