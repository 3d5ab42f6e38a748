//! Error types for the RP2040 UART DMA transport
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Initialization and configuration failures
//! - [`DmaError`]: DMA channel allocation and transfer issues
//! - [`IoError`]: Runtime TX/RX conditions
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.
//!
//! Backpressure from a full TX ring never reaches callers of the blocking
//! write API; [`IoError::BufferFull`] only comes out of the `try_*` variants.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
///
/// These errors occur during UART bring-up or engine setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate is zero or unreachable from the peripheral clock
    InvalidBaudRate,
    /// GPIO cannot carry the requested UART signal
    InvalidPin,
    /// Ring buffer size is not a supported power of two
    InvalidBufferSize,
    /// Peripheral clock is zero
    ClockError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidBaudRate => "invalid baud rate",
            ConfigError::InvalidPin => "invalid UART pin",
            ConfigError::InvalidBufferSize => "invalid ring buffer size",
            ConfigError::ClockError => "peripheral clock error",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// DMA channel and transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Every DMA channel is already claimed
    NoChannelAvailable,
    /// Transfer length is zero or does not fit the count register
    InvalidLength,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::NoChannelAvailable => "no DMA channel available",
            DmaError::InvalidLength => "invalid transfer length",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime TX/RX conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// TX ring is full (non-blocking write only)
    BufferFull,
    /// Transport used before `init`
    NotInitialized,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::BufferFull => "transmit buffer full",
            IoError::NotInitialized => "transport not initialized",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidPin)) => { /* ... */ }
///     Err(Error::Dma(DmaError::NoChannelAvailable)) => { /* ... */ }
///     Err(Error::Io(IoError::NotInitialized)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl core::error::Error for Error {}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

#[cfg(feature = "embedded-io")]
impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        use embedded_io::ErrorKind;

        match self {
            Error::Config(_) => ErrorKind::InvalidInput,
            Error::Dma(DmaError::NoChannelAvailable) => ErrorKind::OutOfMemory,
            Error::Dma(DmaError::InvalidLength)
            | Error::Io(IoError::BufferFull) => ErrorKind::Other,
            Error::Io(IoError::NotInitialized) => ErrorKind::NotConnected,
        }
    }
}

/// Result type alias for transport operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::InvalidBaudRate,
            ConfigError::InvalidPin,
            ConfigError::InvalidBufferSize,
            ConfigError::ClockError,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "ConfigError::{variant:?} has empty string");
        }
    }

    #[test]
    fn config_error_display() {
        let display = format!("{}", ConfigError::InvalidPin);
        assert_eq!(display, "invalid UART pin");
    }

    #[test]
    fn dma_error_as_str_non_empty() {
        let variants = [
            DmaError::NoChannelAvailable,
            DmaError::InvalidLength,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "DmaError::{variant:?} has empty string");
        }
    }

    #[test]
    fn dma_error_display() {
        let display = format!("{}", DmaError::NoChannelAvailable);
        assert_eq!(display, "no DMA channel available");
    }

    #[test]
    fn io_error_display() {
        assert_eq!(format!("{}", IoError::BufferFull), "transmit buffer full");
        assert_eq!(format!("{}", IoError::NotInitialized), "transport not initialized");
    }

    #[test]
    fn error_from_domain_errors() {
        assert_eq!(
            Error::from(ConfigError::InvalidBaudRate),
            Error::Config(ConfigError::InvalidBaudRate)
        );
        assert_eq!(
            Error::from(DmaError::NoChannelAvailable),
            Error::Dma(DmaError::NoChannelAvailable)
        );
        assert_eq!(Error::from(IoError::BufferFull), Error::Io(IoError::BufferFull));
    }

    #[test]
    fn error_display_prefixes_domain() {
        let display = format!("{}", Error::Dma(DmaError::InvalidLength));
        assert!(display.starts_with("dma: "));
        assert!(display.contains("length"));

        let display = format!("{}", Error::Config(ConfigError::ClockError));
        assert!(display.starts_with("config: "));
    }

    #[test]
    fn question_mark_converts_domain_errors() {
        fn claim() -> DmaResult<u8> {
            Err(DmaError::NoChannelAvailable)
        }

        fn init() -> Result<u8> {
            let ch = claim()?;
            Ok(ch)
        }

        assert_eq!(init(), Err(Error::Dma(DmaError::NoChannelAvailable)));
    }
}
