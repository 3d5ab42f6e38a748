//! Core driver components of the UART DMA transport.
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`interrupt`] - Per-channel status of the shared DMA interrupt line
//! - [`rx`] - Free-running circular receive engine
//! - [`tx`] - Chunked, interrupt-chained transmit engine
//! - [`oneshot`] - Blocking send on a transient channel
//! - [`serial`] - The [`SerialDma`] transport tying it all together
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_uart_dma::driver::{SerialConfig, UartInstance};
//!
//! let config = SerialConfig::new()
//!     .with_uart(UartInstance::Uart1)
//!     .with_pins(4, 5)
//!     .with_baud_rate(921_600);
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod interrupt;
pub mod oneshot;
pub mod rx;
pub mod serial;
pub mod tx;

// Re-exports for convenience
pub use config::{
    ChannelConfig, Dreq, RingSelect, RingWrap, SerialConfig, State, TransferSize, UartInstance,
};
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result};
pub use interrupt::IrqStatus;
pub use oneshot::OneShot;
pub use rx::{RxBuffer, RxEngine};
pub use serial::SerialDma;
pub use tx::TxEngine;
