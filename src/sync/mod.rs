//! Synchronization and Concurrency Support
//!
//! Interrupt-safe access to the serial transport for mainline code and the
//! `DMA_IRQ_0` handler:
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`], ISR-safe interior
//!   mutability
//! - **Shared Wrapper** (`shared`): [`SharedSerial`], the static both contexts
//!   hold
//! - **Handle** (`handle`): [`SerialHandle`], `core::fmt::Write` and
//!   `embedded-io` adapters over a [`SharedSerial`]
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//! - `embedded-io`: Adds `embedded_io` trait impls to [`SerialHandle`]
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_uart_dma::sync::SharedSerial;
//!
//! ph_rp2040_uart_dma::serial_dma_static!(SERIAL);
//! ph_rp2040_uart_dma::serial_dma_irq!(SERIAL);
//!
//! fn main() {
//!     SERIAL.init(SerialConfig::default(), timer).unwrap();
//!     SERIAL.write_str("hello\r\n", Spin).unwrap();
//!     while let Some(b) = SERIAL.read_byte() {
//!         SERIAL.write_byte(b, Spin).unwrap();
//!     }
//! }
//! ```

mod handle;
mod primitives;
mod shared;

pub use handle::SerialHandle;
pub use primitives::CriticalSectionCell;
pub use shared::SharedSerial;
