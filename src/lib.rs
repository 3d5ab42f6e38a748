//! RP2040 UART DMA Transport
//!
//! A `no_std`, `no_alloc` serial transport for the RP2040 that moves UART
//! bytes with DMA in both directions.
//!
//! # Architecture
//!
//! 1. **Receive** ([`driver::rx`]): one channel copies every received byte
//!    into a circular buffer forever, using the DMA ring-wrap feature. The
//!    reader polls the channel's write address to see what has arrived.
//! 2. **Transmit** ([`driver::tx`]): the application appends to a ring; a
//!    second channel drains it in contiguous chunks, each completion
//!    interrupt launching the next.
//! 3. **One-shot** ([`driver::oneshot`]): a caller buffer sent on a
//!    transiently claimed channel, for early boot or panic output.
//! 4. **HAL Layer** ([`hal`]): DMA and UART traits the engines run against,
//!    with register-level RP2040 implementations.
//!
//! # Features
//!
//! - `rp2040` (default): Register-level [`Rp2040Dma`] and [`Rp2040Uart`]
//! - `critical-section` (default): ISR-safe [`SharedSerial`] wrapper
//! - `embedded-io`: `embedded_io::{Read, Write}` on [`sync::SerialHandle`]
//! - `defmt`: defmt formatting for public types and lifecycle logging
//! - `log`: lifecycle logging through the `log` facade
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_uart_dma::{SerialConfig, Spin, UartInstance};
//!
//! ph_rp2040_uart_dma::serial_dma_static!(SERIAL);
//! ph_rp2040_uart_dma::serial_dma_irq!(SERIAL);
//!
//! let config = SerialConfig::new()
//!     .with_uart(UartInstance::Uart0)
//!     .with_pins(0, 1)
//!     .with_baud_rate(115_200);
//! SERIAL.init(config, &mut timer).unwrap();
//!
//! SERIAL.write_str("boot\r\n", Spin).unwrap();
//! loop {
//!     if let Some(b) = SERIAL.read_byte() {
//!         SERIAL.write_byte(b, Spin).unwrap();
//!     }
//! }
//! ```
//!
//! # Memory Requirements
//!
//! The RX buffer is aligned to 1024 bytes so the ring wrap can use any size
//! up to 1024. A `SerialDma<_, _, 256, 256>` therefore occupies about 1.3 KB
//! of SRAM, most of it alignment padding after the RX buffer.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// Host tests link std (mocks, proptest)
#[cfg(test)]
extern crate std;

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod ring;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    ChannelConfig, Dreq, RingSelect, RingWrap, SerialConfig, State, TransferSize, UartInstance,
};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use driver::interrupt::IrqStatus;
pub use driver::oneshot::OneShot;
pub use driver::serial::SerialDma;
pub use hal::backoff::{Backoff, DelayBackoff, Spin, Yield};
pub use hal::dma::{DmaChannel, DmaController};
pub use hal::uart::UartPort;

#[cfg(feature = "rp2040")]
pub use hal::{Rp2040Channel, Rp2040Dma, Rp2040Uart};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{SerialHandle, SharedSerial};

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the safe transport APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Writing a channel that
/// the transport owns can corrupt an in-flight transfer.
#[cfg(feature = "rp2040")]
pub mod unsafe_registers {
    pub use crate::internal::register::dma::{DmaChannelRegs, DmaRegs};
    pub use crate::internal::register::uart::UartRegs;
}

/// Shared transport constants.
pub mod constants {
    pub use crate::internal::constants::{
        // Line defaults
        DEFAULT_BAUD_RATE,
        DEFAULT_PERI_CLOCK_HZ,
        // Buffer sizes
        DEFAULT_RX_BUFFER_SIZE,
        DEFAULT_RX_PIN,
        DEFAULT_TX_BUFFER_SIZE,
        DEFAULT_TX_PIN,
        // DMA
        DMA_CHANNEL_COUNT,
        DREQ_UART0_RX,
        DREQ_UART0_TX,
        DREQ_UART1_RX,
        DREQ_UART1_TX,
        MIN_RING_SIZE,
        RX_RING_ALIGN,
        // Timing
        STARTUP_SETTLE_MS,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static, ISR-safe serial transport on the RP2040.
///
/// Expands to a [`SharedSerial`] over [`Rp2040Dma`] and [`Rp2040Uart`] with
/// the default 256-byte rings, or the given sizes.
///
/// # Examples
///
/// ```ignore
/// ph_rp2040_uart_dma::serial_dma_static!(SERIAL);
/// ph_rp2040_uart_dma::serial_dma_static!(DEBUG_PORT, 512, 128);
/// ```
#[cfg(all(feature = "critical-section", feature = "rp2040"))]
#[macro_export]
macro_rules! serial_dma_static {
    ($name:ident) => {
        $crate::serial_dma_static!($name, 256, 256);
    };
    ($name:ident, $rx:expr, $tx:expr) => {
        static $name: $crate::sync::SharedSerial<$crate::Rp2040Dma, $crate::Rp2040Uart, { $rx }, { $tx }> =
            $crate::sync::SharedSerial::new($crate::SerialDma::new(
                $crate::Rp2040Dma::new(),
                $crate::Rp2040Uart::new(),
            ));
    };
}

/// Bind a static [`SharedSerial`] to the `DMA_IRQ_0` vector.
///
/// Defines the `DMA_IRQ_0` symbol the RP2040 vector table links against and
/// forwards every interrupt to [`SharedSerial::on_interrupt`]. Completions
/// from channels the transport does not own are left pending.
///
/// # Examples
///
/// ```ignore
/// ph_rp2040_uart_dma::serial_dma_static!(SERIAL);
/// ph_rp2040_uart_dma::serial_dma_irq!(SERIAL);
/// ```
#[cfg(all(feature = "critical-section", feature = "rp2040"))]
#[macro_export]
macro_rules! serial_dma_irq {
    ($serial:path) => {
        #[allow(non_snake_case)]
        #[unsafe(no_mangle)]
        extern "C" fn DMA_IRQ_0() {
            let _ = $serial.on_interrupt();
        }
    };
}
