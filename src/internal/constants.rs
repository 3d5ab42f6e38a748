//! Centralized Constants
//!
//! Single source of truth for the magic numbers used throughout the UART DMA
//! transport.
//!
//! # Organization
//!
//! - **Buffer sizes**: ring buffer defaults and limits
//! - **Serial defaults**: baud rate, pins, clocks
//! - **Timing**: settle delays and back-off intervals
//! - **DMA**: channel count and pacing (DREQ) numbers
//!
//! Hardware register bit definitions live next to their register blocks in
//! `internal::register`.

// =============================================================================
// Ring Buffer Sizes
// =============================================================================

/// Default receive ring size in bytes (must be a power of two)
pub const DEFAULT_RX_BUFFER_SIZE: usize = 256;

/// Default transmit ring size in bytes (must be a power of two)
pub const DEFAULT_TX_BUFFER_SIZE: usize = 256;

/// Alignment of the RX ring storage.
///
/// The RP2040 ring-wrap logic masks the low `RING_SIZE` address bits, so the
/// buffer must be aligned to its own size. This is also the largest RX ring
/// the engine accepts.
pub const RX_RING_ALIGN: usize = 1024;

/// Smallest ring the geometry accepts (one usable slot)
pub const MIN_RING_SIZE: usize = 2;

// =============================================================================
// Serial Defaults
// =============================================================================

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default peripheral clock feeding the UART (clk_peri = clk_sys at boot)
pub const DEFAULT_PERI_CLOCK_HZ: u32 = 125_000_000;

/// Default UART0 TX pin
pub const DEFAULT_TX_PIN: u8 = 0;

/// Default UART0 RX pin
pub const DEFAULT_RX_PIN: u8 = 1;

/// Maximum integer baud divisor (16-bit IBRD field)
pub const MAX_IBRD: u32 = 0xFFFF;

// =============================================================================
// Timing Constants
// =============================================================================

/// Delay after UART bring-up before the startup garbage is flushed again
pub const STARTUP_SETTLE_MS: u32 = 10;

/// Default back-off interval for delay-based busy-waits
pub const DEFAULT_BACKOFF_US: u32 = 10;

/// Upper bound on bytes discarded while flushing the RX FIFO at startup
///
/// The PL011 RX FIFO is 32 entries deep; a peer that keeps sending would
/// otherwise hold the flush loop forever.
pub const RX_FLUSH_LIMIT: usize = 64;

// =============================================================================
// DMA
// =============================================================================

/// Number of DMA channels on the RP2040
pub const DMA_CHANNEL_COUNT: u8 = 12;

/// Transfer count used for the free-running RX channel.
///
/// `TRANS_COUNT` keeps decrementing in ring mode, so the count is the largest
/// value the register holds rather than the buffer length. The reader
/// re-triggers the channel once it runs out.
pub const RX_ENDLESS_COUNT: u32 = u32::MAX;

/// DREQ number for UART0 TX
pub const DREQ_UART0_TX: u8 = 20;

/// DREQ number for UART0 RX
pub const DREQ_UART0_RX: u8 = 21;

/// DREQ number for UART1 TX
pub const DREQ_UART1_TX: u8 = 22;

/// DREQ number for UART1 RX
pub const DREQ_UART1_RX: u8 = 23;

/// TREQ_SEL value for an unpaced (full speed) transfer
pub const DREQ_FORCE: u8 = 0x3F;
