//! Hardware Abstraction Layer
//!
//! The transfer engines talk to hardware only through the traits in this
//! module, which keeps them testable on the host.
//!
//! # Modules
//!
//! - [`dma`]: DMA channel and controller traits, channel allocation
//! - [`uart`]: Serial peripheral setup collaborator and baud divisor math
//! - [`backoff`]: Pause strategies for the blocking waits
//!
//! # Delay Integration
//!
//! Types that need delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL (e.g., `rp2040_hal::Timer`).

pub mod backoff;
pub mod dma;
pub mod uart;

// Re-export commonly used types
pub use backoff::{Backoff, DelayBackoff, Spin, Yield};
pub use dma::{ChannelAllocator, DmaChannel, DmaController};
pub use uart::{BaudDivisor, UartPort};

#[cfg(feature = "rp2040")]
pub use dma::{Rp2040Channel, Rp2040Dma};
#[cfg(feature = "rp2040")]
pub use uart::Rp2040Uart;
