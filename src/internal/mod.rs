//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`constants`]: Buffer sizes, defaults, DREQ numbers and other magic numbers
//! - [`register`]: Raw memory-mapped register definitions (DMA, UART, RESETS, pads)
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. Do not depend on any types
//! or functions in this module from external code. They are subject to change
//! without notice.

pub(crate) mod constants;

#[cfg(feature = "rp2040")]
pub(crate) mod register;
