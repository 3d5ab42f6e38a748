//! UART setup collaborator
//!
//! The transfer engines only need a few things from the serial peripheral:
//! one-time bring-up, a way to throw away startup garbage, the address of the
//! data register and whether the transmitter is still shifting. [`UartPort`]
//! captures exactly that; [`Rp2040Uart`] implements it for the PL011 blocks.

use crate::driver::config::{SerialConfig, UartInstance};
use crate::driver::error::ConfigResult;
use crate::internal::constants::MAX_IBRD;

// =============================================================================
// Trait
// =============================================================================

/// Serial peripheral as seen by the DMA transport.
pub trait UartPort {
    /// Bring the peripheral up for `config`: baud divisors, 8N1 framing,
    /// FIFOs, pin routing and DMA requests.
    ///
    /// Returns the baud rate actually achieved.
    ///
    /// # Errors
    /// Configuration values the peripheral cannot honour.
    fn init(&mut self, config: &SerialConfig) -> ConfigResult<u32>;

    /// Drain bytes sitting in the receive FIFO. Returns how many were dropped.
    fn discard_rx(&mut self) -> usize;

    /// Bus address of the data register (DMA source and destination)
    fn data_register(&self) -> usize;

    /// Instance the port drives
    fn instance(&self) -> UartInstance;

    /// Check whether the transmitter is still shifting out data
    fn is_busy(&self) -> bool;
}

// =============================================================================
// Baud Rate Divisor
// =============================================================================

/// PL011 baud rate divisor (16.6 fixed point).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivisor {
    /// Integer part (`UARTIBRD`)
    pub integer: u32,
    /// Fractional part in 64ths (`UARTFBRD`)
    pub fraction: u32,
}

impl BaudDivisor {
    /// Nearest divisor for `baud_rate` from `clock_hz`, clamped to the
    /// register range.
    pub const fn compute(clock_hz: u32, baud_rate: u32) -> Self {
        let div = (8 * clock_hz as u64) / baud_rate as u64 + 1;
        let integer = (div >> 7) as u32;
        if integer == 0 {
            Self {
                integer: 1,
                fraction: 0,
            }
        } else if integer >= MAX_IBRD {
            Self {
                integer: MAX_IBRD,
                fraction: 0,
            }
        } else {
            Self {
                integer,
                fraction: ((div & 0x7F) >> 1) as u32,
            }
        }
    }

    /// Baud rate this divisor produces from `clock_hz`
    pub const fn actual_baud(&self, clock_hz: u32) -> u32 {
        ((4 * clock_hz as u64) / (64 * self.integer as u64 + self.fraction as u64)) as u32
    }
}

// =============================================================================
// RP2040 Implementation
// =============================================================================

#[cfg(feature = "rp2040")]
pub use self::rp2040::Rp2040Uart;

#[cfg(feature = "rp2040")]
mod rp2040 {
    use super::{BaudDivisor, UartPort};
    use crate::driver::config::{SerialConfig, UartInstance};
    use crate::driver::error::ConfigResult;
    use crate::internal::constants::RX_FLUSH_LIMIT;
    use crate::internal::register::pads::{GPIO_FUNCSEL_UART, PadRegs};
    use crate::internal::register::resets::{
        RESET_IO_BANK0, RESET_PADS_BANK0, RESET_UART0, RESET_UART1, ResetRegs,
    };
    use crate::internal::register::uart::{
        UARTCR_RXE, UARTCR_TXE, UARTCR_UARTEN, UARTDMACR_RXDMAE, UARTDMACR_TXDMAE,
        UARTLCR_H_FEN, UARTLCR_H_WLEN_8, UartRegs,
    };
    use crate::internal::register::{UART0_BASE, UART1_BASE};

    const fn base_of(instance: UartInstance) -> usize {
        match instance {
            UartInstance::Uart0 => UART0_BASE,
            UartInstance::Uart1 => UART1_BASE,
        }
    }

    /// PL011 UART driven at register level.
    #[derive(Debug)]
    pub struct Rp2040Uart {
        instance: UartInstance,
        regs: UartRegs,
    }

    impl Default for Rp2040Uart {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Rp2040Uart {
        /// Create an unconfigured port. The instance is taken from the
        /// [`SerialConfig`] passed to `init`.
        pub const fn new() -> Self {
            Self {
                instance: UartInstance::Uart0,
                regs: UartRegs::new(UART0_BASE),
            }
        }
    }

    impl UartPort for Rp2040Uart {
        fn init(&mut self, config: &SerialConfig) -> ConfigResult<u32> {
            config.validate()?;

            self.instance = config.uart;
            self.regs = UartRegs::new(base_of(config.uart));
            let reset_bit = match config.uart {
                UartInstance::Uart0 => RESET_UART0,
                UartInstance::Uart1 => RESET_UART1,
            };

            ResetRegs::assert(reset_bit);
            ResetRegs::deassert_and_wait(reset_bit | RESET_IO_BANK0 | RESET_PADS_BANK0);

            let divisor = BaudDivisor::compute(config.peri_clock_hz, config.baud_rate);
            self.regs.set_ibrd(divisor.integer);
            self.regs.set_fbrd(divisor.fraction);

            // LCR_H write latches the divisors
            let mut lcr = UARTLCR_H_WLEN_8;
            if config.fifo_enabled {
                lcr |= UARTLCR_H_FEN;
            }
            self.regs.set_line_control(lcr);

            self.regs.set_control(UARTCR_UARTEN | UARTCR_TXE | UARTCR_RXE);
            self.regs.set_dma_control(UARTDMACR_TXDMAE | UARTDMACR_RXDMAE);

            PadRegs::configure_pad(config.tx_pin, false);
            PadRegs::configure_pad(config.rx_pin, config.rx_pull_up);
            PadRegs::set_function(config.tx_pin, GPIO_FUNCSEL_UART);
            PadRegs::set_function(config.rx_pin, GPIO_FUNCSEL_UART);

            Ok(divisor.actual_baud(config.peri_clock_hz))
        }

        fn discard_rx(&mut self) -> usize {
            let mut dropped = 0;
            while dropped < RX_FLUSH_LIMIT && !self.regs.rx_empty() {
                let _ = self.regs.data();
                dropped += 1;
            }
            dropped
        }

        fn data_register(&self) -> usize {
            self.regs.data_addr()
        }

        fn instance(&self) -> UartInstance {
            self.instance
        }

        fn is_busy(&self) -> bool {
            self.regs.is_busy()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
