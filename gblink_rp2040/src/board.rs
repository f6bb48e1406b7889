//! Pico wiring and fixed configuration
//!
//! | GPIO | Function                              |
//! |------|---------------------------------------|
//! | 0    | UART0 TX to host                      |
//! | 1    | UART0 RX from host                    |
//! | 2    | link SCK                              |
//! | 3    | link SIN, driven by us in slave modes |
//! | 4    | link SOUT                             |
//! | 5    | link SD, read only                    |
//! | 25   | status LED                            |

use crate::bsp::hal::{
    gpio::{
        bank0::{Gpio0, Gpio1, Gpio2, Gpio3, Gpio4, Gpio5},
        FunctionSioInput, FunctionSioOutput, FunctionUart, Pin, PullDown, PullNone, PullUp,
    },
    pac,
    uart::{Enabled, UartPeripheral},
};

pub const HOST_BAUD: u32 = 1_000_000;

// Only the top two priority bits are implemented on the M0+
pub const CLOCK_EDGE_PRIORITY: u8 = 0x00;
pub const HOST_RX_PRIORITY: u8 = 0x40;

pub type SckPin = Pin<Gpio2, FunctionSioInput, PullNone>;
pub type SinObservedPin = Pin<Gpio3, FunctionSioInput, PullNone>;
pub type SinDrivenPin = Pin<Gpio3, FunctionSioOutput, PullDown>;
pub type SoutPin = Pin<Gpio4, FunctionSioInput, PullNone>;
pub type SdPin = Pin<Gpio5, FunctionSioInput, PullNone>;

pub type HostUartPins = (
    Pin<Gpio0, FunctionUart, PullNone>,
    Pin<Gpio1, FunctionUart, PullUp>,
);
pub type HostUart = UartPeripheral<Enabled, pac::UART0, HostUartPins>;
