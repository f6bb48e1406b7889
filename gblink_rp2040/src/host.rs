use crate::board::{HostUart, HostUartPins, HOST_BAUD};
use crate::bsp::hal::{
    fugit::{HertzU32, RateExtU32},
    pac,
    uart::{DataBits, Error, StopBits, UartConfig, UartPeripheral},
};
use embedded_hal::serial::Read;
use gblink::HostOutput;

/// Serial channel to the host computer
pub struct HostSerial {
    uart: HostUart,
}

impl HostSerial {
    pub fn new(
        uart: pac::UART0,
        pins: HostUartPins,
        resets: &mut pac::RESETS,
        peripheral_freq: HertzU32,
    ) -> Result<HostSerial, Error> {
        let config = UartConfig::new(HOST_BAUD.Hz(), DataBits::Eight, None, StopBits::One);
        let uart = UartPeripheral::new(uart, pins, resets).enable(config, peripheral_freq)?;
        Ok(HostSerial { uart })
    }

    /// Drop a byte latched while the line settled after reset
    pub fn discard_pending(&mut self) {
        let _ = self.uart.read();
    }

    /// Blocking stream of received bytes
    ///
    /// Never ends. Receive errors are logged and skipped.
    pub fn commands(&mut self) -> impl Iterator<Item = u8> + '_ {
        core::iter::from_fn(move || loop {
            match nb::block!(self.uart.read()) {
                Ok(byte) => return Some(byte),
                Err(e) => defmt::warn!("host receive error: {}", defmt::Debug2Format(&e)),
            }
        })
    }

    /// Next byte from the receive FIFO, if one is waiting
    pub fn try_read(&mut self) -> Option<u8> {
        loop {
            match self.uart.read() {
                Ok(byte) => return Some(byte),
                Err(nb::Error::WouldBlock) => return None,
                // The faulty byte has been popped; carry on with the next one.
                Err(nb::Error::Other(e)) => {
                    defmt::warn!("host receive error: {}", defmt::Debug2Format(&e))
                }
            }
        }
    }

    pub fn enable_rx_interrupt(&mut self) {
        self.uart.enable_rx_interrupt();
    }
}

impl HostOutput for HostSerial {
    fn send(&mut self, byte: u8) {
        self.uart.write_full_blocking(&[byte]);
    }

    fn send_all(&mut self, bytes: &[u8]) {
        self.uart.write_full_blocking(bytes);
    }
}
