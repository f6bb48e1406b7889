//! Bit level link engines
//!
//! Both engines are stepped from the clock edge interrupt, one call per edge. They never block
//! except for handing completed bytes to the host.

use crate::byte_queue::ByteQueue;
use crate::host::HostOutput;
use crate::link::LinkPort;
use crate::printer::PrinterTracker;
use crate::shift_register::{ShiftIn, ShiftOut};

/// Byte driven onto the link when nothing is queued
pub const FILL_BYTE: u8 = 0x00;

/// One byte observed on each data line during the same eight clocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SniffedPair {
    pub sin: u8,
    pub sout: u8,
}

/// Passive wiretap
///
/// Samples both data lines on every rising clock edge and never drives the link.
#[derive(Debug, Default)]
pub struct SniffEngine {
    sin: ShiftIn,
    sout: ShiftIn,
}

impl SniffEngine {
    pub const fn new() -> Self {
        SniffEngine {
            sin: ShiftIn::new(),
            sout: ShiftIn::new(),
        }
    }

    /// Handle a rising clock edge
    ///
    /// On every eighth edge the completed pair is sent to the host, `sin` byte first.
    pub fn on_rising(
        &mut self,
        port: &mut impl LinkPort,
        host: &mut impl HostOutput,
    ) -> Option<SniffedPair> {
        let sin = self.sin.shift_in(port.sin());
        let sout = self.sout.shift_in(port.sout());
        // Both registers count in lockstep, so they complete on the same edge.
        let pair = SniffedPair {
            sin: sin?,
            sout: sout?,
        };
        host.send_all(&[pair.sin, pair.sout]);
        Some(pair)
    }

    /// Bits accumulated since the last byte boundary
    pub fn bit_count(&self) -> u8 {
        self.sout.bit_count()
    }
}

/// Slave role emulation
///
/// The master's bit is sampled on the falling edge and our next bit is presented on the rising
/// edge, so the receive and transmit halves run half a clock apart.
#[derive(Debug)]
pub struct SlaveEngine {
    rx: ShiftIn,
    tx: ShiftOut,
    // Transmit register holds FILL_BYTE because the queue was empty when it was loaded
    filler: bool,
    printer: Option<PrinterTracker>,
}

impl SlaveEngine {
    /// Create an engine, optionally with printer emulation layered on top
    pub const fn new(printer: bool) -> Self {
        SlaveEngine {
            rx: ShiftIn::new(),
            tx: ShiftOut::new(),
            filler: true,
            printer: if printer {
                Some(PrinterTracker::new())
            } else {
                None
            },
        }
    }

    /// Handle a falling clock edge
    ///
    /// Returns the byte received from the master when this edge completed it. By then the byte
    /// has been echoed to the host, fed to the printer tracker, and the next outgoing byte has
    /// been loaded from `queue` (or `FILL_BYTE` if the queue is empty).
    pub fn on_falling<const N: usize>(
        &mut self,
        port: &mut impl LinkPort,
        host: &mut impl HostOutput,
        queue: &mut ByteQueue<N>,
    ) -> Option<u8> {
        let Some(byte) = self.rx.shift_in(port.sout()) else {
            self.tx.shift();
            return None;
        };

        host.send(byte);
        if let Some(printer) = self.printer.as_mut() {
            printer.feed(byte, queue);
        }

        self.filler = queue.is_empty();
        let next = if self.filler { FILL_BYTE } else { queue.pop() };
        self.tx.load(next);
        Some(byte)
    }

    /// Handle a rising clock edge by presenting the current outgoing bit
    pub fn on_rising(&mut self, port: &mut impl LinkPort) {
        port.drive_sin(self.tx.current_bit());
    }

    /// Replace a pending fill byte with a freshly queued byte
    ///
    /// Only takes effect at a byte boundary, before the master has clocked any bit of the current
    /// byte, and only when the transmit register holds `FILL_BYTE` for lack of data. The first bit
    /// of the new byte is presented right away since the rising edge that would have presented it
    /// has usually passed already.
    pub fn preload<const N: usize>(
        &mut self,
        port: &mut impl LinkPort,
        queue: &mut ByteQueue<N>,
    ) {
        if self.filler && self.rx.bit_count() == 0 && !queue.is_empty() {
            self.tx.load(queue.pop());
            self.filler = false;
            port.drive_sin(self.tx.current_bit());
        }
    }

    pub fn bit_count(&self) -> u8 {
        self.rx.bit_count()
    }

    /// Byte currently in the transmit register, already shifted by the bits sent so far
    pub fn outgoing(&self) -> u8 {
        self.tx.byte()
    }

    pub fn printer(&self) -> Option<&PrinterTracker> {
        self.printer.as_ref()
    }
}
