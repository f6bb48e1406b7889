use crate::board::{SckPin, SdPin, SinDrivenPin, SinObservedPin, SoutPin};
use crate::bsp::hal::gpio::Interrupt::{EdgeHigh, EdgeLow};
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin};
use gblink::{latched_edges, Edge, LinkPort};

pub enum SinPin {
    Observed(SinObservedPin),
    Driven(SinDrivenPin),
}

/// The link connector
pub struct LinkPins {
    sck: SckPin,
    sin: SinPin,
    sout: SoutPin,
    // Select line, wired but not used by any mode
    _sd: SdPin,
}

impl LinkPins {
    pub fn new(sck: SckPin, sin: SinPin, sout: SoutPin, sd: SdPin) -> LinkPins {
        LinkPins {
            sck,
            sin,
            sout,
            _sd: sd,
        }
    }

    /// Arm the clock line interrupt
    ///
    /// A sniffer samples on rising edges only, a slave needs both.
    pub fn enable_clock_interrupt(&mut self) {
        self.sck.clear_interrupt(EdgeHigh);
        self.sck.clear_interrupt(EdgeLow);
        self.sck.set_interrupt_enabled(EdgeHigh, true);
        if matches!(self.sin, SinPin::Driven(_)) {
            self.sck.set_interrupt_enabled(EdgeLow, true);
        }
    }

    /// Acknowledge the pending clock interrupt and return the edges that raised it, oldest first
    ///
    /// Two latched edges mean the handler ran late. Both are replayed; a third edge in the same
    /// window cannot be told apart and is lost.
    pub fn take_edges(&mut self) -> [Option<Edge>; 2] {
        let rose = self.sck.interrupt_status(EdgeHigh);
        let fell = self.sck.interrupt_status(EdgeLow);
        self.sck.clear_interrupt(EdgeHigh);
        self.sck.clear_interrupt(EdgeLow);
        if rose && fell {
            defmt::warn!("clock edges coalesced, handler ran late");
        }
        latched_edges(rose, fell, matches!(self.sck.is_high(), Ok(true)))
    }
}

impl LinkPort for LinkPins {
    fn sin(&mut self) -> bool {
        let level = match &self.sin {
            SinPin::Observed(pin) => pin.is_high(),
            SinPin::Driven(pin) => pin.is_set_high(),
        };
        matches!(level, Ok(true))
    }

    fn sout(&mut self) -> bool {
        matches!(self.sout.is_high(), Ok(true))
    }

    fn drive_sin(&mut self, high: bool) {
        if let SinPin::Driven(pin) = &mut self.sin {
            let _ = if high { pin.set_high() } else { pin.set_low() };
        }
    }
}
