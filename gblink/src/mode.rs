/// Bytes sent to the host right after boot, before the mode command is read
pub const GREETING: &[u8] = b"\nHELLO\n";

/// Error type for a command byte that does not select a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCommand(pub u8);

/// Link role selected by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Observe both data lines without driving anything
    Sniff,
    /// Act as the slave, sending whatever the host queues
    Slave,
    /// Act as the slave and answer printer packets on our own
    SlavePrinter,
}

impl Mode {
    /// The command byte that selects this mode
    pub const fn command(self) -> u8 {
        match self {
            Mode::Sniff => b's',
            Mode::Slave => b'b',
            Mode::SlavePrinter => b'p',
        }
    }

    /// Whether the slave output line must be driven in this mode
    pub const fn drives_link(self) -> bool {
        !matches!(self, Mode::Sniff)
    }

    pub const fn emulates_printer(self) -> bool {
        matches!(self, Mode::SlavePrinter)
    }
}

impl TryFrom<u8> for Mode {
    type Error = UnknownCommand;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b's' => Ok(Mode::Sniff),
            b'b' => Ok(Mode::Slave),
            b'p' => Ok(Mode::SlavePrinter),
            other => Err(UnknownCommand(other)),
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode.command()
    }
}

/// Wait for a mode command
///
/// Consumes `commands` until a byte selects a mode, skipping everything else. A serial port never
/// runs dry, so `None` is only returned for finite command sources.
pub fn select_mode(commands: impl IntoIterator<Item = u8>) -> Option<Mode> {
    commands.into_iter().find_map(|b| Mode::try_from(b).ok())
}
