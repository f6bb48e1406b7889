/// Trait representing the link's data lines
///
/// Line names follow the link master's point of view: `sout` carries bits from the master to the
/// slave and `sin` carries bits from the slave back to the master. The clock line is not part of
/// this trait; edges are delivered to the engine as `Edge` values.
pub trait LinkPort {
    /// Sample the slave to master line
    fn sin(&mut self) -> bool;
    /// Sample the master to slave line
    fn sout(&mut self) -> bool;
    /// Drive the slave to master line
    ///
    /// Only called when this device acts as the slave. Ports that are wired for sniffing may
    /// ignore it.
    fn drive_sin(&mut self, high: bool);
}

/// Clock line transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    /// Classify an edge from the clock level sampled right after it
    pub fn from_clock_level(high: bool) -> Self {
        if high {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }

    fn opposite(self) -> Self {
        match self {
            Edge::Rising => Edge::Falling,
            Edge::Falling => Edge::Rising,
        }
    }
}

/// Order the clock edges latched since the interrupt last ran, oldest first
///
/// `rose` and `fell` are the pending edge flags and `clock_high` is the clock level read after
/// them. Both flags being set means the handler ran late; the level then tells which edge came
/// last.
pub fn latched_edges(rose: bool, fell: bool, clock_high: bool) -> [Option<Edge>; 2] {
    match (rose, fell) {
        (true, true) => {
            let last = Edge::from_clock_level(clock_high);
            [Some(last.opposite()), Some(last)]
        }
        (true, false) => [Some(Edge::Rising), None],
        (false, true) => [Some(Edge::Falling), None],
        (false, false) => [None, None],
    }
}
