use crate::byte_queue::ByteQueue;
use crate::engine::{SlaveEngine, SniffEngine};
use crate::host::HostOutput;
use crate::link::{Edge, LinkPort};
use crate::mode::Mode;

/// Link state for the armed mode
///
/// A session is created once, when the host selects a mode, and lives until power off. Before
/// that there is no session at all, and the interrupt handlers must do nothing.
#[derive(Debug)]
pub enum Session {
    Sniff(SniffEngine),
    Slave(SlaveEngine),
}

impl Session {
    /// Start a session for `mode`
    ///
    /// Empties `queue`, so it must be called before the interrupts using the queue are enabled.
    pub fn arm<const N: usize>(mode: Mode, queue: &mut ByteQueue<N>) -> Self {
        queue.clear();
        match mode {
            Mode::Sniff => Session::Sniff(SniffEngine::new()),
            Mode::Slave | Mode::SlavePrinter => {
                Session::Slave(SlaveEngine::new(mode.emulates_printer()))
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Session::Sniff(_) => Mode::Sniff,
            Session::Slave(engine) if engine.printer().is_some() => Mode::SlavePrinter,
            Session::Slave(_) => Mode::Slave,
        }
    }

    /// Step the engine for one clock edge
    ///
    /// The sniffer only reacts to rising edges; falling edges are ignored should the port deliver
    /// them.
    pub fn on_clock_edge<const N: usize>(
        &mut self,
        edge: Edge,
        port: &mut impl LinkPort,
        host: &mut impl HostOutput,
        queue: &mut ByteQueue<N>,
    ) {
        match (self, edge) {
            (Session::Sniff(engine), Edge::Rising) => {
                engine.on_rising(port, host);
            }
            (Session::Sniff(_), Edge::Falling) => {}
            (Session::Slave(engine), Edge::Falling) => {
                engine.on_falling(port, host, queue);
            }
            (Session::Slave(engine), Edge::Rising) => engine.on_rising(port),
        }
    }

    /// Accept a byte from the host for transmission over the link
    ///
    /// When the byte lands in an empty queue at a byte boundary it goes straight into the
    /// transmit register. Sniffing never transmits, so the byte is dropped.
    pub fn on_host_byte<const N: usize>(
        &mut self,
        byte: u8,
        port: &mut impl LinkPort,
        queue: &mut ByteQueue<N>,
    ) {
        if let Session::Slave(engine) = self {
            let was_empty = queue.is_empty();
            queue.push(byte);
            if was_empty {
                engine.preload(port, queue);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl LinkPort for Idle {
        fn sin(&mut self) -> bool {
            false
        }

        fn sout(&mut self) -> bool {
            false
        }

        fn drive_sin(&mut self, _high: bool) {}
    }

    #[test]
    fn arming_clears_queue() {
        let mut queue = ByteQueue::<8>::new();
        queue.push(1);
        queue.push(2);
        let session = Session::arm(Mode::Slave, &mut queue);
        assert!(queue.is_empty());
        assert_eq!(session.mode(), Mode::Slave);
    }

    #[test]
    fn session_reports_armed_mode() {
        let mut queue = ByteQueue::<8>::new();
        for mode in [Mode::Sniff, Mode::Slave, Mode::SlavePrinter] {
            assert_eq!(Session::arm(mode, &mut queue).mode(), mode);
        }
    }

    #[test]
    fn sniffer_drops_host_bytes() {
        let mut queue = ByteQueue::<8>::new();
        let mut session = Session::arm(Mode::Sniff, &mut queue);
        session.on_host_byte(0x42, &mut Idle, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn host_byte_preloads_idle_slave() {
        let mut queue = ByteQueue::<8>::new();
        let mut session = Session::arm(Mode::Slave, &mut queue);
        session.on_host_byte(0x42, &mut Idle, &mut queue);
        session.on_host_byte(0x43, &mut Idle, &mut queue);
        match &session {
            Session::Slave(engine) => assert_eq!(engine.outgoing(), 0x42),
            Session::Sniff(_) => unreachable!(),
        }
        assert_eq!(queue.pop(), 0x43);
        assert!(queue.is_empty());
    }
}
