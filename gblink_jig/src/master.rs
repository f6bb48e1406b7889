use anyhow::{anyhow, Context, Result};
use gblink::{ByteQueue, Edge, LinkPort, Mode, Session, DEFAULT_CAPACITY};
use std::{io::Write, sync::Mutex, thread, time::Duration};

/// Data lines between the simulated console and the adapter
#[derive(Debug, Default)]
pub struct SimLines {
    sin: bool,
    sout: bool,
}

impl LinkPort for SimLines {
    fn sin(&mut self) -> bool {
        self.sin
    }

    fn sout(&mut self) -> bool {
        self.sout
    }

    fn drive_sin(&mut self, high: bool) {
        self.sin = high;
    }
}

/// What the firmware keeps behind its critical section
pub struct Device {
    pub session: Session,
    pub queue: ByteQueue<DEFAULT_CAPACITY>,
    pub lines: SimLines,
}

impl Device {
    pub fn arm(mode: Mode) -> Self {
        let mut queue = ByteQueue::new();
        let session = Session::arm(mode, &mut queue);
        Device {
            session,
            queue,
            lines: SimLines::default(),
        }
    }
}

pub type SharedDevice = Mutex<Device>;

/// A console acting as link master, clocking bytes through the adapter
pub struct SimMaster<'a, W> {
    device: &'a SharedDevice,
    host: W,
    half_period: Duration,
    // In sniff mode a second console sits on the far end and answers on SIN
    far_slave: Option<u8>,
}

impl<'a, W: Write> SimMaster<'a, W> {
    pub fn new(device: &'a SharedDevice, host: W, bit_rate: u32, sniffing: bool) -> Self {
        let half_period = Duration::from_nanos(500_000_000 / u64::from(bit_rate.max(1)));
        SimMaster {
            device,
            host,
            half_period,
            far_slave: sniffing.then_some(0x00),
        }
    }

    /// Shift `out` to the slave while reading its byte back
    ///
    /// Each bit is presented and the slave's bit sampled before the falling edge, as a console
    /// does.
    pub fn exchange(&mut self, out: u8) -> Result<u8> {
        let mut received = 0u8;
        for i in 0..8 {
            let sout = out & (0x80 >> i) != 0;
            let far_bit = self.far_slave.map(|b| b & (0x80 >> i) != 0);
            let sin = self.with_device(|device| {
                device.lines.sout = sout;
                if let Some(bit) = far_bit {
                    device.lines.sin = bit;
                }
                device.lines.sin
            })?;
            received = (received << 1) | u8::from(sin);

            self.clock(Edge::Falling)?;
            self.clock(Edge::Rising)?;
        }
        // The far end answers each byte with the previous one it received
        if let Some(reply) = self.far_slave.as_mut() {
            *reply = out;
        }
        Ok(received)
    }

    fn clock(&mut self, edge: Edge) -> Result<()> {
        let mut out = Vec::new();
        self.with_device(|device| {
            let Device {
                session,
                queue,
                lines,
            } = device;
            session.on_clock_edge(edge, lines, &mut out, queue)
        })?;
        if !out.is_empty() {
            self.host.write_all(&out).context("writing to host")?;
        }
        thread::sleep(self.half_period);
        Ok(())
    }

    fn with_device<T>(&self, f: impl FnOnce(&mut Device) -> T) -> Result<T> {
        let mut device = self
            .device
            .lock()
            .map_err(|_| anyhow!("device state poisoned"))?;
        Ok(f(&mut device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gblink::printer::{ACK, STATUS};
    use pretty_assertions::assert_eq;

    const FAST: u32 = 1_000_000;

    #[test]
    fn printer_init_collects_ack_and_status() {
        let device = Mutex::new(Device::arm(Mode::SlavePrinter));
        let mut console = SimMaster::new(&device, Vec::new(), FAST, false);

        let packet = [0x88, 0x33, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        let received: Vec<u8> = packet
            .iter()
            .map(|b| console.exchange(*b).unwrap())
            .collect();

        assert_eq!(received, [0, 0, 0, 0, 0, 0, 0, 0, ACK, STATUS]);
        assert_eq!(console.host, packet);
    }

    #[test]
    fn host_bytes_reach_the_console() {
        let device = Mutex::new(Device::arm(Mode::Slave));
        {
            let mut guard = device.lock().unwrap();
            let Device {
                session,
                queue,
                lines,
            } = &mut *guard;
            for b in [0xC0, 0xDE] {
                session.on_host_byte(b, lines, queue);
            }
        }
        let mut console = SimMaster::new(&device, Vec::new(), FAST, false);

        let received: Vec<u8> = [0x01, 0x02, 0x03]
            .iter()
            .map(|b| console.exchange(*b).unwrap())
            .collect();
        assert_eq!(received, [0xC0, 0xDE, 0x00]);
    }

    #[test]
    fn sniffer_sees_far_slave_echo() {
        let device = Mutex::new(Device::arm(Mode::Sniff));
        let mut console = SimMaster::new(&device, Vec::new(), FAST, true);

        let received: Vec<u8> = [0x12, 0x34]
            .iter()
            .map(|b| console.exchange(*b).unwrap())
            .collect();

        assert_eq!(received, [0x00, 0x12]);
        // One `sin`, `sout` pair per byte
        assert_eq!(console.host, [0x00, 0x12, 0x12, 0x34]);
    }
}
