//! Printer accessory emulation
//!
//! The printer protocol frames every packet the same way:
//!
//! | Bytes | Field                          |
//! |-------|--------------------------------|
//! | 2     | magic, `0x88 0x33`             |
//! | 1     | command                        |
//! | 1     | argument                       |
//! | 2     | payload length, little endian  |
//! | n     | payload                        |
//! | 2     | checksum                       |
//! | 1     | master sends filler, we answer with the acknowledgement |
//! | 1     | master sends filler, we answer with the status          |
//!
//! Only the framing is tracked. Commands are not interpreted and the checksum is consumed without
//! being verified.
//!
//! Reply bytes are queued one byte ahead of the slot they are sent in: the engine loads the next
//! outgoing byte right after a received byte completes, so the acknowledgement queued while the
//! second checksum byte completes goes out during the following byte.

use crate::byte_queue::ByteQueue;

/// Packet prefix
pub const MAGIC: [u8; 2] = [0x88, 0x33];
/// Reply to a complete packet, "printer alive"
pub const ACK: u8 = 0x81;
/// Status reply, no error flags set
pub const STATUS: u8 = 0x00;

/// Position within a printer packet
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrinterPhase {
    #[default]
    AwaitMagic0,
    AwaitMagic1,
    Command,
    Argument,
    LengthLow,
    LengthHigh {
        low: u8,
    },
    PayloadData {
        remaining: u16,
    },
    ChecksumLow,
    ChecksumHigh,
    Ack,
    Status,
}

/// Result of feeding one byte to a `PrinterPhase`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: PrinterPhase,
    /// Byte to queue for transmission, if any
    pub reply: Option<u8>,
}

impl Step {
    fn to(next: PrinterPhase) -> Self {
        Step { next, reply: None }
    }

    fn replying(next: PrinterPhase, reply: u8) -> Self {
        Step {
            next,
            reply: Some(reply),
        }
    }
}

impl PrinterPhase {
    /// Advance the framing state by one received byte
    pub fn step(self, byte: u8) -> Step {
        use PrinterPhase::*;
        match self {
            AwaitMagic0 if byte == MAGIC[0] => Step::to(AwaitMagic1),
            AwaitMagic0 => Step::to(AwaitMagic0),
            AwaitMagic1 if byte == MAGIC[1] => Step::to(Command),
            // Resync: the byte is not re-examined as a first magic byte.
            AwaitMagic1 => Step::to(AwaitMagic0),
            Command => Step::to(Argument),
            Argument => Step::to(LengthLow),
            LengthLow => Step::to(LengthHigh { low: byte }),
            LengthHigh { low } => match u16::from_le_bytes([low, byte]) {
                0 => Step::to(ChecksumLow),
                remaining => Step::to(PayloadData { remaining }),
            },
            PayloadData { remaining: 1 } => Step::to(ChecksumLow),
            PayloadData { remaining } => Step::to(PayloadData {
                remaining: remaining.wrapping_sub(1),
            }),
            ChecksumLow => Step::to(ChecksumHigh),
            ChecksumHigh => Step::replying(Ack, ACK),
            Ack => Step::replying(Status, STATUS),
            Status => Step::to(AwaitMagic0),
        }
    }

    /// Payload bytes still expected before the checksum
    pub fn remaining_payload(&self) -> u16 {
        match self {
            PrinterPhase::PayloadData { remaining } => *remaining,
            _ => 0,
        }
    }
}

/// Printer framing state for one session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrinterTracker {
    phase: PrinterPhase,
}

impl PrinterTracker {
    pub const fn new() -> Self {
        PrinterTracker {
            phase: PrinterPhase::AwaitMagic0,
        }
    }

    /// Return to waiting for the first magic byte
    pub fn reset(&mut self) {
        self.phase = PrinterPhase::AwaitMagic0;
    }

    pub fn phase(&self) -> PrinterPhase {
        self.phase
    }

    /// Consume one byte received from the link master, queueing any reply
    pub fn feed<const N: usize>(&mut self, byte: u8, queue: &mut ByteQueue<N>) {
        let step = self.phase.step(byte);
        if let Some(reply) = step.reply {
            queue.push(reply);
        }
        self.phase = step.next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrinterPhase::*;

    fn run(bytes: &[u8]) -> (PrinterPhase, Vec<u8>) {
        let mut phase = AwaitMagic0;
        let mut replies = Vec::new();
        for b in bytes {
            let step = phase.step(*b);
            replies.extend(step.reply);
            phase = step.next;
        }
        (phase, replies)
    }

    #[test]
    fn empty_packet_replies_ack_then_status() {
        let (phase, replies) = run(&[0x88, 0x33, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(phase, Ack);
        assert_eq!(replies, [ACK]);

        let (phase, replies) = run(&[0x88, 0x33, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(phase, Status);
        assert_eq!(replies, [ACK, STATUS]);

        let (phase, _) = run(&[0x88, 0x33, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(phase, AwaitMagic0);
    }

    #[test]
    fn bad_second_magic_resyncs() {
        assert_eq!(run(&[0x88, 0x00]).0, AwaitMagic0);
        // A repeated first magic byte is not treated as a fresh start.
        assert_eq!(run(&[0x88, 0x88]).0, AwaitMagic0);
        assert_eq!(run(&[0x88, 0x88, 0x33]).0, AwaitMagic0);
    }

    #[test]
    fn ignores_noise_before_magic() {
        assert_eq!(run(&[0x00, 0x33, 0xFF, 0x88]).0, AwaitMagic1);
    }

    #[test]
    fn length_is_little_endian() {
        let (phase, _) = run(&[0x88, 0x33, 0x04, 0x00, 0x80, 0x02]);
        assert_eq!(phase, PayloadData { remaining: 0x0280 });
        assert_eq!(phase.remaining_payload(), 640);
    }

    #[test]
    fn payload_consumes_exactly_length_bytes() {
        // Payload bytes that look like magic must not disturb the count.
        let mut packet = vec![0x88, 0x33, 0x04, 0x00, 0x03, 0x00];
        packet.extend([0x88, 0x33, 0x88]);
        let (phase, replies) = run(&packet);
        assert_eq!(phase, ChecksumLow);
        assert!(replies.is_empty());

        let (phase, _) = run(&packet[..packet.len() - 1]);
        assert_eq!(phase, PayloadData { remaining: 1 });
    }

    #[test]
    fn checksum_is_not_verified() {
        let (_, replies) = run(&[0x88, 0x33, 0x0F, 0x00, 0x00, 0x00, 0xDE, 0xAD, 0x00, 0x00]);
        assert_eq!(replies, [ACK, STATUS]);
    }

    #[test]
    fn tracker_queues_replies() {
        let mut queue = ByteQueue::<16>::new();
        let mut tracker = PrinterTracker::new();
        for b in [0x88, 0x33, 0x02, 0x00, 0x00, 0x00, 0x02, 0x00] {
            tracker.feed(b, &mut queue);
        }
        assert_eq!(tracker.phase(), Ack);
        assert_eq!(queue.pop(), ACK);
        assert!(queue.is_empty());

        tracker.reset();
        assert_eq!(tracker.phase(), AwaitMagic0);
    }
}
