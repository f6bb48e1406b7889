//! gblink is the hardware independent core of a link cable tool for handheld game consoles
//!
//! The link is a clock synchronous serial bus: one device (the master) drives the clock line and
//! both devices shift one bit per clock onto their data line, most significant bit first. A
//! firmware built on this crate attaches to that bus and either
//!
//!   * sniffs a conversation between a real master and slave, streaming every observed byte pair
//!     to a host computer, or
//!   * impersonates the slave, optionally answering the printer accessory protocol on its own.
//!
//! The crate implements the link logic only. Pin sampling and driving happen behind the
//! [`LinkPort`] trait and bytes towards the host go through [`HostOutput`]. Everything else,
//! clock setup, pin multiplexing, and the serial driver, is up to the firmware.
//!
//! A firmware boots by sending [`GREETING`] to the host and waiting for a mode command with
//! [`select_mode`]. The selected [`Mode`] is then armed into a [`Session`], which from that point
//! on is driven entirely from interrupts:
//!
//! ```ignore
//! // Main context, once
//! let mut queue = ByteQueue::<DEFAULT_CAPACITY>::new();
//! let mut session = Session::arm(mode, &mut queue);
//!
//! // Clock edge interrupt, highest priority
//! for edge in latched_edges(rose, fell, clock_high).into_iter().flatten() {
//!     session.on_clock_edge(edge, &mut port, &mut host, &mut queue);
//! }
//!
//! // Host receive interrupt, lower priority
//! session.on_host_byte(byte, &mut port, &mut queue);
//! ```
//!
//! The session and its [`ByteQueue`] are touched from both interrupt levels, so the firmware keeps
//! them behind one critical section mutex. The receive handler takes that lock once per byte,
//! which keeps the clock edge interrupt blocked for one short `on_host_byte` call at most.
//!
//! The host protocol is deliberately minimal:
//!
//! | Direction     | Bytes                                                           |
//! |---------------|-----------------------------------------------------------------|
//! | device → host | `GREETING` once at boot                                         |
//! | host → device | one mode command: `s` sniff, `b` slave, `p` printer slave       |
//! | device → host | sniff: `sin`, `sout` per observed byte; slave: each received byte |
//! | host → device | slave modes only: bytes to send over the link                   |

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod byte_queue;
pub mod engine;
pub mod host;
pub mod link;
pub mod mode;
pub mod printer;
pub mod session;
pub mod shift_register;

pub use byte_queue::{ByteQueue, DEFAULT_CAPACITY};
pub use engine::{SlaveEngine, SniffEngine, SniffedPair, FILL_BYTE};
pub use host::HostOutput;
pub use link::{latched_edges, Edge, LinkPort};
pub use mode::{select_mode, Mode, UnknownCommand, GREETING};
pub use printer::{PrinterPhase, PrinterTracker};
pub use session::Session;
