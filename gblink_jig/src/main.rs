//! Hardware-free stand-in for the link adapter
//!
//! Exposes a pseudo terminal that behaves like the adapter's serial port and
//! plays a console on the other end of the link cable, clocking a scripted
//! byte sequence through the armed session.

mod master;
mod pty;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use gblink::{select_mode, Mode, FILL_BYTE, GREETING};
use std::{
    io::Write,
    sync::{Arc, Mutex},
    thread,
};

use master::{Device, SimMaster};
use pty::{PtyBytes, PtyWriter, SerialEmulator};

// Printer INIT packet plus the two bytes the console clocks to collect the replies
const PRINTER_INIT: &str = "88 33 01 00 00 00 01 00 00 00";

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Simulated link clock in Hz
    #[arg(long, default_value_t = 8192)]
    bit_rate: u32,

    /// Hex bytes the simulated console sends, separated by spaces
    #[arg(long, default_value = PRINTER_INIT)]
    script: String,

    /// How many times to play the script, 0 repeats forever
    #[arg(long, default_value_t = 1)]
    repeat: u32,
}

fn parse_script(script: &str) -> Result<Vec<u8>> {
    script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let digits = s.trim_start_matches("0x");
            u8::from_str_radix(digits, 16).with_context(|| format!("bad script byte `{s}`"))
        })
        .collect()
}

/// A byte the emulated printer answered with, as opposed to idle fill
fn printer_reply(mode: Mode, received: u8) -> Option<u8> {
    (mode.emulates_printer() && received != FILL_BYTE).then_some(received)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let script = parse_script(&args.script)?;
    if script.is_empty() {
        bail!("script is empty");
    }

    let serial = SerialEmulator::new()?;
    println!("{}", serial.ttyname()?.display());

    let fd = serial.master();
    PtyWriter(fd).write_all(GREETING).context("sending greeting")?;
    log::info!("waiting for mode command");

    let mut commands = PtyBytes::new(fd);
    let mode = select_mode(commands.by_ref().inspect(|b| log::debug!("command byte {b:#04x}")))
        .ok_or_else(|| anyhow!("host closed the port before choosing a mode"))?;
    log::info!("armed {mode:?}");

    let device = Arc::new(Mutex::new(Device::arm(mode)));

    if mode.drives_link() {
        let device = Arc::clone(&device);
        thread::spawn(move || {
            for byte in commands {
                let Ok(mut device) = device.lock() else {
                    break;
                };
                let Device {
                    session,
                    queue,
                    lines,
                } = &mut *device;
                session.on_host_byte(byte, lines, queue);
            }
            log::info!("host input closed");
        });
    }

    let mut console = SimMaster::new(&device, PtyWriter(fd), args.bit_rate, !mode.drives_link());
    let mut round = 0u32;
    while args.repeat == 0 || round < args.repeat {
        for &out in &script {
            let received = console.exchange(out)?;
            log::debug!("console sent {out:#04x}, received {received:#04x}");
            if let Some(reply) = printer_reply(mode, received) {
                log::info!("printer replied {reply:#04x}");
            }
        }
        round += 1;
        log::info!("script played {round} time(s)");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_default_script() {
        assert_eq!(
            parse_script(PRINTER_INIT).unwrap(),
            vec![0x88, 0x33, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn accepts_prefixes_and_commas() {
        assert_eq!(parse_script("0x12, ab,FF").unwrap(), vec![0x12, 0xAB, 0xFF]);
    }

    #[test]
    fn only_printer_answers_are_reported() {
        assert_eq!(printer_reply(Mode::SlavePrinter, 0x81), Some(0x81));
        assert_eq!(printer_reply(Mode::SlavePrinter, FILL_BYTE), None);
        assert_eq!(printer_reply(Mode::Slave, 0x81), None);
        assert_eq!(printer_reply(Mode::Sniff, 0x81), None);
    }

    #[test]
    fn rejects_bad_bytes() {
        assert!(parse_script("12 1ff").is_err());
        assert!(parse_script("zz").is_err());
    }
}
