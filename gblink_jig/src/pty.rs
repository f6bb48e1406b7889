use anyhow::{Context, Result};
use nix::errno::Errno;
use std::{
    io::{self, Write},
    os::unix::io::RawFd,
    path::PathBuf,
};

/// Pseudo terminal standing in for the adapter's serial port
///
/// The jig owns the master side. Host tools open the slave side by its tty path.
pub struct SerialEmulator {
    master: RawFd,
    slave: RawFd,
}

impl SerialEmulator {
    pub fn new() -> Result<Self> {
        use nix::pty::Winsize;
        use nix::sys::termios::*;

        let ptys =
            nix::pty::openpty(None::<&Winsize>, None::<&Termios>).context("allocating pty")?;

        // Binary data, no echo or line editing
        let mut termios = tcgetattr(ptys.slave).context("reading pty attributes")?;
        cfmakeraw(&mut termios);
        tcsetattr(ptys.slave, SetArg::TCSANOW, &termios).context("setting raw mode")?;

        Ok(SerialEmulator {
            master: ptys.master,
            slave: ptys.slave,
        })
    }

    pub fn ttyname(&self) -> Result<PathBuf> {
        nix::unistd::ttyname(self.slave).context("getting tty name")
    }

    pub fn master(&self) -> RawFd {
        self.master
    }
}

impl Drop for SerialEmulator {
    fn drop(&mut self) {
        let _ = nix::unistd::close(self.master);
        let _ = nix::unistd::close(self.slave);
    }
}

/// Writing half of the host side of the pty
pub struct PtyWriter(pub RawFd);

impl Write for PtyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        nix::unistd::write(self.0, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Blocking byte stream from the host side of the pty
///
/// Ends when the pty is torn down or a read fails.
pub struct PtyBytes {
    fd: RawFd,
    buf: [u8; 64],
    pos: usize,
    len: usize,
}

impl PtyBytes {
    pub fn new(fd: RawFd) -> Self {
        PtyBytes {
            fd,
            buf: [0u8; 64],
            pos: 0,
            len: 0,
        }
    }
}

impl Iterator for PtyBytes {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.pos == self.len {
            match nix::unistd::read(self.fd, &mut self.buf) {
                Ok(0) => return None,
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                }
                Err(Errno::EINTR) | Err(Errno::EAGAIN) => {}
                Err(e) => {
                    log::warn!("pty read failed: {e}");
                    return None;
                }
            }
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Some(b)
    }
}
