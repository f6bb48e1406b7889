/// Trait representing the byte channel towards the host computer
///
/// Implementations block until the byte has been handed to the underlying serial port. They are
/// called from interrupt context, so the port must be provisioned fast enough for the link's bit
/// rate.
pub trait HostOutput {
    /// Send a single byte
    fn send(&mut self, byte: u8);

    /// Send all bytes of `bytes` in order
    fn send_all(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.send(*b);
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl HostOutput for Vec<u8> {
    fn send(&mut self, byte: u8) {
        self.push(byte)
    }

    fn send_all(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes)
    }
}
