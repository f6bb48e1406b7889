/// Capacity used by the firmware for the outgoing link queue
pub const DEFAULT_CAPACITY: usize = 1024;

/// Circular byte queue
///
/// This stages bytes that are waiting to be shifted out over the link. It is filled from the host
/// receive path and by the printer tracker, and drained by the slave engine at every byte
/// boundary.
///
/// Every mutation takes `&mut self`, so a queue touched from two interrupt levels has to live
/// behind the same lock as the session using it. The firmware keeps both in one critical section
/// mutex; each index update then happens entirely inside one critical section.
///
/// There is no overflow detection. Pushing into a full queue moves `head` past `tail` and the
/// unread bytes are lost silently.
pub struct ByteQueue<const N: usize> {
    buffer: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> ByteQueue<N> {
    /// Creates a new, empty queue
    ///
    /// This is declared const, allowing it to be used in `static` contexts.
    pub const fn new() -> Self {
        ByteQueue {
            buffer: [0u8; N],
            head: 0,
            tail: 0,
        }
    }

    /// Number of slots in the backing storage
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Checks for queue emptiness
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Appends a byte
    ///
    /// Never fails. If the queue is full the write lands on the oldest unread slot.
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.head] = byte;
        self.head = (self.head + 1) % N;
    }

    /// Removes the byte at the front of the queue
    ///
    /// Callers must check `is_empty` first. Popping an empty queue returns whatever stale byte
    /// sits in the slot and desynchronizes the indices.
    pub fn pop(&mut self) -> u8 {
        let byte = self.buffer[self.tail];
        self.tail = (self.tail + 1) % N;
        byte
    }

    /// Drops all queued bytes
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for ByteQueue<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteQueue")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}
