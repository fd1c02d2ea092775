//! Append-only byte buffer for incremental decoding.

/// Accumulates chunks fed by a producer and tracks how far a consumer has
/// read.
///
/// Unlike a chunk list, the unread bytes are kept contiguous so a decoder can
/// work on a single slice. The consumed prefix is dropped by
/// [`StreamBuffer::compact`] once it is worth the copy.
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    data: Vec<u8>,
    /// Read cursor into `data`.
    x: usize,
    /// Bytes consumed over the buffer's whole life, including compacted ones.
    total_consumed: u64,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk.
    pub fn push(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Unread bytes.
    pub fn unread(&self) -> &[u8] {
        &self.data[self.x..]
    }

    /// Number of unread bytes.
    pub fn size(&self) -> usize {
        self.data.len() - self.x
    }

    /// Length of the consumed-but-retained prefix.
    pub fn consumed_prefix(&self) -> usize {
        self.x
    }

    pub fn total_consumed(&self) -> u64 {
        self.total_consumed
    }

    /// Marks `n` unread bytes as consumed. `n` is clamped to what is unread.
    pub fn advance(&mut self, n: usize) {
        let n = n.min(self.size());
        self.x += n;
        self.total_consumed += n as u64;
        if self.x == self.data.len() {
            self.data.clear();
            self.x = 0;
        }
    }

    /// Drops the consumed prefix if it has reached `threshold` bytes.
    /// Returns the number of bytes dropped.
    pub fn compact(&mut self, threshold: usize) -> usize {
        if self.x == 0 || self.x < threshold {
            return 0;
        }
        let dropped = self.x;
        self.data.drain(..dropped);
        self.x = 0;
        dropped
    }

    /// Discards everything, unread bytes included.
    pub fn clear(&mut self) {
        self.data.clear();
        self.x = 0;
    }
}
