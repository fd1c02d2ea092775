//! Binary buffer writer with auto-growing capacity.

/// A big-endian binary writer that grows automatically as needed.
///
/// Bytes between the flush position `x0` and the cursor `x` form the pending
/// output; [`Writer::flush`] copies them out and rewinds, so one writer can
/// be reused for many encodes without reallocating.
///
/// # Example
///
/// ```
/// use packwire_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0xcd);
/// writer.u16(0x0102);
/// assert_eq!(writer.flush(), [0xcd, 0x01, 0x02]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (4 KiB).
    pub fn new() -> Self {
        Self::with_alloc_size(4 * 1024)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn pending(&self) -> usize {
        self.x - self.x0
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    // Pending bytes move to the front of the new buffer.
    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Discards pending bytes written since the last flush.
    pub fn reset(&mut self) {
        self.x = self.x0;
    }

    /// Returns the pending bytes and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        // Nothing is pending once copied out, so rewind to the start.
        self.x0 = 0;
        self.x = 0;
        result
    }

    #[inline]
    fn put<const N: usize>(&mut self, bytes: [u8; N]) {
        self.ensure_capacity(N);
        self.uint8[self.x..self.x + N].copy_from_slice(&bytes);
        self.x += N;
    }

    // Fixed-width writes, all big-endian.

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.put([val]);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.put(val.to_be_bytes());
    }

    /// Writes two single bytes, e.g. a marker followed by a type byte.
    pub fn u8u8(&mut self, a: u8, b: u8) {
        self.put([a, b]);
    }

    pub fn u8u16(&mut self, u8_val: u8, u16_val: u16) {
        let b = u16_val.to_be_bytes();
        self.put([u8_val, b[0], b[1]]);
    }

    pub fn u8u32(&mut self, u8_val: u8, u32_val: u32) {
        let b = u32_val.to_be_bytes();
        self.put([u8_val, b[0], b[1], b[2], b[3]]);
    }

    pub fn u8u64(&mut self, u8_val: u8, u64_val: u64) {
        self.u8(u8_val);
        self.u64(u64_val);
    }

    pub fn u8f32(&mut self, u8_val: u8, f32_val: f32) {
        self.u8(u8_val);
        self.f32(f32_val);
    }

    pub fn u8f64(&mut self, u8_val: u8, f64_val: f64) {
        self.u8(u8_val);
        self.f64(f64_val);
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }
}
