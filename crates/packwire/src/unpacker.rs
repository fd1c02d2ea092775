//! Incremental decoding of a MessagePack byte stream.
//!
//! Bytes arrive in arbitrary chunks through [`Unpacker::feed`]; complete
//! top-level values are pulled out with [`Unpacker::next_value`] or by
//! iterating. A value split across chunks is reported as
//! [`Unpacked::NeedMoreData`] until its last byte arrives.

use packwire_buffers::StreamBuffer;
use tracing::{debug, trace, warn};

use crate::{Decoder, DecoderConfig, MsgPackError, Registry, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackerConfig {
    pub decoder: DecoderConfig,
    /// Cap on unread bytes held at once.
    pub max_buffer_size: usize,
    /// Consumed bytes are dropped from the front of the buffer once this many
    /// have accumulated.
    pub compact_threshold: usize,
}

impl Default for UnpackerConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            max_buffer_size: 100 * 1024 * 1024,
            compact_threshold: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unpacked {
    Value(Value),
    NeedMoreData,
}

#[derive(Debug)]
pub struct Unpacker {
    buffer: StreamBuffer,
    registry: Registry,
    config: UnpackerConfig,
    /// Set once the iterator has yielded an error.
    failed: bool,
}

impl Default for Unpacker {
    fn default() -> Self {
        Self::new()
    }
}

impl Unpacker {
    pub fn new() -> Self {
        Self::with_config(Registry::new(), UnpackerConfig::default())
    }

    pub fn with_config(registry: Registry, config: UnpackerConfig) -> Self {
        Self {
            buffer: StreamBuffer::new(),
            registry,
            config,
            failed: false,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &UnpackerConfig {
        &self.config
    }

    /// Appends a chunk. Fails without buffering anything if the unread bytes
    /// would exceed `max_buffer_size`.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), MsgPackError> {
        let len = self.buffer.size().saturating_add(chunk.len());
        let limit = self.config.max_buffer_size;
        if len > limit {
            warn!(len, limit, "rejecting chunk, stream buffer full");
            return Err(MsgPackError::BufferFull { len, limit });
        }
        self.buffer.push(chunk);
        Ok(())
    }

    /// Decodes the next complete value, if the buffer holds one.
    ///
    /// Errors other than running out of input leave the buffer untouched, so
    /// calling again returns the same error.
    pub fn next_value(&mut self) -> Result<Unpacked, MsgPackError> {
        let data = self.buffer.unread();
        if data.is_empty() {
            return Ok(Unpacked::NeedMoreData);
        }
        let mut decoder =
            Decoder::with_config(data, &self.registry, self.config.decoder).partial();
        match decoder.read_any() {
            Ok(value) => {
                let n = decoder.position();
                self.consume(n);
                Ok(Unpacked::Value(value))
            }
            Err(MsgPackError::UnexpectedEof) => Ok(Unpacked::NeedMoreData),
            Err(err) => {
                debug!(error = %err, offset = self.buffer.total_consumed(), "stream decode failed");
                Err(err)
            }
        }
    }

    /// Skips the next complete value without building it, returning the
    /// number of bytes skipped, or `None` if the value is not complete yet.
    pub fn skip_value(&mut self) -> Result<Option<usize>, MsgPackError> {
        let data = self.buffer.unread();
        if data.is_empty() {
            return Ok(None);
        }
        let mut decoder =
            Decoder::with_config(data, &self.registry, self.config.decoder).partial();
        match decoder.skip_any() {
            Ok(n) => {
                self.consume(n);
                Ok(Some(n))
            }
            Err(MsgPackError::UnexpectedEof) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn consume(&mut self, n: usize) {
        self.buffer.advance(n);
        let dropped = self.buffer.compact(self.config.compact_threshold);
        if dropped > 0 {
            trace!(dropped, "compacted stream buffer");
        }
    }

    /// Unread bytes held.
    pub fn buffered(&self) -> usize {
        self.buffer.size()
    }

    /// Total bytes consumed by decoded or skipped values.
    pub fn consumed(&self) -> u64 {
        self.buffer.total_consumed()
    }

    /// Drops all buffered input and clears a previous error.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.failed = false;
    }
}

/// Yields values until more data is needed. Iteration resumes after further
/// [`Unpacker::feed`] calls. After yielding an error it yields nothing more
/// until [`Unpacker::reset`].
impl Iterator for Unpacker {
    type Item = Result<Value, MsgPackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_value() {
            Ok(Unpacked::Value(value)) => Some(Ok(value)),
            Ok(Unpacked::NeedMoreData) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumed_prefix_is_compacted() {
        let mut u = Unpacker::with_config(
            Registry::new(),
            UnpackerConfig {
                compact_threshold: 2,
                ..Default::default()
            },
        );
        u.feed(&[0x01, 0x02, 0x03, 0xa2, b'h']).unwrap();
        assert_eq!(u.next_value(), Ok(Unpacked::Value(Value::Int(1))));
        assert_eq!(u.buffer.consumed_prefix(), 1);
        assert_eq!(u.next_value(), Ok(Unpacked::Value(Value::Int(2))));
        assert_eq!(u.buffer.consumed_prefix(), 0);
        assert_eq!(u.next_value(), Ok(Unpacked::Value(Value::Int(3))));
        assert_eq!(u.next_value(), Ok(Unpacked::NeedMoreData));
        assert_eq!(u.buffered(), 2);
        assert_eq!(u.consumed(), 3);
    }

    #[test]
    fn iterator_stops_after_error_until_reset() {
        let mut u = Unpacker::new();
        u.feed(&[0x01, 0xc1, 0x02]).unwrap();
        assert_eq!(u.next(), Some(Ok(Value::Int(1))));
        assert!(matches!(u.next(), Some(Err(MsgPackError::InvalidFormatByte { byte: 0xc1, .. }))));
        assert_eq!(u.next(), None);
        u.reset();
        u.feed(&[0x05]).unwrap();
        assert_eq!(u.next(), Some(Ok(Value::Int(5))));
    }

    #[test]
    fn feed_rejects_oversized_input() {
        let mut u = Unpacker::with_config(
            Registry::new(),
            UnpackerConfig {
                max_buffer_size: 4,
                ..Default::default()
            },
        );
        u.feed(&[0xa5, b'a', b'b']).unwrap();
        assert_eq!(
            u.feed(&[b'c', b'd']),
            Err(MsgPackError::BufferFull { len: 5, limit: 4 })
        );
        assert_eq!(u.buffered(), 3);
    }
}
