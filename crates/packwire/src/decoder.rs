//! `Decoder`: MessagePack bytes to `Value`.
//!
//! Every declared length is validated against the bytes that remain before
//! anything is sliced or allocated, so hostile headers cannot trigger large
//! allocations.

use packwire_buffers::Reader;

use crate::constants::Format;
use crate::{Ext, LimitKind, MsgPackError, Registry, Value};

/// Decoding limits and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Decode the str family as `Value::Bin`, skipping UTF-8 validation.
    pub raw: bool,
    /// Maximum container nesting.
    pub max_depth: usize,
    pub max_str_len: usize,
    pub max_bin_len: usize,
    pub max_ext_len: usize,
    pub max_array_len: usize,
    pub max_map_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            raw: false,
            max_depth: 512,
            max_str_len: u32::MAX as usize,
            max_bin_len: u32::MAX as usize,
            max_ext_len: u32::MAX as usize,
            max_array_len: u32::MAX as usize,
            max_map_len: u32::MAX as usize,
        }
    }
}

pub struct Decoder<'a, 'r> {
    reader: Reader<'a>,
    registry: &'r Registry,
    config: DecoderConfig,
    /// Input may be a prefix of a longer stream.
    partial: bool,
    depth: usize,
}

impl<'a> Decoder<'a, 'static> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, Registry::standard(), DecoderConfig::default())
    }
}

impl<'a, 'r> Decoder<'a, 'r> {
    pub fn with_config(data: &'a [u8], registry: &'r Registry, config: DecoderConfig) -> Self {
        Self {
            reader: Reader::new(data),
            registry,
            config,
            partial: false,
            depth: 0,
        }
    }

    /// Treats the input as a stream prefix: a container count that cannot
    /// fit yet is reported as `UnexpectedEof` instead of `SizeExceedsInput`.
    pub(crate) fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.reader.x
    }

    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Reads exactly one value spanning the whole input.
    pub fn read_to_end(&mut self) -> Result<Value, MsgPackError> {
        let value = self.read_any()?;
        if self.remaining() > 0 {
            return Err(MsgPackError::TrailingData {
                consumed: self.position(),
                total: self.position() + self.remaining(),
            });
        }
        Ok(value)
    }

    pub fn read_any(&mut self) -> Result<Value, MsgPackError> {
        let offset = self.reader.x;
        let byte = self.reader.u8()?;
        let value = match Format::classify(byte) {
            Format::PositiveFixint(n) => Value::Int(n as i64),
            Format::NegativeFixint(n) => Value::Int(n as i64),
            Format::FixMap(n) => return self.read_map(n),
            Format::FixArray(n) => return self.read_arr(n),
            Format::FixStr(n) => return self.read_str(n),
            Format::Nil => Value::Nil,
            Format::NeverUsed => return Err(MsgPackError::InvalidFormatByte { byte, offset }),
            Format::False => Value::Bool(false),
            Format::True => Value::Bool(true),
            Format::Bin8 => {
                let n = self.reader.u8()? as usize;
                return self.read_bin(n);
            }
            Format::Bin16 => {
                let n = self.reader.u16()? as usize;
                return self.read_bin(n);
            }
            Format::Bin32 => {
                let n = self.reader.u32()? as usize;
                return self.read_bin(n);
            }
            Format::Ext8 => {
                let n = self.reader.u8()? as usize;
                return self.read_ext(n);
            }
            Format::Ext16 => {
                let n = self.reader.u16()? as usize;
                return self.read_ext(n);
            }
            Format::Ext32 => {
                let n = self.reader.u32()? as usize;
                return self.read_ext(n);
            }
            Format::FixExt(n) => return self.read_ext(n),
            Format::Float32 => Value::F32(self.reader.f32()?),
            Format::Float64 => Value::F64(self.reader.f64()?),
            Format::Uint8 => Value::UInt(self.reader.u8()? as u64),
            Format::Uint16 => Value::UInt(self.reader.u16()? as u64),
            Format::Uint32 => Value::UInt(self.reader.u32()? as u64),
            Format::Uint64 => Value::UInt(self.reader.u64()?),
            Format::Int8 => Value::Int(self.reader.i8()? as i64),
            Format::Int16 => Value::Int(self.reader.i16()? as i64),
            Format::Int32 => Value::Int(self.reader.i32()? as i64),
            Format::Int64 => Value::Int(self.reader.i64()?),
            Format::Str8 => {
                let n = self.reader.u8()? as usize;
                return self.read_str(n);
            }
            Format::Str16 => {
                let n = self.reader.u16()? as usize;
                return self.read_str(n);
            }
            Format::Str32 => {
                let n = self.reader.u32()? as usize;
                return self.read_str(n);
            }
            Format::Array16 => {
                let n = self.reader.u16()? as usize;
                return self.read_arr(n);
            }
            Format::Array32 => {
                let n = self.reader.u32()? as usize;
                return self.read_arr(n);
            }
            Format::Map16 => {
                let n = self.reader.u16()? as usize;
                return self.read_map(n);
            }
            Format::Map32 => {
                let n = self.reader.u32()? as usize;
                return self.read_map(n);
            }
        };
        Ok(value)
    }

    fn read_str(&mut self, size: usize) -> Result<Value, MsgPackError> {
        self.check_limit(LimitKind::Str, size, self.config.max_str_len)?;
        let start = self.reader.x;
        let bytes = self.reader.buf(size)?;
        if self.config.raw {
            return Ok(Value::Bin(bytes.to_vec()));
        }
        let s = std::str::from_utf8(bytes).map_err(|e| MsgPackError::InvalidUtf8 {
            offset: start + e.valid_up_to(),
        })?;
        Ok(Value::Str(s.to_owned()))
    }

    fn read_bin(&mut self, size: usize) -> Result<Value, MsgPackError> {
        self.check_limit(LimitKind::Bin, size, self.config.max_bin_len)?;
        Ok(Value::Bin(self.reader.buf(size)?.to_vec()))
    }

    fn read_ext(&mut self, size: usize) -> Result<Value, MsgPackError> {
        self.check_limit(LimitKind::Ext, size, self.config.max_ext_len)?;
        let type_code = self.reader.i8()?;
        let data = self.reader.buf(size)?;
        match self.registry.decode_ext(type_code, data) {
            Some(result) => result,
            None => Ok(Value::Ext(Ext::new(type_code, data))),
        }
    }

    fn read_arr(&mut self, size: usize) -> Result<Value, MsgPackError> {
        self.check_limit(LimitKind::Array, size, self.config.max_array_len)?;
        self.check_count(size, 1)?;
        self.nested(|d| {
            let mut items = Vec::with_capacity(size);
            for _ in 0..size {
                items.push(d.read_any()?);
            }
            Ok(Value::Array(items))
        })
    }

    fn read_map(&mut self, size: usize) -> Result<Value, MsgPackError> {
        self.check_limit(LimitKind::Map, size, self.config.max_map_len)?;
        self.check_count(size, 2)?;
        self.nested(|d| {
            let mut pairs = Vec::with_capacity(size);
            for _ in 0..size {
                let key = d.read_any()?;
                let val = d.read_any()?;
                pairs.push((key, val));
            }
            Ok(Value::Map(pairs))
        })
    }

    /// Returns the number of bytes the next value spans and moves past it,
    /// without building the value.
    pub fn skip_any(&mut self) -> Result<usize, MsgPackError> {
        let start = self.reader.x;
        self.skip_value()?;
        Ok(self.reader.x - start)
    }

    fn skip_value(&mut self) -> Result<(), MsgPackError> {
        let offset = self.reader.x;
        let byte = self.reader.u8()?;
        match Format::classify(byte) {
            Format::PositiveFixint(_)
            | Format::NegativeFixint(_)
            | Format::Nil
            | Format::False
            | Format::True => Ok(()),
            Format::NeverUsed => Err(MsgPackError::InvalidFormatByte { byte, offset }),
            Format::FixMap(n) => self.skip_map(n),
            Format::FixArray(n) => self.skip_arr(n),
            Format::FixStr(n) => self.skip(n),
            Format::Uint8 | Format::Int8 => self.skip(1),
            Format::Uint16 | Format::Int16 => self.skip(2),
            Format::Float32 | Format::Uint32 | Format::Int32 => self.skip(4),
            Format::Float64 | Format::Uint64 | Format::Int64 => self.skip(8),
            Format::Bin8 | Format::Str8 => {
                let n = self.reader.u8()? as usize;
                self.skip(n)
            }
            Format::Bin16 | Format::Str16 => {
                let n = self.reader.u16()? as usize;
                self.skip(n)
            }
            Format::Bin32 | Format::Str32 => {
                let n = self.reader.u32()? as usize;
                self.skip(n)
            }
            Format::FixExt(n) => self.skip(n.saturating_add(1)),
            Format::Ext8 => {
                let n = self.reader.u8()? as usize;
                self.skip(n.saturating_add(1))
            }
            Format::Ext16 => {
                let n = self.reader.u16()? as usize;
                self.skip(n.saturating_add(1))
            }
            Format::Ext32 => {
                let n = self.reader.u32()? as usize;
                self.skip(n.saturating_add(1))
            }
            Format::Array16 => {
                let n = self.reader.u16()? as usize;
                self.skip_arr(n)
            }
            Format::Array32 => {
                let n = self.reader.u32()? as usize;
                self.skip_arr(n)
            }
            Format::Map16 => {
                let n = self.reader.u16()? as usize;
                self.skip_map(n)
            }
            Format::Map32 => {
                let n = self.reader.u32()? as usize;
                self.skip_map(n)
            }
        }
    }

    fn skip_arr(&mut self, size: usize) -> Result<(), MsgPackError> {
        self.check_count(size, 1)?;
        self.nested(|d| (0..size).try_for_each(|_| d.skip_value()))
    }

    fn skip_map(&mut self, size: usize) -> Result<(), MsgPackError> {
        self.check_count(size, 2)?;
        self.nested(|d| {
            (0..size).try_for_each(|_| {
                d.skip_value()?;
                d.skip_value()
            })
        })
    }

    fn skip(&mut self, n: usize) -> Result<(), MsgPackError> {
        Ok(self.reader.skip(n)?)
    }

    fn check_limit(&self, kind: LimitKind, len: usize, limit: usize) -> Result<(), MsgPackError> {
        if len > limit {
            return Err(MsgPackError::LimitExceeded { kind, len, limit });
        }
        Ok(())
    }

    /// Every element needs at least `min_bytes` bytes, so a count the input
    /// cannot hold is rejected before allocating for it.
    fn check_count(&self, count: usize, min_bytes: usize) -> Result<(), MsgPackError> {
        let remaining = self.reader.remaining();
        if count.saturating_mul(min_bytes) <= remaining {
            return Ok(());
        }
        if self.partial {
            Err(MsgPackError::UnexpectedEof)
        } else {
            Err(MsgPackError::SizeExceedsInput {
                declared: count,
                remaining,
            })
        }
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, MsgPackError>,
    ) -> Result<T, MsgPackError> {
        if self.depth >= self.config.max_depth {
            return Err(MsgPackError::DepthLimitExceeded(self.config.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Decodes the first value in `bytes`, returning it with the number of bytes
/// it spans. Bytes after it are left alone.
pub fn decode(bytes: &[u8]) -> Result<(Value, usize), MsgPackError> {
    let mut decoder = Decoder::new(bytes);
    let value = decoder.read_any()?;
    Ok((value, decoder.position()))
}

/// Decodes a buffer holding exactly one value.
///
/// The whole input is known up front, so a container whose element count
/// cannot fit in the remaining bytes fails with `SizeExceedsInput` rather than
/// `UnexpectedEof`: `[0x92, 0x01]` (a two-element array with one element
/// present) is `SizeExceedsInput { declared: 2, remaining: 1 }`. Check
/// [`MsgPackError::is_incomplete`] to treat both as truncation.
pub fn decode_one(bytes: &[u8]) -> Result<Value, MsgPackError> {
    Decoder::new(bytes).read_to_end()
}
