//! `Encoder`: `Value` to MessagePack bytes.
//!
//! Every length and integer uses the narrowest format class that holds it, so
//! the same value always encodes to the same bytes.

use packwire_buffers::Writer;

use crate::constants::*;
use crate::{Ext, MsgPackError, Registry, Value};

pub struct Encoder<'r> {
    pub writer: Writer,
    registry: &'r Registry,
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder<'static> {
    pub fn new() -> Self {
        Self::with_registry(Registry::standard())
    }
}

impl<'r> Encoder<'r> {
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            writer: Writer::new(),
            registry,
        }
    }

    /// Encodes one value. On error nothing is left pending in the writer.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, MsgPackError> {
        self.writer.reset();
        match self.write_any(value) {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                self.writer.reset();
                Err(err)
            }
        }
    }

    pub fn write_any(&mut self, value: &Value) -> Result<(), MsgPackError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_i64(*i),
            Value::UInt(u) => self.write_u64(*u),
            Value::F32(f) => self.write_f32(*f),
            Value::F64(f) => self.write_f64(*f),
            Value::Str(s) => self.write_str(s)?,
            Value::Bin(b) => self.write_bin(b)?,
            Value::Array(arr) => self.write_arr(arr)?,
            Value::Map(pairs) => self.write_map(pairs)?,
            Value::Ext(ext) => self.write_ext(ext)?,
            Value::Timestamp(_) => self.write_semantic_ext(TIMESTAMP_EXT_TYPE, value)?,
            Value::Tagged(code, inner) => self.write_semantic_ext(*code, inner)?,
        }
        Ok(())
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(Marker::Nil as u8);
    }

    pub fn write_bool(&mut self, b: bool) {
        let marker = if b { Marker::True } else { Marker::False };
        self.writer.u8(marker as u8);
    }

    pub fn write_u64(&mut self, num: u64) {
        let writer = &mut self.writer;
        if num <= POSITIVE_FIXINT_MAX as u64 {
            writer.u8(num as u8);
        } else if num <= u8::MAX as u64 {
            writer.u8u8(UINT8, num as u8);
        } else if num <= u16::MAX as u64 {
            writer.u8u16(UINT16, num as u16);
        } else if num <= u32::MAX as u64 {
            writer.u8u32(UINT32, num as u32);
        } else {
            writer.u8u64(UINT64, num);
        }
    }

    pub fn write_i64(&mut self, num: i64) {
        if num >= 0 {
            return self.write_u64(num as u64);
        }
        let writer = &mut self.writer;
        if num >= NEGATIVE_FIXINT_MIN {
            writer.i8(num as i8);
        } else if num >= i8::MIN as i64 {
            writer.u8(INT8);
            writer.i8(num as i8);
        } else if num >= i16::MIN as i64 {
            writer.u8(INT16);
            writer.i16(num as i16);
        } else if num >= i32::MIN as i64 {
            writer.u8(INT32);
            writer.i32(num as i32);
        } else {
            writer.u8(INT64);
            writer.i64(num);
        }
    }

    pub fn write_f32(&mut self, float: f32) {
        self.writer.u8f32(FLOAT32, float);
    }

    pub fn write_f64(&mut self, float: f64) {
        self.writer.u8f64(FLOAT64, float);
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), MsgPackError> {
        if length <= FIXSTR_MAX_LEN {
            self.writer.u8(FIXSTR | length as u8);
        } else if length <= u8::MAX as usize {
            self.writer.u8u8(STR8, length as u8);
        } else if length <= u16::MAX as usize {
            self.writer.u8u16(STR16, length as u16);
        } else {
            self.writer.u8u32(STR32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), MsgPackError> {
        self.write_str_hdr(s.len())?;
        self.writer.utf8(s);
        Ok(())
    }

    pub fn write_bin_hdr(&mut self, length: usize) -> Result<(), MsgPackError> {
        if length <= u8::MAX as usize {
            self.writer.u8u8(BIN8, length as u8);
        } else if length <= u16::MAX as usize {
            self.writer.u8u16(BIN16, length as u16);
        } else {
            self.writer.u8u32(BIN32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), MsgPackError> {
        self.write_bin_hdr(buf.len())?;
        self.writer.buf(buf);
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), MsgPackError> {
        if length <= FIXCONTAINER_MAX_LEN {
            self.writer.u8(FIXARRAY | length as u8);
        } else if length <= u16::MAX as usize {
            self.writer.u8u16(ARRAY16, length as u16);
        } else {
            self.writer.u8u32(ARRAY32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_arr(&mut self, arr: &[Value]) -> Result<(), MsgPackError> {
        self.write_arr_hdr(arr.len())?;
        for item in arr {
            self.write_any(item)?;
        }
        Ok(())
    }

    pub fn write_map_hdr(&mut self, length: usize) -> Result<(), MsgPackError> {
        if length <= FIXCONTAINER_MAX_LEN {
            self.writer.u8(FIXMAP | length as u8);
        } else if length <= u16::MAX as usize {
            self.writer.u8u16(MAP16, length as u16);
        } else {
            self.writer.u8u32(MAP32, checked_u32(length)?);
        }
        Ok(())
    }

    pub fn write_map(&mut self, pairs: &[(Value, Value)]) -> Result<(), MsgPackError> {
        self.write_map_hdr(pairs.len())?;
        for (key, val) in pairs {
            self.write_any(key)?;
            self.write_any(val)?;
        }
        Ok(())
    }

    pub fn write_ext_hdr(&mut self, type_code: i8, length: usize) -> Result<(), MsgPackError> {
        let fixext = match length {
            1 => Some(FIXEXT1),
            2 => Some(FIXEXT2),
            4 => Some(FIXEXT4),
            8 => Some(FIXEXT8),
            16 => Some(FIXEXT16),
            _ => None,
        };
        if let Some(marker) = fixext {
            self.writer.u8(marker);
        } else if length <= u8::MAX as usize {
            self.writer.u8u8(EXT8, length as u8);
        } else if length <= u16::MAX as usize {
            self.writer.u8u16(EXT16, length as u16);
        } else {
            self.writer.u8u32(EXT32, checked_u32(length)?);
        }
        self.writer.i8(type_code);
        Ok(())
    }

    /// Writes a raw ext. Codes with registered hooks are refused: their
    /// decoder would hand back the semantic value, not this payload, so those
    /// codes must be encoded through `Value::Timestamp` or `Value::Tagged`.
    pub fn write_ext(&mut self, ext: &Ext) -> Result<(), MsgPackError> {
        if self.registry.contains(ext.type_code) {
            return Err(MsgPackError::RegisteredExtension(ext.type_code));
        }
        self.write_ext_hdr(ext.type_code, ext.data.len())?;
        self.writer.buf(&ext.data);
        Ok(())
    }

    fn write_semantic_ext(&mut self, type_code: i8, value: &Value) -> Result<(), MsgPackError> {
        let payload = self.registry.encode_ext(type_code, value)?;
        self.write_ext_hdr(type_code, payload.len())?;
        self.writer.buf(&payload);
        Ok(())
    }
}

fn checked_u32(length: usize) -> Result<u32, MsgPackError> {
    u32::try_from(length).map_err(|_| MsgPackError::EncodeOverflow { len: length })
}

/// Encodes `value` with the standard registry.
pub fn encode(value: &Value) -> Result<Vec<u8>, MsgPackError> {
    Encoder::new().encode(value)
}
