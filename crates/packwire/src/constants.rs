//! MessagePack format bytes and lead-byte classification.

pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;
pub const FIXMAP: u8 = 0x80;
pub const FIXARRAY: u8 = 0x90;
pub const FIXSTR: u8 = 0xa0;
pub const NIL: u8 = 0xc0;
pub const NEVER_USED: u8 = 0xc1;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;
pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;
pub const NEGATIVE_FIXINT: u8 = 0xe0;

/// Largest length a fixstr header can carry.
pub const FIXSTR_MAX_LEN: usize = 0x1f;
/// Largest length a fixarray/fixmap header can carry.
pub const FIXCONTAINER_MAX_LEN: usize = 0x0f;
/// Smallest value a negative fixint can carry.
pub const NEGATIVE_FIXINT_MIN: i64 = -32;

/// Extension type code reserved for timestamps.
pub const TIMESTAMP_EXT_TYPE: i8 = -1;

/// One-byte MessagePack markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Marker {
    Nil = NIL,
    False = FALSE,
    True = TRUE,
}

/// What a lead byte announces.
///
/// Fixed-size families carry their embedded length or value; the other
/// variants still need their length field read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    PositiveFixint(u8),
    FixMap(usize),
    FixArray(usize),
    FixStr(usize),
    Nil,
    NeverUsed,
    False,
    True,
    Bin8,
    Bin16,
    Bin32,
    Ext8,
    Ext16,
    Ext32,
    Float32,
    Float64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    /// fixext1..fixext16, carrying the payload size.
    FixExt(usize),
    Str8,
    Str16,
    Str32,
    Array16,
    Array32,
    Map16,
    Map32,
    NegativeFixint(i8),
}

impl Format {
    /// Classifies a lead byte. Every byte maps to exactly one format.
    pub fn classify(byte: u8) -> Format {
        match byte {
            0x00..=POSITIVE_FIXINT_MAX => Format::PositiveFixint(byte),
            0x80..=0x8f => Format::FixMap((byte & 0x0f) as usize),
            0x90..=0x9f => Format::FixArray((byte & 0x0f) as usize),
            0xa0..=0xbf => Format::FixStr((byte & 0x1f) as usize),
            NIL => Format::Nil,
            NEVER_USED => Format::NeverUsed,
            FALSE => Format::False,
            TRUE => Format::True,
            BIN8 => Format::Bin8,
            BIN16 => Format::Bin16,
            BIN32 => Format::Bin32,
            EXT8 => Format::Ext8,
            EXT16 => Format::Ext16,
            EXT32 => Format::Ext32,
            FLOAT32 => Format::Float32,
            FLOAT64 => Format::Float64,
            UINT8 => Format::Uint8,
            UINT16 => Format::Uint16,
            UINT32 => Format::Uint32,
            UINT64 => Format::Uint64,
            INT8 => Format::Int8,
            INT16 => Format::Int16,
            INT32 => Format::Int32,
            INT64 => Format::Int64,
            FIXEXT1 => Format::FixExt(1),
            FIXEXT2 => Format::FixExt(2),
            FIXEXT4 => Format::FixExt(4),
            FIXEXT8 => Format::FixExt(8),
            FIXEXT16 => Format::FixExt(16),
            STR8 => Format::Str8,
            STR16 => Format::Str16,
            STR32 => Format::Str32,
            ARRAY16 => Format::Array16,
            ARRAY32 => Format::Array32,
            MAP16 => Format::Map16,
            MAP32 => Format::Map32,
            NEGATIVE_FIXINT..=0xff => Format::NegativeFixint(byte as i8),
        }
    }
}
