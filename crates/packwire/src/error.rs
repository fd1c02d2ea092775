use packwire_buffers::BufferError;
use thiserror::Error;

/// Which declared length tripped a [`DecoderConfig`](crate::DecoderConfig) limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Str,
    Bin,
    Ext,
    Array,
    Map,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LimitKind::Str => "str",
            LimitKind::Bin => "bin",
            LimitKind::Ext => "ext",
            LimitKind::Array => "array",
            LimitKind::Map => "map",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MsgPackError {
    #[error("invalid format byte 0x{byte:02x} at offset {offset}")]
    InvalidFormatByte { byte: u8, offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("declared size {declared} cannot fit in the {remaining} remaining bytes")]
    SizeExceedsInput { declared: usize, remaining: usize },
    #[error("trailing data: value ends at byte {consumed} of {total}")]
    TrailingData { consumed: usize, total: usize },
    #[error("length {len} exceeds the 32-bit format ceiling")]
    EncodeOverflow { len: usize },
    #[error("extension type {0} is outside -128..=127")]
    InvalidExtType(i64),
    #[error("invalid UTF-8 in str payload at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("no extension hooks registered for type {0}")]
    UnregisteredExtension(i8),
    #[error("raw ext payload for type {0}, which has registered hooks; encode the semantic value")]
    RegisteredExtension(i8),
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
    #[error("{kind} length {len} exceeds limit {limit}")]
    LimitExceeded {
        kind: LimitKind,
        len: usize,
        limit: usize,
    },
    #[error("stream buffer would hold {len} bytes, limit is {limit}")]
    BufferFull { len: usize, limit: usize },
    #[error("extension hook for type {type_code} failed: {message}")]
    ExtHook { type_code: i8, message: String },
}

impl MsgPackError {
    /// True when the input ended early, i.e. more bytes could turn the
    /// failure into a successful decode.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            MsgPackError::UnexpectedEof | MsgPackError::SizeExceedsInput { .. }
        )
    }
}

impl From<BufferError> for MsgPackError {
    fn from(_: BufferError) -> Self {
        MsgPackError::UnexpectedEof
    }
}
