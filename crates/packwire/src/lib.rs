//! MessagePack codec: a dynamic [`Value`] tree, a one-shot encoder and
//! decoder, an incremental [`Unpacker`] for chunked streams, and an extension
//! [`Registry`] with the timestamp extension built in.
//!
//! ```
//! use packwire::{decode_one, encode, Value};
//!
//! let value = Value::Map(vec![("id".into(), 7.into())]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(bytes, [0x81, 0xa2, b'i', b'd', 0x07]);
//! assert_eq!(decode_one(&bytes).unwrap(), value);
//! ```

pub mod cli;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod ext;
pub mod json;
pub mod timestamp;
pub mod unpacker;
pub mod value;

pub use decoder::{decode, decode_one, Decoder, DecoderConfig};
pub use encoder::{encode, Encoder};
pub use error::{LimitKind, MsgPackError};
pub use ext::{DecodeHook, EncodeHook, ExtHooks, Registry};
pub use timestamp::Timestamp;
pub use unpacker::{Unpacked, Unpacker, UnpackerConfig};
pub use value::{Ext, Value};
