//! packwire-buffers - byte buffer primitives shared by the packwire codec.
//!
//! - [`Writer`]: growable big-endian writer with a flush cursor.
//! - [`Reader`]: bounds-checked big-endian reader over a borrowed slice.
//! - [`StreamBuffer`]: append-only byte buffer with a read cursor that drops
//!   its consumed prefix, for incremental decoders.

mod error;
mod reader;
mod stream_buffer;
mod writer;

pub use error::BufferError;
pub use reader::Reader;
pub use stream_buffer::StreamBuffer;
pub use writer::Writer;
