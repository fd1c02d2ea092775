//! Logic behind the `packwire-pack` and `packwire-unpack` binaries.
//!
//! - `packwire-pack`   reads JSON documents from stdin, writes MessagePack
//! - `packwire-unpack` reads a MessagePack stream from stdin, writes JSON lines

use std::io::{Read, Write};

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{DecoderConfig, Encoder, MsgPackError, Registry, Unpacker, UnpackerConfig, Value};

const READ_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    MsgPack(#[from] MsgPackError),
    #[error("input ended inside a value ({remaining} bytes left over)")]
    TruncatedInput { remaining: usize },
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackOptions {
    /// Decode str payloads as binary.
    pub raw: bool,
    /// Pretty-print each JSON document.
    pub pretty: bool,
}

/// Parses `packwire-unpack` flags (program name excluded).
pub fn parse_unpack_args<I, S>(args: I) -> Result<UnpackOptions, CliError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = UnpackOptions::default();
    for arg in args {
        match arg.as_ref() {
            "--raw" => options.raw = true,
            "--pretty" => options.pretty = true,
            other => return Err(CliError::UnknownArgument(other.to_string())),
        }
    }
    Ok(options)
}

/// Encodes every whitespace-separated JSON document in `json` as one
/// top-level MessagePack value, concatenated.
pub fn pack_json(json: &str) -> Result<Vec<u8>, CliError> {
    let mut encoder = Encoder::new();
    let mut out = Vec::new();
    let mut count = 0usize;
    for doc in serde_json::Deserializer::from_str(json).into_iter::<serde_json::Value>() {
        let value = Value::from(doc?);
        out.extend_from_slice(&encoder.encode(&value)?);
        count += 1;
    }
    debug!(documents = count, bytes = out.len(), "packed JSON input");
    Ok(out)
}

/// Streams MessagePack values from `input` to `output` as JSON, one document
/// per line. Returns the number of values written.
pub fn unpack_stream<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    options: UnpackOptions,
) -> Result<usize, CliError> {
    let config = UnpackerConfig {
        decoder: DecoderConfig {
            raw: options.raw,
            ..DecoderConfig::default()
        },
        ..UnpackerConfig::default()
    };
    let mut unpacker = Unpacker::with_config(Registry::new(), config);
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    let mut count = 0usize;
    loop {
        let n = input.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        unpacker.feed(&chunk[..n])?;
        for value in unpacker.by_ref() {
            write_json_line(&mut output, &value?, options.pretty)?;
            count += 1;
        }
    }
    if unpacker.buffered() > 0 {
        return Err(CliError::TruncatedInput {
            remaining: unpacker.buffered(),
        });
    }
    output.flush()?;
    debug!(values = count, bytes = unpacker.consumed(), "unpacked stream");
    Ok(count)
}

/// In-memory variant of [`unpack_stream`].
pub fn unpack_bytes(bytes: &[u8], options: UnpackOptions) -> Result<String, CliError> {
    let mut out = Vec::new();
    unpack_stream(bytes, &mut out, options)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn write_json_line<W: Write>(output: &mut W, value: &Value, pretty: bool) -> Result<(), CliError> {
    let json = value.to_json();
    if pretty {
        serde_json::to_writer_pretty(&mut *output, &json)?;
    } else {
        serde_json::to_writer(&mut *output, &json)?;
    }
    output.write_all(b"\n")?;
    Ok(())
}

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_then_unpack_documents() {
        let bytes = pack_json(r#"{"a":1} [true,null] "x""#).unwrap();
        let out = unpack_bytes(&bytes, UnpackOptions::default()).unwrap();
        assert_eq!(out, "{\"a\":1}\n[true,null]\n\"x\"\n");
    }

    #[test]
    fn raw_mode_turns_strings_into_data_uris() {
        let out = unpack_bytes(&[0xa2, b'h', b'i'], UnpackOptions { raw: true, pretty: false }).unwrap();
        assert_eq!(out, "\"data:application/octet-stream;base64,aGk=\"\n");
    }

    #[test]
    fn truncated_input_is_reported() {
        let err = unpack_bytes(&[0x01, 0x92, 0x01], UnpackOptions::default()).unwrap_err();
        assert!(matches!(err, CliError::TruncatedInput { remaining: 2 }));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(pack_json("{"), Err(CliError::Json(_))));
    }

    #[test]
    fn args() {
        assert_eq!(
            parse_unpack_args(["--raw", "--pretty"]).unwrap(),
            UnpackOptions { raw: true, pretty: true }
        );
        assert!(matches!(
            parse_unpack_args(["--cbor"]),
            Err(CliError::UnknownArgument(a)) if a == "--cbor"
        ));
    }
}
