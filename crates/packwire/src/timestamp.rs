//! Timestamp extension (type -1).
//!
//! Three payload layouts, all big-endian:
//!
//! | size | layout |
//! |---|---|
//! | 4  | `u32` seconds |
//! | 8  | 30-bit nanoseconds, 34-bit seconds, packed in one `u64` |
//! | 12 | `u32` nanoseconds, then `i64` seconds |
//!
//! The encoder always picks the smallest layout that holds the value exactly.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::constants::TIMESTAMP_EXT_TYPE;
use crate::{MsgPackError, Value};

const NANOS_PER_SEC: u32 = 1_000_000_000;
const SECONDS_34_BIT_MAX: i64 = (1 << 34) - 1;

/// Seconds and nanoseconds since the Unix epoch, UTC.
///
/// `nanoseconds` is always below one second; negative instants carry a
/// negative `seconds` and a positive `nanoseconds` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: i64,
    nanoseconds: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanoseconds: u32) -> Result<Self, MsgPackError> {
        if nanoseconds >= NANOS_PER_SEC {
            return Err(MsgPackError::InvalidTimestamp(format!(
                "nanoseconds {nanoseconds} out of range"
            )));
        }
        Ok(Self {
            seconds,
            nanoseconds,
        })
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            seconds,
            nanoseconds: 0,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Encodes the smallest exact payload.
    pub fn to_ext_payload(&self) -> Vec<u8> {
        if (0..=SECONDS_34_BIT_MAX).contains(&self.seconds) {
            let data64 = ((self.nanoseconds as u64) << 34) | self.seconds as u64;
            if data64 >> 32 == 0 {
                (data64 as u32).to_be_bytes().to_vec()
            } else {
                data64.to_be_bytes().to_vec()
            }
        } else {
            let mut out = Vec::with_capacity(12);
            out.extend_from_slice(&self.nanoseconds.to_be_bytes());
            out.extend_from_slice(&self.seconds.to_be_bytes());
            out
        }
    }

    /// Parses a 4, 8 or 12 byte payload.
    pub fn from_ext_payload(payload: &[u8]) -> Result<Self, MsgPackError> {
        match *payload {
            [a, b, c, d] => Ok(Self::from_seconds(u32::from_be_bytes([a, b, c, d]) as i64)),
            [a, b, c, d, e, f, g, h] => {
                let data64 = u64::from_be_bytes([a, b, c, d, e, f, g, h]);
                let nanoseconds = (data64 >> 34) as u32;
                let seconds = (data64 & SECONDS_34_BIT_MAX as u64) as i64;
                Self::new(seconds, nanoseconds)
            }
            [a, b, c, d, ref rest @ ..] if rest.len() == 8 => {
                let nanoseconds = u32::from_be_bytes([a, b, c, d]);
                let mut secs = [0u8; 8];
                secs.copy_from_slice(rest);
                Self::new(i64::from_be_bytes(secs), nanoseconds)
            }
            _ => Err(MsgPackError::InvalidTimestamp(format!(
                "payload of {} bytes, expected 4, 8 or 12",
                payload.len()
            ))),
        }
    }

    /// Converts to [`SystemTime`], if the platform can represent the instant.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let nanos = Duration::from_nanos(self.nanoseconds as u64);
        if self.seconds >= 0 {
            UNIX_EPOCH
                .checked_add(Duration::from_secs(self.seconds as u64))?
                .checked_add(nanos)
        } else {
            UNIX_EPOCH
                .checked_sub(Duration::from_secs(self.seconds.unsigned_abs()))?
                .checked_add(nanos)
        }
    }

    /// RFC 3339 rendering in UTC, with nanoseconds only when non-zero.
    pub fn to_rfc3339(&self) -> String {
        let days = self.seconds.div_euclid(86_400);
        let secs_of_day = self.seconds.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);
        let (hh, mm, ss) = (secs_of_day / 3600, secs_of_day % 3600 / 60, secs_of_day % 60);
        if self.nanoseconds == 0 {
            format!("{year:04}-{month:02}-{day:02}T{hh:02}:{mm:02}:{ss:02}Z")
        } else {
            format!(
                "{year:04}-{month:02}-{day:02}T{hh:02}:{mm:02}:{ss:02}.{:09}Z",
                self.nanoseconds
            )
        }
    }
}

impl From<SystemTime> for Timestamp {
    /// Saturates at the `i64` seconds range.
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self {
                seconds: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
                nanoseconds: d.subsec_nanos(),
            },
            Err(e) => {
                let d = e.duration();
                let secs = i64::try_from(d.as_secs()).unwrap_or(i64::MAX);
                if d.subsec_nanos() == 0 {
                    Self::from_seconds(-secs)
                } else {
                    Self {
                        seconds: -secs - 1,
                        nanoseconds: NANOS_PER_SEC - d.subsec_nanos(),
                    }
                }
            }
        }
    }
}

// Howard Hinnant's days-to-civil algorithm, proleptic Gregorian calendar.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Encode hook registered for type -1.
pub fn encode_hook(value: &Value) -> Result<Vec<u8>, MsgPackError> {
    match value {
        Value::Timestamp(ts) => Ok(ts.to_ext_payload()),
        other => Err(MsgPackError::ExtHook {
            type_code: TIMESTAMP_EXT_TYPE,
            message: format!("expected a timestamp, got {}", other.kind()),
        }),
    }
}

/// Decode hook registered for type -1.
pub fn decode_hook(_type_code: i8, payload: &[u8]) -> Result<Value, MsgPackError> {
    Timestamp::from_ext_payload(payload).map(Value::Timestamp)
}
