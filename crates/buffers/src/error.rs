use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("read of {needed} bytes past end of buffer ({remaining} remaining)")]
    OutOfBounds { needed: usize, remaining: usize },
}
