use std::io;
use thiserror::Error;

/// Errors raised while validating, scanning or rewriting a JPEG stream.
#[derive(Debug, Error)]
pub enum JpegError {
    /// The stream does not start with `FF D8`.
    #[error("missing SOI marker")]
    MissingSoi,

    /// The stream does not end with `FF D9`.
    #[error("missing EOI marker")]
    MissingEoi,

    /// Fewer than 4 bytes were left when reading a marker and its length.
    #[error("couldn't read next segment marker and length")]
    TruncatedSegment,

    /// A segment declared a length below the scanner's floor.
    #[error("reported segment length too small: {length}")]
    SegmentTooShort { length: u16 },

    /// The APP1 segment would not fit the 16-bit length field.
    #[error("APP1 segment is too long: {length} bytes (max 65535)")]
    App1TooLong { length: usize },

    /// Underlying read/seek failure.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl JpegError {
    /// Format violations are problems with the input bytes, not the environment.
    pub fn is_format_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingSoi | Self::MissingEoi | Self::TruncatedSegment | Self::SegmentTooShort { .. }
        )
    }
}

/// Attach a static context string to an `io::Result`.
pub(crate) trait IoContext<T> {
    fn io_context(self, context: &'static str) -> Result<T, JpegError>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context(self, context: &'static str) -> Result<T, JpegError> {
        self.map_err(|source| JpegError::Io { context, source })
    }
}
