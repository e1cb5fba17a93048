use std::borrow::Cow;
use std::fmt;
use std::io;
use std::ops::Range;

/// Result type used across the PackBits decoder.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type surfaced by the scanline decoder.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure while reading from the underlying stream.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The stream ended before a section could be read completely.
    #[error("truncated input while reading {section}: expected {expected} bytes")]
    Truncated { section: Section, expected: usize },

    /// A control byte implied a run outside its line's input or output bounds.
    #[error("malformed PackBits run in {section}: {details}")]
    MalformedRun {
        section: Section,
        details: Cow<'static, str>,
    },

    /// A decode task panicked; the panic was contained at the task boundary.
    #[error("decode task panicked: {details}")]
    Panicked { details: Cow<'static, str> },

    /// First failure reported by a partition decode task.
    #[error("line decode failed for {section}: {source}")]
    TaskFailed {
        section: Section,
        #[source]
        source: Box<Error>,
    },

    /// The caller supplied dimensions or buffers that cannot be honoured.
    #[error("invalid decode arguments: {details}")]
    InvalidArgument { details: Cow<'static, str> },

    /// Failed to allocate the transient decode buffers.
    #[error("allocation failed: {details}")]
    Allocation { details: Cow<'static, str> },
}

impl Error {
    /// Maps a short read to [`Error::Truncated`] and passes other I/O errors through.
    pub(crate) fn from_read(err: io::Error, section: Section, expected: usize) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated { section, expected }
        } else {
            Self::Io(err)
        }
    }

    /// Returns the innermost error, looking through task wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::TaskFailed { source, .. } = current {
            current = source;
        }
        current
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self.root_cause(), Self::Truncated { .. })
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::MalformedRun { .. } | Self::Panicked { .. }
        )
    }
}

/// Logical section of the decode used for diagnostic reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    LengthTable,
    Payload,
    Line { index: usize },
    Partition { index: usize, lines: Range<usize> },
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthTable => write!(f, "scanline length table"),
            Self::Payload => write!(f, "compressed payload"),
            Self::Line { index } => write!(f, "scanline {index}"),
            Self::Partition { index, lines } => {
                write!(f, "partition {index} (lines {}..{})", lines.start, lines.end)
            }
        }
    }
}
