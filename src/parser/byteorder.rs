use byteorder::{BigEndian, ByteOrder};

/// Width of one entry in the scanline length table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    /// 16-bit fields used by standard documents.
    Short,
    /// 32-bit fields used by large documents.
    Long,
}

impl LengthWidth {
    #[inline]
    #[must_use]
    pub const fn from_large(large: bool) -> Self {
        if large { Self::Long } else { Self::Short }
    }

    #[inline]
    #[must_use]
    pub const fn field_size(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Long => 4,
        }
    }

    /// Reads one big-endian length field from the front of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than [`Self::field_size`].
    // 32-bit fields fit in `usize` on every supported target.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn read(self, bytes: &[u8]) -> usize {
        match self {
            Self::Short => usize::from(BigEndian::read_u16(bytes)),
            Self::Long => BigEndian::read_u32(bytes) as usize,
        }
    }
}
