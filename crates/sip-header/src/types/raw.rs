use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// A read-only view of one header value inside a received buffer.
///
/// Backed by [`Bytes`], so carving a span out of a message buffer shares the
/// allocation instead of copying it, and the span keeps the buffer alive for
/// as long as it is referenced.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct RawSpan {
    bytes: Bytes,
}

impl RawSpan {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into() }
    }

    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self {
            bytes: Bytes::from_static(bytes),
        }
    }

    /// Zero-copy span of `buffer[range]`; `None` if the range is out of bounds.
    pub fn from_buffer(buffer: &Bytes, range: Range<usize>) -> Option<Self> {
        if range.start > range.end || range.end > buffer.len() {
            return None;
        }
        Some(Self {
            bytes: buffer.slice(range),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The shared handle, for callers that want to keep the span around
    /// without this wrapper.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl fmt::Debug for RawSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawSpan({:?})", self.to_string_lossy())
    }
}

impl From<Bytes> for RawSpan {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<&'static str> for RawSpan {
    fn from(s: &'static str) -> Self {
        Self::from_static(s.as_bytes())
    }
}

impl From<String> for RawSpan {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Vec<u8>> for RawSpan {
    fn from(v: Vec<u8>) -> Self {
        Self::new(v)
    }
}
