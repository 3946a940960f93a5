use bytes::BytesMut;

use Result;

/// The decompressed name/value pairs of a single header block.
///
/// A block is populated incrementally by a [`HeaderBlockDecoder`] while the
/// compressed payload of a SYN_STREAM, SYN_REPLY or HEADERS frame is being
/// consumed. Pairs are kept in reception order.
///
/// [`HeaderBlockDecoder`]: trait.HeaderBlockDecoder.html
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    entries: Vec<(String, String)>,
    invalid: bool,
    truncated: bool,
}
impl HeaderBlock {
    pub fn new() -> Self {
        HeaderBlock::default()
    }

    /// Appends a name/value pair. Ignored once the block has been flagged
    /// invalid or truncated.
    pub fn add<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        if self.invalid || self.truncated {
            return;
        }
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.0 == name)
            .map(|e| e.1.as_str())
    }
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The compressed stream or a decoded pair was malformed.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }
    pub fn set_invalid(&mut self) {
        self.invalid = true;
    }

    /// The block exceeded the decompressor's size limit and the remaining
    /// pairs were dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
    pub fn set_truncated(&mut self) {
        self.truncated = true;
    }
}

/// The capability the frame decoder expects from a SPDY header-block
/// decompressor.
///
/// Implementations are stateful: the zlib dictionary persists across the
/// header blocks of a connection, so one decompressor instance is pinned to
/// one decoder instance. The frame decoder guarantees the call pattern
/// `decode*, reset` per header block and a single final `end`.
pub trait HeaderBlockDecoder {
    /// Decompresses a prefix of `src` (possibly none, possibly all of it),
    /// appending decoded name/value pairs to `block`.
    ///
    /// Unconsumed bytes are left in `src`; the caller will offer them
    /// again together with later input. The implementation may flag the
    /// block invalid (malformed compressed data or header pair) or
    /// truncated (size limit exceeded) instead of returning an error;
    /// returning `Err` is reserved for failures that must tear down the
    /// connection.
    fn decode(&mut self, src: &mut BytesMut, block: &mut HeaderBlock) -> Result<()>;

    /// Marks the boundary between two consecutive header blocks.
    fn reset(&mut self);

    /// Releases any resources held. Called exactly once, when the owning
    /// decoder is finished.
    fn end(&mut self);
}
