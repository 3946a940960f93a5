use {ErrorKind, Result};
use header_block::HeaderBlock;
use stream::StreamId;
use super::{get_unsigned_int, FrameHeader};

const HEADERS_FLAG_FIN: u8 = 0x01;

pub(crate) const HEADERS_PROLOGUE_SIZE: usize = 4;

/// HEADERS: adds header pairs to an open stream. Same wire shape as
/// SYN_REPLY: a 4-byte stream-id prologue followed by a compressed header
/// block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersFrame {
    pub stream_id: StreamId,
    pub last: bool,
    pub headers: HeaderBlock,
}
impl HeadersFrame {
    pub fn new(stream_id: StreamId) -> Result<Self> {
        track_assert!(
            !stream_id.is_connection_control_stream(),
            ErrorKind::InvalidFrame
        );
        Ok(HeadersFrame {
            stream_id,
            last: false,
            headers: HeaderBlock::new(),
        })
    }

    pub(crate) fn read_from(header: &FrameHeader, bytes: &[u8]) -> Result<Self> {
        let stream_id = StreamId::new_unchecked(get_unsigned_int(bytes, 0));
        let mut frame = track!(HeadersFrame::new(stream_id))?;
        frame.last = (header.flags & HEADERS_FLAG_FIN) != 0;
        Ok(frame)
    }
}
