use {ErrorKind, Result};
use header_block::HeaderBlock;
use stream::StreamId;
use super::{get_unsigned_int, FrameHeader};

const SYN_REPLY_FLAG_FIN: u8 = 0x01;

pub(crate) const SYN_REPLY_PROLOGUE_SIZE: usize = 4;

/// SYN_REPLY: accepts a stream opened by the peer. The 4-byte prologue is
/// the stream id; the rest of the payload is the compressed header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynReplyFrame {
    pub stream_id: StreamId,
    pub last: bool,
    pub headers: HeaderBlock,
}
impl SynReplyFrame {
    pub fn new(stream_id: StreamId) -> Result<Self> {
        track_assert!(
            !stream_id.is_connection_control_stream(),
            ErrorKind::InvalidFrame
        );
        Ok(SynReplyFrame {
            stream_id,
            last: false,
            headers: HeaderBlock::new(),
        })
    }

    pub(crate) fn read_from(header: &FrameHeader, bytes: &[u8]) -> Result<Self> {
        let stream_id = StreamId::new_unchecked(get_unsigned_int(bytes, 0));
        let mut frame = track!(SynReplyFrame::new(stream_id))?;
        frame.last = (header.flags & SYN_REPLY_FLAG_FIN) != 0;
        Ok(frame)
    }
}
