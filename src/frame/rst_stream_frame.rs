use {ErrorKind, Result};
use stream::StreamId;
use super::{get_signed_int, get_unsigned_int};

/// RST_STREAM: abnormally terminates a stream.
///
/// ```text
///    +-+----------------------------------+
///    |1|    Version    |         3        |
///    +-+----------------------------------+
///    | Flags (8)  |         8             |
///    +------------------------------------+
///    |X|          Stream-ID (31)          |
///    +------------------------------------+
///    |          Status code (32)          |
///    +------------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RstStreamFrame {
    pub stream_id: StreamId,
    pub status_code: i32,
}
impl RstStreamFrame {
    pub fn new(stream_id: StreamId, status_code: i32) -> Result<Self> {
        track_assert!(
            !stream_id.is_connection_control_stream(),
            ErrorKind::InvalidFrame
        );
        track_assert_ne!(status_code, 0, ErrorKind::InvalidFrame);
        Ok(RstStreamFrame {
            stream_id,
            status_code,
        })
    }

    pub(crate) fn read_from(bytes: &[u8]) -> Result<Self> {
        let stream_id = StreamId::new_unchecked(get_unsigned_int(bytes, 0));
        let status_code = get_signed_int(bytes, 4);
        track!(RstStreamFrame::new(stream_id, status_code))
    }
}
