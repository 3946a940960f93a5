use {ErrorKind, Result};
use stream::StreamId;
use super::get_unsigned_int;

/// WINDOW_UPDATE: replenishes the flow-control window of a stream, or of
/// the connection as a whole when the stream id is 0 (SPDY/3.1).
///
/// ```text
///    +-+----------------------------------+
///    |1|    Version    |         9        |
///    +-+----------------------------------+
///    | Flags (8)  |         8             |
///    +------------------------------------+
///    |X|          Stream-ID (31)          |
///    +------------------------------------+
///    |X|     Delta-Window-Size (31)       |
///    +------------------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    pub stream_id: StreamId,
    pub delta_window_size: u32,
}
impl WindowUpdateFrame {
    pub fn new(stream_id: StreamId, delta_window_size: u32) -> Result<Self> {
        track_assert_ne!(delta_window_size, 0, ErrorKind::InvalidFrame);
        track_assert_eq!(delta_window_size >> 31, 0, ErrorKind::InvalidFrame);
        Ok(WindowUpdateFrame {
            stream_id,
            delta_window_size,
        })
    }

    pub(crate) fn read_from(bytes: &[u8]) -> Result<Self> {
        let stream_id = StreamId::new_unchecked(get_unsigned_int(bytes, 0));
        let delta_window_size = get_unsigned_int(bytes, 4);
        track!(WindowUpdateFrame::new(stream_id, delta_window_size))
    }
}
