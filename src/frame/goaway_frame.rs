use stream::StreamId;
use super::{get_signed_int, get_unsigned_int};

/// GOAWAY: announces that no further streams will be accepted.
///
/// ```text
///    +-+----------------------------------+
///    |1|    Version    |         7        |
///    +-+----------------------------------+
///    | Flags (8)  |         8             |
///    +------------------------------------+
///    |X|    Last-good-stream-ID (31)      |
///    +------------------------------------+
///    |          Status code (32)          |
///    +------------------------------------+
/// ```
///
/// A last-good-stream-id of 0 means no streams were handled, and status 0
/// is a normal shutdown, so nothing here is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoAwayFrame {
    pub last_good_stream_id: StreamId,
    pub status_code: i32,
}
impl GoAwayFrame {
    pub fn new(last_good_stream_id: StreamId, status_code: i32) -> Self {
        GoAwayFrame {
            last_good_stream_id,
            status_code,
        }
    }

    pub(crate) fn read_from(bytes: &[u8]) -> Self {
        GoAwayFrame::new(
            StreamId::new_unchecked(get_unsigned_int(bytes, 0)),
            get_signed_int(bytes, 4),
        )
    }
}
