use bytes::Bytes;

use {ErrorKind, Result};
use stream::StreamId;

pub(crate) const DATA_FLAG_FIN: u8 = 0x01;

/// A chunk of the payload of a data frame.
///
/// ```text
///    +-+------------------------------+
///    |C|        Stream-ID (31)        |
///    +-+------------------------------+
///    | Flags (8) |     Length (24)    |
///    +-----------+--------------------+
///    |             Data               |
///    +--------------------------------+
/// ```
///
/// A single wire frame larger than the decoder's `max_chunk_size` is
/// emitted as several `DataFrame`s; `last` is only set on the final chunk
/// of a frame whose FIN flag was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    pub stream_id: StreamId,
    pub last: bool,
    pub data: Bytes,
}
impl DataFrame {
    pub fn new(stream_id: StreamId, last: bool, data: Bytes) -> Result<Self> {
        track_assert!(
            !stream_id.is_connection_control_stream(),
            ErrorKind::InvalidDataFrame,
            "Received invalid data frame"
        );
        Ok(DataFrame {
            stream_id,
            last,
            data,
        })
    }
}
