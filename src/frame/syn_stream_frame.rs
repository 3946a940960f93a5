use {ErrorKind, Result};
use header_block::HeaderBlock;
use stream::StreamId;
use super::{get_unsigned_int, FrameHeader};

bitflags! {
    struct SynStreamFlags: u8 {
        const SYN_STREAM_FLAG_FIN = 0x01;
        const SYN_STREAM_FLAG_UNIDIRECTIONAL = 0x02;
    }
}

pub(crate) const SYN_STREAM_PROLOGUE_SIZE: usize = 10;

/// SYN_STREAM: opens a stream.
///
/// ```text
///    +-+----------------------------------+
///    |1|    Version    |         1        |
///    +-+----------------------------------+
///    |  Flags (8)  |     Length (24)      |
///    +------------------------------------+
///    |X|          Stream-ID (31)          |
///    +------------------------------------+
///    |X| Associated-To-Stream-ID (31)     |
///    +------------------------------------+
///    | Pri|Unused | Slot |                |
///    +-------------------+                |
///    | Number of Name/Value pairs (int32) |   <+
///    +------------------------------------+    |
///    |     Length of name (int32)         |    | This section is the
///    +------------------------------------+    | compressed header block;
///    |           Name (string)            |    | it is handed to the
///    +------------------------------------+    | header-block decompressor
///    |     Length of value  (int32)       |    | and never parsed here.
///    +------------------------------------+    |
///    |          Value   (string)          |   <+
///    +------------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynStreamFrame {
    pub stream_id: StreamId,
    pub associated_to_stream_id: StreamId,
    /// Three-bit priority, 0 (highest) through 7 (lowest).
    pub priority: u8,
    pub last: bool,
    pub unidirectional: bool,
    pub headers: HeaderBlock,
}
impl SynStreamFrame {
    pub fn new(
        stream_id: StreamId,
        associated_to_stream_id: StreamId,
        priority: u8,
    ) -> Result<Self> {
        track_assert!(
            !stream_id.is_connection_control_stream(),
            ErrorKind::InvalidFrame
        );
        track_assert!(priority <= 7, ErrorKind::InvalidFrame);
        Ok(SynStreamFrame {
            stream_id,
            associated_to_stream_id,
            priority,
            last: false,
            unidirectional: false,
            headers: HeaderBlock::new(),
        })
    }

    /// Parses the fixed prologue; the compressed header block that
    /// follows it on the wire is streamed separately.
    pub(crate) fn read_from(header: &FrameHeader, bytes: &[u8]) -> Result<Self> {
        let flags = SynStreamFlags::from_bits_truncate(header.flags);
        let stream_id = StreamId::new_unchecked(get_unsigned_int(bytes, 0));
        let associated_to_stream_id = StreamId::new_unchecked(get_unsigned_int(bytes, 4));
        let priority = (bytes[8] >> 5) & 0x07;
        let mut frame = track!(SynStreamFrame::new(
            stream_id,
            associated_to_stream_id,
            priority
        ))?;
        frame.last = flags.contains(SYN_STREAM_FLAG_FIN);
        frame.unidirectional = flags.contains(SYN_STREAM_FLAG_UNIDIRECTIONAL);
        Ok(frame)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prologue() {
        let header = FrameHeader {
            version: 3,
            frame_type: super::super::FRAME_TYPE_SYN_STREAM,
            flags: 0x03,
            length: 10,
            stream_id: 0,
        };
        let bytes = [
            0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0xE0, 0x00
        ];
        let frame = track_try_unwrap!(SynStreamFrame::read_from(&header, &bytes));
        assert_eq!(frame.stream_id.as_u32(), 3);
        assert_eq!(frame.associated_to_stream_id.as_u32(), 0);
        assert_eq!(frame.priority, 7);
        assert!(frame.last);
        assert!(frame.unidirectional);
        assert!(frame.headers.is_empty());
    }

    #[test]
    fn rejects_stream_id_zero() {
        let header = FrameHeader {
            version: 3,
            frame_type: super::super::FRAME_TYPE_SYN_STREAM,
            flags: 0,
            length: 10,
            stream_id: 0,
        };
        let bytes = [0; 10];
        assert!(SynStreamFrame::read_from(&header, &bytes).is_err());
    }
}
