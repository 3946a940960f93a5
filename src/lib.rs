//! A streaming decoder for the SPDY framing layer.
//!
//! Wire bytes go in through [`SpdyFrameDecoder`], typed [`frame::Frame`]
//! events come out. Header-block decompression is delegated to an external
//! [`HeaderBlockDecoder`].
//!
//! [`SpdyFrameDecoder`]: struct.SpdyFrameDecoder.html
//! [`frame::Frame`]: frame/enum.Frame.html
//! [`HeaderBlockDecoder`]: trait.HeaderBlockDecoder.html
#[macro_use]
extern crate bitflags;
extern crate byteorder;
extern crate bytes;
#[macro_use]
extern crate log;
#[macro_use]
extern crate trackable;

pub use decoder::{SpdyFrameDecoder, DEFAULT_MAX_CHUNK_SIZE};
pub use error::{Error, ErrorKind};
pub use header_block::{HeaderBlock, HeaderBlockDecoder};
pub use stream::StreamId;

pub mod frame;

mod decoder;
mod error;
mod header_block;
mod stream;

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use byteorder::{BigEndian, ByteOrder};
    use bytes::BytesMut;

    use frame::Frame;
    use super::*;

    /// Parses the uncompressed SPDY/3 name/value block layout; stands in
    /// for the zlib decompressor in tests.
    struct RawHeaderBlockDecoder {
        buf: Vec<u8>,
        remaining_pairs: Option<u32>,
    }
    impl RawHeaderBlockDecoder {
        fn new() -> Self {
            RawHeaderBlockDecoder {
                buf: Vec::new(),
                remaining_pairs: None,
            }
        }
    }
    impl HeaderBlockDecoder for RawHeaderBlockDecoder {
        fn decode(&mut self, src: &mut BytesMut, block: &mut HeaderBlock) -> Result<()> {
            self.buf.extend_from_slice(&src[..]);
            let _ = src.split_to(src.len());

            if self.remaining_pairs.is_none() {
                if self.buf.len() < 4 {
                    return Ok(());
                }
                self.remaining_pairs = Some(BigEndian::read_u32(&self.buf[..4]));
                self.buf.drain(..4);
            }
            while self.remaining_pairs.map_or(false, |n| n > 0) {
                if self.buf.len() < 4 {
                    break;
                }
                let name_len = BigEndian::read_u32(&self.buf[..4]) as usize;
                if self.buf.len() < 4 + name_len + 4 {
                    break;
                }
                let value_len =
                    BigEndian::read_u32(&self.buf[4 + name_len..4 + name_len + 4]) as usize;
                let pair_len = 4 + name_len + 4 + value_len;
                if self.buf.len() < pair_len {
                    break;
                }
                let name = String::from_utf8(self.buf[4..4 + name_len].to_vec())?;
                let value =
                    String::from_utf8(self.buf[4 + name_len + 4..pair_len].to_vec())?;
                block.add(name, value);
                self.buf.drain(..pair_len);
                self.remaining_pairs = self.remaining_pairs.map(|n| n - 1);
            }
            Ok(())
        }
        fn reset(&mut self) {
            self.buf.clear();
            self.remaining_pairs = None;
        }
        fn end(&mut self) {}
    }

    #[test]
    fn it_works() {
        let data;
        #[cfg_attr(rustfmt, rustfmt_skip)]
        {
            data = [
                // SETTINGS: max concurrent streams = 100
                0x80, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0C,
                0x00, 0x00, 0x00, 0x01,
                0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x64,
                // SYN_STREAM: stream 1, priority 2, FIN, two header pairs
                0x80, 0x03, 0x00, 0x01, 0x01, 0x00, 0x00, 0x2E,
                0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00,
                0x00, 0x00, 0x00, 0x02,
                0x00, 0x00, 0x00, 0x07,
                0x3A, 0x6D, 0x65, 0x74, 0x68, 0x6F, 0x64,
                0x00, 0x00, 0x00, 0x03,
                0x47, 0x45, 0x54,
                0x00, 0x00, 0x00, 0x05,
                0x3A, 0x70, 0x61, 0x74, 0x68,
                0x00, 0x00, 0x00, 0x01,
                0x2F,
                // DATA: stream 1, FIN, "hello"
                0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, 0x05,
                0x68, 0x65, 0x6C, 0x6C, 0x6F,
            ];
        }

        let mut decoder =
            track_try_unwrap!(SpdyFrameDecoder::new(3, RawHeaderBlockDecoder::new()));
        let mut buf = BytesMut::from(&data[..]);
        let mut frames = Vec::new();
        loop {
            let before = buf.len();
            match track_try_unwrap!(decoder.decode(&mut buf)) {
                Some(frame) => frames.push(frame),
                None => {
                    if buf.len() == before {
                        break;
                    }
                }
            }
        }
        assert!(buf.is_empty());
        assert_eq!(frames.len(), 3);

        match frames[0] {
            Frame::Settings(ref frame) => {
                assert!(!frame.clear_previously_persisted());
                assert_eq!(frame.get(4).map(|s| s.value), Some(100));
            }
            ref other => panic!("unexpected frame: {:?}", other),
        }
        match frames[1] {
            Frame::SynStream(ref frame) => {
                assert_eq!(frame.stream_id.as_u32(), 1);
                assert_eq!(frame.priority, 2);
                assert!(frame.last);
                assert!(!frame.unidirectional);
                assert_eq!(frame.headers.get(":method"), Some("GET"));
                assert_eq!(frame.headers.get(":path"), Some("/"));
                assert!(!frame.headers.is_invalid());
                assert!(!frame.headers.is_truncated());
            }
            ref other => panic!("unexpected frame: {:?}", other),
        }
        match frames[2] {
            Frame::Data(ref frame) => {
                assert_eq!(frame.stream_id.as_u32(), 1);
                assert!(frame.last);
                assert_eq!(frame.data.as_ref(), b"hello");
            }
            ref other => panic!("unexpected frame: {:?}", other),
        }
    }
}
