use std::cmp;
use std::mem;
use bytes::{Bytes, BytesMut};

use {ErrorKind, Result};
use frame::{Frame, FrameHeader};
use frame::{DataFrame, GoAwayFrame, HeadersFrame, PingFrame, RstStreamFrame, SettingsFrame,
            SynReplyFrame, SynStreamFrame, WindowUpdateFrame};
use frame::{FRAME_TYPE_DATA, FRAME_TYPE_GOAWAY, FRAME_TYPE_HEADERS, FRAME_TYPE_PING,
            FRAME_TYPE_RST_STREAM, FRAME_TYPE_SETTINGS, FRAME_TYPE_SYN_REPLY,
            FRAME_TYPE_SYN_STREAM, FRAME_TYPE_WINDOW_UPDATE};
use frame::{get_unsigned_int, DATA_FLAG_FIN, HEADERS_PROLOGUE_SIZE, SETTINGS_ENTRY_SIZE,
            SETTINGS_FLAG_CLEAR_PREVIOUSLY_PERSISTED, SPDY_HEADER_SIZE, SPDY_MAX_VERSION,
            SPDY_MIN_VERSION, SYN_REPLY_PROLOGUE_SIZE, SYN_STREAM_PROLOGUE_SIZE};
use header_block::{HeaderBlock, HeaderBlockDecoder};
use stream::StreamId;

/// The default bound on the payload size of an emitted `DataFrame`.
pub const DEFAULT_MAX_CHUNK_SIZE: u32 = 8192;

/// An incremental decoder for one direction of a SPDY connection.
///
/// The decoder consumes an arbitrarily fragmented byte stream through
/// [`decode`] and produces typed [`Frame`] events in wire order. It never
/// blocks and never over-reads: a call that cannot make progress consumes
/// nothing and returns `Ok(None)`.
///
/// Compressed header blocks are not interpreted here; they are streamed
/// into the [`HeaderBlockDecoder`] the decoder owns, and the opening
/// SYN_STREAM/SYN_REPLY/HEADERS frame is emitted once its block has fully
/// arrived (or as soon as the decompressor flags it invalid or truncated).
///
/// A decoder is pinned to a single connection and a single negotiated
/// protocol version. It is single-owner: drive it from the transport's
/// read path only. After an error it is terminal, and after
/// [`decode_last`] it must not be used again.
///
/// [`decode`]: #method.decode
/// [`decode_last`]: #method.decode_last
/// [`Frame`]: frame/enum.Frame.html
/// [`HeaderBlockDecoder`]: trait.HeaderBlockDecoder.html
#[derive(Debug)]
pub struct SpdyFrameDecoder<D: HeaderBlockDecoder> {
    spdy_version: u16,
    max_chunk_size: u32,
    header_block_decoder: D,
    state: DecoderState,
    ended: bool,
}

#[derive(Debug)]
enum DecoderState {
    ReadCommonHeader,
    ReadControlFrame {
        header: FrameHeader,
    },
    ReadSettingsFrame {
        header: FrameHeader,
        pending: Option<SettingsFrame>,
    },
    ReadHeaderBlockFrame {
        header: FrameHeader,
    },
    ReadHeaderBlock {
        header: FrameHeader,
        pending: Option<PendingFrame>,
    },
    ReadDataFrame {
        header: FrameHeader,
    },
    DiscardFrame {
        remaining: u32,
    },
    FrameError,
}
impl DecoderState {
    fn take(&mut self) -> Self {
        mem::replace(self, DecoderState::FrameError)
    }
}

/// A header-bearing frame whose compressed block is still streaming in.
#[derive(Debug)]
enum PendingFrame {
    SynStream(SynStreamFrame),
    SynReply(SynReplyFrame),
    Headers(HeadersFrame),
}
impl PendingFrame {
    fn header_block(&self) -> &HeaderBlock {
        match *self {
            PendingFrame::SynStream(ref f) => &f.headers,
            PendingFrame::SynReply(ref f) => &f.headers,
            PendingFrame::Headers(ref f) => &f.headers,
        }
    }
    fn header_block_mut(&mut self) -> &mut HeaderBlock {
        match *self {
            PendingFrame::SynStream(ref mut f) => &mut f.headers,
            PendingFrame::SynReply(ref mut f) => &mut f.headers,
            PendingFrame::Headers(ref mut f) => &mut f.headers,
        }
    }
    fn into_frame(self) -> Frame {
        match self {
            PendingFrame::SynStream(f) => Frame::SynStream(f),
            PendingFrame::SynReply(f) => Frame::SynReply(f),
            PendingFrame::Headers(f) => Frame::Headers(f),
        }
    }
}

impl<D: HeaderBlockDecoder> SpdyFrameDecoder<D> {
    pub fn new(spdy_version: u16, header_block_decoder: D) -> Result<Self> {
        track!(SpdyFrameDecoder::with_max_chunk_size(
            spdy_version,
            header_block_decoder,
            DEFAULT_MAX_CHUNK_SIZE
        ))
    }

    pub fn with_max_chunk_size(
        spdy_version: u16,
        header_block_decoder: D,
        max_chunk_size: u32,
    ) -> Result<Self> {
        track_assert!(
            SPDY_MIN_VERSION <= spdy_version && spdy_version <= SPDY_MAX_VERSION,
            ErrorKind::InvalidInput,
            "Unsupported SPDY version: {}",
            spdy_version
        );
        track_assert_ne!(max_chunk_size, 0, ErrorKind::InvalidInput);
        Ok(SpdyFrameDecoder {
            spdy_version,
            max_chunk_size,
            header_block_decoder,
            state: DecoderState::ReadCommonHeader,
            ended: false,
        })
    }

    pub fn spdy_version(&self) -> u16 {
        self.spdy_version
    }
    pub fn max_chunk_size(&self) -> u32 {
        self.max_chunk_size
    }

    /// Decodes at most one frame from the front of `buf`.
    ///
    /// A call may return a frame and may consume input; both, either, or
    /// neither. Invoke repeatedly until a call returns `Ok(None)` without
    /// consuming anything, then append more bytes to `buf`.
    ///
    /// `Err` is the decoder's out-of-band error signal: the frame grammar
    /// was violated (or the header-block decompressor failed) and the
    /// decoder is now terminal. The owner is expected to tear down the
    /// connection; further calls only drain queued input.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>> {
        let state = self.state.take();
        match self.decode_next(buf, state) {
            Ok((frame, next_state)) => {
                self.state = next_state;
                Ok(frame)
            }
            Err(e) => {
                // `take` already parked the state at `FrameError`.
                debug!("spdy frame decoding failed: {}", e);
                Err(e)
            }
        }
    }

    /// Like [`decode`], but for the final bytes of the connection: the
    /// header-block decompressor is finalized on every exit path.
    ///
    /// [`decode`]: #method.decode
    pub fn decode_last(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>> {
        let result = self.decode(buf);
        self.end_header_block_decoder();
        result
    }

    fn end_header_block_decoder(&mut self) {
        if !self.ended {
            self.ended = true;
            self.header_block_decoder.end();
        }
    }

    fn decode_next(
        &mut self,
        buf: &mut BytesMut,
        state: DecoderState,
    ) -> Result<(Option<Frame>, DecoderState)> {
        match state {
            DecoderState::ReadCommonHeader => track!(self.read_common_header(buf)),
            DecoderState::ReadControlFrame { header } => track!(self.read_control_frame(buf, header)),
            DecoderState::ReadSettingsFrame { header, pending } => {
                track!(self.read_settings_frame(buf, header, pending))
            }
            DecoderState::ReadHeaderBlockFrame { header } => {
                track!(self.read_header_block_frame(buf, header))
            }
            DecoderState::ReadHeaderBlock { header, pending } => {
                track!(self.read_header_block(buf, header, pending))
            }
            DecoderState::ReadDataFrame { header } => track!(self.read_data_frame(buf, header)),
            DecoderState::DiscardFrame { remaining } => {
                let n = cmp::min(buf.len(), remaining as usize);
                let _ = buf.split_to(n);
                let remaining = remaining - n as u32;
                let next = if remaining == 0 {
                    DecoderState::ReadCommonHeader
                } else {
                    DecoderState::DiscardFrame { remaining }
                };
                Ok((None, next))
            }
            DecoderState::FrameError => {
                // Terminal: drop whatever the transport still delivers.
                let _ = buf.split_to(buf.len());
                Ok((None, DecoderState::FrameError))
            }
        }
    }

    fn read_common_header(&mut self, buf: &mut BytesMut) -> Result<(Option<Frame>, DecoderState)> {
        if buf.len() < SPDY_HEADER_SIZE {
            return Ok((None, DecoderState::ReadCommonHeader));
        }
        let header = FrameHeader::read_from(&buf[..SPDY_HEADER_SIZE], self.spdy_version);
        let _ = buf.split_to(SPDY_HEADER_SIZE);
        trace!("decoded frame header: {:?}", header);

        // The version gate comes before the shape check.
        if header.version != self.spdy_version {
            track_panic!(
                ErrorKind::UnsupportedVersion,
                "Unsupported version: {}",
                header.version
            );
        }
        if header.frame_type == FRAME_TYPE_DATA && header.stream_id == 0 {
            track_panic!(ErrorKind::InvalidDataFrame, "Received invalid data frame");
        }
        track_assert!(
            header.is_valid(),
            ErrorKind::InvalidFrame,
            "Invalid frame header: {:?}",
            header
        );

        if header.length == 0 {
            // The frame boundary has already been reached. A data frame
            // still yields its (empty) chunk so the FIN flag is observed;
            // recognized control types cannot be this short, and unknown
            // ones produce nothing.
            if header.frame_type == FRAME_TYPE_DATA {
                let last = (header.flags & DATA_FLAG_FIN) != 0;
                let frame = track!(DataFrame::new(
                    StreamId::new_unchecked(header.stream_id),
                    last,
                    Bytes::new()
                ))?;
                return Ok((Some(Frame::Data(frame)), DecoderState::ReadCommonHeader));
            }
            return Ok((None, DecoderState::ReadCommonHeader));
        }

        let next = match header.frame_type {
            FRAME_TYPE_DATA => DecoderState::ReadDataFrame { header },
            FRAME_TYPE_SYN_STREAM | FRAME_TYPE_SYN_REPLY | FRAME_TYPE_HEADERS => {
                DecoderState::ReadHeaderBlockFrame { header }
            }
            FRAME_TYPE_SETTINGS => DecoderState::ReadSettingsFrame {
                header,
                pending: None,
            },
            FRAME_TYPE_RST_STREAM | FRAME_TYPE_PING | FRAME_TYPE_GOAWAY
            | FRAME_TYPE_WINDOW_UPDATE => DecoderState::ReadControlFrame { header },
            frame_type => {
                trace!("discarding unknown frame: type={}", frame_type);
                DecoderState::DiscardFrame {
                    remaining: header.length,
                }
            }
        };
        Ok((None, next))
    }

    fn read_control_frame(
        &mut self,
        buf: &mut BytesMut,
        header: FrameHeader,
    ) -> Result<(Option<Frame>, DecoderState)> {
        // Fixed shapes are small; wait for the whole payload.
        let frame_len = header.length as usize;
        if buf.len() < frame_len {
            return Ok((None, DecoderState::ReadControlFrame { header }));
        }
        let payload = buf.split_to(frame_len);
        let frame = match header.frame_type {
            FRAME_TYPE_RST_STREAM => Frame::RstStream(track!(RstStreamFrame::read_from(&payload))?),
            FRAME_TYPE_PING => Frame::Ping(PingFrame::read_from(&payload)),
            FRAME_TYPE_GOAWAY => Frame::GoAway(GoAwayFrame::read_from(&payload)),
            FRAME_TYPE_WINDOW_UPDATE => {
                Frame::WindowUpdate(track!(WindowUpdateFrame::read_from(&payload))?)
            }
            frame_type => unreachable!("not a fixed-shape control frame: {}", frame_type),
        };
        Ok((Some(frame), DecoderState::ReadCommonHeader))
    }

    fn read_settings_frame(
        &mut self,
        buf: &mut BytesMut,
        mut header: FrameHeader,
        pending: Option<SettingsFrame>,
    ) -> Result<(Option<Frame>, DecoderState)> {
        let mut frame = match pending {
            Some(frame) => frame,
            None => {
                // The entry area is preceded by a 32-bit entry count that
                // must agree with the declared payload length.
                if buf.len() < 4 {
                    return Ok((
                        None,
                        DecoderState::ReadSettingsFrame {
                            header,
                            pending: None,
                        },
                    ));
                }
                let num_entries = get_unsigned_int(&buf, 0);
                let _ = buf.split_to(4);
                header.length -= 4;
                track_assert!(
                    header.length % SETTINGS_ENTRY_SIZE as u32 == 0
                        && header.length / SETTINGS_ENTRY_SIZE as u32 == num_entries,
                    ErrorKind::InvalidFrame,
                    "Invalid SETTINGS frame: {} entries in {} bytes",
                    num_entries,
                    header.length
                );
                let clear = (header.flags & SETTINGS_FLAG_CLEAR_PREVIOUSLY_PERSISTED) != 0;
                SettingsFrame::new(clear)
            }
        };

        while header.length > 0 && buf.len() >= SETTINGS_ENTRY_SIZE {
            track!(frame.read_entry(&buf[..SETTINGS_ENTRY_SIZE]))?;
            let _ = buf.split_to(SETTINGS_ENTRY_SIZE);
            header.length -= SETTINGS_ENTRY_SIZE as u32;
        }
        if header.length == 0 {
            Ok((Some(Frame::Settings(frame)), DecoderState::ReadCommonHeader))
        } else {
            Ok((
                None,
                DecoderState::ReadSettingsFrame {
                    header,
                    pending: Some(frame),
                },
            ))
        }
    }

    fn read_header_block_frame(
        &mut self,
        buf: &mut BytesMut,
        mut header: FrameHeader,
    ) -> Result<(Option<Frame>, DecoderState)> {
        let prologue_size = match header.frame_type {
            FRAME_TYPE_SYN_STREAM => SYN_STREAM_PROLOGUE_SIZE,
            FRAME_TYPE_SYN_REPLY => SYN_REPLY_PROLOGUE_SIZE,
            FRAME_TYPE_HEADERS => HEADERS_PROLOGUE_SIZE,
            frame_type => unreachable!("not a header block frame: {}", frame_type),
        };
        if buf.len() < prologue_size {
            return Ok((None, DecoderState::ReadHeaderBlockFrame { header }));
        }
        let pending = {
            let prologue = &buf[..prologue_size];
            match header.frame_type {
                FRAME_TYPE_SYN_STREAM => {
                    PendingFrame::SynStream(track!(SynStreamFrame::read_from(&header, prologue))?)
                }
                FRAME_TYPE_SYN_REPLY => {
                    PendingFrame::SynReply(track!(SynReplyFrame::read_from(&header, prologue))?)
                }
                _ => PendingFrame::Headers(track!(HeadersFrame::read_from(&header, prologue))?),
            }
        };
        let _ = buf.split_to(prologue_size);
        header.length -= prologue_size as u32;

        if header.length == 0 {
            // No header block follows; the decompressor is not involved.
            return Ok((Some(pending.into_frame()), DecoderState::ReadCommonHeader));
        }
        Ok((
            None,
            DecoderState::ReadHeaderBlock {
                header,
                pending: Some(pending),
            },
        ))
    }

    fn read_header_block(
        &mut self,
        buf: &mut BytesMut,
        mut header: FrameHeader,
        mut pending: Option<PendingFrame>,
    ) -> Result<(Option<Frame>, DecoderState)> {
        let slice_len = cmp::min(buf.len(), header.length as usize);
        match pending {
            Some(ref mut frame) => {
                // Offer the readable part of the block; the decompressor
                // consumes some prefix of it and the rest is re-joined to
                // the front of the input for the next call.
                let mut sub = buf.split_to(slice_len);
                let result = self.header_block_decoder
                    .decode(&mut sub, frame.header_block_mut());
                let consumed = slice_len - sub.len();
                if !sub.is_empty() {
                    sub.unsplit(mem::replace(buf, BytesMut::new()));
                    *buf = sub;
                }
                track!(result)?;
                header.length -= consumed as u32;
            }
            None => {
                // Residue of a block that was already emitted as invalid
                // or truncated: consumed and dropped.
                let _ = buf.split_to(slice_len);
                header.length -= slice_len as u32;
            }
        }

        let done = header.length == 0;
        let flagged = pending.as_ref().map_or(false, |frame| {
            let block = frame.header_block();
            block.is_invalid() || block.is_truncated()
        });
        let frame = if flagged || done {
            pending.take().map(PendingFrame::into_frame)
        } else {
            None
        };
        if done {
            self.header_block_decoder.reset();
            Ok((frame, DecoderState::ReadCommonHeader))
        } else {
            Ok((frame, DecoderState::ReadHeaderBlock { header, pending }))
        }
    }

    fn read_data_frame(
        &mut self,
        buf: &mut BytesMut,
        mut header: FrameHeader,
    ) -> Result<(Option<Frame>, DecoderState)> {
        // Unreachable in practice: the common-header check has already
        // rejected data frames on the connection control stream.
        track_assert_ne!(
            header.stream_id,
            0,
            ErrorKind::InvalidDataFrame,
            "Received invalid data frame"
        );

        // Emit whole chunks only, so a slow peer cannot force a flood of
        // tiny sub-chunk events.
        let chunk_size = cmp::min(self.max_chunk_size, header.length) as usize;
        if buf.len() < chunk_size {
            return Ok((None, DecoderState::ReadDataFrame { header }));
        }
        let data = buf.split_to(chunk_size).freeze();
        header.length -= chunk_size as u32;
        let last = header.length == 0 && (header.flags & DATA_FLAG_FIN) != 0;
        let frame = track!(DataFrame::new(
            StreamId::new_unchecked(header.stream_id),
            last,
            data
        ))?;
        let next = if header.length == 0 {
            DecoderState::ReadCommonHeader
        } else {
            DecoderState::ReadDataFrame { header }
        };
        Ok((Some(Frame::Data(frame)), next))
    }
}
impl<D: HeaderBlockDecoder> Drop for SpdyFrameDecoder<D> {
    fn drop(&mut self) {
        self.end_header_block_decoder();
    }
}
