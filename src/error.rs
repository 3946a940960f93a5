use trackable::error::TrackableError;
use trackable::error::{ErrorKind as TrackableErrorKind, ErrorKindExt};

/// The kinds of error the decoder reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The common header carried a version other than the negotiated one.
    UnsupportedVersion,

    /// A frame violated the framing grammar (bad header shape, bad
    /// SETTINGS entry list, a field a frame constructor rejects).
    InvalidFrame,

    /// A data frame arrived on the connection control stream.
    InvalidDataFrame,

    /// The header-block decompressor failed.
    HeaderBlockDecode,

    /// Invalid use of the API (e.g. an out-of-range configuration value).
    InvalidInput,
}
impl ErrorKind {
    /// Session-level protocol errors, as opposed to per-frame framing
    /// errors. Both are fatal to the connection.
    pub fn is_protocol_error(&self) -> bool {
        match *self {
            ErrorKind::UnsupportedVersion | ErrorKind::InvalidDataFrame => true,
            _ => false,
        }
    }
}
impl TrackableErrorKind for ErrorKind {}

#[derive(Debug, Clone)]
pub struct Error(TrackableError<ErrorKind>);
derive_traits_for_trackable_error_newtype!(Error, ErrorKind);
impl From<std::string::FromUtf8Error> for Error {
    fn from(f: std::string::FromUtf8Error) -> Self {
        ErrorKind::HeaderBlockDecode.cause(f).into()
    }
}
