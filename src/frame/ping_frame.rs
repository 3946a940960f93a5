use super::get_signed_int;

/// PING: connection liveness probe. The id is echoed back bit-exactly, so
/// it is kept as the raw signed 32-bit wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingFrame {
    pub id: i32,
}
impl PingFrame {
    pub fn new(id: i32) -> Self {
        PingFrame { id }
    }

    pub(crate) fn read_from(bytes: &[u8]) -> Self {
        PingFrame::new(get_signed_int(bytes, 0))
    }
}
