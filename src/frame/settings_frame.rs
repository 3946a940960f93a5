use std::collections::BTreeMap;
use std::collections::btree_map;

use {ErrorKind, Result};
use super::{get_signed_int, get_unsigned_medium};

pub(crate) const SETTINGS_FLAG_CLEAR_PREVIOUSLY_PERSISTED: u8 = 0x01;
pub(crate) const SETTINGS_ENTRY_SIZE: usize = 8;

bitflags! {
    struct SettingFlags: u8 {
        const FLAG_SETTINGS_PERSIST_VALUE = 0x01;
        const FLAG_SETTINGS_PERSISTED = 0x02;
    }
}

/// Well-known SETTINGS ids. Unknown ids are carried through untouched;
/// interpreting them is session business.
pub const SETTINGS_UPLOAD_BANDWIDTH: u32 = 1;
pub const SETTINGS_DOWNLOAD_BANDWIDTH: u32 = 2;
pub const SETTINGS_ROUND_TRIP_TIME: u32 = 3;
pub const SETTINGS_MAX_CONCURRENT_STREAMS: u32 = 4;
pub const SETTINGS_CURRENT_CWND: u32 = 5;
pub const SETTINGS_DOWNLOAD_RETRANS_RATE: u32 = 6;
pub const SETTINGS_INITIAL_WINDOW_SIZE: u32 = 7;
pub const SETTINGS_CLIENT_CERTIFICATE_VECTOR_SIZE: u32 = 8;

/// One SETTINGS entry: a value plus its persistence flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub value: i32,
    /// The peer asks us to remember this value across connections.
    pub persist_value: bool,
    /// The sender is replaying a value we asked it to persist.
    pub persisted: bool,
}
impl Setting {
    pub fn new(value: i32) -> Self {
        Setting {
            value,
            persist_value: false,
            persisted: false,
        }
    }
}

/// SETTINGS: communicates configuration values.
///
/// ```text
///    +-+----------------------------------+
///    |1|    Version    |         4        |
///    +-+----------------------------------+
///    | Flags (8)  |      Length (24)      |
///    +------------------------------------+
///    |       Number of entries (32)       |
///    +------------------------------------+
///    | Flags(8) |       ID (24)           |   <+
///    +------------------------------------+    |  8 bytes per entry
///    |           Value (32)               |   <+
///    +------------------------------------+
/// ```
///
/// Entry ids are unique within a frame; when a sender repeats an id only
/// the first occurrence is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFrame {
    clear_previously_persisted: bool,
    entries: BTreeMap<u32, Setting>,
}
impl SettingsFrame {
    pub fn new(clear_previously_persisted: bool) -> Self {
        SettingsFrame {
            clear_previously_persisted,
            entries: BTreeMap::new(),
        }
    }

    /// The peer asks us to drop every value it previously persisted.
    pub fn clear_previously_persisted(&self) -> bool {
        self.clear_previously_persisted
    }

    pub fn is_set(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }
    pub fn get(&self, id: u32) -> Option<Setting> {
        self.entries.get(&id).cloned()
    }
    pub fn set(&mut self, id: u32, setting: Setting) -> Result<()> {
        track_assert_ne!(id, 0, ErrorKind::InvalidFrame);
        track_assert_eq!(id >> 24, 0, ErrorKind::InvalidFrame);
        self.entries.insert(id, setting);
        Ok(())
    }
    pub fn entries(&self) -> btree_map::Iter<u32, Setting> {
        self.entries.iter()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses one 8-byte wire entry into the frame. An id of 0 is a
    /// framing error; a repeated id is silently dropped.
    pub(crate) fn read_entry(&mut self, bytes: &[u8]) -> Result<()> {
        let flags = SettingFlags::from_bits_truncate(bytes[0]);
        let id = get_unsigned_medium(bytes, 1);
        let value = get_signed_int(bytes, 4);
        track_assert_ne!(id, 0, ErrorKind::InvalidFrame);
        if self.is_set(id) {
            return Ok(());
        }
        self.entries.insert(
            id,
            Setting {
                value,
                persist_value: flags.contains(FLAG_SETTINGS_PERSIST_VALUE),
                persisted: flags.contains(FLAG_SETTINGS_PERSISTED),
            },
        );
        Ok(())
    }
}
