//! Base types for structure of FNT file.

use binrw::{BinRead, BinWrite};
use derive_more::derive::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size in bytes of the header preceding the entry records
pub const HEADER_SIZE: usize = 4;

/// Size in bytes of a single [`EntryRecord`]
pub const ENTRY_RECORD_SIZE: usize = 20;

/// Bytes appended after the last subtitle, the in-game parser expects them to close the file
pub const FILE_TERMINATOR: [u8; 4] = [0x00; 4];

/// FNT file header
///
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct FntHeader {
    /// The number of entry records (and subtitles) stored in the file
    pub entry_count: i32,
}

/// FNT entry record
///
/// The fixed size part of an entry, the subtitle itself lives in the string block
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct EntryRecord {
    /// Offset from the start of the file to the subtitle of this entry
    pub subtitle_address: i32,

    /// Key used by the dialogue branching logic, entries are sorted by it
    pub message_id_branch_sequence: i32,

    /// Raw [`EntryType`] code
    pub entry_type: i32,

    /// How long the subtitle stays visible
    pub subtitle_active_time: i32,

    /// Index into the audio container, `-1` when the entry has no audio
    pub audio_id: i32,
}

/// Identifies what triggers a subtitle to be shown
///
/// The backing integers are fixed by the game. [`EntryType::Unknown`] only appears when a table was
/// decoded with [`crate::read::DecodeOptions::preserve_unknown_entry_types`] set.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EntryType {
    /// Voice lines played in the background of a stage
    #[display("BACKGROUND_VOICE")]
    BackgroundVoice,

    /// Messages shown by menus and mission screens
    #[display("MENU_MESSAGE")]
    MenuMessage,

    /// Shown when the player touches a trigger object
    #[default]
    #[display("TRIGGER_OBJECT")]
    TriggerObject,

    /// Played while the player is idle
    #[display("IDLE_VOICE")]
    IdleVoice,

    /// Terminates a table
    #[display("FINAL_ENTRY")]
    FinalEntry,

    /// A raw code kept as it was read
    #[display("UNKNOWN({_0})")]
    Unknown(i32),
}

impl EntryType {
    /// Every known entry type, in the order editors list them
    pub const ALL: [EntryType; 5] = [
        EntryType::BackgroundVoice,
        EntryType::MenuMessage,
        EntryType::TriggerObject,
        EntryType::IdleVoice,
        EntryType::FinalEntry,
    ];

    /// Map a raw code to a known entry type
    pub fn from_raw(value: i32) -> Option<EntryType> {
        match value {
            0 => Some(EntryType::BackgroundVoice),
            100 => Some(EntryType::MenuMessage),
            201 => Some(EntryType::TriggerObject),
            300 => Some(EntryType::IdleVoice),
            999 => Some(EntryType::FinalEntry),
            _ => None,
        }
    }

    /// Map a position in [`EntryType::ALL`] to its entry type
    pub fn from_ordinal(ordinal: usize) -> Option<EntryType> {
        EntryType::ALL.get(ordinal).copied()
    }

    /// The code written to the file for this entry type
    pub const fn raw(self) -> i32 {
        match self {
            EntryType::BackgroundVoice => 0,
            EntryType::MenuMessage => 100,
            EntryType::TriggerObject => 201,
            EntryType::IdleVoice => 300,
            EntryType::FinalEntry => 999,
            EntryType::Unknown(value) => value,
        }
    }
}

impl From<EntryType> for i32 {
    fn from(value: EntryType) -> Self {
        value.raw()
    }
}
