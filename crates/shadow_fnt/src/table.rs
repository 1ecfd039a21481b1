//! In-memory subtitle table and the operations that keep its addresses consistent
//!

use bon::bon;
use derive_more::derive::{Deref, IntoIterator};
use std::{
    fmt,
    hash::{Hash, Hasher},
};
use tracing::{debug, instrument, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{EntryRecord, EntryType, ENTRY_RECORD_SIZE, HEADER_SIZE};

/// Normalize subtitle text the way the game stores it.
///
/// `\r\n` becomes `\n`, embedded NULs are dropped and exactly one trailing NUL is appended.
pub fn normalize_subtitle(text: &str) -> String {
    let mut normalized = text.replace("\r\n", "\n").replace('\0', "");
    normalized.push('\0');
    normalized
}

/// A single row of a FNT table: trigger metadata and the subtitle it shows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    /// Offset from the start of the file to this entry's subtitle
    pub subtitle_address: i32,

    /// Key used by the dialogue branching logic
    pub message_id_branch_sequence: i32,

    /// What triggers this subtitle
    pub entry_type: EntryType,

    /// How long the subtitle stays visible, in game time units
    pub subtitle_active_time: i32,

    /// Index into the audio container, `-1` for none
    pub audio_id: i32,

    subtitle: String,
}

#[bon]
impl Entry {
    /// Create an entry for a new table.
    ///
    /// The subtitle is normalized, the address is only meaningful once the entry is part of a
    /// table and [`FntTable::recompute_all_addresses`] has been called.
    ///
    /// ```
    /// use shadow_fnt::{Entry, EntryType};
    ///
    /// let entry = Entry::builder()
    ///     .message_id_branch_sequence(64100)
    ///     .subtitle("This cage is protected by\r\nthose GUN soldiers.")
    ///     .build();
    ///
    /// assert_eq!(entry.entry_type, EntryType::TriggerObject);
    /// assert_eq!(entry.audio_id, -1);
    /// assert_eq!(entry.subtitle(), "This cage is protected by\nthose GUN soldiers.\0");
    /// ```
    #[builder]
    pub fn new(
        #[builder(default)] subtitle_address: i32,
        message_id_branch_sequence: i32,
        #[builder(default)] entry_type: EntryType,
        #[builder(default)] subtitle_active_time: i32,
        #[builder(default = -1)] audio_id: i32,
        #[builder(into, default)] subtitle: String,
    ) -> Self {
        Entry {
            subtitle_address,
            message_id_branch_sequence,
            entry_type,
            subtitle_active_time,
            audio_id,
            subtitle: normalize_subtitle(&subtitle),
        }
    }
}

impl Entry {
    pub(crate) fn from_record(record: EntryRecord, entry_type: EntryType, subtitle: &str) -> Self {
        Entry {
            subtitle_address: record.subtitle_address,
            message_id_branch_sequence: record.message_id_branch_sequence,
            entry_type,
            subtitle_active_time: record.subtitle_active_time,
            audio_id: record.audio_id,
            subtitle: normalize_subtitle(subtitle),
        }
    }

    pub(crate) fn to_record(&self) -> EntryRecord {
        EntryRecord {
            subtitle_address: self.subtitle_address,
            message_id_branch_sequence: self.message_id_branch_sequence,
            entry_type: self.entry_type.raw(),
            subtitle_active_time: self.subtitle_active_time,
            audio_id: self.audio_id,
        }
    }

    /// The stored subtitle, including its trailing NUL
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// The subtitle without its trailing NUL
    pub fn text(&self) -> &str {
        self.subtitle.strip_suffix('\0').unwrap_or(&self.subtitle)
    }

    /// Number of UTF-16 code units the subtitle occupies, NUL included
    pub fn subtitle_units(&self) -> usize {
        self.subtitle.encode_utf16().count()
    }

    /// Number of bytes the subtitle occupies in the string block.
    ///
    /// Addresses are 32-bit, so lengths past `i32::MAX` saturate and can not be laid out.
    pub fn subtitle_byte_len(&self) -> i32 {
        units_to_bytes(self.subtitle_units())
    }

    /// Replace the subtitle, returning how many bytes the stored string grew by
    fn replace_subtitle(&mut self, text: &str) -> i32 {
        let previous = self.subtitle_byte_len();
        self.subtitle = normalize_subtitle(text);
        self.subtitle_byte_len() - previous
    }
}

fn units_to_bytes(units: usize) -> i32 {
    units
        .checked_mul(2)
        .and_then(|bytes| i32::try_from(bytes).ok())
        .unwrap_or(i32::MAX)
}

fn shift_addresses(entries: &mut [Entry], delta: i32) {
    if delta == 0 {
        return;
    }

    for entry in entries {
        entry.subtitle_address = entry.subtitle_address.wrapping_add(delta);
    }
}

/// A decoded FNT subtitle table
///
/// Entries are kept in file order, which is also the order of their subtitles in the string block.
/// Every operation that changes a subtitle length or the number of entries shifts the stored
/// addresses so the table can be written back directly. Tables loaded from files written by broken
/// tools can be repaired with [`FntTable::recompute_all_addresses`].
///
/// ```
/// # fn doit() -> shadow_fnt::error::Result<()>
/// # {
/// use shadow_fnt::{Entry, FntTable};
///
/// let mut fnt = FntTable::from_entries(
///     "stg0100_EN.fnt",
///     "",
///     vec![
///         Entry::builder().message_id_branch_sequence(100).subtitle("Hello").build(),
///         Entry::builder().message_id_branch_sequence(300).subtitle("World").build(),
///     ],
/// );
///
/// fnt.insert_entry(200)?;
/// fnt.set_subtitle(1, "Hello again")?;
/// assert!(fnt.is_consistent());
///
/// let bytes = fnt.encode()?;
/// assert_eq!(shadow_fnt::decode(&bytes)?, fnt);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, Default, Deref, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<Entry>", into = "Vec<Entry>")
)]
pub struct FntTable {
    #[deref]
    #[into_iterator(ref)]
    entries: Vec<Entry>,
    source_name: String,
    display_filter: String,
}

impl FntTable {
    /// Create an empty table
    pub fn new(source_name: impl Into<String>, display_filter: impl Into<String>) -> FntTable {
        FntTable {
            entries: Vec::new(),
            source_name: source_name.into(),
            display_filter: display_filter.into(),
        }
    }

    /// Create a table from entries, normalizing their subtitles and laying out their addresses
    pub fn from_entries(
        source_name: impl Into<String>,
        display_filter: impl Into<String>,
        entries: Vec<Entry>,
    ) -> FntTable {
        let mut table = FntTable {
            entries,
            source_name: source_name.into(),
            display_filter: display_filter.into(),
        };
        for entry in &mut table.entries {
            let text = entry.subtitle.clone();
            entry.replace_subtitle(&text);
        }
        table.recompute_all_addresses();
        table
    }

    pub(crate) fn from_decoded(
        entries: Vec<Entry>,
        source_name: String,
        display_filter: String,
    ) -> FntTable {
        FntTable {
            entries,
            source_name,
            display_filter,
        }
    }

    /// Name of the file this table came from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Path prefix removed from [`FntTable::source_name`] when displayed
    pub fn display_filter(&self) -> &str {
        &self.display_filter
    }

    /// Number of entries in this table
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries in file order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get an entry by index
    pub fn get_entry(&self, index: usize) -> Result<&Entry> {
        let len = self.entries.len();
        self.entries
            .get(index)
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    /// Get mutable access to an entry by index.
    ///
    /// Changing [`Entry::subtitle_address`] through this leaves the table inconsistent until
    /// [`FntTable::recompute_all_addresses`] is called.
    pub fn entry_mut(&mut self, index: usize) -> Result<&mut Entry> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    /// Find the index of an entry equal to `entry`
    pub fn index_of(&self, entry: &Entry) -> Option<usize> {
        self.entries.iter().position(|e| e == entry)
    }

    /// Stored address of the subtitle of an entry
    pub fn subtitle_address(&self, index: usize) -> Result<i32> {
        Ok(self.get_entry(index)?.subtitle_address)
    }

    /// Message id branch sequence of an entry
    pub fn message_id_branch_sequence(&self, index: usize) -> Result<i32> {
        Ok(self.get_entry(index)?.message_id_branch_sequence)
    }

    /// What triggers the subtitle of an entry
    pub fn entry_type(&self, index: usize) -> Result<EntryType> {
        Ok(self.get_entry(index)?.entry_type)
    }

    /// How long the subtitle of an entry stays visible
    pub fn active_time(&self, index: usize) -> Result<i32> {
        Ok(self.get_entry(index)?.subtitle_active_time)
    }

    /// Audio clip of an entry, `-1` for none
    pub fn audio_id(&self, index: usize) -> Result<i32> {
        Ok(self.get_entry(index)?.audio_id)
    }

    /// Subtitle of an entry, including its trailing NUL
    pub fn subtitle(&self, index: usize) -> Result<&str> {
        Ok(self.get_entry(index)?.subtitle())
    }

    /// Replace the message id branch sequence of an entry, the table is not reordered
    pub fn set_message_id_branch_sequence(&mut self, index: usize, value: i32) -> Result<()> {
        self.entry_mut(index)?.message_id_branch_sequence = value;
        Ok(())
    }

    /// Replace the entry type of an entry
    pub fn set_entry_type(&mut self, index: usize, value: EntryType) -> Result<()> {
        self.entry_mut(index)?.entry_type = value;
        Ok(())
    }

    /// Set the entry type from its position in [`EntryType::ALL`], as picked from an editor list
    pub fn set_entry_type_by_ordinal(&mut self, index: usize, ordinal: usize) -> Result<()> {
        let entry_type =
            EntryType::from_ordinal(ordinal).ok_or(Error::UnknownEntryTypeOrdinal(ordinal))?;
        self.set_entry_type(index, entry_type)
    }

    /// Replace how long the subtitle of an entry stays visible
    pub fn set_active_time(&mut self, index: usize, value: i32) -> Result<()> {
        self.entry_mut(index)?.subtitle_active_time = value;
        Ok(())
    }

    /// Replace the audio clip of an entry
    pub fn set_audio_id(&mut self, index: usize, value: i32) -> Result<()> {
        self.entry_mut(index)?.audio_id = value;
        Ok(())
    }

    /// Replace the subtitle of an entry.
    ///
    /// The text is normalized and every following entry is moved by the change in length.
    /// Lengths are counted in UTF-16 code units, so characters outside the Basic Multilingual
    /// Plane take the four bytes they occupy in the file.
    #[instrument(skip(self, text), err(level = "debug"))]
    pub fn set_subtitle(&mut self, index: usize, text: &str) -> Result<()> {
        let delta = self.entry_mut(index)?.replace_subtitle(text);
        trace!(delta, "subtitle resized");

        shift_addresses(&mut self.entries[index + 1..], delta);
        Ok(())
    }

    /// Insert a blank entry before the first entry with a greater message id branch sequence.
    ///
    /// Returns the index of the new entry. Nothing changes when the key already exists or when no
    /// entry has a greater key, use [`FntTable::append_entry`] for the latter.
    #[instrument(skip(self), err(level = "debug"))]
    pub fn insert_entry(&mut self, message_id_branch_sequence: i32) -> Result<usize> {
        let successor = self
            .entries
            .iter()
            .position(|e| message_id_branch_sequence <= e.message_id_branch_sequence)
            .ok_or(Error::NoSuccessor(message_id_branch_sequence))?;

        if self.entries[successor].message_id_branch_sequence == message_id_branch_sequence {
            return Err(Error::DuplicateKey(message_id_branch_sequence));
        }

        let entry = Entry::builder()
            .subtitle_address(self.entries[successor].subtitle_address)
            .message_id_branch_sequence(message_id_branch_sequence)
            .build();
        let grown = entry.subtitle_byte_len();

        self.entries.insert(successor, entry);
        shift_addresses(&mut self.entries[successor + 1..], grown);
        shift_addresses(&mut self.entries, ENTRY_RECORD_SIZE as i32);

        debug!(index = successor, "inserted entry");
        Ok(successor)
    }

    /// Append a blank entry whose message id branch sequence is greater than every other one.
    ///
    /// Returns the index of the new entry.
    #[instrument(skip(self), err(level = "debug"))]
    pub fn append_entry(&mut self, message_id_branch_sequence: i32) -> Result<usize> {
        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| message_id_branch_sequence <= e.message_id_branch_sequence)
        {
            if existing.message_id_branch_sequence == message_id_branch_sequence {
                return Err(Error::DuplicateKey(message_id_branch_sequence));
            }
            return Err(Error::HasSuccessor {
                key: message_id_branch_sequence,
                successor: existing.message_id_branch_sequence,
            });
        }

        let address = match self.entries.last() {
            Some(last) => last
                .subtitle_address
                .wrapping_add(last.subtitle_byte_len()),
            None => self.first_subtitle_address(),
        };

        self.entries.push(
            Entry::builder()
                .subtitle_address(address)
                .message_id_branch_sequence(message_id_branch_sequence)
                .build(),
        );
        shift_addresses(&mut self.entries, ENTRY_RECORD_SIZE as i32);

        let index = self.entries.len() - 1;
        debug!(index, "appended entry");
        Ok(index)
    }

    /// Remove an entry, pulling every following subtitle back into its place.
    ///
    /// Returns the removed entry.
    #[instrument(skip(self), err(level = "debug"))]
    pub fn delete_entry(&mut self, index: usize) -> Result<Entry> {
        let removed_len = self.get_entry(index)?.subtitle_byte_len();
        let removed = self.entries.remove(index);

        shift_addresses(&mut self.entries[index..], -removed_len);
        shift_addresses(&mut self.entries, -(ENTRY_RECORD_SIZE as i32));

        debug!(index, "deleted entry");
        Ok(removed)
    }

    /// Where the first subtitle starts for the current number of entries
    pub fn first_subtitle_address(&self) -> i32 {
        (HEADER_SIZE + ENTRY_RECORD_SIZE * self.entries.len()) as i32
    }

    /// Rebuild every subtitle address from the header size, the record size and the subtitle
    /// lengths, ignoring whatever addresses are currently stored.
    #[instrument(skip(self), fields(entries = self.entries.len()))]
    pub fn recompute_all_addresses(&mut self) {
        let mut address = self.first_subtitle_address();
        for entry in &mut self.entries {
            entry.subtitle_address = address;
            address = address.wrapping_add(entry.subtitle_byte_len());
        }
    }

    /// Index of the first entry whose stored address disagrees with the layout
    pub fn first_inconsistent_address(&self) -> Option<usize> {
        let mut address = self.first_subtitle_address();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.subtitle_address != address {
                return Some(index);
            }
            address = address.wrapping_add(entry.subtitle_byte_len());
        }
        None
    }

    /// Whether every stored address matches the layout
    pub fn is_consistent(&self) -> bool {
        self.first_inconsistent_address().is_none()
    }
}

impl PartialEq for FntTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for FntTable {}

impl Hash for FntTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl fmt::Display for FntTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.display_filter.is_empty() {
            for separator in ['\\', '/'] {
                let prefix = format!("{}{}", self.display_filter, separator);
                if let Some(start) = self.source_name.find(&prefix) {
                    return f.write_str(&self.source_name[start + prefix.len()..]);
                }
            }
        }
        f.write_str(&self.source_name)
    }
}

#[cfg(feature = "serde")]
impl From<Vec<Entry>> for FntTable {
    fn from(value: Vec<Entry>) -> Self {
        FntTable::from_entries("", "", value)
    }
}

#[cfg(feature = "serde")]
impl From<FntTable> for Vec<Entry> {
    fn from(value: FntTable) -> Self {
        value.entries
    }
}
