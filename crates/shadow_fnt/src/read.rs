//! Types for reading FNT files
//!

use binrw::BinRead;
use bon::Builder;
use byteorder::{ByteOrder, LittleEndian};
use std::io::{Cursor, Read};
use tracing::{debug, instrument, warn};
use widestring::U16Str;

use crate::{
    error::{Error, Result},
    table::{Entry, FntTable},
    types::{EntryRecord, EntryType, FntHeader, ENTRY_RECORD_SIZE, HEADER_SIZE},
};

/// Options for how a FNT file should be decoded
#[derive(Debug, Clone, Default, Builder)]
pub struct DecodeOptions {
    /// Name of the file being decoded, kept for display only
    #[builder(into, default)]
    pub source_name: String,

    /// Path prefix removed from the source name when the table is displayed
    #[builder(into, default)]
    pub display_filter: String,

    /// Keep entry type codes outside of the known set as [`EntryType::Unknown`] instead of failing
    #[builder(default)]
    pub preserve_unknown_entry_types: bool,
}

/// Decode a FNT file held in memory.
///
/// ```
/// # fn doit() -> shadow_fnt::error::Result<()>
/// # {
/// #[rustfmt::skip]
/// let bytes = [
///     0x01, 0x00, 0x00, 0x00,
///     0x18, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0xC9, 0x00, 0x00, 0x00,
///     0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
///     0x48, 0x00, 0x69, 0x00, 0x00, 0x00,
///     0x00, 0x00, 0x00, 0x00,
/// ];
///
/// let fnt = shadow_fnt::decode(&bytes)?;
/// assert_eq!(fnt.subtitle(0)?, "Hi\0");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub fn decode(bytes: &[u8]) -> Result<FntTable> {
    decode_with(bytes, DecodeOptions::default())
}

/// Read a whole FNT file from `reader` and decode it
pub fn read<R: Read>(mut reader: R, options: DecodeOptions) -> Result<FntTable> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_with(&bytes, options)
}

/// Decode a FNT file held in memory using the given options.
///
/// Subtitles are read back to back after the entry records, each one as long as the distance
/// between its address and the next entry's. The last subtitle runs to the end of the buffer and is
/// cut at its first NUL, dropping the terminator and any junk older tools left behind.
///
/// Stored addresses are kept as they are even when they disagree with the decoded subtitles, see
/// [`FntTable::recompute_all_addresses`].
#[instrument(skip_all, err, fields(len = bytes.len(), source = %options.source_name))]
pub fn decode_with(bytes: &[u8], options: DecodeOptions) -> Result<FntTable> {
    let len = bytes.len();
    if len < HEADER_SIZE {
        return Err(Error::Truncated {
            needed: HEADER_SIZE,
            len,
        });
    }

    let mut reader = Cursor::new(bytes);
    let header = FntHeader::read(&mut reader)?;
    let count = usize::try_from(header.entry_count)
        .map_err(|_| Error::InvalidEntryCount(header.entry_count))?;

    let strings_start = count
        .checked_mul(ENTRY_RECORD_SIZE)
        .and_then(|size| size.checked_add(HEADER_SIZE))
        .unwrap_or(usize::MAX);
    if len < strings_start {
        return Err(Error::Truncated {
            needed: strings_start,
            len,
        });
    }

    let records = (0..count)
        .map(|_| EntryRecord::read(&mut reader).map_err(Error::from))
        .collect::<Result<Vec<_>>>()?;

    let mut entries = Vec::with_capacity(count);
    let mut position = strings_start;
    for (index, record) in records.iter().enumerate() {
        let entry_type =
            resolve_entry_type(index, record.entry_type, options.preserve_unknown_entry_types)?;

        let next = records.get(index + 1);
        let end_address = next.map_or(len as i64, |n| n.subtitle_address as i64);
        let length = end_address - record.subtitle_address as i64;
        if length < 0 {
            return Err(Error::NegativeLength { index, length });
        }

        let end = position as i64 + length;
        if end > len as i64 {
            return Err(Error::OutOfBounds {
                index,
                start: position,
                end,
                len,
            });
        }

        let span = &bytes[position..end as usize];
        let subtitle = read_subtitle(index, span, next.is_none())?;
        entries.push(Entry::from_record(*record, entry_type, &subtitle));

        position = end as usize;
    }

    let table = FntTable::from_decoded(entries, options.source_name, options.display_filter);
    if let Some(index) = table.first_inconsistent_address() {
        warn!(index, "subtitle addresses do not match the subtitle lengths");
    }

    debug!(entries = table.entry_count(), "decoded table");
    Ok(table)
}

fn resolve_entry_type(index: usize, value: i32, preserve_unknown: bool) -> Result<EntryType> {
    match EntryType::from_raw(value) {
        Some(entry_type) => Ok(entry_type),
        None if preserve_unknown => {
            debug!(index, value, "keeping unknown entry type");
            Ok(EntryType::Unknown(value))
        }
        None => Err(Error::UnknownEntryType { index, value }),
    }
}

fn read_subtitle(index: usize, span: &[u8], last: bool) -> Result<String> {
    if span.len() % 2 != 0 {
        warn!(index, "subtitle span has an odd length, ignoring its last byte");
    }

    let mut units = vec![0u16; span.len() / 2];
    LittleEndian::read_u16_into(&span[..units.len() * 2], &mut units);

    let mut text = units.as_slice();
    if last {
        if let Some(nul) = units.iter().position(|&unit| unit == 0) {
            if units[nul + 1..].iter().any(|&unit| unit != 0) {
                warn!(index, "discarding junk after the last subtitle");
            }
            text = &units[..nul];
        }
    }

    Ok(U16Str::from_slice(text).to_string()?)
}

impl FntTable {
    /// Decode a FNT file held in memory, see [`decode`]
    pub fn decode(bytes: &[u8]) -> Result<FntTable> {
        decode(bytes)
    }
}
