//! Types for writing FNT files
//!

use binrw::BinWrite;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Seek, Write};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::table::FntTable;
use crate::types::{FntHeader, ENTRY_RECORD_SIZE, FILE_TERMINATOR, HEADER_SIZE};

fn entry_count_field(count: usize) -> Result<i32> {
    i32::try_from(count).map_err(|_| Error::TooManyEntries(count))
}

/// FNT file generator
///
/// Entries are written with the addresses they currently hold. Call
/// [`FntTable::recompute_all_addresses`] first when the table may have drifted.
///
/// ```
/// # fn doit() -> shadow_fnt::error::Result<()>
/// # {
/// use shadow_fnt::{Entry, FntTable, FntWriter};
///
/// let fnt = FntTable::from_entries(
///     "new.fnt",
///     "",
///     vec![Entry::builder().message_id_branch_sequence(10).subtitle("Hi").build()],
/// );
///
/// // We use a buffer here, though you'd normally use a `File`
/// let buffer = FntWriter::new(std::io::Cursor::new(Vec::new())).write_table(&fnt)?;
/// assert_eq!(buffer.get_ref().len(), 34);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct FntWriter<W: Write + Seek> {
    inner: W,
}

impl<W: Write + Seek> FntWriter<W> {
    pub fn new(inner: W) -> FntWriter<W> {
        FntWriter { inner }
    }

    /// Write the header, the entry records, the subtitles and the terminator, returning the writer
    #[instrument(skip_all, err, fields(entries = table.entry_count()))]
    pub fn write_table(mut self, table: &FntTable) -> Result<W> {
        FntHeader {
            entry_count: entry_count_field(table.entry_count())?,
        }
        .write(&mut self.inner)?;

        for entry in table {
            entry.to_record().write(&mut self.inner)?;
        }

        for entry in table {
            for unit in entry.subtitle().encode_utf16() {
                self.inner.write_u16::<LittleEndian>(unit)?;
            }
        }

        self.inner.write_all(&FILE_TERMINATOR)?;

        Ok(self.inner)
    }
}

/// Encode a table into the bytes of a FNT file
pub fn encode(table: &FntTable) -> Result<Vec<u8>> {
    let size = HEADER_SIZE
        + ENTRY_RECORD_SIZE * table.entry_count()
        + table
            .iter()
            .map(|e| e.subtitle_byte_len() as usize)
            .sum::<usize>()
        + FILE_TERMINATOR.len();

    let buffer = FntWriter::new(Cursor::new(Vec::with_capacity(size))).write_table(table)?;
    Ok(buffer.into_inner())
}

impl FntTable {
    /// Encode this table into the bytes of a FNT file, see [`encode`]
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(self)
    }
}
