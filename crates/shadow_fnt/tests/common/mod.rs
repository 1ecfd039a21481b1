#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use shadow_fnt::{Entry, EntryType, FntTable};

pub const ENTRY_COUNT: usize = 471;
pub const CAGE_INDEX: usize = 120;
pub const CAGE_ADDRESS: i32 = 23478;
pub const CAGE_KEY: i32 = 64100;
pub const CAGE_AUDIO: i32 = 1564;
pub const CAGE_SUBTITLE: &str = "This cage is protected by\nthose GUN soldiers.\0";

/// Text of `units - 1` characters, so it takes `units` code units once the NUL is added
pub fn filler(index: usize, units: usize) -> String {
    let mut text = format!("Line {index:03}:");
    let pattern = b"abcdefghijklmnopqrstuvwxyz ";
    let mut i = 0;
    while text.len() < units - 1 {
        text.push(pattern[(index + i) % pattern.len()] as char);
        i += 1;
    }
    text.truncate(units - 1);
    text
}

fn subtitle_units(index: usize) -> usize {
    match index {
        // 119 × 58 + 125 code units put entry 120 at address 23478
        0..=118 => 58,
        119 => 125,
        _ => 20 + index % 40,
    }
}

fn entry(index: usize) -> Entry {
    if index == CAGE_INDEX {
        return Entry::builder()
            .message_id_branch_sequence(CAGE_KEY)
            .entry_type(EntryType::TriggerObject)
            .subtitle_active_time(172)
            .audio_id(CAGE_AUDIO)
            .subtitle("This cage is protected by\r\nthose GUN soldiers.")
            .build();
    }

    Entry::builder()
        .message_id_branch_sequence(60500 + 30 * index as i32)
        .entry_type(EntryType::ALL[index % EntryType::ALL.len()])
        .subtitle_active_time(index as i32)
        .audio_id(1000 + index as i32)
        .subtitle(filler(index, subtitle_units(index)))
        .build()
}

/// A stage table shaped like `stg0100_EN.fnt`
pub fn stage_table() -> FntTable {
    FntTable::from_entries(
        "Assets\\stg0100_EN.fnt",
        "Assets",
        (0..ENTRY_COUNT).map(entry).collect(),
    )
}

/// Bytes of [`stage_table`] as the game ships them
pub fn stage_bytes() -> Vec<u8> {
    stage_table().encode().unwrap()
}

/// Write a FNT file from raw addresses and raw string bytes, the way older tools did
pub fn write_raw(table: &FntTable, addresses: &[i32], strings: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes
        .write_i32::<LittleEndian>(table.entry_count() as i32)
        .unwrap();

    for (entry, address) in table.iter().zip(addresses) {
        bytes.write_i32::<LittleEndian>(*address).unwrap();
        bytes
            .write_i32::<LittleEndian>(entry.message_id_branch_sequence)
            .unwrap();
        bytes
            .write_i32::<LittleEndian>(entry.entry_type.into())
            .unwrap();
        bytes
            .write_i32::<LittleEndian>(entry.subtitle_active_time)
            .unwrap();
        bytes.write_i32::<LittleEndian>(entry.audio_id).unwrap();
    }

    for string in strings {
        bytes.extend_from_slice(string);
    }
    bytes.extend_from_slice(&[0x00; 4]);
    bytes
}

/// UTF-16LE bytes of every subtitle in `table`
pub fn string_bytes(table: &FntTable) -> Vec<Vec<u8>> {
    table
        .iter()
        .map(|entry| {
            entry
                .subtitle()
                .encode_utf16()
                .flat_map(u16::to_le_bytes)
                .collect()
        })
        .collect()
}

/// Bytes of [`stage_table`] written by a tool that padded subtitle `index - 1` with an extra NUL,
/// moving every address from `index` onwards by two bytes
pub fn padded_bytes(index: usize) -> Vec<u8> {
    let table = stage_table();

    let mut strings = string_bytes(&table);
    strings[index - 1].extend_from_slice(&[0x00, 0x00]);

    let addresses = table
        .iter()
        .enumerate()
        .map(|(i, e)| {
            if i >= index {
                e.subtitle_address + 2
            } else {
                e.subtitle_address
            }
        })
        .collect::<Vec<_>>();

    write_raw(&table, &addresses, &strings)
}
