//! This library handles reading, editing and creating **FNT** subtitle tables used by *Shadow the Hedgehog*.
//!
//! # FNT Format Documentation
//!
//! A FNT file maps the message id branch sequences used by the game's dialogue logic to the subtitle
//! shown on screen, how long it stays visible and which audio clip plays with it. Every stage and
//! language has its own table, typically named like `stg0100_EN.fnt`.
//!
//! ## File Structure
//!
//! A FNT file consists of a header, followed by one record per entry, the string block and a terminator.
//!
//! | Offset (bytes)   | Field          | Description                                          |
//! |------------------|----------------|------------------------------------------------------|
//! | 0x0000           | Entry Count    | 4 bytes: Number of entry records (`N`)               |
//! | 0x0004           | Entry Records  | `N` × 20 bytes: One record per entry                 |
//! | 0x0004 + 20 × N  | String Block   | UTF-16LE subtitles stored back to back               |
//! | end - 4          | Terminator     | 4 bytes: Always zero                                 |
//!
//! ### Entry Record
//!
//! | Offset (bytes) | Field                      | Description                                            |
//! |----------------|----------------------------|--------------------------------------------------------|
//! | 0x0000         | Subtitle Address           | 4 bytes: Offset from the start of the file to the text |
//! | 0x0004         | Message Id Branch Sequence | 4 bytes: Key used by the dialogue branching logic      |
//! | 0x0008         | Entry Type                 | 4 bytes: What triggers the subtitle                    |
//! | 0x000C         | Subtitle Active Time       | 4 bytes: How long the subtitle is shown                |
//! | 0x0010         | Audio Id                   | 4 bytes: Audio clip to play, `-1` for none             |
//!
//! - **Entry Type**: One of
//!   - `0`: Background voice
//!   - `100`: Menu message
//!   - `201`: Trigger object
//!   - `300`: Idle voice
//!   - `999`: Final entry
//!
//! ### String Block
//!
//! Subtitles are stored in record order with no separators other than their own trailing NUL. The
//! length of a subtitle is the distance between its address and the next entry's address, the last
//! one runs up to its first NUL. The game expects `\n` line breaks and exactly one trailing NUL, and
//! the first subtitle must start right after the last record.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.fnt`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Text Encoding**: UTF-16LE, lengths counted in code units
//!

pub mod error;
pub mod read;
pub mod table;
pub mod types;
pub mod write;

pub use read::{decode, decode_with, DecodeOptions};
pub use table::{Entry, FntTable};
pub use types::EntryType;
pub use write::{encode, FntWriter};
