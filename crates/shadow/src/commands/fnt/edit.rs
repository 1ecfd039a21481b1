use clap::{Args, Subcommand, ValueEnum};
use miette::Result;
use shadow_fnt::{EntryType, FntTable};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EntryTypeArg {
    BackgroundVoice,
    MenuMessage,
    TriggerObject,
    IdleVoice,
    FinalEntry,
}

impl From<EntryTypeArg> for EntryType {
    fn from(value: EntryTypeArg) -> Self {
        match value {
            EntryTypeArg::BackgroundVoice => EntryType::BackgroundVoice,
            EntryTypeArg::MenuMessage => EntryType::MenuMessage,
            EntryTypeArg::TriggerObject => EntryType::TriggerObject,
            EntryTypeArg::IdleVoice => EntryType::IdleVoice,
            EntryTypeArg::FinalEntry => EntryType::FinalEntry,
        }
    }
}

#[derive(Subcommand)]
enum EditCommands {
    /// Replace the subtitle of an entry
    Subtitle {
        /// Index of the entry
        index: usize,
        /// The new text, `\r\n` is stored as `\n`
        text: String,
    },
    /// Change the fields of an entry
    Set {
        /// Index of the entry
        index: usize,
        /// New message id branch sequence
        #[arg(long)]
        key: Option<i32>,
        #[arg(long, value_enum)]
        entry_type: Option<EntryTypeArg>,
        #[arg(long)]
        active_time: Option<i32>,
        /// New audio id, `-1` for none
        #[arg(long, allow_negative_numbers = true)]
        audio_id: Option<i32>,
    },
    /// Insert a blank entry before the first entry with a greater key
    Insert {
        /// Message id branch sequence of the new entry
        key: i32,
    },
    /// Append a blank entry after the last one
    Append {
        /// Message id branch sequence of the new entry
        key: i32,
    },
    /// Remove an entry
    Delete {
        /// Index of the entry
        index: usize,
    },
}

impl EditCommands {
    fn apply(&self, fnt: &mut FntTable) -> Result<()> {
        match self {
            EditCommands::Subtitle { index, text } => fnt.set_subtitle(*index, text)?,
            EditCommands::Set {
                index,
                key,
                entry_type,
                active_time,
                audio_id,
            } => {
                if let Some(key) = key {
                    fnt.set_message_id_branch_sequence(*index, *key)?;
                }
                if let Some(entry_type) = entry_type {
                    fnt.set_entry_type(*index, (*entry_type).into())?;
                }
                if let Some(active_time) = active_time {
                    fnt.set_active_time(*index, *active_time)?;
                }
                if let Some(audio_id) = audio_id {
                    fnt.set_audio_id(*index, *audio_id)?;
                }
            }
            EditCommands::Insert { key } => {
                let index = fnt.insert_entry(*key)?;
                info!("inserted {} at {}", key, index);
            }
            EditCommands::Append { key } => {
                let index = fnt.append_entry(*key)?;
                info!("appended {} at {}", key, index);
            }
            EditCommands::Delete { index } => {
                let removed = fnt.delete_entry(*index)?;
                info!("deleted {:?}", removed.text());
            }
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct EditArgs {
    /// An input FNT file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target FNT file, the input is replaced when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting an existing output file
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Keep entry types the game does not define instead of failing
    #[arg(long, default_value_t = false)]
    preserve_unknown: bool,

    #[command(subcommand)]
    command: EditCommands,
}

impl EditArgs {
    pub fn handle(&self) -> Result<()> {
        let mut fnt = super::load(&self.file, "", self.preserve_unknown)?;

        self.command.apply(&mut fnt)?;
        fnt.recompute_all_addresses();

        let target = super::write_back(
            &self.file,
            self.output.as_deref(),
            &fnt.encode()?,
            self.overwrite,
        )?;
        info!("wrote {}", target.display());

        Ok(())
    }
}
