use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use shadow_fnt::Entry;
use std::path::PathBuf;

#[derive(Args)]
pub struct ShowArgs {
    /// An input FNT file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only show the entry at this index
    #[arg(short, long)]
    index: Option<usize>,

    /// Path prefix hidden from the displayed name
    #[arg(long, default_value = "")]
    filter: String,

    /// Keep entry types the game does not define instead of failing
    #[arg(long, default_value_t = false)]
    preserve_unknown: bool,
}

fn print_entry(index: usize, entry: &Entry) {
    println!(
        "{:>5} {:>8} {:>10} {:<16} {:>6} {:>6} {}",
        index.dimmed(),
        entry.subtitle_address,
        entry.message_id_branch_sequence.bold(),
        entry.entry_type.to_string(),
        entry.subtitle_active_time,
        entry.audio_id,
        format!("{:?}", entry.text()).green(),
    );
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let fnt = super::load(&self.file, &self.filter, self.preserve_unknown)?;

        println!("{} ({} entries)", fnt.bold(), fnt.entry_count());
        if let Some(index) = fnt.first_inconsistent_address() {
            println!(
                "{}",
                format!("addresses are inconsistent from entry {index}, run `repair`").yellow()
            );
        }

        println!(
            "{:>5} {:>8} {:>10} {:<16} {:>6} {:>6} {}",
            "index", "address", "key", "type", "time", "audio", "subtitle"
        );

        match self.index {
            Some(index) => print_entry(index, fnt.get_entry(index)?),
            None => {
                for (index, entry) in fnt.iter().enumerate() {
                    print_entry(index, entry);
                }
            }
        }

        Ok(())
    }
}
