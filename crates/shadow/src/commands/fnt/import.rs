use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use shadow_fnt::FntTable;
use std::{fs::File, io::BufReader, path::PathBuf};
use tracing::info;

#[derive(Args)]
pub struct ImportArgs {
    /// An input JSON file, as written by `export`
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target FNT file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        // subtitles are normalized and addresses laid out while deserializing
        let fnt: FntTable = serde_json::from_reader(BufReader::new(f))
            .into_diagnostic()
            .context(format!("parsing {}", &self.file.display()))?;

        super::save(&self.output, &fnt.encode()?, self.overwrite)?;
        info!("imported {} entries into {}", fnt.entry_count(), self.output.display());

        Ok(())
    }
}
