use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ExportArgs {
    /// An input FNT file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target JSON file, printed when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Keep entry types the game does not define instead of failing
    #[arg(long, default_value_t = false)]
    preserve_unknown: bool,
}

impl ExportArgs {
    pub fn handle(&self) -> Result<()> {
        let fnt = super::load(&self.file, "", self.preserve_unknown)?;

        let json = serde_json::to_string_pretty(&fnt)
            .into_diagnostic()
            .context(format!("serializing {}", self.file.display()))?;

        match &self.output {
            Some(output) => {
                super::save(output, json.as_bytes(), self.overwrite)?;
                info!("exported {} entries to {}", fnt.entry_count(), output.display());
            }
            None => println!("{}", json),
        }

        Ok(())
    }
}
