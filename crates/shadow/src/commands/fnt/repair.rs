use clap::Args;
use miette::{miette, IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Args)]
pub struct RepairArgs {
    /// An input FNT file, or a directory searched for FNT files
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// Where repaired files are written, mirroring the input when it is a directory
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Allow overwriting existing output files
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Only report which files are inconsistent
    #[arg(long, default_value_t = false)]
    check: bool,

    /// Keep entry types the game does not define instead of failing
    #[arg(long, default_value_t = false)]
    preserve_unknown: bool,
}

impl RepairArgs {
    /// Repair a single file, returning whether it needed it
    fn repair_file(&self, path: &Path, output: Option<&Path>) -> Result<bool> {
        let mut fnt = super::load(path, "", self.preserve_unknown)?;

        let Some(index) = fnt.first_inconsistent_address() else {
            info!("{} is consistent", path.display());
            return Ok(false);
        };

        warn!("{} is inconsistent from entry {}", path.display(), index);
        if self.check {
            return Ok(true);
        }

        fnt.recompute_all_addresses();
        let target = super::write_back(path, output, &fnt.encode()?, self.overwrite)?;
        info!("wrote {}", target.display());

        Ok(true)
    }

    pub fn handle(&self) -> Result<()> {
        if !self.file.is_dir() {
            self.repair_file(&self.file, self.output.as_deref())?;
            return Ok(());
        }

        let files = WalkDir::new(&self.file)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("fnt"))
            })
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("no FNT files found in {}", self.file.display()));
        }

        let mut repaired = 0;
        for file in &files {
            let target = self
                .output
                .as_ref()
                .map(|output| {
                    file.path()
                        .strip_prefix(&self.file)
                        .map(|relative| output.join(relative))
                })
                .transpose()
                .into_diagnostic()?;

            if self.repair_file(file.path(), target.as_deref())? {
                repaired += 1;
            }
        }

        info!("{} of {} files were inconsistent", repaired, files.len());
        Ok(())
    }
}
